use crate::utils::Handle;
use super::backend::BackendId;

#[cfg(feature = "mirin-serde")]
use serde::{Deserialize, Serialize};

pub const NUM_SHADER_STAGES: usize = 2;
pub const MAX_COLOR_ATTACHMENTS: usize = 4;
pub const MAX_VERTEX_BUFFERS: usize = 4;
pub const MAX_STAGE_IMAGES: usize = 12;
pub const MAX_STAGE_UNIFORM_BLOCKS: usize = 4;
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;
pub const MAX_MIPMAPS: usize = 16;

pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
pub const DEFAULT_CLEAR_DEPTH: f32 = 1.0;
pub const DEFAULT_CLEAR_STENCIL: u8 = 0;

const CANARY_SENTINEL: u32 = 0x5AFE_C0DE;

/// Sentinel bracketing the public descriptor structs.
///
/// The only safe way to obtain one is `Default::default()`, which writes
/// the sentinel; a descriptor assembled through struct-update syntax is
/// therefore always well-formed. A mismatch at use time means the caller
/// handed over uninitialized or trampled memory, and continuing would risk
/// feeding garbage sizes to the backend, so it is a fatal usage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canary(u32);

impl Default for Canary {
    fn default() -> Self {
        Canary(CANARY_SENTINEL)
    }
}

impl Canary {
    pub fn intact(&self) -> bool {
        self.0 == CANARY_SENTINEL
    }

    #[cfg(test)]
    pub(crate) fn corrupted() -> Self {
        Canary(0)
    }
}

pub(crate) fn check_canaries(start: Canary, end: Canary, what: &str) {
    if !start.intact() || !end.intact() {
        panic!("corrupt canary on {what}: descriptor was not default-initialized");
    }
}

/// The five pooled resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum ResourceKind {
    Buffer,
    Image,
    Shader,
    Pipeline,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum BufferType {
    #[default]
    Vertex,
    Index,
}

/// Update strategy for buffers and images.
///
/// `Immutable` resources must be created with their full content and can
/// never be updated. `Dynamic` and `Stream` resources are created empty and
/// filled through the update calls, at most once per resource per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum Usage {
    #[default]
    Immutable,
    Dynamic,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum ImageType {
    #[default]
    Dim2,
    Cube,
    Dim3,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn index(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 1,
        }
    }
}

/// Common subset of pixel formats supported across the native APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    None,
    #[default]
    Rgba8,
    Rgb8,
    Rgba32F,
    Rgba16F,
    R32F,
    R16F,
    L8,
    Dxt1,
    Dxt3,
    Dxt5,
    Etc2Rgb8,
    Depth,
    DepthStencil,
}

impl PixelFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, PixelFormat::Depth | PixelFormat::DepthStencil)
    }

    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Etc2Rgb8
        )
    }

    /// Bytes per pixel. Compressed formats are block-based, not
    /// per-pixel, and report 0; they only appear on immutable images,
    /// which are never updated.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::None => 0,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba32F => 16,
            PixelFormat::Rgba16F => 8,
            PixelFormat::R32F => 4,
            PixelFormat::R16F => 2,
            PixelFormat::L8 => 1,
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Etc2Rgb8 => 0,
            PixelFormat::Depth => 4,
            PixelFormat::DepthStencil => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum IndexType {
    #[default]
    None,
    Uint16,
    Uint32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum Wrap {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Byte4,
    Byte4N,
    UByte4,
    UByte4N,
    Short2,
    Short2N,
    Short4,
    Short4N,
    Uint10N2,
}

impl VertexFormat {
    pub fn byte_size(&self) -> u32 {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Byte4
            | VertexFormat::Byte4N
            | VertexFormat::UByte4
            | VertexFormat::UByte4N
            | VertexFormat::Uint10N2 => 4,
            VertexFormat::Short2 | VertexFormat::Short2N => 4,
            VertexFormat::Short4 | VertexFormat::Short4N => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum VertexStep {
    #[default]
    PerVertex,
    PerInstance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum UniformType {
    Float,
    Float2,
    Float3,
    Float4,
    Mat4,
}

impl UniformType {
    pub fn byte_size(&self) -> u32 {
        match self {
            UniformType::Float => 4,
            UniformType::Float2 => 8,
            UniformType::Float3 => 12,
            UniformType::Float4 => 16,
            UniformType::Mat4 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    IncrClamp,
    DecrClamp,
    Invert,
    IncrWrap,
    DecrWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturated,
    BlendColor,
    OneMinusBlendColor,
    BlendAlpha,
    OneMinusBlendAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum BlendOp {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum FaceWinding {
    Ccw,
    #[default]
    Cw,
}

bitflags::bitflags! {
    /// Which color channels a pipeline writes to the framebuffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const RGB = 0x7;
        const RGBA = 0xF;
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        ColorMask::RGBA
    }
}

/// Optional capabilities a backend may or may not provide. Answered once at
/// setup and cached; see [`crate::gpu::Context::query_feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum Feature {
    InstancedArrays,
    TextureCompressionDxt,
    TextureCompressionPvrtc,
    TextureCompressionAtc,
    TextureCompressionEtc2,
    TextureFloat,
    TextureHalfFloat,
    OriginBottomLeft,
    OriginTopLeft,
    MsaaRenderTargets,
    PackedVertexFormat10_2,
    MultipleRenderTargets,
    ImageType3d,
    ImageTypeArray,
}

/// What happens to an attachment when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum Action {
    #[default]
    Clear,
    Load,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct ColorAction {
    pub action: Action,
    pub value: [f32; 4],
}

impl Default for ColorAction {
    fn default() -> Self {
        Self {
            action: Action::Clear,
            value: DEFAULT_CLEAR_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct DepthAction {
    pub action: Action,
    pub value: f32,
}

impl Default for DepthAction {
    fn default() -> Self {
        Self {
            action: Action::Clear,
            value: DEFAULT_CLEAR_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct StencilAction {
    pub action: Action,
    pub value: u8,
}

/// Per-attachment actions applied when a pass begins.
///
/// The default clears every attachment: color to (0.5, 0.5, 0.5, 1.0),
/// depth to 1.0, stencil to 0. The clear values are only consulted when the
/// corresponding action is [`Action::Clear`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PassAction {
    pub start_canary: Canary,
    pub colors: [ColorAction; MAX_COLOR_ATTACHMENTS],
    pub depth: DepthAction,
    pub stencil: StencilAction,
    pub end_canary: Canary,
}

/// The resource binding set consumed by `apply_draw_state`.
///
/// Only the slots the bound pipeline and its shader actually declare are
/// resolved; the rest can stay at their invalid defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawState {
    pub start_canary: Canary,
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffers: [Handle<Buffer>; MAX_VERTEX_BUFFERS],
    pub index_buffer: Handle<Buffer>,
    pub vs_images: [Handle<Image>; MAX_STAGE_IMAGES],
    pub fs_images: [Handle<Image>; MAX_STAGE_IMAGES],
    pub end_canary: Canary,
}

/// Context setup parameters. Pool sizes of zero fall back to the documented
/// defaults (128 buffers, 128 images, 32 shaders, 64 pipelines, 16 passes).
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextInfo {
    pub start_canary: Canary,
    pub buffer_pool_size: u32,
    pub image_pool_size: u32,
    pub shader_pool_size: u32,
    pub pipeline_pool_size: u32,
    pub pass_pool_size: u32,
    pub end_canary: Canary,
}

#[derive(Debug, Clone, Copy)]
pub struct BufferInfo<'a> {
    pub start_canary: Canary,
    pub debug_name: &'a str,
    pub size: u32,
    pub buffer_type: BufferType,
    pub usage: Usage,
    /// Required (with exactly `size` bytes) for immutable buffers,
    /// forbidden otherwise.
    pub initial_data: Option<&'a [u8]>,
    pub end_canary: Canary,
}

impl Default for BufferInfo<'_> {
    fn default() -> Self {
        Self {
            start_canary: Canary::default(),
            debug_name: "",
            size: 0,
            buffer_type: BufferType::default(),
            usage: Usage::default(),
            initial_data: None,
            end_canary: Canary::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageInfo<'a> {
    pub start_canary: Canary,
    pub debug_name: &'a str,
    pub image_type: ImageType,
    /// Render targets must be immutable and carry no initial data.
    pub render_target: bool,
    pub width: u32,
    pub height: u32,
    /// Depth for 3D images, layer count for array images, ignored (1) for
    /// the other types.
    pub depth_or_layers: u32,
    pub mip_count: u32,
    pub usage: Usage,
    pub format: PixelFormat,
    pub sample_count: u32,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap_u: Wrap,
    pub wrap_v: Wrap,
    pub wrap_w: Wrap,
    /// One slice per subimage: face-major, then mip level, scaled by
    /// depth/layer count for 3D and array images.
    pub initial_data: &'a [&'a [u8]],
    pub end_canary: Canary,
}

impl Default for ImageInfo<'_> {
    fn default() -> Self {
        Self {
            start_canary: Canary::default(),
            debug_name: "",
            image_type: ImageType::default(),
            render_target: false,
            width: 0,
            height: 0,
            depth_or_layers: 1,
            mip_count: 1,
            usage: Usage::default(),
            format: PixelFormat::default(),
            sample_count: 1,
            min_filter: Filter::default(),
            mag_filter: Filter::default(),
            wrap_u: Wrap::default(),
            wrap_v: Wrap::default(),
            wrap_w: Wrap::default(),
            initial_data: &[],
            end_canary: Canary::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UniformDesc<'a> {
    pub name: &'a str,
    pub offset: u32,
    pub uniform_type: UniformType,
    pub array_count: u32,
}

impl Default for UniformDesc<'_> {
    fn default() -> Self {
        Self {
            name: "",
            offset: 0,
            uniform_type: UniformType::Float,
            array_count: 1,
        }
    }
}

/// One uniform block as the shader declares it. `size` is the byte size
/// checked against `apply_uniform_block` data; the member list is optional
/// detail for backends that bind uniforms by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformBlockLayout<'a> {
    pub size: u32,
    pub uniforms: &'a [UniformDesc<'a>],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSlot<'a> {
    pub name: &'a str,
    pub image_type: ImageType,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderStageInfo<'a> {
    pub source: &'a str,
    pub uniform_blocks: &'a [UniformBlockLayout<'a>],
    pub images: &'a [ImageSlot<'a>],
}

#[derive(Debug, Clone, Copy)]
pub struct ShaderInfo<'a> {
    pub start_canary: Canary,
    pub debug_name: &'a str,
    pub vs: ShaderStageInfo<'a>,
    pub fs: ShaderStageInfo<'a>,
    pub end_canary: Canary,
}

impl Default for ShaderInfo<'_> {
    fn default() -> Self {
        Self {
            start_canary: Canary::default(),
            debug_name: "",
            vs: ShaderStageInfo::default(),
            fs: ShaderStageInfo::default(),
            end_canary: Canary::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VertexBufferLayout {
    pub stride: u32,
    pub step: VertexStep,
    pub step_rate: u32,
}

impl Default for VertexBufferLayout {
    fn default() -> Self {
        Self {
            stride: 0,
            step: VertexStep::default(),
            step_rate: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute<'a> {
    pub name: &'a str,
    pub buffer_index: usize,
    pub offset: u32,
    pub format: VertexFormat,
}

impl Default for VertexAttribute<'_> {
    fn default() -> Self {
        Self {
            name: "",
            buffer_index: 0,
            offset: 0,
            format: VertexFormat::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VertexLayout<'a> {
    pub buffers: &'a [VertexBufferLayout],
    pub attrs: &'a [VertexAttribute<'a>],
}

#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct StencilState {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub compare: CompareFunc,
}

#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct DepthStencilState {
    pub stencil_front: StencilState,
    pub stencil_back: StencilState,
    pub depth_compare: CompareFunc,
    pub depth_write_enabled: bool,
    pub stencil_enabled: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub stencil_ref: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct BlendState {
    pub enabled: bool,
    pub src_factor_rgb: BlendFactor,
    pub dst_factor_rgb: BlendFactor,
    pub op_rgb: BlendOp,
    pub src_factor_alpha: BlendFactor,
    pub dst_factor_alpha: BlendFactor,
    pub op_alpha: BlendOp,
    pub color_write_mask: ColorMask,
    pub blend_color: [f32; 4],
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            src_factor_rgb: BlendFactor::One,
            dst_factor_rgb: BlendFactor::Zero,
            op_rgb: BlendOp::Add,
            src_factor_alpha: BlendFactor::One,
            dst_factor_alpha: BlendFactor::Zero,
            op_alpha: BlendOp::Add,
            color_write_mask: ColorMask::RGBA,
            blend_color: [0.0; 4],
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct RasterizerState {
    pub alpha_to_coverage: bool,
    pub cull_mode: CullMode,
    pub face_winding: FaceWinding,
    pub sample_count: u32,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            alpha_to_coverage: false,
            cull_mode: CullMode::default(),
            face_winding: FaceWinding::default(),
            sample_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineInfo<'a> {
    pub start_canary: Canary,
    pub debug_name: &'a str,
    pub layout: VertexLayout<'a>,
    pub shader: Handle<Shader>,
    pub primitive_type: PrimitiveType,
    pub index_type: IndexType,
    pub depth_stencil: DepthStencilState,
    pub blend: BlendState,
    pub rasterizer: RasterizerState,
    pub end_canary: Canary,
}

impl Default for PipelineInfo<'_> {
    fn default() -> Self {
        Self {
            start_canary: Canary::default(),
            debug_name: "",
            layout: VertexLayout::default(),
            shader: Handle::invalid(),
            primitive_type: PrimitiveType::default(),
            index_type: IndexType::default(),
            depth_stencil: DepthStencilState::default(),
            blend: BlendState::default(),
            rasterizer: RasterizerState::default(),
            end_canary: Canary::default(),
        }
    }
}

/// One pass attachment: an image plus the subimage to render into.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentInfo {
    pub image: Handle<Image>,
    pub mip_level: u32,
    /// Cube face, array layer, or depth slice, depending on the image type.
    pub slice: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PassInfo<'a> {
    pub start_canary: Canary,
    pub debug_name: &'a str,
    /// 1..=4 color attachments; all images must be render targets of the
    /// same size, pixel format, and sample count.
    pub color_attachments: &'a [AttachmentInfo],
    pub depth_stencil_attachment: Option<AttachmentInfo>,
    pub end_canary: Canary,
}

impl Default for PassInfo<'_> {
    fn default() -> Self {
        Self {
            start_canary: Canary::default(),
            debug_name: "",
            color_attachments: &[],
            depth_stencil_attachment: None,
            end_canary: Canary::default(),
        }
    }
}

// Pool payloads. The public-facing names double as the phantom parameter of
// the typed handles, following the convention that Handle<Buffer> is what
// make_buffer returns. Fields hold the validated creation metadata later
// checks need, plus the backend's opaque id.

#[derive(Debug)]
pub struct Buffer {
    pub(crate) backend: BackendId,
    pub(crate) size: u32,
    pub(crate) buffer_type: BufferType,
    pub(crate) usage: Usage,
    pub(crate) update_frame: u64,
}

#[derive(Debug)]
pub struct Image {
    pub(crate) backend: BackendId,
    pub(crate) image_type: ImageType,
    pub(crate) render_target: bool,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) depth_or_layers: u32,
    pub(crate) mip_count: u32,
    pub(crate) usage: Usage,
    pub(crate) format: PixelFormat,
    pub(crate) sample_count: u32,
    pub(crate) update_frame: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StageLayout {
    pub(crate) uniform_block_sizes: Vec<u32>,
    pub(crate) image_types: Vec<ImageType>,
}

#[derive(Debug)]
pub struct Shader {
    pub(crate) backend: BackendId,
    pub(crate) stages: [StageLayout; NUM_SHADER_STAGES],
}

#[derive(Debug)]
pub struct Pipeline {
    pub(crate) backend: BackendId,
    pub(crate) shader: Handle<Shader>,
    pub(crate) vertex_buffer_count: usize,
    pub(crate) index_type: IndexType,
}

#[derive(Debug)]
pub struct RenderPass {
    pub(crate) backend: BackendId,
    pub(crate) width: u32,
    pub(crate) height: u32,
}
