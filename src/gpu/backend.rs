use super::error::Result;
use super::structs::{
    BufferInfo, ImageInfo, PassAction, PassInfo, PipelineInfo, ShaderInfo, ShaderStage,
};

#[cfg(feature = "mirin-serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier a backend assigns to one created resource. The core
/// never interprets it; it only hands it back on later calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct BackendId(pub u64);

/// Feature answers a backend reports once at setup. The context caches the
/// snapshot and serves `query_feature` from it.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub struct Capabilities {
    pub instanced_arrays: bool,
    pub texture_compression_dxt: bool,
    pub texture_compression_pvrtc: bool,
    pub texture_compression_atc: bool,
    pub texture_compression_etc2: bool,
    pub texture_float: bool,
    pub texture_half_float: bool,
    /// Framebuffer origin convention. Callers of the viewport/scissor calls
    /// always use top-left; the pass controller flips Y for backends that
    /// report `false` here.
    pub origin_top_left: bool,
    pub msaa_render_targets: bool,
    pub packed_vertex_format_10_2: bool,
    pub multiple_render_targets: bool,
    pub imagetype_3d: bool,
    pub imagetype_array: bool,
}

impl Capabilities {
    pub fn query(&self, feature: super::structs::Feature) -> bool {
        use super::structs::Feature;
        match feature {
            Feature::InstancedArrays => self.instanced_arrays,
            Feature::TextureCompressionDxt => self.texture_compression_dxt,
            Feature::TextureCompressionPvrtc => self.texture_compression_pvrtc,
            Feature::TextureCompressionAtc => self.texture_compression_atc,
            Feature::TextureCompressionEtc2 => self.texture_compression_etc2,
            Feature::TextureFloat => self.texture_float,
            Feature::TextureHalfFloat => self.texture_half_float,
            Feature::OriginBottomLeft => !self.origin_top_left,
            Feature::OriginTopLeft => self.origin_top_left,
            Feature::MsaaRenderTargets => self.msaa_render_targets,
            Feature::PackedVertexFormat10_2 => self.packed_vertex_format_10_2,
            Feature::MultipleRenderTargets => self.multiple_render_targets,
            Feature::ImageType3d => self.imagetype_3d,
            Feature::ImageTypeArray => self.imagetype_array,
        }
    }
}

/// Pass begin parameters handed to the backend, with every handle already
/// resolved by the pass controller.
#[derive(Debug, Clone, Copy)]
pub struct PassBegin<'a> {
    /// `None` renders to the default framebuffer.
    pub pass: Option<BackendId>,
    pub action: &'a PassAction,
    pub width: u32,
    pub height: u32,
}

/// A fully resolved draw state: only backend ids of `Valid` resources, with
/// slot counts already trimmed to what the pipeline and shader declare.
#[derive(Debug, Clone, Copy)]
pub struct DrawStateBinding<'a> {
    pub pipeline: BackendId,
    pub vertex_buffers: &'a [BackendId],
    pub index_buffer: Option<BackendId>,
    pub vs_images: &'a [BackendId],
    pub fs_images: &'a [BackendId],
}

/// The native-API capability set injected at context setup.
///
/// One implementation exists per native graphics API; the context selects
/// it at runtime by taking a `Box<dyn Backend>`. The core guarantees the
/// command-sequencing contract before any method is called: creation
/// descriptors are validated, draw-state bindings are resolved and checked,
/// and pass brackets are balanced. Backends perform the real API work and
/// answer the capability snapshot, nothing else.
pub trait Backend {
    fn capabilities(&self) -> Capabilities;

    fn create_buffer(&mut self, info: &BufferInfo) -> Result<BackendId>;
    fn destroy_buffer(&mut self, id: BackendId);
    fn update_buffer(&mut self, id: BackendId, data: &[u8]);

    fn create_image(&mut self, info: &ImageInfo) -> Result<BackendId>;
    fn destroy_image(&mut self, id: BackendId);
    fn update_image(&mut self, id: BackendId, data: &[u8]);

    fn create_shader(&mut self, info: &ShaderInfo) -> Result<BackendId>;
    fn destroy_shader(&mut self, id: BackendId);

    fn create_pipeline(&mut self, info: &PipelineInfo, shader: BackendId) -> Result<BackendId>;
    fn destroy_pipeline(&mut self, id: BackendId);

    fn create_pass(
        &mut self,
        info: &PassInfo,
        color_images: &[BackendId],
        depth_image: Option<BackendId>,
    ) -> Result<BackendId>;
    fn destroy_pass(&mut self, id: BackendId);

    fn begin_pass(&mut self, begin: &PassBegin);
    fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn apply_draw_state(&mut self, binding: &DrawStateBinding);
    fn apply_uniform_block(&mut self, stage: ShaderStage, index: usize, data: &[u8]);
    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32);
    fn end_pass(&mut self);

    /// Frame boundary bookkeeping, called once per frame by
    /// [`crate::gpu::Context::commit`].
    fn commit(&mut self);

    /// Release backend-global state; called once from `Context::destroy`
    /// after every pooled resource has been torn down.
    fn shutdown(&mut self);
}
