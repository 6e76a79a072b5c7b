use mirin::gpu::*;
use mirin::utils::Handle;

/// Byte size of the one uniform block the test shader declares (a single
/// mat4 at offset 0).
#[allow(dead_code)]
pub const UNIFORM_BLOCK_SIZE: usize = 64;

pub fn test_context() -> (Context, NullTrace) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (backend, trace) = NullBackend::new();
    let ctx = Context::new(Box::new(backend), &ContextInfo::default())
        .unwrap_or_else(|e| panic!("context setup failed: {e}"));
    (ctx, trace)
}

#[allow(dead_code)]
pub fn test_context_with_caps(caps: Capabilities) -> (Context, NullTrace) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (backend, trace) = NullBackend::with_capabilities(caps);
    let ctx = Context::new(Box::new(backend), &ContextInfo::default())
        .unwrap_or_else(|e| panic!("context setup failed: {e}"));
    (ctx, trace)
}

#[allow(dead_code)]
pub fn test_context_with_info(info: &ContextInfo) -> (Context, NullTrace) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (backend, trace) = NullBackend::new();
    let ctx = Context::new(Box::new(backend), info)
        .unwrap_or_else(|e| panic!("context setup failed: {e}"));
    (ctx, trace)
}

/// The capability set the permissive [`NullBackend::new`] reports, for tests
/// that want everything on except a single feature.
#[allow(dead_code)]
pub fn full_caps() -> Capabilities {
    Capabilities {
        instanced_arrays: true,
        texture_compression_dxt: true,
        texture_compression_pvrtc: true,
        texture_compression_atc: true,
        texture_compression_etc2: true,
        texture_float: true,
        texture_half_float: true,
        origin_top_left: true,
        msaa_render_targets: true,
        packed_vertex_format_10_2: true,
        multiple_render_targets: true,
        imagetype_3d: true,
        imagetype_array: true,
    }
}

/// Minimal vertex+fragment shader: one 64-byte uniform block on the vertex
/// stage, no images.
#[allow(dead_code)]
pub fn basic_shader(ctx: &mut Context) -> Handle<Shader> {
    ctx.make_shader(&ShaderInfo {
        debug_name: "basic",
        vs: ShaderStageInfo {
            source: "void main() {}",
            uniform_blocks: &[UniformBlockLayout {
                size: UNIFORM_BLOCK_SIZE as u32,
                uniforms: &[UniformDesc {
                    name: "mvp",
                    offset: 0,
                    uniform_type: UniformType::Mat4,
                    array_count: 1,
                }],
            }],
            images: &[],
        },
        fs: ShaderStageInfo {
            source: "void main() {}",
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap_or_else(|e| panic!("basic shader: {e}"))
}

/// Non-indexed pipeline over one vertex buffer of packed Float3 positions.
#[allow(dead_code)]
pub fn basic_pipeline(ctx: &mut Context, shader: Handle<Shader>) -> Handle<Pipeline> {
    ctx.make_pipeline(&PipelineInfo {
        debug_name: "basic",
        shader,
        layout: VertexLayout {
            buffers: &[VertexBufferLayout {
                stride: 12,
                ..Default::default()
            }],
            attrs: &[VertexAttribute {
                name: "position",
                format: VertexFormat::Float3,
                ..Default::default()
            }],
        },
        ..Default::default()
    })
    .unwrap_or_else(|e| panic!("basic pipeline: {e}"))
}

/// Immutable vertex buffer holding `vertex_count` packed Float3 vertices.
#[allow(dead_code)]
pub fn vertex_buffer(ctx: &mut Context, vertex_count: usize) -> Handle<Buffer> {
    let bytes = vec![0u8; vertex_count * 12];
    ctx.make_buffer(&BufferInfo {
        debug_name: "vertices",
        size: bytes.len() as u32,
        buffer_type: BufferType::Vertex,
        usage: Usage::Immutable,
        initial_data: Some(&bytes),
        ..Default::default()
    })
    .unwrap_or_else(|e| panic!("vertex buffer: {e}"))
}

#[allow(dead_code)]
pub fn dynamic_buffer(ctx: &mut Context, size: u32) -> Handle<Buffer> {
    ctx.make_buffer(&BufferInfo {
        debug_name: "dynamic",
        size,
        buffer_type: BufferType::Vertex,
        usage: Usage::Dynamic,
        ..Default::default()
    })
    .unwrap_or_else(|e| panic!("dynamic buffer: {e}"))
}

#[allow(dead_code)]
pub fn render_target(ctx: &mut Context, width: u32, height: u32, format: PixelFormat) -> Handle<Image> {
    ctx.make_image(&ImageInfo {
        debug_name: "rt",
        render_target: true,
        width,
        height,
        format,
        ..Default::default()
    })
    .unwrap_or_else(|e| panic!("render target: {e}"))
}

/// Draw state binding `pipeline` with a single vertex buffer, matching what
/// [`basic_pipeline`] declares.
#[allow(dead_code)]
pub fn draw_state(pipeline: Handle<Pipeline>, vbuf: Handle<Buffer>) -> DrawState {
    let mut ds = DrawState {
        pipeline,
        ..Default::default()
    };
    ds.vertex_buffers[0] = vbuf;
    ds
}
