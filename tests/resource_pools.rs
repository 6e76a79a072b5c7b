mod common;

use common::*;
use mirin::gpu::*;
use mirin::ResourceState;

#[test]
fn recycled_slot_gets_a_new_generation() {
    let (mut ctx, _trace) = test_context();

    let first = dynamic_buffer(&mut ctx, 64);
    ctx.destroy_buffer(first);
    let second = dynamic_buffer(&mut ctx, 64);

    // same physical slot, different identity
    assert_eq!(first.slot, second.slot);
    assert_ne!(first.generation, second.generation);

    // the stale handle reports Initial and reaches nothing
    assert_eq!(ctx.query_buffer_state(first), ResourceState::Initial);
    assert_eq!(ctx.query_buffer_state(second), ResourceState::Valid);
    assert!(matches!(
        ctx.update_buffer(first, &[0u8; 16]),
        Err(GPUError::InvalidHandle)
    ));
    assert!(ctx.update_buffer(second, &[0u8; 16]).is_ok());
}

#[test]
fn destroy_is_idempotent_and_stale_destroy_spares_the_new_occupant() {
    let (mut ctx, trace) = test_context();

    let first = dynamic_buffer(&mut ctx, 64);
    ctx.destroy_buffer(first);
    ctx.destroy_buffer(first);
    assert_eq!(trace.live_resources(), 0);

    let second = dynamic_buffer(&mut ctx, 64);
    ctx.destroy_buffer(first);
    assert_eq!(ctx.query_buffer_state(second), ResourceState::Valid);
    assert_eq!(trace.live_resources(), 1);
}

#[test]
fn alloc_init_walks_the_state_machine() {
    let (mut ctx, _trace) = test_context();

    let handle = ctx.alloc_buffer().unwrap();
    assert_eq!(ctx.query_buffer_state(handle), ResourceState::Alloc);

    ctx.init_buffer(
        handle,
        &BufferInfo {
            size: 64,
            usage: Usage::Dynamic,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(ctx.query_buffer_state(handle), ResourceState::Valid);

    ctx.destroy_buffer(handle);
    assert_eq!(ctx.query_buffer_state(handle), ResourceState::Initial);
}

#[test]
fn fail_resolves_an_allocation_without_a_backend_resource() {
    let (mut ctx, trace) = test_context();

    let handle = ctx.alloc_image().unwrap();
    ctx.fail_image(handle);
    assert_eq!(ctx.query_image_state(handle), ResourceState::Failed);
    assert_eq!(trace.live_resources(), 0);

    // failed slots stay destroyable
    ctx.destroy_image(handle);
    assert_eq!(ctx.query_image_state(handle), ResourceState::Initial);
}

#[test]
fn backend_refusal_leaves_the_slot_failed() {
    let (mut ctx, trace) = test_context();

    let handle = ctx.alloc_buffer().unwrap();
    trace.fail_next_create();
    let result = ctx.init_buffer(
        handle,
        &BufferInfo {
            size: 64,
            usage: Usage::Dynamic,
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(GPUError::Backend(_))));
    assert_eq!(ctx.query_buffer_state(handle), ResourceState::Failed);
    assert_eq!(trace.live_resources(), 0);
}

#[test]
fn validation_failure_leaves_the_slot_failed() {
    let (mut ctx, _trace) = test_context();

    let handle = ctx.alloc_buffer().unwrap();
    // immutable without data
    let result = ctx.init_buffer(
        handle,
        &BufferInfo {
            size: 64,
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(GPUError::Validation(_))));
    assert_eq!(ctx.query_buffer_state(handle), ResourceState::Failed);
}

#[test]
fn uniform_member_past_u32_range_is_rejected() {
    let (mut ctx, _trace) = test_context();

    // offset + member size wraps u32; must be a recoverable rejection
    let result = ctx.make_shader(&ShaderInfo {
        vs: ShaderStageInfo {
            source: "void main() {}",
            uniform_blocks: &[UniformBlockLayout {
                size: 64,
                uniforms: &[UniformDesc {
                    name: "mvp",
                    offset: u32::MAX,
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
    });
    assert!(matches!(result, Err(GPUError::Validation(_))));
}

#[test]
fn vertex_attribute_past_u32_range_is_rejected() {
    let (mut ctx, _trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let result = ctx.make_pipeline(&PipelineInfo {
        shader,
        layout: VertexLayout {
            buffers: &[VertexBufferLayout {
                stride: 12,
                ..Default::default()
            }],
            attrs: &[VertexAttribute {
                name: "position",
                offset: u32::MAX,
                format: VertexFormat::Float3,
                ..Default::default()
            }],
        },
        ..Default::default()
    });
    assert!(matches!(result, Err(GPUError::Validation(_))));
}

#[test]
fn compressed_images_cannot_be_dynamic() {
    let (mut ctx, _trace) = test_context();

    let result = ctx.make_image(&ImageInfo {
        width: 16,
        height: 16,
        format: PixelFormat::Dxt1,
        usage: Usage::Stream,
        ..Default::default()
    });
    assert!(matches!(result, Err(GPUError::Validation(_))));
}

#[test]
fn make_failure_returns_the_slot_to_the_pool() {
    let (mut ctx, _trace) = test_context_with_info(&ContextInfo {
        buffer_pool_size: 2,
        ..Default::default()
    });

    // zero size never validates; the slot must not leak
    for _ in 0..10 {
        assert!(ctx.make_buffer(&BufferInfo::default()).is_err());
    }
    let a = dynamic_buffer(&mut ctx, 16);
    let b = dynamic_buffer(&mut ctx, 16);
    assert_eq!(ctx.query_buffer_state(a), ResourceState::Valid);
    assert_eq!(ctx.query_buffer_state(b), ResourceState::Valid);
}

#[test]
fn exhausted_pool_reports_and_recovers() {
    let (mut ctx, _trace) = test_context_with_info(&ContextInfo {
        buffer_pool_size: 2,
        ..Default::default()
    });

    let a = dynamic_buffer(&mut ctx, 16);
    let _b = dynamic_buffer(&mut ctx, 16);
    assert!(matches!(
        ctx.alloc_buffer(),
        Err(GPUError::PoolExhausted(ResourceKind::Buffer))
    ));

    ctx.destroy_buffer(a);
    assert!(ctx.alloc_buffer().is_ok());
}

#[test]
fn context_destroy_releases_every_backend_resource() {
    let (mut ctx, trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let _pipeline = basic_pipeline(&mut ctx, shader);
    let _vbuf = vertex_buffer(&mut ctx, 3);
    let color = render_target(&mut ctx, 64, 64, PixelFormat::Rgba8);
    let _pass = ctx
        .make_pass(&PassInfo {
            color_attachments: &[AttachmentInfo {
                image: color,
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();
    assert!(trace.live_resources() > 0);

    ctx.destroy();
    assert_eq!(trace.live_resources(), 0);
    assert_eq!(trace.shutdown_count(), 1);
}

#[test]
fn handles_of_different_kinds_are_independent() {
    let (mut ctx, _trace) = test_context();

    let buffer = dynamic_buffer(&mut ctx, 16);
    let shader = basic_shader(&mut ctx);
    // same numeric slot, different pool
    assert_eq!(buffer.slot, 1);
    assert_eq!(shader.slot, 1);
    assert_eq!(ctx.query_buffer_state(buffer), ResourceState::Valid);
    assert_eq!(ctx.query_shader_state(shader), ResourceState::Valid);
    ctx.destroy_buffer(buffer);
    assert_eq!(ctx.query_shader_state(shader), ResourceState::Valid);
}
