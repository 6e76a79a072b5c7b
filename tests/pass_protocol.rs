//! Command-sequencing contract: pass brackets, draw-state ordering, the
//! frame boundary, and origin normalization.

mod common;

use common::*;
use mirin::gpu::*;

#[test]
#[should_panic(expected = "another pass is active")]
fn nested_pass_brackets_are_fatal() {
    let (mut ctx, _trace) = test_context();
    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    ctx.begin_default_pass(&PassAction::default(), 64, 64);
}

#[test]
#[should_panic(expected = "without an active pass")]
fn end_pass_outside_a_pass_is_fatal() {
    let (mut ctx, _trace) = test_context();
    ctx.end_pass();
}

#[test]
#[should_panic(expected = "inside a render pass")]
fn commit_inside_a_pass_is_fatal() {
    let (mut ctx, _trace) = test_context();
    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    ctx.commit();
}

#[test]
fn draw_calls_outside_a_pass_are_dropped() {
    let (mut ctx, trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let pipeline = basic_pipeline(&mut ctx, shader);
    let vbuf = vertex_buffer(&mut ctx, 3);

    ctx.apply_viewport(0, 0, 32, 32);
    ctx.apply_scissor_rect(0, 0, 32, 32);
    ctx.apply_draw_state(&draw_state(pipeline, vbuf));
    ctx.draw(0, 3, 1);
    ctx.commit();

    assert_eq!(trace.viewports().len(), 0);
    assert_eq!(trace.scissors().len(), 0);
    assert_eq!(trace.draw_state_count(), 0);
    assert_eq!(trace.draw_call_count(), 0);
    assert_eq!(trace.commit_count(), 1);
}

#[test]
fn a_full_frame_reaches_the_backend_in_order() {
    let (mut ctx, trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let pipeline = basic_pipeline(&mut ctx, shader);
    let vbuf = vertex_buffer(&mut ctx, 3);

    ctx.begin_default_pass(&PassAction::default(), 640, 480);
    ctx.apply_viewport(0, 0, 640, 480);
    ctx.apply_draw_state(&draw_state(pipeline, vbuf));
    ctx.apply_uniform_block(ShaderStage::Vertex, 0, &[0u8; UNIFORM_BLOCK_SIZE])
        .unwrap();
    ctx.draw(0, 3, 1);
    ctx.end_pass();
    ctx.commit();

    assert_eq!(trace.passes_begun(), 1);
    assert_eq!(trace.draw_state_count(), 1);
    assert_eq!(
        trace.uniform_uploads(),
        vec![(ShaderStage::Vertex, 0, UNIFORM_BLOCK_SIZE)]
    );
    assert_eq!(
        trace.draw_calls(),
        vec![DrawCall {
            base_element: 0,
            num_elements: 3,
            num_instances: 1,
        }]
    );
    assert_eq!(trace.passes_ended(), 1);
    assert_eq!(trace.commit_count(), 1);
}

#[test]
fn viewport_is_passed_through_on_top_left_backends() {
    let (mut ctx, trace) = test_context();

    ctx.begin_default_pass(&PassAction::default(), 640, 480);
    ctx.apply_viewport(10, 20, 300, 200);
    ctx.end_pass();

    assert_eq!(
        trace.viewports(),
        vec![Rect {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
        }]
    );
}

#[test]
fn viewport_and_scissor_flip_y_on_bottom_left_backends() {
    let (mut ctx, trace) = test_context_with_caps(Capabilities {
        origin_top_left: false,
        ..full_caps()
    });
    assert!(ctx.query_feature(Feature::OriginBottomLeft));

    ctx.begin_default_pass(&PassAction::default(), 640, 480);
    ctx.apply_viewport(10, 20, 300, 200);
    ctx.apply_scissor_rect(0, 0, 640, 480);
    ctx.end_pass();

    // y' = pass_height - y - height
    assert_eq!(
        trace.viewports(),
        vec![Rect {
            x: 10,
            y: 260,
            width: 300,
            height: 200,
        }]
    );
    assert_eq!(
        trace.scissors(),
        vec![Rect {
            x: 0,
            y: 0,
            width: 640,
            height: 480,
        }]
    );
}

#[test]
fn uniform_size_mismatch_is_an_error() {
    let (mut ctx, trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let pipeline = basic_pipeline(&mut ctx, shader);
    let vbuf = vertex_buffer(&mut ctx, 3);

    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    ctx.apply_draw_state(&draw_state(pipeline, vbuf));

    let short = [0u8; 16];
    match ctx.apply_uniform_block(ShaderStage::Vertex, 0, &short) {
        Err(GPUError::SizeMismatch {
            stage,
            index,
            expected,
            actual,
        }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert_eq!(index, 0);
            assert_eq!(expected, UNIFORM_BLOCK_SIZE as u32);
            assert_eq!(actual, 16);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
    assert_eq!(trace.uniform_uploads().len(), 0);
    ctx.end_pass();
}

#[test]
fn undeclared_uniform_block_slot_is_an_error() {
    let (mut ctx, _trace) = test_context();

    let shader = basic_shader(&mut ctx);
    let pipeline = basic_pipeline(&mut ctx, shader);
    let vbuf = vertex_buffer(&mut ctx, 3);

    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    ctx.apply_draw_state(&draw_state(pipeline, vbuf));
    // the fragment stage declares no blocks at all
    assert!(matches!(
        ctx.apply_uniform_block(ShaderStage::Fragment, 0, &[0u8; 4]),
        Err(GPUError::Validation(_))
    ));
    assert!(matches!(
        ctx.apply_uniform_block(ShaderStage::Vertex, 3, &[0u8; 4]),
        Err(GPUError::Validation(_))
    ));
    ctx.end_pass();
}

#[test]
fn uniform_upload_before_draw_state_is_dropped() {
    let (mut ctx, trace) = test_context();

    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    assert!(ctx
        .apply_uniform_block(ShaderStage::Vertex, 0, &[0u8; UNIFORM_BLOCK_SIZE])
        .is_ok());
    ctx.end_pass();
    assert_eq!(trace.uniform_uploads().len(), 0);
}

#[test]
fn instanced_draws_need_the_capability() {
    let (mut ctx, trace) = test_context_with_caps(Capabilities {
        instanced_arrays: false,
        ..full_caps()
    });

    let shader = basic_shader(&mut ctx);
    let pipeline = basic_pipeline(&mut ctx, shader);
    let vbuf = vertex_buffer(&mut ctx, 3);

    ctx.begin_default_pass(&PassAction::default(), 64, 64);
    ctx.apply_draw_state(&draw_state(pipeline, vbuf));
    ctx.draw(0, 3, 4);
    ctx.draw(0, 3, 1);
    ctx.end_pass();
    ctx.commit();

    // the instanced draw is dropped, the plain one goes through
    assert_eq!(trace.draw_call_count(), 1);
}

#[test]
fn multiple_passes_per_frame_are_balanced() {
    let (mut ctx, trace) = test_context();

    let color = render_target(&mut ctx, 64, 64, PixelFormat::Rgba8);
    let pass = ctx
        .make_pass(&PassInfo {
            color_attachments: &[AttachmentInfo {
                image: color,
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap();

    ctx.begin_pass(pass, &PassAction::default());
    ctx.end_pass();
    ctx.begin_default_pass(&PassAction::default(), 640, 480);
    ctx.end_pass();
    ctx.commit();

    assert_eq!(trace.passes_begun(), 2);
    assert_eq!(trace.passes_ended(), 2);
    assert_eq!(trace.commit_count(), 1);
}
