use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::backend::{Backend, BackendId, Capabilities, DrawStateBinding, PassBegin};
use super::error::{GPUError, Result};
use super::structs::{
    BufferInfo, ImageInfo, PassInfo, PipelineInfo, ResourceKind, ShaderInfo, ShaderStage,
};

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub base_element: u32,
    pub num_elements: u32,
    pub num_instances: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Default)]
struct TraceInner {
    next_id: u64,
    live: HashSet<BackendId>,
    created: Vec<(ResourceKind, BackendId)>,
    draws: Vec<DrawCall>,
    draw_states: usize,
    passes_begun: usize,
    passes_ended: usize,
    viewports: Vec<Rect>,
    scissors: Vec<Rect>,
    uniform_uploads: Vec<(ShaderStage, usize, usize)>,
    buffer_updates: Vec<(BackendId, usize)>,
    image_updates: Vec<(BackendId, usize)>,
    commits: usize,
    shutdowns: usize,
    fail_next_create: bool,
}

/// Read-side handle to a [`NullBackend`]'s call trace.
///
/// Tests keep a clone of this after the backend itself moves into the
/// context, then assert on what actually reached the backend.
#[derive(Clone, Default)]
pub struct NullTrace(Arc<Mutex<TraceInner>>);

impl NullTrace {
    fn lock(&self) -> MutexGuard<'_, TraceInner> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.lock().draws.clone()
    }

    pub fn draw_call_count(&self) -> usize {
        self.lock().draws.len()
    }

    pub fn draw_state_count(&self) -> usize {
        self.lock().draw_states
    }

    /// Backend resources created and not yet destroyed.
    pub fn live_resources(&self) -> usize {
        self.lock().live.len()
    }

    pub fn created_count(&self, kind: ResourceKind) -> usize {
        self.lock().created.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn passes_begun(&self) -> usize {
        self.lock().passes_begun
    }

    pub fn passes_ended(&self) -> usize {
        self.lock().passes_ended
    }

    pub fn viewports(&self) -> Vec<Rect> {
        self.lock().viewports.clone()
    }

    pub fn scissors(&self) -> Vec<Rect> {
        self.lock().scissors.clone()
    }

    /// `(stage, block index, byte length)` per accepted uniform upload.
    pub fn uniform_uploads(&self) -> Vec<(ShaderStage, usize, usize)> {
        self.lock().uniform_uploads.clone()
    }

    pub fn buffer_update_count(&self) -> usize {
        self.lock().buffer_updates.len()
    }

    pub fn image_update_count(&self) -> usize {
        self.lock().image_updates.len()
    }

    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    pub fn shutdown_count(&self) -> usize {
        self.lock().shutdowns
    }

    /// Make the next `create_*` call report a backend failure, to exercise
    /// the `Failed` resource state without a real driver.
    pub fn fail_next_create(&self) {
        self.lock().fail_next_create = true;
    }
}

/// Backend that performs no GPU work and records every call instead.
///
/// Fills the same role the command-stream replay sinks do in other
/// renderers: tests and headless tools run the full resource and pass
/// protocol against it and inspect the resulting [`NullTrace`].
pub struct NullBackend {
    caps: Capabilities,
    trace: NullTrace,
}

impl NullBackend {
    /// A permissive backend: every feature available, top-left origin.
    pub fn new() -> (Self, NullTrace) {
        Self::with_capabilities(Capabilities {
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
        })
    }

    pub fn with_capabilities(caps: Capabilities) -> (Self, NullTrace) {
        let trace = NullTrace::default();
        (
            Self {
                caps,
                trace: trace.clone(),
            },
            trace,
        )
    }

    fn create(&mut self, kind: ResourceKind) -> Result<BackendId> {
        let mut inner = self.trace.lock();
        if inner.fail_next_create {
            inner.fail_next_create = false;
            return Err(GPUError::Backend(format!("injected {kind:?} failure")));
        }
        inner.next_id += 1;
        let id = BackendId(inner.next_id);
        inner.live.insert(id);
        inner.created.push((kind, id));
        Ok(id)
    }

    fn release(&mut self, id: BackendId) {
        let mut inner = self.trace.lock();
        let was_live = inner.live.remove(&id);
        debug_assert!(was_live, "double destroy of backend id {id:?}");
    }
}

impl Backend for NullBackend {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn create_buffer(&mut self, _info: &BufferInfo) -> Result<BackendId> {
        self.create(ResourceKind::Buffer)
    }

    fn destroy_buffer(&mut self, id: BackendId) {
        self.release(id);
    }

    fn update_buffer(&mut self, id: BackendId, data: &[u8]) {
        self.trace.lock().buffer_updates.push((id, data.len()));
    }

    fn create_image(&mut self, _info: &ImageInfo) -> Result<BackendId> {
        self.create(ResourceKind::Image)
    }

    fn destroy_image(&mut self, id: BackendId) {
        self.release(id);
    }

    fn update_image(&mut self, id: BackendId, data: &[u8]) {
        self.trace.lock().image_updates.push((id, data.len()));
    }

    fn create_shader(&mut self, _info: &ShaderInfo) -> Result<BackendId> {
        self.create(ResourceKind::Shader)
    }

    fn destroy_shader(&mut self, id: BackendId) {
        self.release(id);
    }

    fn create_pipeline(&mut self, _info: &PipelineInfo, _shader: BackendId) -> Result<BackendId> {
        self.create(ResourceKind::Pipeline)
    }

    fn destroy_pipeline(&mut self, id: BackendId) {
        self.release(id);
    }

    fn create_pass(
        &mut self,
        _info: &PassInfo,
        _color_images: &[BackendId],
        _depth_image: Option<BackendId>,
    ) -> Result<BackendId> {
        self.create(ResourceKind::Pass)
    }

    fn destroy_pass(&mut self, id: BackendId) {
        self.release(id);
    }

    fn begin_pass(&mut self, _begin: &PassBegin) {
        self.trace.lock().passes_begun += 1;
    }

    fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.trace.lock().viewports.push(Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.trace.lock().scissors.push(Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn apply_draw_state(&mut self, _binding: &DrawStateBinding) {
        self.trace.lock().draw_states += 1;
    }

    fn apply_uniform_block(&mut self, stage: ShaderStage, index: usize, data: &[u8]) {
        self.trace
            .lock()
            .uniform_uploads
            .push((stage, index, data.len()));
    }

    fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        self.trace.lock().draws.push(DrawCall {
            base_element,
            num_elements,
            num_instances,
        });
    }

    fn end_pass(&mut self) {
        self.trace.lock().passes_ended += 1;
    }

    fn commit(&mut self) {
        self.trace.lock().commits += 1;
    }

    fn shutdown(&mut self) {
        self.trace.lock().shutdowns += 1;
    }
}
