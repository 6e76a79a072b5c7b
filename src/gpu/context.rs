use log::{debug, info, warn};

use crate::utils::{Handle, Pool, ResourceState};

use super::backend::{Backend, BackendId, Capabilities, DrawStateBinding, PassBegin};
use super::error::{GPUError, Result};
use super::structs::*;

pub const DEFAULT_BUFFER_POOL_SIZE: u16 = 128;
pub const DEFAULT_IMAGE_POOL_SIZE: u16 = 128;
pub const DEFAULT_SHADER_POOL_SIZE: u16 = 32;
pub const DEFAULT_PIPELINE_POOL_SIZE: u16 = 64;
pub const DEFAULT_PASS_POOL_SIZE: u16 = 16;

/// State carried across one begin/end pass bracket.
struct PassScope {
    /// False when the pass handle itself did not resolve; the bracket is
    /// honored but no backend call is made until `end_pass`.
    valid: bool,
    /// Render-target height, for flipping Y on bottom-left-origin backends.
    height: u32,
    draw_state_applied: bool,
    draw_valid: bool,
    pipeline: Handle<Pipeline>,
}

/// A resolved draw state, ready to hand to the backend.
struct ResolvedDrawState {
    pipeline: BackendId,
    vertex_buffers: [BackendId; MAX_VERTEX_BUFFERS],
    vertex_buffer_count: usize,
    index_buffer: Option<BackendId>,
    vs_images: [BackendId; MAX_STAGE_IMAGES],
    vs_image_count: usize,
    fs_images: [BackendId; MAX_STAGE_IMAGES],
    fs_image_count: usize,
}

/// The process-wide GPU context: one generation-checked pool per resource
/// kind, the pass/draw-state controller, and the injected backend.
///
/// All operations must be called from one thread (the rendering thread).
/// The allocate/initialize split exists so payload bytes can be prepared
/// elsewhere, but the `init_*` call that mutates pool state still happens
/// here.
///
/// Construction is setup and [`Context::destroy`] is shutdown; an
/// unconfigured context cannot exist, so there is no "not initialized"
/// error state to check for.
pub struct Context {
    backend: Box<dyn Backend>,
    caps: Capabilities,
    buffers: Pool<Buffer>,
    images: Pool<Image>,
    shaders: Pool<Shader>,
    pipelines: Pool<Pipeline>,
    passes: Pool<RenderPass>,
    frame_index: u64,
    pass: Option<PassScope>,
}

impl Context {
    pub fn new(backend: Box<dyn Backend>, info: &ContextInfo) -> Result<Self> {
        check_canaries(info.start_canary, info.end_canary, "ContextInfo");
        let caps = backend.capabilities();
        let ctx = Self {
            backend,
            caps,
            buffers: Pool::new(pool_size(info.buffer_pool_size, DEFAULT_BUFFER_POOL_SIZE)?),
            images: Pool::new(pool_size(info.image_pool_size, DEFAULT_IMAGE_POOL_SIZE)?),
            shaders: Pool::new(pool_size(info.shader_pool_size, DEFAULT_SHADER_POOL_SIZE)?),
            pipelines: Pool::new(pool_size(
                info.pipeline_pool_size,
                DEFAULT_PIPELINE_POOL_SIZE,
            )?),
            passes: Pool::new(pool_size(info.pass_pool_size, DEFAULT_PASS_POOL_SIZE)?),
            frame_index: 1,
            pass: None,
        };
        info!(
            "gpu context ready: pools buffer={} image={} shader={} pipeline={} pass={}",
            ctx.buffers.capacity(),
            ctx.images.capacity(),
            ctx.shaders.capacity(),
            ctx.pipelines.capacity(),
            ctx.passes.capacity()
        );
        Ok(ctx)
    }

    /// Tear down every live resource across all pools, then release the
    /// backend. Constructing a new context afterwards starts from empty
    /// pools again.
    pub fn destroy(mut self) {
        for buffer in self.buffers.drain() {
            self.backend.destroy_buffer(buffer.backend);
        }
        for image in self.images.drain() {
            self.backend.destroy_image(image.backend);
        }
        for shader in self.shaders.drain() {
            self.backend.destroy_shader(shader.backend);
        }
        for pipeline in self.pipelines.drain() {
            self.backend.destroy_pipeline(pipeline.backend);
        }
        for pass in self.passes.drain() {
            self.backend.destroy_pass(pass.backend);
        }
        self.backend.shutdown();
        info!("gpu context destroyed");
    }

    pub fn query_feature(&self, feature: Feature) -> bool {
        self.caps.query(feature)
    }

    // ----- buffers ------------------------------------------------------

    pub fn make_buffer(&mut self, info: &BufferInfo) -> Result<Handle<Buffer>> {
        let handle = self.alloc_buffer()?;
        match self.init_buffer(handle, info) {
            Ok(()) => Ok(handle),
            Err(e) => {
                // synchronous creation has no use for a Failed slot
                self.destroy_buffer(handle);
                Err(e)
            }
        }
    }

    pub fn alloc_buffer(&mut self) -> Result<Handle<Buffer>> {
        self.buffers
            .allocate()
            .ok_or(GPUError::PoolExhausted(ResourceKind::Buffer))
    }

    pub fn init_buffer(&mut self, handle: Handle<Buffer>, info: &BufferInfo) -> Result<()> {
        check_canaries(info.start_canary, info.end_canary, "BufferInfo");
        if self.buffers.state(handle) != ResourceState::Alloc {
            return Err(GPUError::InvalidHandle);
        }
        if let Err(e) = validate_buffer_info(info) {
            self.buffers.fail(handle);
            warn!("buffer '{}' failed validation: {e}", info.debug_name);
            return Err(e);
        }
        match self.backend.create_buffer(info) {
            Ok(id) => {
                self.buffers.initialize(
                    handle,
                    Buffer {
                        backend: id,
                        size: info.size,
                        buffer_type: info.buffer_type,
                        usage: info.usage,
                        update_frame: 0,
                    },
                );
                debug!("buffer '{}': {} bytes", info.debug_name, info.size);
                Ok(())
            }
            Err(e) => {
                self.buffers.fail(handle);
                warn!("buffer '{}' failed in backend: {e}", info.debug_name);
                Err(e)
            }
        }
    }

    /// Resolve an in-flight allocation as failed, e.g. when the data that
    /// was being streamed in never arrived. No-op unless the slot is in the
    /// `Alloc` state.
    pub fn fail_buffer(&mut self, handle: Handle<Buffer>) {
        if self.buffers.fail(handle) {
            debug!("buffer slot {} marked failed", handle.slot);
        }
    }

    /// Idempotent: stale, invalid, and never-allocated handles are ignored.
    pub fn destroy_buffer(&mut self, handle: Handle<Buffer>) {
        if let Some(buffer) = self.buffers.destroy(handle) {
            self.backend.destroy_buffer(buffer.backend);
        }
    }

    pub fn query_buffer_state(&self, handle: Handle<Buffer>) -> ResourceState {
        self.buffers.state(handle)
    }

    /// Upload new content to a dynamic or stream buffer. At most one update
    /// per buffer per frame; a second call before the next [`Context::commit`]
    /// is a hard [`GPUError::UpdateBudgetExceeded`] error.
    pub fn update_buffer(&mut self, handle: Handle<Buffer>, data: &[u8]) -> Result<()> {
        let frame = self.frame_index;
        let buffer = self.buffers.get_mut(handle).ok_or(GPUError::InvalidHandle)?;
        if buffer.usage == Usage::Immutable {
            return Err(GPUError::Validation("immutable buffers cannot be updated"));
        }
        if data.len() as u64 > u64::from(buffer.size) {
            return Err(GPUError::Validation("update data exceeds buffer size"));
        }
        if buffer.update_frame == frame {
            return Err(GPUError::UpdateBudgetExceeded);
        }
        buffer.update_frame = frame;
        let id = buffer.backend;
        self.backend.update_buffer(id, data);
        Ok(())
    }

    // ----- images -------------------------------------------------------

    pub fn make_image(&mut self, info: &ImageInfo) -> Result<Handle<Image>> {
        let handle = self.alloc_image()?;
        match self.init_image(handle, info) {
            Ok(()) => Ok(handle),
            Err(e) => {
                self.destroy_image(handle);
                Err(e)
            }
        }
    }

    pub fn alloc_image(&mut self) -> Result<Handle<Image>> {
        self.images
            .allocate()
            .ok_or(GPUError::PoolExhausted(ResourceKind::Image))
    }

    pub fn init_image(&mut self, handle: Handle<Image>, info: &ImageInfo) -> Result<()> {
        check_canaries(info.start_canary, info.end_canary, "ImageInfo");
        if self.images.state(handle) != ResourceState::Alloc {
            return Err(GPUError::InvalidHandle);
        }
        if let Err(e) = validate_image_info(info, &self.caps) {
            self.images.fail(handle);
            warn!("image '{}' failed validation: {e}", info.debug_name);
            return Err(e);
        }
        match self.backend.create_image(info) {
            Ok(id) => {
                self.images.initialize(
                    handle,
                    Image {
                        backend: id,
                        image_type: info.image_type,
                        render_target: info.render_target,
                        width: info.width,
                        height: info.height,
                        depth_or_layers: info.depth_or_layers,
                        mip_count: info.mip_count,
                        usage: info.usage,
                        format: info.format,
                        sample_count: info.sample_count,
                        update_frame: 0,
                    },
                );
                debug!(
                    "image '{}': {}x{} {:?}",
                    info.debug_name, info.width, info.height, info.format
                );
                Ok(())
            }
            Err(e) => {
                self.images.fail(handle);
                warn!("image '{}' failed in backend: {e}", info.debug_name);
                Err(e)
            }
        }
    }

    pub fn fail_image(&mut self, handle: Handle<Image>) {
        if self.images.fail(handle) {
            debug!("image slot {} marked failed", handle.slot);
        }
    }

    pub fn destroy_image(&mut self, handle: Handle<Image>) {
        if let Some(image) = self.images.destroy(handle) {
            self.backend.destroy_image(image.backend);
        }
    }

    pub fn query_image_state(&self, handle: Handle<Image>) -> ResourceState {
        self.images.state(handle)
    }

    /// Same budget rules as [`Context::update_buffer`].
    pub fn update_image(&mut self, handle: Handle<Image>, data: &[u8]) -> Result<()> {
        let frame = self.frame_index;
        let image = self.images.get_mut(handle).ok_or(GPUError::InvalidHandle)?;
        if image.usage == Usage::Immutable {
            return Err(GPUError::Validation("immutable images cannot be updated"));
        }
        if data.len() as u64 > image_byte_capacity(image) {
            return Err(GPUError::Validation("update data exceeds image size"));
        }
        if image.update_frame == frame {
            return Err(GPUError::UpdateBudgetExceeded);
        }
        image.update_frame = frame;
        let id = image.backend;
        self.backend.update_image(id, data);
        Ok(())
    }

    // ----- shaders ------------------------------------------------------

    pub fn make_shader(&mut self, info: &ShaderInfo) -> Result<Handle<Shader>> {
        let handle = self.alloc_shader()?;
        match self.init_shader(handle, info) {
            Ok(()) => Ok(handle),
            Err(e) => {
                self.destroy_shader(handle);
                Err(e)
            }
        }
    }

    pub fn alloc_shader(&mut self) -> Result<Handle<Shader>> {
        self.shaders
            .allocate()
            .ok_or(GPUError::PoolExhausted(ResourceKind::Shader))
    }

    pub fn init_shader(&mut self, handle: Handle<Shader>, info: &ShaderInfo) -> Result<()> {
        check_canaries(info.start_canary, info.end_canary, "ShaderInfo");
        if self.shaders.state(handle) != ResourceState::Alloc {
            return Err(GPUError::InvalidHandle);
        }
        if let Err(e) = validate_shader_info(info) {
            self.shaders.fail(handle);
            warn!("shader '{}' failed validation: {e}", info.debug_name);
            return Err(e);
        }
        match self.backend.create_shader(info) {
            Ok(id) => {
                self.shaders.initialize(
                    handle,
                    Shader {
                        backend: id,
                        stages: [stage_layout(&info.vs), stage_layout(&info.fs)],
                    },
                );
                debug!("shader '{}'", info.debug_name);
                Ok(())
            }
            Err(e) => {
                self.shaders.fail(handle);
                warn!("shader '{}' failed in backend: {e}", info.debug_name);
                Err(e)
            }
        }
    }

    pub fn fail_shader(&mut self, handle: Handle<Shader>) {
        if self.shaders.fail(handle) {
            debug!("shader slot {} marked failed", handle.slot);
        }
    }

    pub fn destroy_shader(&mut self, handle: Handle<Shader>) {
        if let Some(shader) = self.shaders.destroy(handle) {
            self.backend.destroy_shader(shader.backend);
        }
    }

    pub fn query_shader_state(&self, handle: Handle<Shader>) -> ResourceState {
        self.shaders.state(handle)
    }

    // ----- pipelines ----------------------------------------------------

    pub fn make_pipeline(&mut self, info: &PipelineInfo) -> Result<Handle<Pipeline>> {
        let handle = self.alloc_pipeline()?;
        match self.init_pipeline(handle, info) {
            Ok(()) => Ok(handle),
            Err(e) => {
                self.destroy_pipeline(handle);
                Err(e)
            }
        }
    }

    pub fn alloc_pipeline(&mut self) -> Result<Handle<Pipeline>> {
        self.pipelines
            .allocate()
            .ok_or(GPUError::PoolExhausted(ResourceKind::Pipeline))
    }

    pub fn init_pipeline(&mut self, handle: Handle<Pipeline>, info: &PipelineInfo) -> Result<()> {
        check_canaries(info.start_canary, info.end_canary, "PipelineInfo");
        if self.pipelines.state(handle) != ResourceState::Alloc {
            return Err(GPUError::InvalidHandle);
        }
        let shader_id = match self.shaders.get(info.shader) {
            Some(shader) => shader.backend,
            None => {
                self.pipelines.fail(handle);
                warn!(
                    "pipeline '{}' references a shader that is not valid",
                    info.debug_name
                );
                return Err(GPUError::Validation("pipeline shader handle is not valid"));
            }
        };
        if let Err(e) = validate_pipeline_info(info, &self.caps) {
            self.pipelines.fail(handle);
            warn!("pipeline '{}' failed validation: {e}", info.debug_name);
            return Err(e);
        }
        match self.backend.create_pipeline(info, shader_id) {
            Ok(id) => {
                self.pipelines.initialize(
                    handle,
                    Pipeline {
                        backend: id,
                        shader: info.shader,
                        vertex_buffer_count: info.layout.buffers.len(),
                        index_type: info.index_type,
                    },
                );
                debug!("pipeline '{}'", info.debug_name);
                Ok(())
            }
            Err(e) => {
                self.pipelines.fail(handle);
                warn!("pipeline '{}' failed in backend: {e}", info.debug_name);
                Err(e)
            }
        }
    }

    pub fn fail_pipeline(&mut self, handle: Handle<Pipeline>) {
        if self.pipelines.fail(handle) {
            debug!("pipeline slot {} marked failed", handle.slot);
        }
    }

    pub fn destroy_pipeline(&mut self, handle: Handle<Pipeline>) {
        if let Some(pipeline) = self.pipelines.destroy(handle) {
            self.backend.destroy_pipeline(pipeline.backend);
        }
    }

    pub fn query_pipeline_state(&self, handle: Handle<Pipeline>) -> ResourceState {
        self.pipelines.state(handle)
    }

    // ----- passes -------------------------------------------------------

    pub fn make_pass(&mut self, info: &PassInfo) -> Result<Handle<RenderPass>> {
        let handle = self.alloc_pass()?;
        match self.init_pass(handle, info) {
            Ok(()) => Ok(handle),
            Err(e) => {
                self.destroy_pass(handle);
                Err(e)
            }
        }
    }

    pub fn alloc_pass(&mut self) -> Result<Handle<RenderPass>> {
        self.passes
            .allocate()
            .ok_or(GPUError::PoolExhausted(ResourceKind::Pass))
    }

    pub fn init_pass(&mut self, handle: Handle<RenderPass>, info: &PassInfo) -> Result<()> {
        check_canaries(info.start_canary, info.end_canary, "PassInfo");
        if self.passes.state(handle) != ResourceState::Alloc {
            return Err(GPUError::InvalidHandle);
        }
        let resolved = match self.resolve_pass_attachments(info) {
            Ok(r) => r,
            Err(e) => {
                self.passes.fail(handle);
                warn!("pass '{}' failed validation: {e}", info.debug_name);
                return Err(e);
            }
        };
        let (color_ids, color_count, depth_id, width, height) = resolved;
        match self
            .backend
            .create_pass(info, &color_ids[..color_count], depth_id)
        {
            Ok(id) => {
                self.passes.initialize(
                    handle,
                    RenderPass {
                        backend: id,
                        width,
                        height,
                    },
                );
                debug!("pass '{}': {}x{}", info.debug_name, width, height);
                Ok(())
            }
            Err(e) => {
                self.passes.fail(handle);
                warn!("pass '{}' failed in backend: {e}", info.debug_name);
                Err(e)
            }
        }
    }

    pub fn fail_pass(&mut self, handle: Handle<RenderPass>) {
        if self.passes.fail(handle) {
            debug!("pass slot {} marked failed", handle.slot);
        }
    }

    pub fn destroy_pass(&mut self, handle: Handle<RenderPass>) {
        if let Some(pass) = self.passes.destroy(handle) {
            self.backend.destroy_pass(pass.backend);
        }
    }

    pub fn query_pass_state(&self, handle: Handle<RenderPass>) -> ResourceState {
        self.passes.state(handle)
    }

    #[allow(clippy::type_complexity)]
    fn resolve_pass_attachments(
        &self,
        info: &PassInfo,
    ) -> Result<(
        [BackendId; MAX_COLOR_ATTACHMENTS],
        usize,
        Option<BackendId>,
        u32,
        u32,
    )> {
        let count = info.color_attachments.len();
        if count == 0 {
            return Err(GPUError::Validation(
                "a pass needs at least one color attachment",
            ));
        }
        if count > MAX_COLOR_ATTACHMENTS {
            return Err(GPUError::Validation("too many color attachments"));
        }
        if count > 1 && !self.caps.multiple_render_targets {
            return Err(GPUError::Validation(
                "backend does not support multiple render targets",
            ));
        }

        let mut color_ids = [BackendId::default(); MAX_COLOR_ATTACHMENTS];
        let mut width = 0;
        let mut height = 0;
        let mut sample_count = 0;
        let mut format = PixelFormat::None;
        for (i, attachment) in info.color_attachments.iter().enumerate() {
            let image = self
                .images
                .get(attachment.image)
                .ok_or(GPUError::Validation("color attachment image is not valid"))?;
            validate_attachment(attachment, image)?;
            if image.format.is_depth() {
                return Err(GPUError::Validation(
                    "color attachment has a depth pixel format",
                ));
            }
            if i == 0 {
                width = image.width;
                height = image.height;
                sample_count = image.sample_count;
                format = image.format;
            } else {
                if image.width != width || image.height != height {
                    return Err(GPUError::Validation("attachment sizes differ"));
                }
                if image.sample_count != sample_count {
                    return Err(GPUError::Validation("attachment sample counts differ"));
                }
                if image.format != format {
                    return Err(GPUError::Validation(
                        "color attachment pixel formats differ",
                    ));
                }
            }
            color_ids[i] = image.backend;
        }

        let mut depth_id = None;
        if let Some(attachment) = &info.depth_stencil_attachment {
            let image = self.images.get(attachment.image).ok_or(GPUError::Validation(
                "depth-stencil attachment image is not valid",
            ))?;
            validate_attachment(attachment, image)?;
            if !image.format.is_depth() {
                return Err(GPUError::Validation(
                    "depth-stencil attachment needs a depth pixel format",
                ));
            }
            if image.width != width || image.height != height {
                return Err(GPUError::Validation("attachment sizes differ"));
            }
            if image.sample_count != sample_count {
                return Err(GPUError::Validation("attachment sample counts differ"));
            }
            depth_id = Some(image.backend);
        }

        Ok((color_ids, count, depth_id, width, height))
    }

    // ----- pass bracket and draw state ----------------------------------

    /// Begin rendering to the default framebuffer. Calling this while
    /// another pass is active is a contract violation and panics.
    pub fn begin_default_pass(&mut self, action: &PassAction, width: u32, height: u32) {
        check_canaries(action.start_canary, action.end_canary, "PassAction");
        assert!(
            self.pass.is_none(),
            "begin_default_pass called while another pass is active"
        );
        self.backend.begin_pass(&PassBegin {
            pass: None,
            action,
            width,
            height,
        });
        self.pass = Some(PassScope {
            valid: true,
            height,
            draw_state_applied: false,
            draw_valid: false,
            pipeline: Handle::invalid(),
        });
    }

    /// Begin rendering to an offscreen pass. A handle that does not resolve
    /// to a valid pass still opens the bracket, but every operation until
    /// `end_pass` is silently dropped; async-loading render targets skip
    /// frames instead of failing them.
    pub fn begin_pass(&mut self, handle: Handle<RenderPass>, action: &PassAction) {
        check_canaries(action.start_canary, action.end_canary, "PassAction");
        assert!(
            self.pass.is_none(),
            "begin_pass called while another pass is active"
        );
        match self.passes.get(handle) {
            Some(pass) => {
                let (id, width, height) = (pass.backend, pass.width, pass.height);
                self.backend.begin_pass(&PassBegin {
                    pass: Some(id),
                    action,
                    width,
                    height,
                });
                self.pass = Some(PassScope {
                    valid: true,
                    height,
                    draw_state_applied: false,
                    draw_valid: false,
                    pipeline: Handle::invalid(),
                });
            }
            None => {
                warn!("begin_pass: pass handle not valid, dropping pass content");
                self.pass = Some(PassScope {
                    valid: false,
                    height: 0,
                    draw_state_applied: false,
                    draw_valid: false,
                    pipeline: Handle::invalid(),
                });
            }
        }
    }

    /// Set the viewport for subsequent draws, in the top-left origin
    /// convention regardless of backend. Outside a pass this is a no-op.
    pub fn apply_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some(scope) = &self.pass else {
            warn!("apply_viewport called outside a render pass");
            return;
        };
        if !scope.valid {
            return;
        }
        let y = self.flip_y(y, height, scope.height);
        self.backend.apply_viewport(x, y, width, height);
    }

    /// Same convention handling as [`Context::apply_viewport`].
    pub fn apply_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some(scope) = &self.pass else {
            warn!("apply_scissor_rect called outside a render pass");
            return;
        };
        if !scope.valid {
            return;
        }
        let y = self.flip_y(y, height, scope.height);
        self.backend.apply_scissor_rect(x, y, width, height);
    }

    fn flip_y(&self, y: i32, height: i32, pass_height: u32) -> i32 {
        if self.caps.origin_top_left {
            y
        } else {
            pass_height as i32 - y - height
        }
    }

    /// Bind a pipeline and its resources for subsequent draws. If any
    /// required binding does not resolve to a `Valid` resource the call is
    /// still accepted, but draws are dropped until the next valid draw
    /// state; partially loaded scenes skip content instead of crashing.
    /// Outside a pass this is a no-op.
    pub fn apply_draw_state(&mut self, ds: &DrawState) {
        check_canaries(ds.start_canary, ds.end_canary, "DrawState");
        if self.pass.is_none() {
            warn!("apply_draw_state called outside a render pass");
            return;
        }
        let resolved = self.resolve_draw_state(ds);
        let Some(scope) = self.pass.as_mut() else {
            return;
        };
        scope.draw_state_applied = true;
        scope.pipeline = ds.pipeline;
        scope.draw_valid = scope.valid && resolved.is_some();
        if !scope.valid {
            return;
        }
        match resolved {
            Some(r) => {
                self.backend.apply_draw_state(&DrawStateBinding {
                    pipeline: r.pipeline,
                    vertex_buffers: &r.vertex_buffers[..r.vertex_buffer_count],
                    index_buffer: r.index_buffer,
                    vs_images: &r.vs_images[..r.vs_image_count],
                    fs_images: &r.fs_images[..r.fs_image_count],
                });
            }
            None => {
                warn!("draw state references unusable resources, draws will be skipped");
            }
        }
    }

    fn resolve_draw_state(&self, ds: &DrawState) -> Option<ResolvedDrawState> {
        let pipeline = self.pipelines.get(ds.pipeline)?;
        let shader = self.shaders.get(pipeline.shader)?;

        let mut resolved = ResolvedDrawState {
            pipeline: pipeline.backend,
            vertex_buffers: [BackendId::default(); MAX_VERTEX_BUFFERS],
            vertex_buffer_count: pipeline.vertex_buffer_count,
            index_buffer: None,
            vs_images: [BackendId::default(); MAX_STAGE_IMAGES],
            vs_image_count: shader.stages[0].image_types.len(),
            fs_images: [BackendId::default(); MAX_STAGE_IMAGES],
            fs_image_count: shader.stages[1].image_types.len(),
        };

        for i in 0..pipeline.vertex_buffer_count {
            let buffer = self.buffers.get(ds.vertex_buffers[i])?;
            if buffer.buffer_type != BufferType::Vertex {
                return None;
            }
            resolved.vertex_buffers[i] = buffer.backend;
        }

        if pipeline.index_type != IndexType::None {
            let buffer = self.buffers.get(ds.index_buffer)?;
            if buffer.buffer_type != BufferType::Index {
                return None;
            }
            resolved.index_buffer = Some(buffer.backend);
        }

        for (i, declared) in shader.stages[0].image_types.iter().enumerate() {
            let image = self.images.get(ds.vs_images[i])?;
            if image.image_type != *declared {
                return None;
            }
            resolved.vs_images[i] = image.backend;
        }
        for (i, declared) in shader.stages[1].image_types.iter().enumerate() {
            let image = self.images.get(ds.fs_images[i])?;
            if image.image_type != *declared {
                return None;
            }
            resolved.fs_images[i] = image.backend;
        }

        Some(resolved)
    }

    /// Upload uniform data for one block slot of the currently bound
    /// shader stage. The byte length must exactly match the size the
    /// shader declared. While the current draw state is invalid the call
    /// is silently accepted, consistent with draws being skipped.
    pub fn apply_uniform_block(
        &mut self,
        stage: ShaderStage,
        index: usize,
        data: &[u8],
    ) -> Result<()> {
        let Some(scope) = &self.pass else {
            warn!("apply_uniform_block called outside a render pass");
            return Ok(());
        };
        if !scope.draw_state_applied {
            warn!("apply_uniform_block called before apply_draw_state");
            return Ok(());
        }
        if !scope.valid || !scope.draw_valid {
            return Ok(());
        }
        let pipeline = self
            .pipelines
            .get(scope.pipeline)
            .ok_or(GPUError::InvalidHandle)?;
        let shader = self
            .shaders
            .get(pipeline.shader)
            .ok_or(GPUError::InvalidHandle)?;
        let blocks = &shader.stages[stage.index()].uniform_block_sizes;
        let expected = *blocks.get(index).ok_or(GPUError::Validation(
            "no uniform block declared at this slot",
        ))?;
        if data.len() as u32 != expected {
            return Err(GPUError::SizeMismatch {
                stage,
                index,
                expected,
                actual: data.len() as u32,
            });
        }
        self.backend.apply_uniform_block(stage, index, data);
        Ok(())
    }

    /// Issue a draw. A silent no-op unless a pass is active and the current
    /// draw state resolved completely; a frame rendered before its content
    /// finished loading simply omits the draw.
    pub fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        let Some(scope) = &self.pass else {
            warn!("draw called outside a render pass");
            return;
        };
        if !scope.valid || !scope.draw_valid {
            return;
        }
        if num_instances > 1 && !self.caps.instanced_arrays {
            warn!("instanced draw skipped: backend lacks instanced arrays");
            return;
        }
        self.backend.draw(base_element, num_elements, num_instances);
    }

    /// Close the current pass bracket. Calling without an active pass is a
    /// contract violation and panics.
    pub fn end_pass(&mut self) {
        let scope = self
            .pass
            .take()
            .expect("end_pass called without an active pass");
        if scope.valid {
            self.backend.end_pass();
        }
    }

    /// Frame boundary. Resets the per-resource update budgets and lets the
    /// backend run its end-of-frame bookkeeping. Must be called outside a
    /// pass bracket, once per frame.
    pub fn commit(&mut self) {
        assert!(self.pass.is_none(), "commit called inside a render pass");
        self.frame_index += 1;
        self.backend.commit();
    }
}

fn pool_size(requested: u32, default: u16) -> Result<u16> {
    if requested == 0 {
        Ok(default)
    } else {
        u16::try_from(requested)
            .map_err(|_| GPUError::Validation("pool size exceeds the 16-bit slot index space"))
    }
}

fn stage_layout(info: &ShaderStageInfo) -> StageLayout {
    StageLayout {
        uniform_block_sizes: info.uniform_blocks.iter().map(|b| b.size).collect(),
        image_types: info.images.iter().map(|s| s.image_type).collect(),
    }
}

fn validate_buffer_info(info: &BufferInfo) -> Result<()> {
    if info.size == 0 {
        return Err(GPUError::Validation("buffer size must be > 0"));
    }
    match info.usage {
        Usage::Immutable => match info.initial_data {
            Some(data) if data.len() as u64 == u64::from(info.size) => Ok(()),
            Some(_) => Err(GPUError::Validation(
                "immutable buffer data length must equal the buffer size",
            )),
            None => Err(GPUError::Validation(
                "immutable buffers require initial data",
            )),
        },
        Usage::Dynamic | Usage::Stream => {
            if info.initial_data.is_some() {
                Err(GPUError::Validation(
                    "dynamic and stream buffers are created without data",
                ))
            } else {
                Ok(())
            }
        }
    }
}

fn image_byte_capacity(image: &Image) -> u64 {
    let bpp = u64::from(image.format.bytes_per_pixel());
    let layers = u64::from(image.depth_or_layers);
    let mut total = 0;
    for mip in 0..image.mip_count {
        let w = u64::from((image.width >> mip).max(1));
        let h = u64::from((image.height >> mip).max(1));
        total += w * h * layers * bpp;
    }
    total
}

fn expected_subimage_count(info: &ImageInfo) -> usize {
    let faces = if info.image_type == ImageType::Cube {
        6
    } else {
        1
    };
    let layers = match info.image_type {
        ImageType::Dim3 | ImageType::Array => info.depth_or_layers as usize,
        _ => 1,
    };
    faces * layers * info.mip_count as usize
}

fn validate_image_info(info: &ImageInfo, caps: &Capabilities) -> Result<()> {
    if info.width == 0 || info.height == 0 {
        return Err(GPUError::Validation("image dimensions must be > 0"));
    }
    if info.depth_or_layers == 0 {
        return Err(GPUError::Validation("image depth/layer count must be > 0"));
    }
    if info.mip_count == 0 || info.mip_count as usize > MAX_MIPMAPS {
        return Err(GPUError::Validation("mip count out of range"));
    }
    if info.sample_count == 0 {
        return Err(GPUError::Validation("sample count must be > 0"));
    }
    if info.format == PixelFormat::None {
        return Err(GPUError::Validation("image needs a pixel format"));
    }
    match info.image_type {
        ImageType::Dim3 if !caps.imagetype_3d => {
            return Err(GPUError::Validation("backend does not support 3D images"));
        }
        ImageType::Array if !caps.imagetype_array => {
            return Err(GPUError::Validation(
                "backend does not support array images",
            ));
        }
        _ => {}
    }
    match info.format {
        PixelFormat::Rgba32F | PixelFormat::R32F if !caps.texture_float => {
            return Err(GPUError::Validation(
                "backend does not support float textures",
            ));
        }
        PixelFormat::Rgba16F | PixelFormat::R16F if !caps.texture_half_float => {
            return Err(GPUError::Validation(
                "backend does not support half-float textures",
            ));
        }
        PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5
            if !caps.texture_compression_dxt =>
        {
            return Err(GPUError::Validation(
                "backend does not support DXT compression",
            ));
        }
        PixelFormat::Etc2Rgb8 if !caps.texture_compression_etc2 => {
            return Err(GPUError::Validation(
                "backend does not support ETC2 compression",
            ));
        }
        _ => {}
    }
    if info.format.is_compressed() && info.usage != Usage::Immutable {
        return Err(GPUError::Validation("compressed images must be immutable"));
    }
    if info.render_target {
        if info.usage != Usage::Immutable {
            return Err(GPUError::Validation("render targets must be immutable"));
        }
        if !info.initial_data.is_empty() {
            return Err(GPUError::Validation(
                "render targets cannot carry initial data",
            ));
        }
        if info.format.is_compressed() {
            return Err(GPUError::Validation(
                "render targets cannot use a compressed format",
            ));
        }
        if info.sample_count > 1 && !caps.msaa_render_targets {
            return Err(GPUError::Validation(
                "backend does not support MSAA render targets",
            ));
        }
    } else {
        if info.sample_count > 1 {
            return Err(GPUError::Validation(
                "multisampling is only for render targets",
            ));
        }
        match info.usage {
            Usage::Immutable => {
                if info.initial_data.len() != expected_subimage_count(info) {
                    return Err(GPUError::Validation(
                        "immutable images require one data slice per subimage",
                    ));
                }
                if info.initial_data.iter().any(|slice| slice.is_empty()) {
                    return Err(GPUError::Validation("empty subimage data slice"));
                }
            }
            Usage::Dynamic | Usage::Stream => {
                if !info.initial_data.is_empty() {
                    return Err(GPUError::Validation(
                        "dynamic and stream images are created without data",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_stage_info(stage: &ShaderStageInfo) -> Result<()> {
    if stage.source.is_empty() {
        return Err(GPUError::Validation("shader stage needs source text"));
    }
    if stage.uniform_blocks.len() > MAX_STAGE_UNIFORM_BLOCKS {
        return Err(GPUError::Validation("too many uniform blocks"));
    }
    if stage.images.len() > MAX_STAGE_IMAGES {
        return Err(GPUError::Validation("too many image slots"));
    }
    for block in stage.uniform_blocks {
        if block.size == 0 {
            return Err(GPUError::Validation("uniform block size must be > 0"));
        }
        for uniform in block.uniforms {
            let end = uniform
                .uniform_type
                .byte_size()
                .checked_mul(uniform.array_count.max(1))
                .and_then(|len| uniform.offset.checked_add(len));
            match end {
                Some(end) if end <= block.size => {}
                _ => {
                    return Err(GPUError::Validation(
                        "uniform member exceeds its block size",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_shader_info(info: &ShaderInfo) -> Result<()> {
    validate_stage_info(&info.vs)?;
    validate_stage_info(&info.fs)
}

fn validate_pipeline_info(info: &PipelineInfo, caps: &Capabilities) -> Result<()> {
    let layout = &info.layout;
    if layout.buffers.is_empty() || layout.buffers.len() > MAX_VERTEX_BUFFERS {
        return Err(GPUError::Validation(
            "pipeline needs 1..=4 vertex buffer layouts",
        ));
    }
    if layout.attrs.is_empty() || layout.attrs.len() > MAX_VERTEX_ATTRIBUTES {
        return Err(GPUError::Validation(
            "pipeline needs 1..=16 vertex attributes",
        ));
    }
    for buffer in layout.buffers {
        if buffer.stride == 0 {
            return Err(GPUError::Validation("vertex buffer stride must be > 0"));
        }
        if buffer.step == VertexStep::PerInstance && !caps.instanced_arrays {
            return Err(GPUError::Validation(
                "backend does not support instanced arrays",
            ));
        }
    }
    for attr in layout.attrs {
        let buffer = layout
            .buffers
            .get(attr.buffer_index)
            .ok_or(GPUError::Validation(
                "vertex attribute references an undeclared buffer",
            ))?;
        match attr.offset.checked_add(attr.format.byte_size()) {
            Some(end) if end <= buffer.stride => {}
            _ => {
                return Err(GPUError::Validation(
                    "vertex attribute exceeds its buffer stride",
                ));
            }
        }
        if attr.format == VertexFormat::Uint10N2 && !caps.packed_vertex_format_10_2 {
            return Err(GPUError::Validation(
                "backend does not support the packed 10-2 vertex format",
            ));
        }
    }
    if info.rasterizer.sample_count == 0 {
        return Err(GPUError::Validation("sample count must be > 0"));
    }
    Ok(())
}

fn validate_attachment(attachment: &AttachmentInfo, image: &Image) -> Result<()> {
    if !image.render_target {
        return Err(GPUError::Validation(
            "attachment image was not created as a render target",
        ));
    }
    if attachment.mip_level >= image.mip_count {
        return Err(GPUError::Validation("attachment mip level out of range"));
    }
    let slices = match image.image_type {
        ImageType::Dim2 => 1,
        ImageType::Cube => 6,
        ImageType::Dim3 | ImageType::Array => image.depth_or_layers,
    };
    if attachment.slice >= slices {
        return Err(GPUError::Validation(
            "attachment face/layer/slice out of range",
        ));
    }
    Ok(())
}
