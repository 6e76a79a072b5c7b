//! A small hardware-abstraction layer for GPU rendering.
//!
//! Resources live in fixed-capacity pools and are addressed through
//! generation-checked [`utils::Handle`]s, so a stale handle can never reach
//! freed or recycled GPU state. A [`gpu::Context`] owns the pools and a
//! pluggable [`gpu::Backend`], validates every creation descriptor, and
//! enforces the begin-pass/draw/end-pass/commit sequencing contract before
//! anything touches the native API.
//!
//! ```no_run
//! use mirin::gpu::{BufferInfo, BufferType, Context, ContextInfo, NullBackend, Usage};
//!
//! let (backend, _trace) = NullBackend::new();
//! let mut ctx = Context::new(Box::new(backend), &ContextInfo::default())?;
//! let vertices: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];
//! let bytes: Vec<u8> = vertices.iter().flat_map(|f| f.to_le_bytes()).collect();
//! let vbuf = ctx.make_buffer(&BufferInfo {
//!     size: bytes.len() as u32,
//!     buffer_type: BufferType::Vertex,
//!     usage: Usage::Immutable,
//!     initial_data: Some(&bytes),
//!     debug_name: "triangle-vertices",
//!     ..Default::default()
//! })?;
//! ctx.destroy_buffer(vbuf);
//! ctx.destroy();
//! # Ok::<(), mirin::gpu::GPUError>(())
//! ```

pub mod gpu;
pub mod utils;

pub use gpu::{Context, GPUError};
pub use utils::{Handle, ResourceState};
