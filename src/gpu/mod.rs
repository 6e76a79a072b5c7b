pub mod backend;
pub mod context;
pub mod error;
pub mod null;
pub mod structs;

pub use backend::{Backend, BackendId, Capabilities, DrawStateBinding, PassBegin};
pub use context::Context;
pub use error::{GPUError, Result};
pub use null::{DrawCall, NullBackend, NullTrace, Rect};
pub use structs::*;
