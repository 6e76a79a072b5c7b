use thiserror::Error;

use super::structs::{ResourceKind, ShaderStage};

/// Runtime errors reported by the resource manager and pass controller.
///
/// These are the recoverable conditions: the caller can retry, substitute a
/// placeholder resource, or drop the work. Contract violations (unbalanced
/// pass brackets, corrupted canaries) are bugs in the calling code and
/// panic instead of appearing here.
#[derive(Debug, Error)]
pub enum GPUError {
    /// No free slot left in the pool for this resource kind. The pools are
    /// fixed-capacity and never grow; destroy something or configure a
    /// larger pool at setup.
    #[error("{0:?} pool exhausted")]
    PoolExhausted(ResourceKind),

    /// The handle is stale, was never allocated, or names a slot in a state
    /// the operation does not accept.
    #[error("invalid or stale resource handle")]
    InvalidHandle,

    /// A creation descriptor failed validation. The slot lands in the
    /// `Failed` state and stays queryable and destroyable.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// Uniform data length does not match the size the shader declared for
    /// that block slot.
    #[error("uniform block {index} ({stage:?}) size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        stage: ShaderStage,
        index: usize,
        expected: u32,
        actual: u32,
    },

    /// A dynamic resource was updated twice between two `commit` calls.
    /// The budget is one update per resource per frame.
    #[error("resource already updated this frame")]
    UpdateBudgetExceeded,

    /// The backend refused to create the resource.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Convenient crate-wide result type.
pub type Result<T, E = GPUError> = std::result::Result<T, E>;
