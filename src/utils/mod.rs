pub mod handle;
pub mod pool;

pub use handle::Handle;
pub use pool::{Pool, ResourceState};
