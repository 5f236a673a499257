pub mod error;
pub mod pool;
mod replacer;

pub use error::BufferPoolError;
pub use pool::{BufferPool, BufferPoolStats, EvictionPolicy};
