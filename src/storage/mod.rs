// Storage Module
//
// Block-oriented heap files: record codec, block allocator, the heap store
// itself and the record cache sitting in front of it.

pub mod error;
pub mod codec;
pub mod allocator;
pub mod disk;
pub mod heap;
pub mod buffer;

pub use error::StorageError;
