mod placement;
mod usage;

pub use placement::{BlockAllocator, Placement};
pub use usage::{BlockUsage, BlockUsageTable};
