mod scan;
mod store;

pub use scan::{HeapScan, ScannedRow};
pub use store::{HeapStore, RowData};
