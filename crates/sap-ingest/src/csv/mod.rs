//! Surgery sheet CSV reading.

mod header;
mod reader;

pub use header::{ColumnIndex, SurgeryColumn};
pub use reader::{SurgeryTable, read_surgery_csv};
