//! Domain types for SaleScope

pub mod raw;
pub mod sale;
pub mod summary;

pub use raw::{RawRow, RawTable, RawValue};
pub use sale::SaleRecord;
pub use summary::{CategoryStats, Summary, WeekdayActivity};
