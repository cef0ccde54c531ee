// ==========================================
// 批量抄表工作台 - 领域层
// ==========================================

pub mod lease;
pub mod reading;
pub mod types;
pub mod unit;

pub use lease::Lease;
pub use reading::{BulkCreateReceipt, BulkReadingRow, ReadingPeriod, ReadingRecord};
pub use unit::{Building, Unit, UtilityType};
