// ==========================================
// 批量抄表工作台 - API层
// ==========================================

pub mod error;
pub mod intake_api;

pub use error::{ApiError, ApiResult};
pub use intake_api::{EditFeedback, MeterIntakeApi, UtilityPair};
