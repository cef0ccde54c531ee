// ==========================================
// 批量抄表工作台 - 引擎层
// ==========================================
// 职责: 抄表资格判定、远程状态探测、批量提交
// ==========================================

pub mod eligibility;
pub mod eligibility_core;
pub mod probe;
pub mod submit;

pub use eligibility::EligibilityEngine;
pub use eligibility_core::{Eligibility, EligibilityCore};
pub use probe::{DebounceGuard, ProbeBatch, ProbeKey, StatusProber, UnitProbeResult};
pub use submit::{SubmissionBatcher, SubmissionReport, SubmitError};
