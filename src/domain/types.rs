// ==========================================
// 批量抄表工作台 - 领域类型定义
// ==========================================
// 约定: 抄表周期按自然月计；合同窗口判定含起止两端
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 公用事业类别 (Utility Kind)
// ==========================================
// 本工作台只处理电表/水表两类；类型ID由后端目录解析得到
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilityKind {
    Electricity,
    Water,
}

impl UtilityKind {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            UtilityKind::Electricity => "ELECTRICITY",
            UtilityKind::Water => "WATER",
        }
    }

    /// 界面展示名称
    pub fn label(&self) -> &str {
        match self {
            UtilityKind::Electricity => "电表",
            UtilityKind::Water => "水表",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 合同状态 (Lease Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与后端一致)
// 只有 ACTIVE 合同参与抄表资格判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaseStatus {
    /// 待生效
    Pending,
    /// 生效中
    Active,
    /// 已到期
    Ended,
    /// 提前终止
    Terminated,
}

impl LeaseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeaseStatus::Pending => "PENDING",
            LeaseStatus::Active => "ACTIVE",
            LeaseStatus::Ended => "ENDED",
            LeaseStatus::Terminated => "TERMINATED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "PENDING" => LeaseStatus::Pending,
            "ACTIVE" => LeaseStatus::Active,
            "ENDED" => LeaseStatus::Ended,
            _ => LeaseStatus::Terminated,
        }
    }
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 行阶段 (Row Phase)
// ==========================================
// 单个单元在本次抄表会话中的生命周期:
// Uninitialized → EligiblePending → Submitted | Ineligible
// Ineligible 仅经由楼栋/日期变更重新判定产生;
// Submitted 仅经由批量提交成功产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowPhase {
    Uninitialized,
    EligiblePending,
    Submitted,
    Ineligible,
}

impl RowPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RowPhase::Uninitialized => "UNINITIALIZED",
            RowPhase::EligiblePending => "ELIGIBLE_PENDING",
            RowPhase::Submitted => "SUBMITTED",
            RowPhase::Ineligible => "INELIGIBLE",
        }
    }
}

impl fmt::Display for RowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 探测结果 (Probe Outcome)
// ==========================================
// 远程状态探测的带标记结果:
// 区分 "确实没有记录"(NotFound) 与 "查询失败"(Error)，
// 两者都回退到默认值，但失败必须留下日志线索
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome<T> {
    /// 查到了值
    Found(T),
    /// 后端确认无记录
    NotFound,
    /// 查询失败（网络/服务端错误），携带原因
    Error(String),
}

impl<T: Clone> ProbeOutcome<T> {
    /// 取值，NotFound/Error 回退到默认值
    pub fn value_or(&self, default: T) -> T {
        match self {
            ProbeOutcome::Found(v) => v.clone(),
            ProbeOutcome::NotFound | ProbeOutcome::Error(_) => default,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProbeOutcome::Error(_))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProbeOutcome::Found(_))
    }
}

// ==========================================
// 不可抄表原因 (Ineligible Reason)
// ==========================================
// 由合同窗口判定得出；Display 输出给录入人员
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IneligibleReason {
    /// 无生效中的合同
    NoActiveLease,
    /// 抄表日期早于合同起始日
    StartsOn { start: NaiveDate },
    /// 抄表日期晚于合同结束日
    EndedOn { end: NaiveDate },
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::NoActiveLease => write!(f, "无有效合同"),
            IneligibleReason::StartsOn { start } => {
                write!(f, "合同自 {} 起生效", start.format("%Y-%m-%d"))
            }
            IneligibleReason::EndedOn { end } => {
                write!(f, "合同已于 {} 到期", end.format("%Y-%m-%d"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utility_kind_as_str() {
        assert_eq!(UtilityKind::Electricity.as_str(), "ELECTRICITY");
        assert_eq!(UtilityKind::Water.as_str(), "WATER");
    }

    #[test]
    fn test_lease_status_round_trip() {
        for status in [
            LeaseStatus::Pending,
            LeaseStatus::Active,
            LeaseStatus::Ended,
            LeaseStatus::Terminated,
        ] {
            assert_eq!(LeaseStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_probe_outcome_value_or() {
        let found: ProbeOutcome<f64> = ProbeOutcome::Found(12.5);
        let missing: ProbeOutcome<f64> = ProbeOutcome::NotFound;
        let failed: ProbeOutcome<f64> = ProbeOutcome::Error("超时".to_string());

        assert_eq!(found.value_or(0.0), 12.5);
        assert_eq!(missing.value_or(0.0), 0.0);
        assert_eq!(failed.value_or(0.0), 0.0);
        assert!(failed.is_error());
        assert!(!missing.is_error());
    }

    #[test]
    fn test_ineligible_reason_display_contains_date() {
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let reason = IneligibleReason::StartsOn { start };
        assert!(reason.to_string().contains("2026-09-01"));

        let end = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
        let reason = IneligibleReason::EndedOn { end };
        assert!(reason.to_string().contains("2026-07-31"));

        assert_eq!(IneligibleReason::NoActiveLease.to_string(), "无有效合同");
    }
}
