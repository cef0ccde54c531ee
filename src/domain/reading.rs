// ==========================================
// 批量抄表工作台 - 抄表读数实体与会话视图模型
// ==========================================
// BulkReadingRow 是会话内的瞬态视图模型:
// 选择楼栋时创建，日期变更时重新判定，提交后标记已抄，
// 楼栋/日期切换时整体丢弃。没有跨会话不变量。
// ==========================================

use crate::domain::types::{IneligibleReason, RowPhase, UtilityKind};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 抄表周期 (Reading Period)
// ==========================================
// 抄表周期 = 抄表日期所在的自然月；用于重复提交检测
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadingPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReadingPeriod {
    /// 由抄表日期得到所属周期
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 上一个周期（跨年回绕）
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for ReadingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// 会话视图模型 (Bulk Reading Row)
// ==========================================

/// 单个单元在本次抄表会话中的行状态
///
/// 不变量:
/// - `is_disabled()` 为真当且仅当本期已有读数或该日期不可抄表
/// - 可提交的读数要求 `can_have_reading && !has_*_reading`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkReadingRow {
    /// 单元ID
    pub unit_id: String,
    /// 单元编号
    pub unit_no: String,
    /// 单元类型（仅展示用）
    pub unit_type: Option<String>,

    /// 本期电表读数（录入值）
    pub electricity_value: Option<f64>,
    /// 本期水表读数（录入值）
    pub water_value: Option<f64>,

    /// 上期电表读数（探测所得，缺省 0）
    pub prev_electricity: f64,
    /// 上期水表读数（探测所得，缺省 0）
    pub prev_water: f64,

    /// 本期是否已有电表记录
    pub has_electricity_reading: bool,
    /// 本期是否已有水表记录
    pub has_water_reading: bool,

    /// 该日期是否可抄表（合同窗口判定）
    pub can_have_reading: bool,
    /// 不可抄表原因
    pub ineligible_reason: Option<IneligibleReason>,

    /// 行阶段
    pub phase: RowPhase,
}

impl BulkReadingRow {
    /// 由单元构造初始行（资格判定之前）
    pub fn uninitialized(unit_id: &str, unit_no: &str, unit_type: Option<String>) -> Self {
        Self {
            unit_id: unit_id.to_string(),
            unit_no: unit_no.to_string(),
            unit_type,
            electricity_value: None,
            water_value: None,
            prev_electricity: 0.0,
            prev_water: 0.0,
            has_electricity_reading: false,
            has_water_reading: false,
            can_have_reading: false,
            ineligible_reason: None,
            phase: RowPhase::Uninitialized,
        }
    }

    /// 本期是否已有任一读数
    pub fn has_any_reading(&self) -> bool {
        self.has_electricity_reading || self.has_water_reading
    }

    /// 行是否禁用（已抄表或不可抄表）
    pub fn is_disabled(&self) -> bool {
        self.has_any_reading() || !self.can_have_reading
    }

    /// 指定类别本期是否已有读数
    pub fn has_reading(&self, kind: UtilityKind) -> bool {
        match kind {
            UtilityKind::Electricity => self.has_electricity_reading,
            UtilityKind::Water => self.has_water_reading,
        }
    }

    /// 指定类别的上期读数
    pub fn previous_value(&self, kind: UtilityKind) -> f64 {
        match kind {
            UtilityKind::Electricity => self.prev_electricity,
            UtilityKind::Water => self.prev_water,
        }
    }

    /// 指定类别的本期录入值
    pub fn current_value(&self, kind: UtilityKind) -> Option<f64> {
        match kind {
            UtilityKind::Electricity => self.electricity_value,
            UtilityKind::Water => self.water_value,
        }
    }

    /// 指定类别是否可提交（可抄表且本期尚无记录）
    pub fn submittable(&self, kind: UtilityKind) -> bool {
        self.can_have_reading && !self.has_reading(kind)
    }
}

// ==========================================
// 提交记录 (Reading Record)
// ==========================================

/// 提交给后端的单条抄表记录（每单元每类别一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    /// 单元ID
    pub unit_id: String,
    /// 公用事业类型ID（电/水，由目录解析）
    pub utility_type_id: String,
    /// 抄表日期
    pub reading_date: NaiveDate,
    /// 上期读数
    pub previous_value: f64,
    /// 本期读数
    pub current_value: f64,
}

impl ReadingRecord {
    /// 本期用量 = 本期读数 - 上期读数
    pub fn consumption(&self) -> f64 {
        self.current_value - self.previous_value
    }
}

/// 批量创建回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateReceipt {
    /// 后端实际创建的记录数
    pub created: usize,
    /// 后端附带消息（可选）
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_date_and_previous() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let period = ReadingPeriod::from_date(date);
        assert_eq!(period, ReadingPeriod { year: 2026, month: 3 });
        assert_eq!(period.previous(), ReadingPeriod { year: 2026, month: 2 });

        // 跨年回绕
        let jan = ReadingPeriod { year: 2026, month: 1 };
        assert_eq!(jan.previous(), ReadingPeriod { year: 2025, month: 12 });
    }

    #[test]
    fn test_period_display() {
        let period = ReadingPeriod { year: 2026, month: 8 };
        assert_eq!(period.to_string(), "2026-08");
    }

    #[test]
    fn test_row_disabled_when_any_reading_exists() {
        let mut row = BulkReadingRow::uninitialized("U001", "101", None);
        row.can_have_reading = true;
        assert!(!row.is_disabled());

        row.has_electricity_reading = true;
        assert!(row.is_disabled());
        // 水表仍可提交判定为假（行级禁用不影响类别级判定语义）
        assert!(row.submittable(UtilityKind::Water));
        assert!(!row.submittable(UtilityKind::Electricity));
    }

    #[test]
    fn test_row_disabled_when_ineligible() {
        let row = BulkReadingRow::uninitialized("U001", "101", None);
        // can_have_reading 默认 false
        assert!(row.is_disabled());
        assert!(!row.submittable(UtilityKind::Electricity));
    }

    #[test]
    fn test_record_consumption() {
        let record = ReadingRecord {
            unit_id: "U001".to_string(),
            utility_type_id: "T-ELEC".to_string(),
            reading_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            previous_value: 120.0,
            current_value: 150.5,
        };
        assert!((record.consumption() - 30.5).abs() < f64::EPSILON);
    }
}
