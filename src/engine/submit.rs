// ==========================================
// 批量抄表工作台 - 批量提交器
// ==========================================
// 职责: 组装抄表记录、提交前校验、主/备接口提交
// 约定:
// - 每行最多产出两条记录（电/水各一），只含可提交类别
// - 任一记录用量为负 → 整批阻止，不发起后端调用
// - 主接口(带校验)失败 → 备用接口重试一次，不再重试
// ==========================================

use crate::domain::{BulkCreateReceipt, BulkReadingRow, ReadingRecord};
use crate::gateway::LeasingGateway;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 提交错误类型
#[derive(Error, Debug)]
pub enum SubmitError {
    /// 提交前校验: 存在用量为负的记录，整批阻止
    #[error("存在 {invalid_count} 行用量为负，已阻止提交")]
    NegativeConsumption { invalid_count: usize },

    /// 没有可提交的记录
    #[error("没有可提交的抄表记录")]
    NothingToSubmit,

    /// 主/备接口均失败
    #[error("抄表提交失败: {detail}")]
    Backend { detail: String },
}

/// 提交回执
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    /// 批次ID（日志关联用）
    pub batch_id: String,
    /// 实际提交的记录（会话层据此标记已抄类别）
    pub records: Vec<ReadingRecord>,
    /// 是否走了备用接口
    pub used_fallback: bool,
    /// 后端回执
    pub receipt: BulkCreateReceipt,
}

impl SubmissionReport {
    /// 提交的记录数
    pub fn submitted(&self) -> usize {
        self.records.len()
    }
}

// ==========================================
// SubmissionBatcher
// ==========================================

pub struct SubmissionBatcher {
    gateway: Arc<dyn LeasingGateway>,
}

impl SubmissionBatcher {
    pub fn new(gateway: Arc<dyn LeasingGateway>) -> Self {
        Self { gateway }
    }

    /// 由抄表行组装提交记录
    ///
    /// # 规则
    /// - 仅限可抄表单元（can_have_reading）
    /// - 每类别仅当本期尚无记录且已录入读数时产出
    pub fn assemble_records(
        rows: &[BulkReadingRow],
        reading_date: NaiveDate,
        electricity_type_id: &str,
        water_type_id: &str,
    ) -> Vec<ReadingRecord> {
        use crate::domain::types::UtilityKind::{Electricity, Water};

        let mut records = Vec::new();
        for row in rows {
            for (kind, type_id) in [(Electricity, electricity_type_id), (Water, water_type_id)] {
                if !row.submittable(kind) {
                    continue;
                }
                let Some(current_value) = row.current_value(kind) else {
                    continue;
                };
                records.push(ReadingRecord {
                    unit_id: row.unit_id.clone(),
                    utility_type_id: type_id.to_string(),
                    reading_date,
                    previous_value: row.previous_value(kind),
                    current_value,
                });
            }
        }
        records
    }

    /// 提交前校验: 用量（本期-上期）不得为负
    pub fn validate(records: &[ReadingRecord]) -> Result<(), SubmitError> {
        let invalid_count = records.iter().filter(|r| r.consumption() < 0.0).count();
        if invalid_count > 0 {
            return Err(SubmitError::NegativeConsumption { invalid_count });
        }
        Ok(())
    }

    /// 提交一批抄表行
    ///
    /// # 流程
    /// 1. 组装记录；为空 → NothingToSubmit
    /// 2. 校验用量；存在负值 → 整批阻止，不调用后端
    /// 3. 主接口提交；失败 → 备用接口重试一次
    pub async fn submit(
        &self,
        rows: &[BulkReadingRow],
        reading_date: NaiveDate,
        electricity_type_id: &str,
        water_type_id: &str,
    ) -> Result<SubmissionReport, SubmitError> {
        let records =
            Self::assemble_records(rows, reading_date, electricity_type_id, water_type_id);
        if records.is_empty() {
            return Err(SubmitError::NothingToSubmit);
        }
        Self::validate(&records)?;

        let batch_id = Uuid::new_v4().to_string();
        tracing::info!(
            "开始批量提交抄表记录: batch_id={}, records={}",
            batch_id,
            records.len()
        );

        match self.gateway.bulk_create_validated(&batch_id, &records).await {
            Ok(receipt) => {
                tracing::info!(
                    "批量提交成功(主接口): batch_id={}, created={}",
                    batch_id,
                    receipt.created
                );
                Ok(SubmissionReport {
                    batch_id,
                    records,
                    used_fallback: false,
                    receipt,
                })
            }
            Err(primary_err) => {
                tracing::warn!(
                    "主接口提交失败，尝试备用接口: batch_id={}, error={}",
                    batch_id,
                    primary_err
                );

                match self.gateway.bulk_create(&batch_id, &records).await {
                    Ok(receipt) => {
                        tracing::info!(
                            "批量提交成功(备用接口): batch_id={}, created={}",
                            batch_id,
                            receipt.created
                        );
                        Ok(SubmissionReport {
                            batch_id,
                            records,
                            used_fallback: true,
                            receipt,
                        })
                    }
                    Err(fallback_err) => {
                        tracing::error!(
                            "备用接口提交同样失败: batch_id={}, error={}",
                            batch_id,
                            fallback_err
                        );
                        Err(SubmitError::Backend {
                            detail: fallback_err.detail(),
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BulkReadingRow;

    fn eligible_row(unit_id: &str, unit_no: &str) -> BulkReadingRow {
        let mut row = BulkReadingRow::uninitialized(unit_id, unit_no, None);
        row.can_have_reading = true;
        row
    }

    fn date() -> NaiveDate {
        "2026-08-07".parse().unwrap()
    }

    #[test]
    fn test_assemble_only_submittable_utilities() {
        let mut row = eligible_row("U001", "101");
        row.electricity_value = Some(150.0);
        row.water_value = Some(42.0);
        row.has_water_reading = true; // 水表本期已有记录 → 不产出

        let records = SubmissionBatcher::assemble_records(&[row], date(), "T-ELEC", "T-WATER");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].utility_type_id, "T-ELEC");
        assert_eq!(records[0].current_value, 150.0);
    }

    #[test]
    fn test_assemble_skips_ineligible_rows() {
        let mut row = BulkReadingRow::uninitialized("U001", "101", None);
        row.electricity_value = Some(150.0); // 有录入值但不可抄表

        let records = SubmissionBatcher::assemble_records(&[row], date(), "T-ELEC", "T-WATER");
        assert!(records.is_empty());
    }

    #[test]
    fn test_assemble_skips_missing_values() {
        let row = eligible_row("U001", "101"); // 未录入任何读数
        let records = SubmissionBatcher::assemble_records(&[row], date(), "T-ELEC", "T-WATER");
        assert!(records.is_empty());
    }

    #[test]
    fn test_validate_blocks_negative_consumption() {
        let record = ReadingRecord {
            unit_id: "U001".to_string(),
            utility_type_id: "T-WATER".to_string(),
            reading_date: date(),
            previous_value: 50.0,
            current_value: 42.0, // 用量 -8
        };
        let ok = ReadingRecord {
            unit_id: "U002".to_string(),
            utility_type_id: "T-WATER".to_string(),
            reading_date: date(),
            previous_value: 10.0,
            current_value: 12.0,
        };

        let result = SubmissionBatcher::validate(&[record, ok]);
        match result {
            Err(SubmitError::NegativeConsumption { invalid_count }) => {
                assert_eq!(invalid_count, 1);
            }
            other => panic!("期望 NegativeConsumption，实际 {:?}", other.err()),
        }
    }

    #[test]
    fn test_validate_accepts_zero_consumption() {
        let record = ReadingRecord {
            unit_id: "U001".to_string(),
            utility_type_id: "T-ELEC".to_string(),
            reading_date: date(),
            previous_value: 50.0,
            current_value: 50.0,
        };
        assert!(SubmissionBatcher::validate(&[record]).is_ok());
    }
}
