// ==========================================
// 批量抄表工作台 - 抄表资格引擎
// ==========================================
// 职责: 将楼栋的单元/合同/日期映射为初始抄表行集
// 依赖: EligibilityCore 纯函数
// ==========================================

use crate::domain::types::RowPhase;
use crate::domain::{BulkReadingRow, Lease, Unit};
use crate::engine::eligibility_core::EligibilityCore;
use chrono::NaiveDate;

pub struct EligibilityEngine;

impl EligibilityEngine {
    pub fn new() -> Self {
        Self
    }

    /// 构建初始抄表行集
    ///
    /// # 规则
    /// - 只纳入装表单元，每单元一行
    /// - 按单元编号排序（与模板导出顺序一致）
    /// - 资格判定通过 → EligiblePending；否则 → Ineligible + 原因
    ///
    /// # 参数
    /// - units: 楼栋下已出租的单元
    /// - leases: 楼栋下的全部合同
    /// - date: 抄表日期
    pub fn build_rows(
        &self,
        units: &[Unit],
        leases: &[Lease],
        date: NaiveDate,
    ) -> Vec<BulkReadingRow> {
        let mut metered: Vec<&Unit> = units.iter().filter(|u| u.has_meter).collect();
        metered.sort_by(|a, b| a.unit_no.cmp(&b.unit_no));

        let rows: Vec<BulkReadingRow> = metered
            .into_iter()
            .map(|unit| {
                let mut row =
                    BulkReadingRow::uninitialized(&unit.unit_id, &unit.unit_no, unit.unit_type.clone());

                let eligibility = EligibilityCore::resolve(&unit.unit_id, date, leases);
                row.can_have_reading = eligibility.eligible;
                row.ineligible_reason = eligibility.reason;
                row.phase = if eligibility.eligible {
                    RowPhase::EligiblePending
                } else {
                    RowPhase::Ineligible
                };
                row
            })
            .collect();

        let ineligible_count = rows.iter().filter(|r| !r.can_have_reading).count();
        tracing::debug!(
            "抄表行集构建完成: date={}, total={}, ineligible={}",
            date,
            rows.len(),
            ineligible_count
        );

        rows
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
