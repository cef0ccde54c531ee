// ==========================================
// 批量抄表工作台 - Eligibility Core 纯函数库
// ==========================================
// 职责: 提供合同窗口的抄表资格判定纯逻辑
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::types::IneligibleReason;
use crate::domain::Lease;
use chrono::NaiveDate;

/// 资格判定结果
#[derive(Debug, Clone, PartialEq)]
pub struct Eligibility {
    /// 是否可抄表
    pub eligible: bool,
    /// 不可抄表原因（eligible 为真时为 None）
    pub reason: Option<IneligibleReason>,
}

impl Eligibility {
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn ineligible(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

// ==========================================
// EligibilityCore - 纯函数工具类
// ==========================================
pub struct EligibilityCore;

impl EligibilityCore {
    /// 判定单元在指定日期是否可抄表
    ///
    /// # 规则
    /// 1. 只考虑该单元状态为 ACTIVE 的合同
    /// 2. 无 ACTIVE 合同 → 不可抄表（无有效合同）
    /// 3. 任一 ACTIVE 合同窗口覆盖该日期（含起止两端）→ 可抄表
    /// 4. 日期早于最近的将来合同起始日 → 不可抄表（合同自 X 起生效）
    /// 5. 日期晚于最晚的合同结束日 → 不可抄表（合同已于 X 到期）
    ///
    /// # 参数
    /// - unit_id: 单元ID
    /// - date: 抄表日期
    /// - leases: 已加载的合同列表（可包含其它单元的合同）
    pub fn resolve(unit_id: &str, date: NaiveDate, leases: &[Lease]) -> Eligibility {
        let active: Vec<&Lease> = leases
            .iter()
            .filter(|l| l.unit_id == unit_id && l.is_active())
            .collect();

        // 规则 2: 无有效合同
        if active.is_empty() {
            return Eligibility::ineligible(IneligibleReason::NoActiveLease);
        }

        // 规则 3: 窗口覆盖（含两端）
        if active.iter().any(|l| l.covers(date)) {
            return Eligibility::eligible();
        }

        // 规则 4: 日期在某份合同之前 → 取最近的将来起始日
        if let Some(start) = active
            .iter()
            .filter(|l| l.start_date > date)
            .map(|l| l.start_date)
            .min()
        {
            return Eligibility::ineligible(IneligibleReason::StartsOn { start });
        }

        // 规则 5: 日期在所有合同之后 → 取最晚的结束日
        let end = active
            .iter()
            .map(|l| l.end_date)
            .max()
            .unwrap_or(date);
        Eligibility::ineligible(IneligibleReason::EndedOn { end })
    }
}
