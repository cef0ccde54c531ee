// ==========================================
// 批量抄表工作台 - 租赁合同实体
// ==========================================
// 合同由后端拥有并维护；本工作台只读消费
// 合同窗口 [start_date, end_date] 用于抄表资格判定，两端均含
// ==========================================

use crate::domain::types::LeaseStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 租赁合同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    /// 合同ID
    pub lease_id: String,
    /// 承租单元ID
    pub unit_id: String,
    /// 承租方名称（仅展示用）
    pub tenant_name: Option<String>,
    /// 合同状态
    pub status: LeaseStatus,
    /// 起始日
    pub start_date: NaiveDate,
    /// 结束日
    pub end_date: NaiveDate,
}

impl Lease {
    /// 合同窗口是否覆盖指定日期（含起止两端）
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// 是否为生效中的合同
    pub fn is_active(&self) -> bool {
        self.status == LeaseStatus::Active
    }
}
