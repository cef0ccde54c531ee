// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use leasing_meter_intake::domain::types::LeaseStatus;
use leasing_meter_intake::domain::{Lease, Unit};

// ==========================================
// Unit 构建器
// ==========================================

pub struct UnitBuilder {
    unit_id: String,
    unit_no: String,
    unit_type: Option<String>,
    has_meter: bool,
}

impl UnitBuilder {
    pub fn new(unit_id: &str, unit_no: &str) -> Self {
        Self {
            unit_id: unit_id.to_string(),
            unit_no: unit_no.to_string(),
            unit_type: None,
            has_meter: true,
        }
    }

    pub fn unit_type(mut self, unit_type: &str) -> Self {
        self.unit_type = Some(unit_type.to_string());
        self
    }

    pub fn without_meter(mut self) -> Self {
        self.has_meter = false;
        self
    }

    pub fn build(self) -> Unit {
        Unit {
            unit_id: self.unit_id,
            unit_no: self.unit_no,
            unit_type: self.unit_type,
            has_meter: self.has_meter,
        }
    }
}

// ==========================================
// Lease 构建器
// ==========================================

pub struct LeaseBuilder {
    lease_id: String,
    unit_id: String,
    tenant_name: Option<String>,
    status: LeaseStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl LeaseBuilder {
    pub fn active(unit_id: &str, start: &str, end: &str) -> Self {
        Self {
            lease_id: format!("L-{}", unit_id),
            unit_id: unit_id.to_string(),
            tenant_name: None,
            status: LeaseStatus::Active,
            start_date: start.parse().expect("起始日格式应为 YYYY-MM-DD"),
            end_date: end.parse().expect("结束日格式应为 YYYY-MM-DD"),
        }
    }

    pub fn status(mut self, status: LeaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn tenant(mut self, name: &str) -> Self {
        self.tenant_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Lease {
        Lease {
            lease_id: self.lease_id,
            unit_id: self.unit_id,
            tenant_name: self.tenant_name,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
