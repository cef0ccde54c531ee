// ==========================================
// 批量抄表工作台 - 网关层
// ==========================================
// 职责: 定义后端 REST 接口的访问缝 (trait)，实现依赖倒置
// 说明: 引擎层/API层只依赖 trait；HTTP 实现与测试替身各自实现之
// ==========================================

pub mod error;
pub mod http;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpLeasingGateway;

use crate::domain::{
    Building, BulkCreateReceipt, Lease, ReadingPeriod, ReadingRecord, Unit, UtilityType,
};
use async_trait::async_trait;

/// 租赁后端网关
///
/// 对应后端协作接口（只消费，不定义）:
/// - 楼栋/单元/合同 只读查询
/// - 上期读数查询、本期已抄检测
/// - 批量创建（带校验的主接口 + 普通备用接口）
/// - 公用事业类型目录
#[async_trait]
pub trait LeasingGateway: Send + Sync {
    /// 查询楼栋列表
    async fn fetch_buildings(&self) -> GatewayResult<Vec<Building>>;

    /// 查询楼栋下已出租的单元
    async fn fetch_occupied_units(&self, building_id: &str) -> GatewayResult<Vec<Unit>>;

    /// 查询楼栋下的全部合同
    async fn fetch_leases(&self, building_id: &str) -> GatewayResult<Vec<Lease>>;

    /// 查询公用事业类型目录
    async fn fetch_utility_types(&self) -> GatewayResult<Vec<UtilityType>>;

    /// 查询单元在指定周期的读数值
    ///
    /// # 返回
    /// - Ok(Some(value)): 有记录
    /// - Ok(None): 确认无记录（区别于查询失败）
    /// - Err: 查询失败
    async fn fetch_reading_value(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<Option<f64>>;

    /// 检测单元在指定周期是否已有抄表记录
    async fn has_reading(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<bool>;

    /// 批量创建抄表记录（带校验的主接口）
    async fn bulk_create_validated(
        &self,
        batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt>;

    /// 批量创建抄表记录（普通备用接口）
    async fn bulk_create(
        &self,
        batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt>;
}
