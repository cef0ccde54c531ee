// ==========================================
// 批量抄表工作台 - 远程状态探测器
// ==========================================
// 职责: 为每个可抄表单元查询上期读数与本期已抄标记
// 约定:
// - 每单元×每类别两次查询，全部并发发出、汇合后一次性应用
// - 单点失败降级为默认值（上期 0 / 未抄），只记日志不中断
// - 探测批次携带代次号，过期批次由会话层丢弃
// ==========================================

use crate::domain::types::ProbeOutcome;
use crate::domain::ReadingPeriod;
use crate::gateway::LeasingGateway;
use std::sync::{Arc, Mutex};

// ==========================================
// 去抖键 (Probe Key)
// ==========================================

/// 探测去抖键: 楼栋+日期+电/水类型ID
///
/// 键未变化时重复探测会被抑制；提交后的刷新用 force 绕过
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeKey {
    pub building_id: String,
    pub date: String,
    pub electricity_type_id: String,
    pub water_type_id: String,
}

/// 探测去抖保护
pub struct DebounceGuard {
    last_key: Mutex<Option<ProbeKey>>,
}

impl DebounceGuard {
    pub fn new() -> Self {
        Self {
            last_key: Mutex::new(None),
        }
    }

    /// 判断是否放行本次探测
    ///
    /// # 参数
    /// - key: 本次探测键
    /// - force: 强制刷新（提交后使用）
    ///
    /// # 返回
    /// - true: 放行并记录键
    /// - false: 键未变化，抑制本次探测
    pub fn pass(&self, key: &ProbeKey, force: bool) -> bool {
        let mut last = match self.last_key.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !force && last.as_ref() == Some(key) {
            tracing::debug!(
                "探测被去抖抑制: building={}, date={}",
                key.building_id,
                key.date
            );
            return false;
        }

        *last = Some(key.clone());
        true
    }

    /// 清空记录的键（楼栋切换时调用）
    pub fn reset(&self) {
        let mut last = match self.last_key.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = None;
    }
}

impl Default for DebounceGuard {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 探测结果结构
// ==========================================

/// 单个单元的探测结果（四路查询各自带标记）
#[derive(Debug, Clone)]
pub struct UnitProbeResult {
    pub unit_id: String,
    /// 上期电表读数
    pub prev_electricity: ProbeOutcome<f64>,
    /// 上期水表读数
    pub prev_water: ProbeOutcome<f64>,
    /// 本期是否已有电表记录
    pub has_electricity: ProbeOutcome<bool>,
    /// 本期是否已有水表记录
    pub has_water: ProbeOutcome<bool>,
}

/// 一次探测批次
///
/// generation 与发起时的会话代次一致；
/// 会话层只接受代次仍然匹配的批次（过期响应直接丢弃）
#[derive(Debug, Clone)]
pub struct ProbeBatch {
    pub generation: u64,
    pub period: ReadingPeriod,
    pub results: Vec<UnitProbeResult>,
}

// ==========================================
// StatusProber
// ==========================================

pub struct StatusProber {
    gateway: Arc<dyn LeasingGateway>,
}

impl StatusProber {
    pub fn new(gateway: Arc<dyn LeasingGateway>) -> Self {
        Self { gateway }
    }

    /// 探测一批单元的抄表状态
    ///
    /// # 参数
    /// - generation: 发起时的会话代次（原样写入批次）
    /// - period: 本期抄表周期
    /// - unit_ids: 待探测的单元（调用方已按资格过滤）
    /// - electricity_type_id / water_type_id: 类型ID
    pub async fn probe_units(
        &self,
        generation: u64,
        period: ReadingPeriod,
        unit_ids: &[String],
        electricity_type_id: &str,
        water_type_id: &str,
    ) -> ProbeBatch {
        let lookups = unit_ids.iter().map(|unit_id| {
            self.probe_unit(unit_id, period, electricity_type_id, water_type_id)
        });
        let results = futures::future::join_all(lookups).await;

        let error_count = results
            .iter()
            .flat_map(|r| {
                [
                    r.prev_electricity.is_error(),
                    r.prev_water.is_error(),
                    r.has_electricity.is_error(),
                    r.has_water.is_error(),
                ]
            })
            .filter(|e| *e)
            .count();
        if error_count > 0 {
            tracing::warn!(
                "探测批次完成但存在失败查询: generation={}, units={}, failed_lookups={}",
                generation,
                results.len(),
                error_count
            );
        }

        ProbeBatch {
            generation,
            period,
            results,
        }
    }

    /// 探测单个单元: 四路查询并发发出
    async fn probe_unit(
        &self,
        unit_id: &str,
        period: ReadingPeriod,
        electricity_type_id: &str,
        water_type_id: &str,
    ) -> UnitProbeResult {
        let previous_period = period.previous();

        let (prev_electricity, prev_water, has_electricity, has_water) = tokio::join!(
            self.lookup_previous(unit_id, electricity_type_id, previous_period),
            self.lookup_previous(unit_id, water_type_id, previous_period),
            self.lookup_exists(unit_id, electricity_type_id, period),
            self.lookup_exists(unit_id, water_type_id, period),
        );

        UnitProbeResult {
            unit_id: unit_id.to_string(),
            prev_electricity,
            prev_water,
            has_electricity,
            has_water,
        }
    }

    /// 查询上期读数（带标记结果）
    async fn lookup_previous(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> ProbeOutcome<f64> {
        match self
            .gateway
            .fetch_reading_value(unit_id, utility_type_id, period)
            .await
        {
            Ok(Some(value)) => ProbeOutcome::Found(value),
            Ok(None) => ProbeOutcome::NotFound,
            Err(e) => {
                tracing::warn!(
                    "上期读数查询失败(已降级为0): unit={}, utility={}, period={}, error={}",
                    unit_id,
                    utility_type_id,
                    period,
                    e
                );
                ProbeOutcome::Error(e.to_string())
            }
        }
    }

    /// 查询本期已抄标记（带标记结果）
    async fn lookup_exists(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> ProbeOutcome<bool> {
        match self.gateway.has_reading(unit_id, utility_type_id, period).await {
            Ok(exists) => ProbeOutcome::Found(exists),
            Err(e) => {
                tracing::warn!(
                    "本期已抄检测失败(已降级为未抄): unit={}, utility={}, period={}, error={}",
                    unit_id,
                    utility_type_id,
                    period,
                    e
                );
                ProbeOutcome::Error(e.to_string())
            }
        }
    }
}
