// ==========================================
// 批量抄表工作台 - 抄表编排 API
// ==========================================
// 职责: 工作台操作入口；串联 网关 → 引擎 → 会话
// 控制流: 选楼栋+日期 → 资格判定 → 状态探测 →
//         行内编辑/工作簿导入 → 批量提交 → 强制刷新
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::Settings;
use crate::domain::types::UtilityKind;
use crate::domain::{Building, BulkReadingRow, UtilityType};
use crate::engine::probe::{DebounceGuard, ProbeKey, StatusProber};
use crate::engine::submit::{SubmissionBatcher, SubmissionReport};
use crate::gateway::LeasingGateway;
use crate::i18n::t_with_args;
use crate::session::{Applied, SessionAction, SessionStore};
use crate::workbook::{ImportOutcome, TemplateWriter, UniversalWorkbookParser, WorkbookIntake};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// 类型解析结果
// ==========================================

/// 电/水类型ID对（由后端目录按名称匹配解析一次）
#[derive(Debug, Clone)]
pub struct UtilityPair {
    pub electricity: UtilityType,
    pub water: UtilityType,
}

/// 行内编辑反馈
#[derive(Debug, Clone, PartialEq)]
pub enum EditFeedback {
    /// 正常录入
    Accepted,
    /// 低于上期读数，已重置；附带给录入人员的警告文案
    ResetToPrevious { previous: f64, warning: String },
    /// 被忽略（行禁用或单元不存在）
    Ignored,
}

// ==========================================
// MeterIntakeApi
// ==========================================

pub struct MeterIntakeApi {
    gateway: Arc<dyn LeasingGateway>,
    settings: Settings,
    store: SessionStore,
    prober: StatusProber,
    batcher: SubmissionBatcher,
    debounce: DebounceGuard,
    /// 解析一次后缓存；锁内不做 I/O
    utilities: Mutex<Option<UtilityPair>>,
}

impl MeterIntakeApi {
    pub fn new(settings: Settings, gateway: Arc<dyn LeasingGateway>) -> Self {
        Self {
            prober: StatusProber::new(gateway.clone()),
            batcher: SubmissionBatcher::new(gateway.clone()),
            gateway,
            settings,
            store: SessionStore::new(),
            debounce: DebounceGuard::new(),
            utilities: Mutex::new(None),
        }
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询楼栋列表
    pub async fn load_buildings(&self) -> ApiResult<Vec<Building>> {
        Ok(self.gateway.fetch_buildings().await?)
    }

    /// 当前行集快照
    pub fn rows(&self) -> Vec<BulkReadingRow> {
        self.store.snapshot().rows
    }

    // ==========================================
    // 选择操作
    // ==========================================

    /// 选择楼栋并加载抄表行集
    ///
    /// # 流程
    /// 1. 并发拉取单元与合同
    /// 2. 资格判定、重建会话（代次递增）
    /// 3. 强制探测（新楼栋必然是新键）
    pub async fn select_building(
        &self,
        building_id: &str,
        date: NaiveDate,
    ) -> ApiResult<Vec<BulkReadingRow>> {
        tracing::info!("选择楼栋: building_id={}, date={}", building_id, date);

        let (units, leases) = tokio::try_join!(
            self.gateway.fetch_occupied_units(building_id),
            self.gateway.fetch_leases(building_id),
        )?;

        self.store.apply(SessionAction::SelectBuilding {
            building_id: building_id.to_string(),
            date,
            units,
            leases,
        });
        self.debounce.reset();

        self.probe_current(true).await?;
        Ok(self.rows())
    }

    /// 变更抄表日期（楼栋不变）
    ///
    /// 基于已加载的单元/合同重新判定资格，再经去抖探测
    pub async fn select_date(&self, date: NaiveDate) -> ApiResult<Vec<BulkReadingRow>> {
        if self.store.snapshot().building_id.is_none() {
            return Err(ApiError::NoBuildingSelected);
        }

        self.store.apply(SessionAction::SelectDate { date });
        self.probe_current(false).await?;
        Ok(self.rows())
    }

    /// 刷新当前选择的抄表状态
    ///
    /// # 参数
    /// - force: 绕过去抖（提交后的强制刷新）
    ///
    /// # 返回
    /// - Ok(true): 探测已执行并应用
    /// - Ok(false): 被去抖抑制或批次已过期
    pub async fn refresh(&self, force: bool) -> ApiResult<bool> {
        self.probe_current(force).await
    }

    // ==========================================
    // 录入操作
    // ==========================================

    /// 行内编辑读数
    ///
    /// 低于上期读数的录入被拒绝并重置为上期读数（附警告文案）
    pub fn edit_reading(
        &self,
        unit_id: &str,
        kind: UtilityKind,
        value: f64,
    ) -> ApiResult<EditFeedback> {
        let applied = self.store.apply(SessionAction::EditReading {
            unit_id: unit_id.to_string(),
            kind,
            value,
        });

        Ok(match applied {
            Applied::Ok => EditFeedback::Accepted,
            Applied::EditReset { previous } => EditFeedback::ResetToPrevious {
                previous,
                warning: t_with_args(
                    "intake.edit.reset_to_previous",
                    &[("previous", &previous.to_string())],
                ),
            },
            _ => EditFeedback::Ignored,
        })
    }

    // ==========================================
    // 工作簿操作
    // ==========================================

    /// 导出抄表模板（预填当前行集的单元编号）
    pub fn export_template<P: AsRef<Path>>(&self, path: P) -> ApiResult<()> {
        let snapshot = self.store.snapshot();
        if snapshot.building_id.is_none() {
            return Err(ApiError::NoBuildingSelected);
        }
        TemplateWriter::write(path, &snapshot.rows)?;
        Ok(())
    }

    /// 导入已填写的工作簿
    ///
    /// 行级失败只丢弃该行并计入摘要；
    /// 导入值原样写入行集，负用量由提交前校验整批拦截
    pub fn import_workbook<P: AsRef<Path>>(&self, path: P) -> ApiResult<ImportOutcome> {
        let snapshot = self.store.snapshot();
        if snapshot.building_id.is_none() {
            return Err(ApiError::NoBuildingSelected);
        }

        let raw_rows = UniversalWorkbookParser.parse(path)?;
        let outcome = WorkbookIntake::collect(&raw_rows, &snapshot.rows)?;

        let mut values = Vec::new();
        for candidate in &outcome.candidates {
            if let Some(v) = candidate.electricity {
                values.push((candidate.unit_id.clone(), UtilityKind::Electricity, v));
            }
            if let Some(v) = candidate.water {
                values.push((candidate.unit_id.clone(), UtilityKind::Water, v));
            }
        }
        self.store.apply(SessionAction::ApplyImport { values });

        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }

    // ==========================================
    // 提交操作
    // ==========================================

    /// 批量提交当前行集
    ///
    /// # 流程
    /// 1. 组装并校验（负用量整批阻止，不调用后端）
    /// 2. 主接口提交；失败则备用接口重试一次
    /// 3. 标记已抄类别，延迟后强制刷新行状态
    pub async fn submit_batch(&self) -> ApiResult<SubmissionReport> {
        let snapshot = self.store.snapshot();
        if snapshot.building_id.is_none() {
            return Err(ApiError::NoBuildingSelected);
        }
        let date = snapshot.date.ok_or(ApiError::NoDateSelected)?;

        let utilities = self.resolve_utilities().await?;
        let report = self
            .batcher
            .submit(
                &snapshot.rows,
                date,
                &utilities.electricity.utility_type_id,
                &utilities.water.utility_type_id,
            )
            .await?;

        // 标记已提交类别（探测刷新前的乐观更新）
        let submitted = report
            .records
            .iter()
            .map(|r| {
                let kind = if r.utility_type_id == utilities.electricity.utility_type_id {
                    UtilityKind::Electricity
                } else {
                    UtilityKind::Water
                };
                (r.unit_id.clone(), kind)
            })
            .collect();
        self.store.apply(SessionAction::SubmitResult { submitted });

        // 延迟后强制刷新，让行状态反映后端的已抄标记
        if self.settings.reprobe_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.reprobe_delay_ms)).await;
        }
        self.probe_current(true).await?;

        Ok(report)
    }

    // ==========================================
    // 内部: 类型解析与探测
    // ==========================================

    /// 解析电/水类型（名称关键字匹配，解析一次后缓存）
    pub async fn resolve_utilities(&self) -> ApiResult<UtilityPair> {
        {
            let cached = match self.utilities.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(pair) = cached.as_ref() {
                return Ok(pair.clone());
            }
        }

        let catalogue = self.gateway.fetch_utility_types().await?;
        let find = |keyword: &str| {
            catalogue
                .iter()
                .find(|t| t.name.contains(keyword))
                .cloned()
                .ok_or_else(|| ApiError::UtilityTypeMissing(keyword.to_string()))
        };
        let pair = UtilityPair {
            electricity: find(&self.settings.electricity_keyword)?,
            water: find(&self.settings.water_keyword)?,
        };

        let mut cached = match self.utilities.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cached = Some(pair.clone());
        Ok(pair)
    }

    /// 探测当前选择的抄表状态并应用到会话
    ///
    /// # 返回
    /// - Ok(true): 批次已应用
    /// - Ok(false): 被去抖抑制 / 去抖等待期间选择已变化 / 批次过期
    async fn probe_current(&self, force: bool) -> ApiResult<bool> {
        let snapshot = self.store.snapshot();
        let building_id = snapshot
            .building_id
            .clone()
            .ok_or(ApiError::NoBuildingSelected)?;
        let date = snapshot.date.ok_or(ApiError::NoDateSelected)?;

        let utilities = self.resolve_utilities().await?;
        let key = ProbeKey {
            building_id,
            date: date.to_string(),
            electricity_type_id: utilities.electricity.utility_type_id.clone(),
            water_type_id: utilities.water.utility_type_id.clone(),
        };
        if !self.debounce.pass(&key, force) {
            return Ok(false);
        }

        // 合并快速连续的日期变更: 短暂等待后若代次已变化则放弃本次探测
        let generation = snapshot.generation;
        if self.settings.probe_debounce_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.probe_debounce_ms)).await;
            if self.store.generation() != generation {
                tracing::debug!("去抖等待期间选择已变化，放弃探测: generation={}", generation);
                return Ok(false);
            }
        }

        let period = snapshot
            .period
            .ok_or(ApiError::NoDateSelected)?;
        let unit_ids = snapshot.eligible_unit_ids();
        let batch = self
            .prober
            .probe_units(
                generation,
                period,
                &unit_ids,
                &utilities.electricity.utility_type_id,
                &utilities.water.utility_type_id,
            )
            .await;

        let applied = self.store.apply(SessionAction::ProbeResult { batch });
        Ok(matches!(applied, Applied::Ok))
    }
}
