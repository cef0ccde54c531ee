// ==========================================
// 批量抄表工作台 - 抄表会话状态机
// ==========================================
// 职责: 会话内唯一事实来源；一切变更经由显式动作
// 约定:
// - SelectBuilding/SelectDate 递增代次并重建行集
//   （日期变更基于已加载的单元/合同重新判定，不触达 I/O）
// - ProbeResult 携带过期代次时整批丢弃
// - EditReading 执行"低于上期读数即重置"规则
// - ApplyImport 直接写入导入值（负用量留给提交前校验拦截）
// - SubmitResult 将受影响类别标记为已抄、行阶段置为 Submitted
// ==========================================

use crate::domain::types::{RowPhase, UtilityKind};
use crate::domain::{BulkReadingRow, Lease, ReadingPeriod, Unit};
use crate::engine::eligibility::EligibilityEngine;
use crate::engine::probe::ProbeBatch;
use chrono::NaiveDate;
use std::sync::Mutex;

// ==========================================
// 会话状态 (Session State)
// ==========================================

/// 抄表会话状态（按 楼栋+日期 为键）
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// 当前楼栋
    pub building_id: Option<String>,
    /// 当前抄表日期
    pub date: Option<NaiveDate>,
    /// 当前抄表周期
    pub period: Option<ReadingPeriod>,
    /// 已加载的单元（日期变更时重新判定的依据）
    pub units: Vec<Unit>,
    /// 已加载的合同（只读消费）
    pub leases: Vec<Lease>,
    /// 行集（每装表单元一行）
    pub rows: Vec<BulkReadingRow>,
    /// 会话代次: 楼栋/日期每变更一次递增；
    /// 用于丢弃在途的过期探测批次
    pub generation: u64,
}

impl SessionState {
    /// 可抄表单元的ID列表（探测目标）
    pub fn eligible_unit_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.can_have_reading)
            .map(|r| r.unit_id.clone())
            .collect()
    }
}

// ==========================================
// 会话动作 (Session Action)
// ==========================================

/// 会话动作（状态的唯一变更入口）
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// 选择楼栋（携带后端加载的单元与合同）
    SelectBuilding {
        building_id: String,
        date: NaiveDate,
        units: Vec<Unit>,
        leases: Vec<Lease>,
    },
    /// 变更抄表日期（楼栋不变，基于已加载数据重新判定）
    SelectDate { date: NaiveDate },
    /// 应用探测批次
    ProbeResult { batch: ProbeBatch },
    /// 行内编辑读数
    EditReading {
        unit_id: String,
        kind: UtilityKind,
        value: f64,
    },
    /// 应用工作簿导入值
    ApplyImport {
        values: Vec<(String, UtilityKind, f64)>,
    },
    /// 批量提交成功后标记
    SubmitResult {
        submitted: Vec<(String, UtilityKind)>,
    },
}

/// 动作应用结果
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// 正常应用
    Ok,
    /// 过期探测批次被丢弃
    StaleProbeDiscarded { batch_generation: u64 },
    /// 编辑值低于上期读数，已重置为上期读数
    EditReset { previous: f64 },
    /// 编辑被忽略（行禁用/不可抄表/单元不存在）
    EditIgnored,
}

// ==========================================
// 纯归约函数
// ==========================================

/// 应用一个动作到会话状态
///
/// 纯函数（不触达 I/O）；返回值描述实际发生的变更
pub fn reduce(state: &mut SessionState, action: SessionAction) -> Applied {
    match action {
        SessionAction::SelectBuilding {
            building_id,
            date,
            units,
            leases,
        } => {
            state.rows = EligibilityEngine::new().build_rows(&units, &leases, date);
            state.building_id = Some(building_id);
            state.date = Some(date);
            state.period = Some(ReadingPeriod::from_date(date));
            state.units = units;
            state.leases = leases;
            state.generation += 1;
            Applied::Ok
        }

        SessionAction::SelectDate { date } => {
            state.rows = EligibilityEngine::new().build_rows(&state.units, &state.leases, date);
            state.date = Some(date);
            state.period = Some(ReadingPeriod::from_date(date));
            state.generation += 1;
            Applied::Ok
        }

        SessionAction::ProbeResult { batch } => {
            // 过期批次: 楼栋/日期已经变化，丢弃整批
            if batch.generation != state.generation {
                tracing::debug!(
                    "丢弃过期探测批次: batch_generation={}, current_generation={}",
                    batch.generation,
                    state.generation
                );
                return Applied::StaleProbeDiscarded {
                    batch_generation: batch.generation,
                };
            }

            for result in batch.results {
                let Some(row) = state.rows.iter_mut().find(|r| r.unit_id == result.unit_id)
                else {
                    continue;
                };
                row.prev_electricity = result.prev_electricity.value_or(0.0);
                row.prev_water = result.prev_water.value_or(0.0);
                row.has_electricity_reading = result.has_electricity.value_or(false);
                row.has_water_reading = result.has_water.value_or(false);
            }
            Applied::Ok
        }

        SessionAction::EditReading {
            unit_id,
            kind,
            value,
        } => {
            let Some(row) = state.rows.iter_mut().find(|r| r.unit_id == unit_id) else {
                return Applied::EditIgnored;
            };
            if !row.submittable(kind) {
                return Applied::EditIgnored;
            }

            // 规则: 本期读数低于上期读数 → 拒绝并重置为上期读数
            let previous = row.previous_value(kind);
            let accepted = if value < previous { previous } else { value };

            match kind {
                UtilityKind::Electricity => row.electricity_value = Some(accepted),
                UtilityKind::Water => row.water_value = Some(accepted),
            }

            if value < previous {
                Applied::EditReset { previous }
            } else {
                Applied::Ok
            }
        }

        SessionAction::ApplyImport { values } => {
            // 导入值不走"低于上期即重置"规则：
            // 负用量由提交前校验整批拦截，便于录入人员核对源文件
            for (unit_id, kind, value) in values {
                let Some(row) = state.rows.iter_mut().find(|r| r.unit_id == unit_id) else {
                    continue;
                };
                if !row.submittable(kind) {
                    continue;
                }
                match kind {
                    UtilityKind::Electricity => row.electricity_value = Some(value),
                    UtilityKind::Water => row.water_value = Some(value),
                }
            }
            Applied::Ok
        }

        SessionAction::SubmitResult { submitted } => {
            for (unit_id, kind) in submitted {
                let Some(row) = state.rows.iter_mut().find(|r| r.unit_id == unit_id) else {
                    continue;
                };
                match kind {
                    UtilityKind::Electricity => row.has_electricity_reading = true,
                    UtilityKind::Water => row.has_water_reading = true,
                }
                row.phase = RowPhase::Submitted;
            }
            Applied::Ok
        }
    }
}

// ==========================================
// SessionStore - 线程安全包装
// ==========================================

/// 会话存储
///
/// 内部短临界区持锁；探测/提交等异步工作在锁外进行
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
        }
    }

    /// 应用动作
    pub fn apply(&self, action: SessionAction) -> Applied {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        reduce(&mut state, action)
    }

    /// 读取状态快照
    pub fn snapshot(&self) -> SessionState {
        let state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.clone()
    }

    /// 当前代次
    pub fn generation(&self) -> u64 {
        let state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.generation
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
