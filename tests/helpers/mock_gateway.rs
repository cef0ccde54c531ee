// ==========================================
// 测试替身 - 内存版租赁后端网关
// ==========================================
// 支持: 数据种子、失败注入、调用计数
// ==========================================

use async_trait::async_trait;
use leasing_meter_intake::domain::{
    Building, BulkCreateReceipt, Lease, ReadingPeriod, ReadingRecord, Unit, UtilityType,
};
use leasing_meter_intake::gateway::{GatewayError, GatewayResult, LeasingGateway};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// (单元ID, 类型ID, 周期) → 状态键
type ReadingKey = (String, String, ReadingPeriod);

pub struct MockGateway {
    pub buildings: Mutex<Vec<Building>>,
    pub units: Mutex<HashMap<String, Vec<Unit>>>,
    pub leases: Mutex<HashMap<String, Vec<Lease>>>,
    pub utility_types: Mutex<Vec<UtilityType>>,

    /// 指定周期的读数值（上期读数查询数据源）
    pub reading_values: Mutex<HashMap<ReadingKey, f64>>,
    /// 已有抄表记录的键
    pub existing: Mutex<HashSet<ReadingKey>>,

    /// 这些单元的状态查询直接失败（探测降级路径）
    pub failing_units: Mutex<HashSet<String>>,
    /// 主接口是否失败
    pub fail_validated: AtomicBool,
    /// 备用接口是否失败
    pub fail_plain: AtomicBool,

    // 调用计数
    pub validated_calls: AtomicUsize,
    pub plain_calls: AtomicUsize,
    pub status_lookup_calls: AtomicUsize,

    /// 成功提交的记录
    pub submitted: Mutex<Vec<ReadingRecord>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            buildings: Mutex::new(Vec::new()),
            units: Mutex::new(HashMap::new()),
            leases: Mutex::new(HashMap::new()),
            utility_types: Mutex::new(vec![
                UtilityType {
                    utility_type_id: "T-ELEC".to_string(),
                    name: "电费".to_string(),
                    unit_label: Some("度".to_string()),
                },
                UtilityType {
                    utility_type_id: "T-WATER".to_string(),
                    name: "水费".to_string(),
                    unit_label: Some("吨".to_string()),
                },
            ]),
            reading_values: Mutex::new(HashMap::new()),
            existing: Mutex::new(HashSet::new()),
            failing_units: Mutex::new(HashSet::new()),
            fail_validated: AtomicBool::new(false),
            fail_plain: AtomicBool::new(false),
            validated_calls: AtomicUsize::new(0),
            plain_calls: AtomicUsize::new(0),
            status_lookup_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    // ==========================================
    // 数据种子
    // ==========================================

    pub fn seed_building(&self, building_id: &str, name: &str) {
        self.buildings.lock().unwrap().push(Building {
            building_id: building_id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn seed_unit(&self, building_id: &str, unit: Unit) {
        self.units
            .lock()
            .unwrap()
            .entry(building_id.to_string())
            .or_default()
            .push(unit);
    }

    pub fn seed_lease(&self, building_id: &str, lease: Lease) {
        self.leases
            .lock()
            .unwrap()
            .entry(building_id.to_string())
            .or_default()
            .push(lease);
    }

    /// 预置某周期的读数值（上期读数查询会命中）
    pub fn seed_reading_value(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
        value: f64,
    ) {
        self.reading_values.lock().unwrap().insert(
            (unit_id.to_string(), utility_type_id.to_string(), period),
            value,
        );
    }

    /// 标记某周期已有抄表记录
    pub fn mark_existing(&self, unit_id: &str, utility_type_id: &str, period: ReadingPeriod) {
        self.existing.lock().unwrap().insert((
            unit_id.to_string(),
            utility_type_id.to_string(),
            period,
        ));
    }

    /// 注入: 指定单元的状态查询全部失败
    pub fn fail_lookups_for(&self, unit_id: &str) {
        self.failing_units
            .lock()
            .unwrap()
            .insert(unit_id.to_string());
    }

    /// 清空公用事业类型目录（类型解析失败路径）
    pub fn clear_utility_types(&self) {
        self.utility_types.lock().unwrap().clear();
    }

    fn check_failing(&self, unit_id: &str) -> GatewayResult<()> {
        if self.failing_units.lock().unwrap().contains(unit_id) {
            return Err(GatewayError::BackendStatus {
                status: 500,
                detail: Some("模拟的服务端错误".to_string()),
            });
        }
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeasingGateway for MockGateway {
    async fn fetch_buildings(&self) -> GatewayResult<Vec<Building>> {
        Ok(self.buildings.lock().unwrap().clone())
    }

    async fn fetch_occupied_units(&self, building_id: &str) -> GatewayResult<Vec<Unit>> {
        Ok(self
            .units
            .lock()
            .unwrap()
            .get(building_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_leases(&self, building_id: &str) -> GatewayResult<Vec<Lease>> {
        Ok(self
            .leases
            .lock()
            .unwrap()
            .get(building_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_utility_types(&self) -> GatewayResult<Vec<UtilityType>> {
        Ok(self.utility_types.lock().unwrap().clone())
    }

    async fn fetch_reading_value(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<Option<f64>> {
        self.status_lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing(unit_id)?;
        Ok(self
            .reading_values
            .lock()
            .unwrap()
            .get(&(unit_id.to_string(), utility_type_id.to_string(), period))
            .copied())
    }

    async fn has_reading(
        &self,
        unit_id: &str,
        utility_type_id: &str,
        period: ReadingPeriod,
    ) -> GatewayResult<bool> {
        self.status_lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing(unit_id)?;
        Ok(self.existing.lock().unwrap().contains(&(
            unit_id.to_string(),
            utility_type_id.to_string(),
            period,
        )))
    }

    async fn bulk_create_validated(
        &self,
        _batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt> {
        self.validated_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_validated.load(Ordering::SeqCst) {
            return Err(GatewayError::BackendStatus {
                status: 500,
                detail: Some("主接口校验服务不可用".to_string()),
            });
        }
        self.accept(records)
    }

    async fn bulk_create(
        &self,
        _batch_id: &str,
        records: &[ReadingRecord],
    ) -> GatewayResult<BulkCreateReceipt> {
        self.plain_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_plain.load(Ordering::SeqCst) {
            return Err(GatewayError::BackendStatus {
                status: 503,
                detail: Some("抄表服务暂不可用".to_string()),
            });
        }
        self.accept(records)
    }
}

impl MockGateway {
    /// 接受一批记录: 记入已提交并标记对应周期已抄
    fn accept(&self, records: &[ReadingRecord]) -> GatewayResult<BulkCreateReceipt> {
        let mut existing = self.existing.lock().unwrap();
        for record in records {
            existing.insert((
                record.unit_id.clone(),
                record.utility_type_id.clone(),
                ReadingPeriod::from_date(record.reading_date),
            ));
        }
        drop(existing);

        self.submitted.lock().unwrap().extend_from_slice(records);
        Ok(BulkCreateReceipt {
            created: records.len(),
            message: None,
        })
    }
}
