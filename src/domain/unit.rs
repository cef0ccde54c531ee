// ==========================================
// 批量抄表工作台 - 楼栋与单元实体
// ==========================================
// 来源: 后端只读接口；本工作台不持久化、不修改
// ==========================================

use serde::{Deserialize, Serialize};

/// 楼栋
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// 楼栋ID
    pub building_id: String,
    /// 楼栋名称
    pub name: String,
}

/// 单元（可出租的商铺/厅室）
///
/// 抄表行按"已出租且装表"的单元生成；
/// 未装表的单元不出现在工作台中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// 单元ID
    pub unit_id: String,
    /// 单元编号（录入人员可见，也是模板导入的匹配键）
    pub unit_no: String,
    /// 单元类型（商铺/仓库等，仅展示用）
    pub unit_type: Option<String>,
    /// 是否装有水电表
    pub has_meter: bool,
}

impl Unit {
    pub fn new(unit_id: &str, unit_no: &str) -> Self {
        Self {
            unit_id: unit_id.to_string(),
            unit_no: unit_no.to_string(),
            unit_type: None,
            has_meter: true,
        }
    }
}

/// 公用事业类型（后端目录项）
///
/// 电/水的类型ID由名称匹配解析一次，之后用于标记提交的抄表记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityType {
    /// 类型ID
    pub utility_type_id: String,
    /// 类型名称（如 "电费"、"水费"）
    pub name: String,
    /// 计量单位（如 "度"、"吨"，仅展示用）
    pub unit_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_new_defaults() {
        let unit = Unit::new("U001", "101");
        assert_eq!(unit.unit_id, "U001");
        assert_eq!(unit.unit_no, "101");
        assert!(unit.has_meter);
        assert!(unit.unit_type.is_none());
    }
}
