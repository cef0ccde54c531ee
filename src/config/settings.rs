// ==========================================
// 批量抄表工作台 - 系统配置
// ==========================================
// 职责: 配置加载与默认值管理
// 存储: 用户配置目录下的 settings.json（可用环境变量覆盖）
// ==========================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 配置文件路径环境变量
pub const SETTINGS_PATH_ENV: &str = "LEASING_METER_SETTINGS_PATH";

/// 接口地址环境变量（优先级高于配置文件）
pub const API_BASE_URL_ENV: &str = "LEASING_API_BASE_URL";

/// 系统配置
///
/// 说明: 这里只有工作台自身的编排参数，
/// 不包含任何业务规则常量（业务规则以后端为准）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 后端接口地址
    pub api_base_url: String,

    /// 单次请求超时（毫秒）
    pub request_timeout_ms: u64,

    /// 探测去抖间隔（毫秒）: 合并快速连续的日期变更
    pub probe_debounce_ms: u64,

    /// 提交成功后延迟强制刷新的间隔（毫秒）
    pub reprobe_delay_ms: u64,

    /// 电表类型名称匹配关键字
    pub electricity_keyword: String,

    /// 水表类型名称匹配关键字
    pub water_keyword: String,

    /// 界面语言（"zh-CN" / "en"）
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 10_000,
            probe_debounce_ms: 100,
            reprobe_delay_ms: 1_000,
            electricity_keyword: "电".to_string(),
            water_keyword: "水".to_string(),
            locale: "zh-CN".to_string(),
        }
    }
}

impl Settings {
    /// 获取默认配置文件路径
    ///
    /// # 返回
    /// - 环境变量 LEASING_METER_SETTINGS_PATH 指定的路径（若设置）
    /// - 否则: 用户配置目录/leasing-meter-intake/settings.json
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        let mut path = PathBuf::from("./settings.json");
        if let Some(config_dir) = dirs::config_dir() {
            path = config_dir.join("leasing-meter-intake");
            std::fs::create_dir_all(&path).ok();
            path = path.join("settings.json");
        }
        path
    }

    /// 加载配置
    ///
    /// 配置文件不存在时使用默认值；存在但无法解析时报错。
    /// 环境变量 LEASING_API_BASE_URL 可覆盖接口地址。
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("配置文件格式错误: {}", path.display()))?
        } else {
            tracing::info!("配置文件不存在，使用默认配置: {}", path.display());
            Settings::default()
        };

        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            let trimmed = base_url.trim();
            if !trimmed.is_empty() {
                settings.api_base_url = trimmed.to_string();
            }
        }

        Ok(settings)
    }

    /// 面向测试的快速构造: 极短的去抖/刷新间隔
    pub fn for_tests() -> Self {
        Self {
            probe_debounce_ms: 0,
            reprobe_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.probe_debounce_ms, 100);
        assert_eq!(settings.reprobe_delay_ms, 1_000);
        assert_eq!(settings.electricity_keyword, "电");
        assert_eq!(settings.water_keyword, "水");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        // serde(default): 缺失字段回落到默认值
        let settings: Settings =
            serde_json::from_str(r#"{"apiBaseUrl": "http://example"}"#).unwrap_or_default();
        // 字段名为 snake_case，上面的 camelCase 键会被忽略
        assert_eq!(settings.api_base_url, Settings::default().api_base_url);

        let settings: Settings =
            serde_json::from_str(r#"{"api_base_url": "http://example"}"#).unwrap();
        assert_eq!(settings.api_base_url, "http://example");
        assert_eq!(settings.probe_debounce_ms, 100);
    }

    #[test]
    fn test_for_tests_disables_delays() {
        let settings = Settings::for_tests();
        assert_eq!(settings.probe_debounce_ms, 0);
        assert_eq!(settings.reprobe_delay_ms, 0);
    }
}
