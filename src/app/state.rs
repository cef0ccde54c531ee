// ==========================================
// 批量抄表工作台 - 应用状态
// ==========================================
// 职责: 装配网关与API实例，作为应用级共享状态
// ==========================================

use crate::api::MeterIntakeApi;
use crate::config::Settings;
use crate::gateway::{HttpLeasingGateway, LeasingGateway};
use std::sync::Arc;

/// 应用状态
///
/// 包含API实例与配置；库的使用方（CLI/桌面壳）持有一份即可
pub struct AppState {
    /// 系统配置
    pub settings: Settings,

    /// 抄表编排API
    pub intake_api: Arc<MeterIntakeApi>,
}

impl AppState {
    /// 创建新的AppState实例（HTTP 网关）
    ///
    /// # 参数
    /// - settings: 系统配置
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(settings: Settings) -> Result<Self, String> {
        tracing::info!("初始化AppState，接口地址: {}", settings.api_base_url);

        let gateway = HttpLeasingGateway::new(&settings)
            .map_err(|e| format!("无法创建HTTP网关: {}", e))?;

        Ok(Self::with_gateway(settings, Arc::new(gateway)))
    }

    /// 由指定网关创建（测试替身/其它传输层）
    pub fn with_gateway(settings: Settings, gateway: Arc<dyn LeasingGateway>) -> Self {
        let intake_api = Arc::new(MeterIntakeApi::new(settings.clone(), gateway));

        tracing::info!("AppState初始化完成");
        Self {
            settings,
            intake_api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_new_with_default_settings() {
        let state = AppState::new(Settings::default()).unwrap();
        assert_eq!(state.settings.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_app_state_rejects_empty_base_url() {
        let mut settings = Settings::default();
        settings.api_base_url = String::new();
        assert!(AppState::new(settings).is_err());
    }
}
