// ==========================================
// 批量抄表工作台 - 网关层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 职责: 封装后端 REST 访问的传输/状态/解码错误
// ==========================================

use thiserror::Error;

/// 网关层错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    // ===== 传输错误 =====
    #[error("请求发送失败: {0}")]
    RequestFailed(String),

    #[error("请求超时: {0}")]
    Timeout(String),

    // ===== 后端状态错误 =====
    /// 非 2xx 响应；detail 为后端返回的错误描述（若能解析）
    #[error("后端返回错误状态 {status}: {}", .detail.as_deref().unwrap_or("无详情"))]
    BackendStatus {
        status: u16,
        detail: Option<String>,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 解码错误 =====
    #[error("响应解码失败: {0}")]
    DecodeError(String),

    // ===== 配置错误 =====
    #[error("接口地址无效: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// 提取面向用户的错误详情（提交失败时展示）
    pub fn detail(&self) -> String {
        match self {
            GatewayError::BackendStatus {
                detail: Some(d), ..
            } => d.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else if err.is_decode() {
            GatewayError::DecodeError(err.to_string())
        } else {
            GatewayError::RequestFailed(err.to_string())
        }
    }
}

/// Result 类型别名
pub type GatewayResult<T> = Result<T, GatewayError>;
