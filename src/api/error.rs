// ==========================================
// 批量抄表工作台 - API层错误类型
// ==========================================
// 职责: 面向录入人员的错误口径；转换各层技术错误
// 约定:
// - 校验类错误阻止动作且不发起后端调用
// - 探测类错误不会出现在这里（探测降级为默认值，只记日志）
// - 提交类错误携带后端详情（若能解析）
// ==========================================

use crate::engine::submit::SubmitError;
use crate::gateway::error::GatewayError;
use crate::workbook::error::WorkbookError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 前置条件错误
    // ==========================================
    #[error("请先选择楼栋")]
    NoBuildingSelected,

    #[error("请先选择抄表日期")]
    NoDateSelected,

    /// 公用事业类型目录中找不到匹配项（配置错误）
    #[error("未找到公用事业类型: {0}")]
    UtilityTypeMissing(String),

    // ==========================================
    // 各层错误转换
    // ==========================================
    #[error("后端接口错误: {0}")]
    Gateway(#[from] GatewayError),

    #[error("工作簿处理失败: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
