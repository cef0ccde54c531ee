// ==========================================
// 批量抄表工作台 - 工作簿模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 工作簿模块错误类型
#[derive(Error, Debug)]
pub enum WorkbookError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("Excel 写入失败: {0}")]
    ExcelWriteError(String),

    // ===== 模板结构错误 =====
    /// 找不到包含全部必需表头的行 → 整个文件按无效格式拒绝
    #[error("文件格式不正确：缺少必需的表头（{0}）")]
    InvalidTemplate(String),

    #[error("文件无数据行")]
    EmptyWorkbook,
}

/// Result 类型别名
pub type WorkbookResult<T> = Result<T, WorkbookError>;
