// ==========================================
// 商业物业租赁管理系统 - 批量抄表工作台核心库
// ==========================================
// 技术栈: Rust + REST 后端
// 系统定位: 抄表录入编排层 (业务规则以后端为准)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 网关层 - 后端 REST 接口访问
pub mod gateway;

// 引擎层 - 业务规则
pub mod engine;

// 工作簿层 - 抄表模板导出/导入
pub mod workbook;

// 会话层 - 抄表会话状态机
pub mod session;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    IneligibleReason, LeaseStatus, ProbeOutcome, RowPhase, UtilityKind,
};

// 领域实体
pub use domain::{
    Building, BulkCreateReceipt, BulkReadingRow, Lease, ReadingPeriod, ReadingRecord, Unit,
    UtilityType,
};

// 引擎
pub use engine::{
    Eligibility, EligibilityCore, EligibilityEngine, StatusProber, SubmissionBatcher,
};

// 网关
pub use gateway::{GatewayError, LeasingGateway};

// API
pub use api::{ApiError, MeterIntakeApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商业物业租赁管理系统 · 批量抄表工作台";
