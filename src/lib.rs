// ==========================================
// 教室占用控制 - 核心库
// ==========================================
// 输入: 排课计划表（Excel / CSV,每行一门课程）
// 输出: 按 日期 × 教室 × 时段 展开的占用网格,可筛选、可导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 源表布局与导出设置
pub mod config;

// 导入层 - 外部排课表
pub mod importer;

// 引擎层 - 展开 / 筛选 / 缓存
pub mod engine;

// 导出层 - XLSX / CSV
pub mod exporter;

// API 层 - 查询接口
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Expansion, ExpansionReport, OccupancyRecord, OccupancyStatus, OccupancySummary, Period,
    ScheduleRow,
};

// 配置
pub use config::{AppConfig, ConfigManager};

// 引擎
pub use engine::{ExpansionCache, FilterCriteria, FilterEngine, ScheduleExpander, StatusFilter};

// 导出
pub use exporter::{ExportFormat, OccupancyExporter};

// API
pub use api::{ApiError, OccupancyApi, QueryRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教室占用控制";
