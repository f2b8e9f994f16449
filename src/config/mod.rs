// ==========================================
// 教室占用控制 - 配置层
// ==========================================
// 职责: 源表位置 / 列布局 / 导出格式 配置
// 存储: JSON 配置文件 + 环境变量覆写
// ==========================================

pub mod column_layout;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use column_layout::{column_index, ColumnLayout, ResolvedColumns};
pub use config_manager::{
    config_keys, get_default_config_path, AppConfig, ConfigManager, ExportConfig, SourceConfig,
    DEFAULT_DATE_FORMAT,
};
pub use error::{ConfigError, ConfigResult};
