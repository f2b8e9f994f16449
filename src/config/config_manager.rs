// ==========================================
// 教室占用控制 - 配置管理器
// ==========================================
// 职责: 配置加载、覆写、校验
// 优先级: 默认值 < JSON 配置文件 < 环境变量 < 命令行参数
// ==========================================

use crate::config::column_layout::ColumnLayout;
use crate::config::error::{ConfigError, ConfigResult};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// 配置键 / 环境变量名
// ==========================================
pub mod config_keys {
    /// 配置文件路径
    pub const ENV_CONFIG_PATH: &str = "ROOM_OCCUPANCY_CONFIG";
    /// 源表文件路径
    pub const ENV_SOURCE_PATH: &str = "ROOM_OCCUPANCY_SOURCE";
    /// 源表工作表名
    pub const ENV_SOURCE_SHEET: &str = "ROOM_OCCUPANCY_SHEET";

    /// 用户配置目录下的子目录名
    pub const CONFIG_DIR_NAME: &str = "room-occupancy";
    /// 配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// 默认日期显示格式（DD/MM/YYYY）
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// SourceConfig - 源表配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub sheet: String,
    pub first_data_row: u32, // 1 起,含
    pub columns: ColumnLayout,
    pub occupied_marker: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Planejamento e Custos - 2025.xlsm"),
            sheet: "Planejamento".to_string(),
            first_data_row: 2,
            columns: ColumnLayout::default(),
            occupied_marker: "x".to_string(),
        }
    }
}

// ==========================================
// ExportConfig - 导出配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub headers: [String; 5], // 日期 / 教室 / 时段 / 课程 / 状态
    pub date_format: String,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Controle de Salas".to_string(),
            headers: [
                "Data".to_string(),
                "Sala".to_string(),
                "Período".to_string(),
                "Curso".to_string(),
                "Status".to_string(),
            ],
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            file_name: "controle_salas.xlsx".to_string(),
        }
    }
}

impl ExportConfig {
    /// 实际使用的日期格式
    ///
    /// 配置格式无效时回退到 DD/MM/YYYY（不报错）
    pub fn effective_date_format(&self) -> &str {
        if is_valid_date_format(&self.date_format) {
            &self.date_format
        } else {
            tracing::warn!(
                "导出日期格式无效: {:?}，回退为 {}",
                self.date_format,
                DEFAULT_DATE_FORMAT
            );
            DEFAULT_DATE_FORMAT
        }
    }
}

/// 检查 strftime 格式串是否可用
pub fn is_valid_date_format(format: &str) -> bool {
    !format.trim().is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// 从 JSON 文件读取（缺省字段取默认值）
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 应用覆写（lookup 通常为环境变量读取）
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = non_empty(config_keys::ENV_SOURCE_PATH) {
            tracing::debug!("环境变量覆写源表路径: {}", path);
            self.source.path = PathBuf::from(path);
        }
        if let Some(sheet) = non_empty(config_keys::ENV_SOURCE_SHEET) {
            tracing::debug!("环境变量覆写工作表: {}", sheet);
            self.source.sheet = sheet;
        }
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.source.columns.resolve()?;

        if self.source.first_data_row == 0 {
            return Err(ConfigError::value(
                "source.first_data_row",
                "0",
                "行号从 1 开始",
            ));
        }
        if self.source.occupied_marker.trim().is_empty() {
            return Err(ConfigError::value(
                "source.occupied_marker",
                self.source.occupied_marker.clone(),
                "占用标记不能为空",
            ));
        }
        if self.source.sheet.trim().is_empty() {
            return Err(ConfigError::value("source.sheet", "", "工作表名不能为空"));
        }
        if self.export.sheet_name.trim().is_empty() || self.export.sheet_name.chars().count() > 31 {
            return Err(ConfigError::value(
                "export.sheet_name",
                self.export.sheet_name.clone(),
                "工作表名长度应为 1..31",
            ));
        }
        Ok(())
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    explicit: bool,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件（优先于默认位置）
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        let explicit = explicit_path.is_some();
        let config_path = explicit_path.or_else(get_default_config_path);
        Self {
            config_path,
            explicit,
        }
    }

    /// 加载配置
    ///
    /// # 说明
    /// - 显式指定的文件不存在时报错
    /// - 默认位置的文件不存在时使用默认值
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let mut config = match &self.config_path {
            Some(path) if path.exists() => {
                tracing::info!("加载配置文件: {}", path.display());
                AppConfig::from_file(path)?
            }
            Some(path) if self.explicit => {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    message: "文件不存在".to_string(),
                });
            }
            _ => {
                tracing::debug!("未找到配置文件，使用默认配置");
                AppConfig::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}

/// 默认配置文件路径
///
/// 1. 环境变量 ROOM_OCCUPANCY_CONFIG
/// 2. <用户配置目录>/room-occupancy/config.json
pub fn get_default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(config_keys::ENV_CONFIG_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| {
        dir.join(config_keys::CONFIG_DIR_NAME)
            .join(config_keys::CONFIG_FILE_NAME)
    })
}
