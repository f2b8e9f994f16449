// ==========================================
// 教室占用控制 - 配置模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn value(key: &str, value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValueError {
            key: key.to_string(),
            value: value.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
