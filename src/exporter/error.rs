// ==========================================
// 教室占用控制 - 导出模块错误类型
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出格式不支持: {0}（仅支持 xlsx/csv）")]
    UnsupportedFormat(String),

    #[error("工作簿生成失败: {0}")]
    WorkbookError(String),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("文件写入失败: {path}: {message}")]
    FileWriteError { path: String, message: String },
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::WorkbookError(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
