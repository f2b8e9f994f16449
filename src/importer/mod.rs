// ==========================================
// 教室占用控制 - 导入层
// ==========================================
// 职责: 外部排课表导入,生成 ScheduleRow
// 支持: Excel (xlsx/xlsm/xls/ods), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod schedule_importer;
pub mod schedule_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CellValue, CsvParser, ExcelParser, RawRow, UniversalFileParser};
pub use schedule_importer::{ImportOutcome, ScheduleImporterImpl};

// 重导出 Trait 接口
pub use schedule_importer_trait::{FileParser, ScheduleImporter};
