// ==========================================
// 教室占用控制 - 导出层
// ==========================================
// 职责: 筛选结果写出为 XLSX / CSV
// ==========================================

pub mod error;
pub mod occupancy_exporter;

pub use error::{ExportError, ExportResult};
pub use occupancy_exporter::{ExportFormat, OccupancyExporter};
