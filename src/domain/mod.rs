// ==========================================
// 教室占用控制 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod occupancy;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use occupancy::{
    DoubleBooking, Expansion, ExpansionReport, OccupancyRecord, OccupancySummary, SkipReason,
    SkippedRow, UnknownPeriodRow,
};
pub use schedule::{ScheduleRow, WEEKDAY_COUNT};
pub use types::{OccupancyStatus, Period};
