// ==========================================
// 教室占用控制 - 引擎层
// ==========================================
// 职责: 排课展开、结果筛选、展开缓存
// 红线: 引擎不读写文件格式,输入输出均为领域类型
// ==========================================

pub mod cache;
pub mod expander;
pub mod filter;

// 重导出核心引擎
pub use cache::{ExpansionCache, SourceFingerprint};
pub use expander::ScheduleExpander;
pub use filter::{is_any_label, FilterCriteria, FilterEngine, StatusFilter, ANY_LABELS};
