// ==========================================
// 教室占用控制 - API 层
// ==========================================
// 职责: 对外查询接口（CLI / 宿主 UI 共用）
// ==========================================

pub mod error;
pub mod occupancy_api;

pub use error::{ApiError, ApiResult};
pub use occupancy_api::{
    parse_criteria, ExportResponse, FilterOptions, LoadResponse, OccupancyApi, QueryRequest,
    QueryResponse,
};
