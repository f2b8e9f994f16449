// ==========================================
// 教室占用控制 - 占用查询 API
// ==========================================
// 职责: 串联 导入 → 展开（缓存）→ 筛选 → 导出
// 调用方: CLI / 宿主 UI
// 说明: 请求参数为字符串（控件原值）,在此统一解析与校验
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::domain::{
    Expansion, ExpansionReport, OccupancyRecord, OccupancyStatus, OccupancySummary, Period,
};
use crate::engine::{
    is_any_label, ExpansionCache, FilterCriteria, FilterEngine, ScheduleExpander, StatusFilter,
};
use crate::exporter::{ExportFormat, OccupancyExporter};
use crate::importer::{ScheduleImporter, ScheduleImporterImpl};

/// 请求日期格式
const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// DTO
// ==========================================

/// 加载响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    /// 源文件路径
    pub source: String,
    /// 展开报告（跳过明细、重复占用等）
    pub report: ExpansionReport,
    /// 全网格汇总
    pub summary: OccupancySummary,
}

/// 筛选控件选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub rooms: Vec<String>,
    pub periods: Vec<String>,
    pub statuses: Vec<String>,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

/// 查询请求（字段均可缺省,缺省即不限）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    pub date_from: Option<String>, // YYYY-MM-DD
    pub date_to: Option<String>,   // YYYY-MM-DD
    pub status: Option<String>,
    pub room: Option<String>,
    pub period: Option<String>,
}

/// 查询响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub rows: Vec<OccupancyRecord>,
    pub summary: OccupancySummary,
}

/// 导出响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub output: String,
    pub format: ExportFormat,
    pub rows: usize,
}

// ==========================================
// OccupancyApi
// ==========================================
pub struct OccupancyApi {
    source_path: PathBuf,
    importer: ScheduleImporterImpl,
    expander: ScheduleExpander,
    filter: FilterEngine,
    exporter: OccupancyExporter,
    cache: ExpansionCache,
}

impl OccupancyApi {
    /// 按配置创建 API 实例
    ///
    /// # 返回
    /// - Err(ApiError::ConfigError): 配置校验失败
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            source_path: config.source.path.clone(),
            importer: ScheduleImporterImpl::new(&config.source)?,
            expander: ScheduleExpander::new(&config.source.occupied_marker),
            filter: FilterEngine,
            exporter: OccupancyExporter::new(&config.export),
            cache: ExpansionCache::new(),
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// 取展开结果（命中缓存则不重读源表）
    fn expansion(&self) -> ApiResult<Arc<Expansion>> {
        let expansion = self.cache.get_or_load(&self.source_path, |path| {
            let outcome = self.importer.import(path)?;
            let mut expansion = self.expander.expand(&outcome.rows);

            // 导入阶段与展开阶段的跳过明细合并,按源表行号排序
            let report = &mut expansion.report;
            report.total_rows = outcome.total_rows;
            report.skipped.extend(outcome.skipped);
            report.skipped.sort_by_key(|s| s.row_number);
            Ok(expansion)
        })?;
        Ok(expansion)
    }

    /// 加载源表
    pub fn load(&self) -> ApiResult<LoadResponse> {
        let expansion = self.expansion()?;
        Ok(LoadResponse {
            source: self.source_path.display().to_string(),
            report: expansion.report.clone(),
            summary: self.filter.summarize(&expansion.records),
        })
    }

    /// 筛选控件选项
    pub fn filter_options(&self) -> ApiResult<FilterOptions> {
        let expansion = self.expansion()?;
        let bounds = self.filter.date_bounds(&expansion.records);
        Ok(FilterOptions {
            rooms: self.filter.available_rooms(&expansion.records),
            periods: Period::ALL.iter().map(|p| p.label().to_string()).collect(),
            statuses: [OccupancyStatus::Free, OccupancyStatus::Occupied]
                .iter()
                .map(|s| s.label().to_string())
                .collect(),
            date_min: bounds.map(|(min, _)| min),
            date_max: bounds.map(|(_, max)| max),
        })
    }

    /// 按请求筛选
    pub fn query(&self, request: &QueryRequest) -> ApiResult<QueryResponse> {
        let criteria = parse_criteria(request)?;
        let expansion = self.expansion()?;
        let rows = self.filter.apply(&expansion.records, &criteria);
        let summary = self.filter.summarize(&rows);
        Ok(QueryResponse { rows, summary })
    }

    /// 按请求筛选并导出
    pub fn export(
        &self,
        request: &QueryRequest,
        output: &Path,
        format: ExportFormat,
    ) -> ApiResult<ExportResponse> {
        let response = self.query(request)?;
        let rows = self
            .exporter
            .export_to_file(&response.rows, output, format)?;
        Ok(ExportResponse {
            output: output.display().to_string(),
            format,
            rows,
        })
    }

    /// 按请求筛选并生成导出字节（供宿主直接下载）
    pub fn export_bytes(&self, request: &QueryRequest, format: ExportFormat) -> ApiResult<Vec<u8>> {
        let response = self.query(request)?;
        Ok(self.exporter.export_to_buffer(&response.rows, format)?)
    }

    /// 丢弃缓存,下一次访问重读源表
    pub fn refresh(&self) -> ApiResult<()> {
        self.cache.invalidate()?;
        Ok(())
    }
}

// ==========================================
// 请求解析
// ==========================================

/// 空串与“不限”取值视为未设置
fn selection(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !is_any_label(v))
}

fn parse_date(field: &str, value: &Option<String>) -> ApiResult<Option<NaiveDate>> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, REQUEST_DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                ApiError::InvalidInput(format!("{} 日期格式错误（应为 YYYY-MM-DD）: {}", field, text))
            }),
    }
}

/// 请求 → 筛选条件
pub fn parse_criteria(request: &QueryRequest) -> ApiResult<FilterCriteria> {
    let date_from = parse_date("date_from", &request.date_from)?;
    let date_to = parse_date("date_to", &request.date_to)?;
    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            return Err(ApiError::InvalidInput(format!(
                "开始日期晚于结束日期: {} > {}",
                from, to
            )));
        }
    }

    let status = match request.status.as_deref() {
        None => StatusFilter::Any,
        Some(label) => StatusFilter::from_label(label)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知状态: {}", label)))?,
    };

    let period = match selection(&request.period) {
        None => None,
        Some(label) => Some(
            Period::from_label(label)
                .ok_or_else(|| ApiError::InvalidInput(format!("未知时段: {}", label)))?,
        ),
    };

    let mut criteria = FilterCriteria {
        date_from,
        date_to,
        status,
        period,
        ..FilterCriteria::default()
    };
    if let Some(room) = selection(&request.room) {
        criteria = criteria.with_room(room);
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QueryRequest {
        QueryRequest::default()
    }

    #[test]
    fn test_parse_empty_request_is_any() {
        assert_eq!(parse_criteria(&request()).unwrap(), FilterCriteria::any());

        let all = QueryRequest {
            status: Some("Todos".to_string()),
            room: Some("Todas".to_string()),
            period: Some("Todos".to_string()),
            date_from: Some(" ".to_string()),
            ..request()
        };
        assert_eq!(parse_criteria(&all).unwrap(), FilterCriteria::any());

        // 三个控件接受同一组“不限”取值
        for label in ["Todas", "todos", "ALL"] {
            let all = QueryRequest {
                status: Some(label.to_string()),
                room: Some(label.to_string()),
                period: Some(label.to_string()),
                ..request()
            };
            assert_eq!(parse_criteria(&all).unwrap(), FilterCriteria::any(), "{}", label);
        }
    }

    #[test]
    fn test_parse_full_request() {
        let req = QueryRequest {
            date_from: Some("2025-03-03".to_string()),
            date_to: Some("2025-03-07".to_string()),
            status: Some("Livre".to_string()),
            room: Some(" a1 ".to_string()),
            period: Some("noite".to_string()),
        };
        let criteria = parse_criteria(&req).unwrap();

        assert_eq!(criteria.date_from, NaiveDate::from_ymd_opt(2025, 3, 3));
        assert_eq!(criteria.date_to, NaiveDate::from_ymd_opt(2025, 3, 7));
        assert_eq!(criteria.status, StatusFilter::Free);
        assert_eq!(criteria.room.as_deref(), Some("A1"));
        assert_eq!(criteria.period, Some(Period::Evening));
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        let bad_date = QueryRequest {
            date_from: Some("03/03/2025".to_string()),
            ..request()
        };
        assert!(matches!(parse_criteria(&bad_date), Err(ApiError::InvalidInput(_))));

        let inverted = QueryRequest {
            date_from: Some("2025-03-07".to_string()),
            date_to: Some("2025-03-03".to_string()),
            ..request()
        };
        assert!(matches!(parse_criteria(&inverted), Err(ApiError::InvalidInput(_))));

        let bad_status = QueryRequest {
            status: Some("busy".to_string()),
            ..request()
        };
        assert!(matches!(parse_criteria(&bad_status), Err(ApiError::InvalidInput(_))));

        let bad_period = QueryRequest {
            period: Some("Madrugada".to_string()),
            ..request()
        };
        assert!(matches!(parse_criteria(&bad_period), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_query_request_deserializes_partial_json() {
        let req: QueryRequest = serde_json::from_str(r#"{"status":"Ocupado"}"#).unwrap();
        assert_eq!(req.status.as_deref(), Some("Ocupado"));
        assert_eq!(req.room, None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.source.occupied_marker = String::new();
        assert!(matches!(OccupancyApi::new(config), Err(ApiError::ConfigError(_))));
    }
}
