// ==========================================
// 教室占用控制 - 筛选引擎
// ==========================================
// 职责: 对稠密网格应用用户筛选条件
// 规则: 所有条件 AND; 未设置（Any）的维度全部放行
// 排序: 日期 ↑ → 教室 ↑（字典序）→ 时段 ↑（枚举序）
// 红线: 纯函数,无副作用
// ==========================================

use crate::domain::{OccupancyRecord, OccupancyStatus, OccupancySummary, Period};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 控件中表示“不限”的取值（小写）,状态 / 教室 / 时段共用
pub const ANY_LABELS: [&str; 4] = ["all", "any", "todos", "todas"];

/// 空串或“不限”取值
pub fn is_any_label(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    normalized.is_empty() || ANY_LABELS.contains(&normalized.as_str())
}

// ==========================================
// StatusFilter - 状态筛选
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
    #[default]
    Any,
    Free,
    Occupied,
}

impl StatusFilter {
    pub fn matches(&self, status: OccupancyStatus) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Free => status == OccupancyStatus::Free,
            StatusFilter::Occupied => status == OccupancyStatus::Occupied,
        }
    }

    /// 从控件取值解析（all / todos / todas / free / livre / occupied / ocupado）
    pub fn from_label(label: &str) -> Option<Self> {
        if is_any_label(label) {
            return Some(StatusFilter::Any);
        }
        OccupancyStatus::from_label(label.trim()).map(|status| match status {
            OccupancyStatus::Free => StatusFilter::Free,
            OccupancyStatus::Occupied => StatusFilter::Occupied,
        })
    }
}

// ==========================================
// FilterCriteria - 筛选条件
// ==========================================
// 每次交互重新构造,不持久化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_from: Option<NaiveDate>, // 含
    pub date_to: Option<NaiveDate>,   // 含
    pub status: StatusFilter,
    pub room: Option<String>,
    pub period: Option<Period>,
}

impl FilterCriteria {
    /// 全部放行
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// 教室编号按 TRIM + UPPER 比较
    pub fn with_room(mut self, room: &str) -> Self {
        self.room = Some(room.trim().to_uppercase());
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn matches(&self, record: &OccupancyRecord) -> bool {
        self.date_from.map_or(true, |from| record.date >= from)
            && self.date_to.map_or(true, |to| record.date <= to)
            && self.status.matches(record.status)
            && self
                .room
                .as_deref()
                .map_or(true, |room| record.room == room)
            && self.period.map_or(true, |period| record.period == period)
    }
}

// ==========================================
// FilterEngine - 筛选引擎
// ==========================================
pub struct FilterEngine;

impl FilterEngine {
    /// 应用筛选条件并排序
    pub fn apply(&self, records: &[OccupancyRecord], criteria: &FilterCriteria) -> Vec<OccupancyRecord> {
        let mut result: Vec<OccupancyRecord> = records
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        tracing::debug!(
            "筛选完成: 输入={}, 输出={}, 条件={:?}",
            records.len(),
            result.len(),
            criteria
        );
        result
    }

    /// 教室下拉选项（去重、排序）
    pub fn available_rooms(&self, records: &[OccupancyRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.room.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 日期范围控件默认值: (最早, 最晚)
    pub fn date_bounds(&self, records: &[OccupancyRecord]) -> Option<(NaiveDate, NaiveDate)> {
        let min = records.iter().map(|r| r.date).min()?;
        let max = records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn summarize(&self, records: &[OccupancyRecord]) -> OccupancySummary {
        OccupancySummary::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 两天 × 两教室 × 3 时段,A1 周一上午占用、B2 周二晚上占用（乱序）
    fn sample_grid() -> Vec<OccupancyRecord> {
        let mut records = Vec::new();
        for d in [date(2025, 3, 4), date(2025, 3, 3)] {
            for room in ["B2", "A1"] {
                for period in [Period::Evening, Period::Morning, Period::Afternoon] {
                    let occupied = (d == date(2025, 3, 3) && room == "A1" && period == Period::Morning)
                        || (d == date(2025, 3, 4) && room == "B2" && period == Period::Evening);
                    records.push(if occupied {
                        OccupancyRecord::occupied(d, room, period, "Math101")
                    } else {
                        OccupancyRecord::free(d, room, period)
                    });
                }
            }
        }
        records
    }

    #[test]
    fn test_any_filter_returns_everything_sorted() {
        let records = sample_grid();
        let result = FilterEngine.apply(&records, &FilterCriteria::any());

        assert_eq!(result.len(), records.len());
        assert_eq!(result[0].sort_key(), (date(2025, 3, 3), "A1", Period::Morning));
        assert_eq!(result[1].period, Period::Afternoon);
        assert_eq!(result[2].period, Period::Evening);
        assert_eq!(result[3].room, "B2");
        assert!(result.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn test_status_occupied() {
        let result = FilterEngine.apply(
            &sample_grid(),
            &FilterCriteria::any().with_status(StatusFilter::Occupied),
        );
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.is_occupied()));
        assert_eq!(result[0].date, date(2025, 3, 3));
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let criteria = FilterCriteria::any()
            .with_date_range(date(2025, 3, 4), date(2025, 3, 4))
            .with_status(StatusFilter::Free)
            .with_room(" b2 ")
            .with_period(Period::Morning);
        let result = FilterEngine.apply(&sample_grid(), &criteria);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sort_key(), (date(2025, 3, 4), "B2", Period::Morning));
        assert!(!result[0].is_occupied());
    }

    #[test]
    fn test_open_ended_date_range() {
        let criteria = FilterCriteria {
            date_from: Some(date(2025, 3, 4)),
            ..FilterCriteria::default()
        };
        let result = FilterEngine.apply(&sample_grid(), &criteria);
        assert_eq!(result.len(), 6);
        assert!(result.iter().all(|r| r.date == date(2025, 3, 4)));
    }

    #[test]
    fn test_empty_range_returns_nothing() {
        let criteria = FilterCriteria::any().with_date_range(date(2025, 4, 1), date(2025, 4, 30));
        assert!(FilterEngine.apply(&sample_grid(), &criteria).is_empty());
    }

    #[test]
    fn test_status_filter_labels() {
        for label in ["Todos", "Todas", " TODAS ", "all", "Any", ""] {
            assert_eq!(StatusFilter::from_label(label), Some(StatusFilter::Any), "{}", label);
        }
        assert_eq!(StatusFilter::from_label("Livre"), Some(StatusFilter::Free));
        assert_eq!(StatusFilter::from_label("OCCUPIED"), Some(StatusFilter::Occupied));
        assert_eq!(StatusFilter::from_label("busy"), None);
    }

    #[test]
    fn test_control_helpers() {
        let records = sample_grid();
        assert_eq!(FilterEngine.available_rooms(&records), vec!["A1", "B2"]);
        assert_eq!(
            FilterEngine.date_bounds(&records),
            Some((date(2025, 3, 3), date(2025, 3, 4)))
        );
        assert_eq!(FilterEngine.date_bounds(&[]), None);

        let summary = FilterEngine.summarize(&records);
        assert_eq!(summary.total, 12);
        assert_eq!(summary.occupied, 2);
    }
}
