// ==========================================
// 教室占用控制 - 占用记录与展开报告
// ==========================================
// 职责: 定义展开引擎的输出实体
// 红线: 记录一经生成不可修改,只能整体重算
// ==========================================

use crate::domain::types::{OccupancyStatus, Period};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OccupancyRecord - 占用记录
// ==========================================
// 一条 (日期, 教室, 时段) 观测
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub date: NaiveDate,
    pub room: String,
    pub period: Period,
    pub course: String, // 空闲时为空串
    pub status: OccupancyStatus,
}

impl OccupancyRecord {
    pub fn occupied(date: NaiveDate, room: &str, period: Period, course: &str) -> Self {
        Self {
            date,
            room: room.to_string(),
            period,
            course: course.to_string(),
            status: OccupancyStatus::Occupied,
        }
    }

    pub fn free(date: NaiveDate, room: &str, period: Period) -> Self {
        Self {
            date,
            room: room.to_string(),
            period,
            course: String::new(),
            status: OccupancyStatus::Free,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status == OccupancyStatus::Occupied
    }

    /// 排序键: 日期 → 教室（字典序）→ 时段（枚举序）
    pub fn sort_key(&self) -> (NaiveDate, &str, Period) {
        (self.date, self.room.as_str(), self.period)
    }
}

// ==========================================
// SkipReason - 行跳过原因
// ==========================================
// 数据质量容忍策略: 跳过不报错,仅记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    MissingField { field: String },
    InvalidDate { field: String, value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField { field } => write!(f, "必填字段缺失: {}", field),
            SkipReason::InvalidDate { field, value } => {
                write!(f, "日期无法解析 (字段 {}): {}", field, value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,  // 源表行号
    pub reason: SkipReason, // 跳过原因
}

/// 时段无法识别的行: 仍计入网格的日期与教室,但不产生占用记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownPeriodRow {
    pub row_number: usize,
    pub label: String,
}

// ==========================================
// DoubleBooking - 重复占用
// ==========================================
// 两行排课占用同一 (日期, 教室, 时段): 先出现者保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleBooking {
    pub date: NaiveDate,
    pub room: String,
    pub period: Period,
    pub kept_course: String,
    pub kept_row: usize,
    pub dropped_course: String,
    pub dropped_row: usize,
}

// ==========================================
// ExpansionReport - 展开报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub total_rows: usize,                    // 读取的非空行数
    pub expanded_rows: usize,                 // 参与展开的有效行数
    pub skipped: Vec<SkippedRow>,             // 跳过明细
    pub unknown_periods: Vec<UnknownPeriodRow>, // 时段无法识别的行
    pub double_bookings: Vec<DoubleBooking>,  // 重复占用明细
    pub occupied_slots: usize,                // 占用格数
    pub free_slots: usize,                    // 空闲格数
}

impl ExpansionReport {
    pub fn grid_size(&self) -> usize {
        self.occupied_slots + self.free_slots
    }
}

// ==========================================
// Expansion - 展开结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub records: Vec<OccupancyRecord>,
    pub report: ExpansionReport,
}

// ==========================================
// OccupancySummary - 结果视图汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancySummary {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub occupancy_rate: f64, // 0.0 ~ 1.0,空集为 0
}

impl OccupancySummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a OccupancyRecord>,
    {
        let (total, occupied) = records
            .into_iter()
            .fold((0usize, 0usize), |(total, occupied), r| {
                (total + 1, occupied + usize::from(r.is_occupied()))
            });
        let occupancy_rate = if total == 0 {
            0.0
        } else {
            occupied as f64 / total as f64
        };

        Self {
            total,
            occupied,
            free: total - occupied,
            occupancy_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_free_record_has_empty_course() {
        let record = OccupancyRecord::free(date(2025, 3, 4), "A1", Period::Afternoon);
        assert_eq!(record.course, "");
        assert!(!record.is_occupied());
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            OccupancyRecord::occupied(date(2025, 3, 3), "A1", Period::Morning, "Math101"),
            OccupancyRecord::free(date(2025, 3, 3), "A1", Period::Afternoon),
            OccupancyRecord::free(date(2025, 3, 3), "A1", Period::Evening),
            OccupancyRecord::free(date(2025, 3, 4), "A1", Period::Morning),
        ];
        let summary = OccupancySummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.free, 3);
        assert!((summary.occupancy_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_empty() {
        let records: Vec<OccupancyRecord> = Vec::new();
        let summary = OccupancySummary::from_records(&records);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.occupancy_rate, 0.0);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::MissingField {
            field: "room".to_string(),
        };
        assert_eq!(reason.to_string(), "必填字段缺失: room");
    }
}
