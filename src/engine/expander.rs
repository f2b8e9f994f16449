// ==========================================
// 教室占用控制 - 排课展开引擎
// ==========================================
// 职责: 稀疏排课行 → 稠密占用网格
// 输入: ScheduleRow 列表（源表顺序）
// 输出: Expansion（占用记录 + 展开报告）
// 红线: 网格稠密,所有 (日期 × 教室 × 3 时段) 各恰好一条
// ==========================================

use crate::domain::{
    DoubleBooking, Expansion, ExpansionReport, OccupancyRecord, Period, ScheduleRow, SkipReason,
    SkippedRow, UnknownPeriodRow, WEEKDAY_COUNT,
};
use crate::importer::DataCleaner;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashMap};

/// 有效排课行（已通过必填校验）
struct ActiveSchedule<'a> {
    row_number: usize,
    course: &'a str,
    period_label: &'a str,
    period: Option<Period>, // None: 时段无法识别,只贡献网格的日期与教室
    room: String,
    start: NaiveDate,
    end: NaiveDate,
    weekdays: [bool; WEEKDAY_COUNT],
}

/// 已占用格: 课程 + 来源行号
struct OccupiedSlot {
    course: String,
    row_number: usize,
}

type SlotKey = (NaiveDate, String, Period);

// ==========================================
// ScheduleExpander - 排课展开引擎
// ==========================================
pub struct ScheduleExpander {
    occupied_marker: String,
    cleaner: DataCleaner,
}

impl Default for ScheduleExpander {
    fn default() -> Self {
        Self::new("x")
    }
}

impl ScheduleExpander {
    /// # 参数
    /// - occupied_marker: 工作日占用标记（忽略大小写与首尾空白）
    pub fn new(occupied_marker: &str) -> Self {
        Self {
            occupied_marker: occupied_marker.to_string(),
            cleaner: DataCleaner,
        }
    }

    /// 展开排课行
    ///
    /// 1. 每个有效行: 逐日遍历 [start, end],跳过周六日
    /// 2. 当日标记命中占用标记 → 占用记录
    /// 3. 取有效行区间内的工作日集 × 有效行教室集 × 3 时段
    /// 4. 已占用保留,其余补空闲记录
    ///
    /// 时段无法识别的行照常贡献日期与教室,只是不产生占用,记入 unknown_periods
    ///
    /// 同一格被多行占用时,源表中先出现者保留,其余记入 double_bookings
    pub fn expand(&self, rows: &[ScheduleRow]) -> Expansion {
        let mut report = ExpansionReport {
            total_rows: rows.len(),
            ..ExpansionReport::default()
        };

        let mut occupied: HashMap<SlotKey, OccupiedSlot> = HashMap::new();
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut rooms: BTreeSet<String> = BTreeSet::new();

        for row in rows {
            let schedule = match self.validate(row) {
                Ok(schedule) => schedule,
                Err(reason) => {
                    tracing::debug!("跳过第 {} 行: {}", row.row_number, reason);
                    report.skipped.push(SkippedRow {
                        row_number: row.row_number,
                        reason,
                    });
                    continue;
                }
            };
            report.expanded_rows += 1;
            rooms.insert(schedule.room.clone());
            if schedule.period.is_none() {
                tracing::debug!(
                    "第 {} 行时段无法识别: {}（不计占用）",
                    schedule.row_number,
                    schedule.period_label
                );
                report.unknown_periods.push(UnknownPeriodRow {
                    row_number: schedule.row_number,
                    label: schedule.period_label.to_string(),
                });
            }

            for date in schedule.start.iter_days().take_while(|d| *d <= schedule.end) {
                let weekday_idx = date.weekday().num_days_from_monday() as usize;
                if weekday_idx >= WEEKDAY_COUNT {
                    continue;
                }
                // 有效区间内的工作日均进入网格,无论当日是否占用
                dates.insert(date);
                let period = match schedule.period {
                    Some(period) if schedule.weekdays[weekday_idx] => period,
                    _ => continue,
                };

                let key = (date, schedule.room.clone(), period);
                if let Some(existing) = occupied.get(&key) {
                    report.double_bookings.push(DoubleBooking {
                        date,
                        room: schedule.room.clone(),
                        period,
                        kept_course: existing.course.clone(),
                        kept_row: existing.row_number,
                        dropped_course: schedule.course.to_string(),
                        dropped_row: schedule.row_number,
                    });
                    continue;
                }

                occupied.insert(
                    key,
                    OccupiedSlot {
                        course: schedule.course.to_string(),
                        row_number: schedule.row_number,
                    },
                );
            }
        }

        // 稠密网格: 日期 → 教室 → 时段（即结果排序）
        let mut records = Vec::with_capacity(dates.len() * rooms.len() * Period::ALL.len());
        for date in &dates {
            for room in &rooms {
                for period in Period::ALL {
                    let key = (*date, room.clone(), period);
                    match occupied.get(&key) {
                        Some(slot) => {
                            records.push(OccupancyRecord::occupied(*date, room, period, &slot.course))
                        }
                        None => records.push(OccupancyRecord::free(*date, room, period)),
                    }
                }
            }
        }

        report.occupied_slots = occupied.len();
        report.free_slots = records.len() - occupied.len();

        tracing::info!(
            "排课展开完成: 有效行={}, 跳过={}, 时段未识别={}, 日期={}, 教室={}, 网格={} (占用 {} / 空闲 {}), 重复占用={}",
            report.expanded_rows,
            report.skipped.len(),
            report.unknown_periods.len(),
            dates.len(),
            rooms.len(),
            records.len(),
            report.occupied_slots,
            report.free_slots,
            report.double_bookings.len()
        );
        if !report.double_bookings.is_empty() {
            tracing::warn!("发现 {} 处重复占用（保留先出现的排课）", report.double_bookings.len());
        }

        Expansion { records, report }
    }

    /// 必填校验: 课程 / 开始 / 结束 / 教室 / 时段
    ///
    /// 教室再次 TRIM + UPPER,直接构造的 ScheduleRow 同样适用
    fn validate<'a>(&self, row: &'a ScheduleRow) -> Result<ActiveSchedule<'a>, SkipReason> {
        let missing = |field: &str| SkipReason::MissingField {
            field: field.to_string(),
        };
        let present = |value: &'a Option<String>| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        };

        let course = present(&row.course).ok_or_else(|| missing("course"))?;
        let start = row.start_date.ok_or_else(|| missing("start_date"))?;
        let end = row.end_date.ok_or_else(|| missing("end_date"))?;
        let room = present(&row.room).ok_or_else(|| missing("room"))?;
        let period_label = present(&row.period).ok_or_else(|| missing("period"))?;

        let mut weekdays = [false; WEEKDAY_COUNT];
        for (idx, flag) in weekdays.iter_mut().enumerate() {
            *flag = self.cleaner.is_marker(row.day_flag(idx), &self.occupied_marker);
        }

        Ok(ActiveSchedule {
            row_number: row.row_number,
            course,
            period_label,
            period: Period::from_label(period_label),
            room: self.cleaner.clean_text(room, true),
            start,
            end,
            weekdays,
        })
    }
}
