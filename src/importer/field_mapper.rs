// ==========================================
// 教室占用控制 - 字段映射器实现
// ==========================================
// 职责: 原始行（按列位置）→ ScheduleRow + 类型转换
// 说明: 缺失字段保留为 None,由展开引擎判定是否跳过;
//       日期有值但无法解析时整行跳过并记录原因
// ==========================================

use crate::config::ResolvedColumns;
use crate::domain::{ScheduleRow, SkipReason, SkippedRow, WEEKDAY_COUNT};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::{CellValue, RawRow};
use chrono::NaiveDate;

pub struct FieldMapper {
    columns: ResolvedColumns,
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(columns: ResolvedColumns) -> Self {
        Self {
            columns,
            cleaner: DataCleaner,
        }
    }

    /// 将原始行映射为 ScheduleRow
    ///
    /// # 返回
    /// - Ok(ScheduleRow): 映射结果（字段可能缺失）
    /// - Err(SkippedRow): 日期字段存在但无法解析
    pub fn map_row(&self, row: &RawRow) -> Result<ScheduleRow, SkippedRow> {
        let cols = &self.columns;

        let mut day_flags: [Option<String>; WEEKDAY_COUNT] = Default::default();
        for (idx, col) in cols.weekdays.iter().enumerate() {
            day_flags[idx] = row.cell(*col).as_text();
        }

        Ok(ScheduleRow {
            row_number: row.row_number,
            course: self.cleaner.normalize_null(row.cell(cols.course).as_text()),
            period: self.cleaner.clean_period(row.cell(cols.period).as_text()),
            day_flags,
            start_date: self.parse_date(row, cols.start_date, "start_date")?,
            end_date: self.parse_date(row, cols.end_date, "end_date")?,
            room: self.cleaner.clean_room(row.cell(cols.room).as_text()),
        })
    }

    /// 解析日期单元格
    ///
    /// 日期单元格 / Excel 序列号 / 文本日期 均可；空值返回 Ok(None)
    fn parse_date(
        &self,
        row: &RawRow,
        column: u32,
        field: &str,
    ) -> Result<Option<NaiveDate>, SkippedRow> {
        let cell = row.cell(column);
        let parsed = match cell {
            CellValue::Empty => return Ok(None),
            CellValue::Date(d) => Some(*d),
            CellValue::Number(n) => self.cleaner.excel_serial_to_date(*n),
            CellValue::Text(s) if s.trim().is_empty() => return Ok(None),
            CellValue::Text(s) => self.cleaner.parse_date_text(s),
            CellValue::Bool(_) => None,
        };

        parsed.map(Some).ok_or_else(|| SkippedRow {
            row_number: row.row_number,
            reason: SkipReason::InvalidDate {
                field: field.to_string(),
                value: cell.as_text().unwrap_or_default(),
            },
        })
    }
}
