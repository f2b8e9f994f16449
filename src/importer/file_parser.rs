// ==========================================
// 教室占用控制 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 读取方式: 按绝对列位置,不依赖表头
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schedule_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本形式（去首尾空白,空值返回 None）
    ///
    /// 整数值不带小数点（101.0 → "101"）
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn from_excel(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                CellValue::Text(s.clone())
            }
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // 日期系统（1900 / 1904）由 calamine 按工作簿标志换算
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => CellValue::Date(datetime.date()),
                None => CellValue::Number(dt.as_f64()),
            },
        }
    }

    fn from_csv(field: &str) -> Self {
        if field.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }
}

// ==========================================
// RawRow - 原始行
// ==========================================
// cells 下标 = 绝对列号（0 起）
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 源表行号（1 起）
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn cell(&self, column: u32) -> &CellValue {
        self.cells.get(column as usize).unwrap_or(&CellValue::Empty)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(
        &self,
        file_path: &Path,
        _sheet: &str,
        first_data_row: u32,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 CSV 文件（无表头,按位置读取）
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = idx + 1;
            if row_number < first_data_row as usize {
                continue;
            }

            let row = RawRow {
                row_number,
                cells: record.iter().map(CellValue::from_csv).collect(),
            };

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_rows(
        &self,
        file_path: &Path,
        sheet: &str,
        first_data_row: u32,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 Excel 文件（按内容自动识别 xlsx/xlsm/xls/ods）
        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        if !sheet_names.iter().any(|name| name == sheet) {
            return Err(ImportError::SheetNotFound {
                sheet: sheet.to_string(),
                available: sheet_names.join(", "),
            });
        }

        let range = workbook.worksheet_range(sheet)?;

        // 空表
        let (start, end) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Ok(Vec::new()),
        };

        // 使用绝对坐标: 已用区域不一定从 A1 开始
        let first_row = first_data_row.saturating_sub(1).max(start.0);
        let mut rows = Vec::new();
        for row_idx in first_row..=end.0 {
            let cells: Vec<CellValue> = (0..=end.1)
                .map(|col_idx| {
                    range
                        .get_value((row_idx, col_idx))
                        .map(CellValue::from_excel)
                        .unwrap_or(CellValue::Empty)
                })
                .collect();

            let row = RawRow {
                row_number: row_idx as usize + 1,
                cells,
            };

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

/// 经 calamine 读取的工作簿扩展名
pub const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
        sheet: &str,
        first_data_row: u32,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_rows(path, sheet, first_data_row),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_rows(path, sheet, first_data_row),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
