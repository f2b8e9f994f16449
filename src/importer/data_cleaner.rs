// ==========================================
// 教室占用控制 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / 首字母大写 / NULL 标准化 / 日期解析
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// 文本日期兼容格式（按顺序尝试）
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%Y%m%d", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Excel 序列日期上限（9999-12-31）
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub struct DataCleaner;

impl DataCleaner {
    /// 去首尾空白,可选转大写
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 空白串视为 NULL
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 首字母大写,其余小写（"MANHÃ " → "Manhã"）
    pub fn capitalize(&self, value: &str) -> String {
        let mut chars = value.trim().chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// 教室编号标准化: TRIM + UPPER
    pub fn clean_room(&self, value: Option<String>) -> Option<String> {
        self.normalize_null(value.map(|v| self.clean_text(&v, true)))
    }

    /// 时段标签标准化: TRIM + 首字母大写
    pub fn clean_period(&self, value: Option<String>) -> Option<String> {
        self.normalize_null(value.map(|v| self.capitalize(&v)))
    }

    /// 工作日标记是否为占用标记（忽略大小写与首尾空白）
    pub fn is_marker(&self, flag: Option<&str>, marker: &str) -> bool {
        flag.map(|f| f.trim().to_lowercase() == marker.trim().to_lowercase())
            .unwrap_or(false)
    }

    /// 解析文本日期
    ///
    /// 兼容 DD/MM/YYYY、YYYY-MM-DD、YYYYMMDD 等格式及带时间的 ISO 写法
    pub fn parse_date_text(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    /// Excel 序列日期（1900 日期系统）→ NaiveDate
    ///
    /// 小数部分（时间）忽略；超出范围返回 None
    pub fn excel_serial_to_date(&self, serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
            return None;
        }

        let days = serial.floor() as i64;
        // Excel 将 1900 视为闰年（序号 60 = 1900-02-29）: 60 之前基准为 1899-12-31
        let base = if days < 60 {
            NaiveDate::from_ymd_opt(1899, 12, 31)?
        } else {
            NaiveDate::from_ymd_opt(1899, 12, 30)?
        };
        base.checked_add_signed(Duration::days(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  a1  ", false), "a1");
        assert_eq!(cleaner.clean_text("  a1  ", true), "A1");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_null(None), None);
        assert_eq!(
            cleaner.normalize_null(Some("  Math101  ".to_string())),
            Some("Math101".to_string())
        );
    }

    #[test]
    fn test_capitalize() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.capitalize("  MANHÃ "), "Manhã");
        assert_eq!(cleaner.capitalize("tarde"), "Tarde");
        assert_eq!(cleaner.capitalize("nOITE"), "Noite");
        assert_eq!(cleaner.capitalize("   "), "");
    }

    #[test]
    fn test_clean_room_and_period() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_room(Some(" a1 ".to_string())), Some("A1".to_string()));
        assert_eq!(cleaner.clean_room(Some("   ".to_string())), None);
        assert_eq!(
            cleaner.clean_period(Some("manhã".to_string())),
            Some("Manhã".to_string())
        );
    }

    #[test]
    fn test_is_marker() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_marker(Some("x"), "x"));
        assert!(cleaner.is_marker(Some(" X "), "x"));
        assert!(!cleaner.is_marker(Some("xx"), "x"));
        assert!(!cleaner.is_marker(Some(""), "x"));
        assert!(!cleaner.is_marker(None, "x"));
    }

    #[test]
    fn test_parse_date_text() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date_text("03/03/2025"), Some(date(2025, 3, 3)));
        assert_eq!(cleaner.parse_date_text("2025-03-04"), Some(date(2025, 3, 4)));
        assert_eq!(cleaner.parse_date_text("20250305"), Some(date(2025, 3, 5)));
        assert_eq!(
            cleaner.parse_date_text("2025-03-06T00:00:00"),
            Some(date(2025, 3, 6))
        );
        assert_eq!(cleaner.parse_date_text("amanhã"), None);
        assert_eq!(cleaner.parse_date_text("31/02/2025"), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.excel_serial_to_date(45719.0), Some(date(2025, 3, 3)));
        assert_eq!(cleaner.excel_serial_to_date(45719.75), Some(date(2025, 3, 3)));
        assert_eq!(cleaner.excel_serial_to_date(1.0), Some(date(1900, 1, 1)));
        assert_eq!(cleaner.excel_serial_to_date(59.0), Some(date(1900, 2, 28)));
        assert_eq!(cleaner.excel_serial_to_date(61.0), Some(date(1900, 3, 1)));
        assert_eq!(cleaner.excel_serial_to_date(0.0), None);
        assert_eq!(cleaner.excel_serial_to_date(f64::NAN), None);
    }
}
