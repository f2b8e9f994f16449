// ==========================================
// 教室占用控制 - 源表列布局
// ==========================================
// 职责: 列字母（A / AF ...）→ 0 起列号
// 默认布局: 课程 B / 时段 D / 周一..周五 I..M / 开始 S / 结束 T / 教室 AF
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::WEEKDAY_COUNT;
use serde::{Deserialize, Serialize};

/// Excel 最大列号（XFD）
const MAX_COLUMN: u32 = 16_384;

/// 将列字母解析为 0 起列号
///
/// # 示例
/// - "A" → 0
/// - "AF" → 31
///
/// 非字母、空串或超出 XFD 时返回 None
pub fn column_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }

    let mut value: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
        if value > MAX_COLUMN {
            return None;
        }
    }
    Some(value - 1)
}

// ==========================================
// ColumnLayout - 列布局（配置形态,列字母）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub course: String,
    pub period: String,
    pub weekdays: [String; WEEKDAY_COUNT],
    pub start_date: String,
    pub end_date: String,
    pub room: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            course: "B".to_string(),
            period: "D".to_string(),
            weekdays: [
                "I".to_string(),
                "J".to_string(),
                "K".to_string(),
                "L".to_string(),
                "M".to_string(),
            ],
            start_date: "S".to_string(),
            end_date: "T".to_string(),
            room: "AF".to_string(),
        }
    }
}

impl ColumnLayout {
    /// 解析为列号布局
    pub fn resolve(&self) -> ConfigResult<ResolvedColumns> {
        let mut weekdays = [0u32; WEEKDAY_COUNT];
        for (idx, letters) in self.weekdays.iter().enumerate() {
            weekdays[idx] = resolve_one(&format!("source.columns.weekdays[{}]", idx), letters)?;
        }

        Ok(ResolvedColumns {
            course: resolve_one("source.columns.course", &self.course)?,
            period: resolve_one("source.columns.period", &self.period)?,
            weekdays,
            start_date: resolve_one("source.columns.start_date", &self.start_date)?,
            end_date: resolve_one("source.columns.end_date", &self.end_date)?,
            room: resolve_one("source.columns.room", &self.room)?,
        })
    }
}

fn resolve_one(key: &str, letters: &str) -> ConfigResult<u32> {
    column_index(letters)
        .ok_or_else(|| ConfigError::value(key, letters, "列字母无效（应为 A..XFD）"))
}

// ==========================================
// ResolvedColumns - 列布局（0 起列号）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub course: u32,
    pub period: u32,
    pub weekdays: [u32; WEEKDAY_COUNT],
    pub start_date: u32,
    pub end_date: u32,
    pub room: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("b"), Some(1));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AF"), Some(31));
        assert_eq!(column_index(" XFD "), Some(16_383));
    }

    #[test]
    fn test_column_index_invalid() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("XFE"), None);
        assert_eq!(column_index("ZZZZZZZZ"), None);
    }

    #[test]
    fn test_default_layout_resolves() {
        let resolved = ColumnLayout::default().resolve().unwrap();
        assert_eq!(resolved.course, 1);
        assert_eq!(resolved.period, 3);
        assert_eq!(resolved.weekdays, [8, 9, 10, 11, 12]);
        assert_eq!(resolved.start_date, 18);
        assert_eq!(resolved.end_date, 19);
        assert_eq!(resolved.room, 31);
    }

    #[test]
    fn test_invalid_layout_reports_key() {
        let layout = ColumnLayout {
            room: "3".to_string(),
            ..ColumnLayout::default()
        };
        let err = layout.resolve().unwrap_err();
        assert!(err.to_string().contains("source.columns.room"));
    }
}
