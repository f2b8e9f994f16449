// ==========================================
// 教室占用控制 - 排课源记录
// ==========================================
// 职责: 源表一行排课数据（按固定列位置读取）
// 红线: 本层不做校验,缺失字段保留为 None
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 工作日数量（周一至周五）
pub const WEEKDAY_COUNT: usize = 5;

// ==========================================
// ScheduleRow - 排课源记录
// ==========================================
// 用途: 导入层输出,展开引擎输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub row_number: usize,                         // 源表行号（1 起）
    pub course: Option<String>,                    // 课程名
    pub period: Option<String>,                    // 时段标签（原样）
    pub day_flags: [Option<String>; WEEKDAY_COUNT], // 周一..周五 标记
    pub start_date: Option<NaiveDate>,             // 开始日期
    pub end_date: Option<NaiveDate>,               // 结束日期
    pub room: Option<String>,                      // 教室编号（原样）
}

impl ScheduleRow {
    /// 指定工作日（0=周一 .. 4=周五）的原始标记
    pub fn day_flag(&self, weekday_idx: usize) -> Option<&str> {
        self.day_flags
            .get(weekday_idx)
            .and_then(|flag| flag.as_deref())
    }
}
