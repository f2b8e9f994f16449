// ==========================================
// 教室占用控制 - 领域类型定义
// ==========================================
// 职责: 时段 / 占用状态 等固定枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 时段 (Period)
// ==========================================
// 固定三段,与具体钟点无关
// 顺序: Morning < Afternoon < Evening（用于结果排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Manhã")]
    Morning, // 上午
    #[serde(rename = "Tarde")]
    Afternoon, // 下午
    #[serde(rename = "Noite")]
    Evening, // 晚上
}

impl Period {
    /// 全部时段（按枚举顺序）
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    /// 标准标签（与源表一致）
    pub fn label(&self) -> &'static str {
        match self {
            Period::Morning => "Manhã",
            Period::Afternoon => "Tarde",
            Period::Evening => "Noite",
        }
    }

    /// 从标签解析时段
    ///
    /// 忽略大小写与首尾空白；兼容无重音写法与英文名。
    /// 无法识别时返回 None。
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "manhã" | "manha" | "morning" => Some(Period::Morning),
            "tarde" | "afternoon" => Some(Period::Afternoon),
            "noite" | "evening" => Some(Period::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 占用状态 (Occupancy Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyStatus {
    #[serde(rename = "Ocupado")]
    Occupied, // 已占用
    #[serde(rename = "Livre")]
    Free, // 空闲
}

impl OccupancyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OccupancyStatus::Occupied => "Ocupado",
            OccupancyStatus::Free => "Livre",
        }
    }

    /// 从标签解析状态（兼容葡语标签与英文名）
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "ocupado" | "occupied" => Some(OccupancyStatus::Occupied),
            "livre" | "free" => Some(OccupancyStatus::Free),
            _ => None,
        }
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
