// ==========================================
// 教室占用控制 - 排课导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawRow;
use crate::importer::schedule_importer::ImportOutcome;
use std::path::Path;

// ==========================================
// ScheduleImporter Trait
// ==========================================
// 用途: 排课导入主接口
// 实现者: ScheduleImporterImpl
pub trait ScheduleImporter: Send + Sync {
    /// 从源文件导入排课行
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 映射后的排课行 + 日期无法解析而跳过的行
    /// - Err: 文件不存在、格式不支持、工作表缺失等文件级错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析（按绝对列位置）
    /// 2. 字段映射与类型转换
    /// 3. 基础清洗（TRIM / UPPER / 首字母大写 / NULL 标准化）
    fn import(&self, file_path: &Path) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 工作表名（CSV 忽略）
    /// - first_data_row: 首个数据行（1 起,含）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 非空行列表（保留源表行号）
    /// - Err: 文件读取错误、格式错误
    fn parse_rows(
        &self,
        file_path: &Path,
        sheet: &str,
        first_data_row: u32,
    ) -> ImportResult<Vec<RawRow>>;
}
