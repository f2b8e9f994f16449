// ==========================================
// 教室占用控制 - 排课导入器实现
// ==========================================
// 职责: 串联 文件解析 → 字段映射 → 清洗
// 输出: ImportOutcome（排课行 + 跳过明细）
// ==========================================

use crate::config::SourceConfig;
use crate::domain::{ScheduleRow, SkippedRow};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::schedule_importer_trait::ScheduleImporter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub total_rows: usize,        // 非空行数
    pub rows: Vec<ScheduleRow>,   // 映射成功的行
    pub skipped: Vec<SkippedRow>, // 导入阶段跳过的行
}

// ==========================================
// ScheduleImporterImpl - 排课导入器
// ==========================================
pub struct ScheduleImporterImpl {
    sheet: String,
    first_data_row: u32,
    mapper: FieldMapper,
}

impl ScheduleImporterImpl {
    /// 按源表配置创建导入器
    ///
    /// # 返回
    /// - Err: 列布局无效
    pub fn new(config: &SourceConfig) -> ImportResult<Self> {
        let columns = config.columns.resolve()?;
        Ok(Self {
            sheet: config.sheet.clone(),
            first_data_row: config.first_data_row,
            mapper: FieldMapper::new(columns),
        })
    }
}

impl ScheduleImporter for ScheduleImporterImpl {
    fn import(&self, file_path: &Path) -> ImportResult<ImportOutcome> {
        let started = Instant::now();
        tracing::info!(
            "开始导入排课表: file={}, sheet={}",
            file_path.display(),
            self.sheet
        );

        // 阶段 0: 文件解析
        let raw_rows = UniversalFileParser.parse(file_path, &self.sheet, self.first_data_row)?;

        // 阶段 1-2: 字段映射 + 清洗
        let mut outcome = ImportOutcome {
            total_rows: raw_rows.len(),
            ..ImportOutcome::default()
        };
        for raw in &raw_rows {
            match self.mapper.map_row(raw) {
                Ok(row) => outcome.rows.push(row),
                Err(skipped) => {
                    tracing::debug!("跳过第 {} 行: {}", skipped.row_number, skipped.reason);
                    outcome.skipped.push(skipped);
                }
            }
        }

        tracing::info!(
            "排课表导入完成: 非空行={}, 映射={}, 跳过={}, 耗时={}ms",
            outcome.total_rows,
            outcome.rows.len(),
            outcome.skipped.len(),
            started.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnLayout;
    use crate::domain::SkipReason;
    use std::io::Write;

    fn csv_config() -> SourceConfig {
        SourceConfig {
            first_data_row: 2,
            columns: ColumnLayout {
                course: "A".to_string(),
                period: "B".to_string(),
                weekdays: [
                    "C".to_string(),
                    "D".to_string(),
                    "E".to_string(),
                    "F".to_string(),
                    "G".to_string(),
                ],
                start_date: "H".to_string(),
                end_date: "I".to_string(),
                room: "J".to_string(),
            },
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_import_csv_source() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "curso,periodo,seg,ter,qua,qui,sex,inicio,fim,sala").unwrap();
        writeln!(file, "Math101,manhã,x,,,,,03/03/2025,04/03/2025,a1").unwrap();
        writeln!(file, "Bio,Tarde,,x,,,,2025-03-03,???,B2").unwrap();
        writeln!(file, ",,,,,,,,,").unwrap();

        let importer = ScheduleImporterImpl::new(&csv_config()).unwrap();
        let outcome = importer.import(file.path()).unwrap();

        assert_eq!(outcome.total_rows, 2);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].room.as_deref(), Some("A1"));
        assert_eq!(outcome.rows[0].period.as_deref(), Some("Manhã"));
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].row_number, 3);
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::InvalidDate { ref field, .. } if field == "end_date"
        ));
    }

    #[test]
    fn test_new_rejects_invalid_layout() {
        let mut config = csv_config();
        config.columns.course = "1A".to_string();
        assert!(ScheduleImporterImpl::new(&config).is_err());
    }
}
