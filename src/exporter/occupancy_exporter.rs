// ==========================================
// 教室占用控制 - 占用结果导出器
// ==========================================
// 职责: 筛选结果 → XLSX / CSV
// 列序: 日期 / 教室 / 时段 / 课程 / 状态（表头可配置）
// 说明: 每次请求只生成一次,按钮点击与下载共用同一份字节
// ==========================================

use crate::config::ExportConfig;
use crate::domain::OccupancyRecord;
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

// ==========================================
// ExportFormat - 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// 按输出文件扩展名推断
    ///
    /// # 返回
    /// - 无扩展名: 默认 XLSX
    /// - Err(ExportError::UnsupportedFormat): 扩展名既非 xlsx 也非 csv
    pub fn for_output(path: &Path) -> ExportResult<Self> {
        match path.extension() {
            None => Ok(ExportFormat::default()),
            Some(ext) => ext.to_string_lossy().parse(),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ==========================================
// OccupancyExporter - 导出器
// ==========================================
pub struct OccupancyExporter {
    config: ExportConfig,
}

impl OccupancyExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 单行导出值（与表头同序）
    fn row_values(&self, record: &OccupancyRecord) -> [String; 5] {
        [
            record.date.format(self.config.effective_date_format()).to_string(),
            record.room.clone(),
            record.period.label().to_string(),
            record.course.clone(),
            record.status.label().to_string(),
        ]
    }

    /// 生成导出字节
    pub fn export_to_buffer(
        &self,
        records: &[OccupancyRecord],
        format: ExportFormat,
    ) -> ExportResult<Vec<u8>> {
        let buffer = match format {
            ExportFormat::Xlsx => self.build_xlsx(records)?,
            ExportFormat::Csv => self.build_csv(records)?,
        };
        tracing::info!(
            "导出完成: 格式={}, 行数={}, 字节={}",
            format.extension(),
            records.len(),
            buffer.len()
        );
        Ok(buffer)
    }

    /// 生成并写入文件
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数（不含表头）
    pub fn export_to_file(
        &self,
        records: &[OccupancyRecord],
        path: &Path,
        format: ExportFormat,
    ) -> ExportResult<usize> {
        let buffer = self.export_to_buffer(records, format)?;
        std::fs::write(path, buffer).map_err(|e| ExportError::FileWriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!("导出文件已写入: {}", path.display());
        Ok(records.len())
    }

    fn build_xlsx(&self, records: &[OccupancyRecord]) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.config.sheet_name)?;

        for (col, header) in self.config.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }
        for (idx, record) in records.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, value) in self.row_values(record).iter().enumerate() {
                sheet.write_string(row, col as u16, value)?;
            }
        }

        sheet.set_column_width(0, 12)?;
        sheet.set_column_width(1, 10)?;
        sheet.set_column_width(2, 10)?;
        sheet.set_column_width(3, 30)?;
        sheet.set_column_width(4, 10)?;
        sheet.set_freeze_panes(1, 0)?;
        let last_col = self.config.headers.len() as u16 - 1;
        sheet.autofilter(0, 0, records.len() as u32, last_col)?;

        Ok(workbook.save_to_buffer()?)
    }

    fn build_csv(&self, records: &[OccupancyRecord]) -> ExportResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.config.headers)?;
        for record in records {
            writer.write_record(self.row_values(record))?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::CsvWriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;
    use calamine::{open_workbook_auto, Data, Reader};
    use chrono::NaiveDate;

    fn records() -> Vec<OccupancyRecord> {
        let d = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        vec![
            OccupancyRecord::occupied(d, "A1", Period::Morning, "Math101"),
            OccupancyRecord::free(d, "A1", Period::Afternoon),
        ]
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_for_output_path() {
        assert_eq!(
            ExportFormat::for_output(Path::new("out/controle.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::for_output(Path::new("controle")).unwrap(),
            ExportFormat::Xlsx
        );
        // 未知扩展名报错,不静默写成 xlsx
        match ExportFormat::for_output(Path::new("out.txt")) {
            Err(ExportError::UnsupportedFormat(ext)) => assert_eq!(ext, "txt"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_csv_export() {
        let exporter = OccupancyExporter::new(&ExportConfig::default());
        let bytes = exporter.export_to_buffer(&records(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Data,Sala,Período,Curso,Status");
        assert_eq!(lines[1], "03/03/2025,A1,Manhã,Math101,Ocupado");
        assert_eq!(lines[2], "03/03/2025,A1,Tarde,,Livre");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let config = ExportConfig {
            date_format: "%Q".to_string(),
            ..ExportConfig::default()
        };
        let exporter = OccupancyExporter::new(&config);
        let bytes = exporter.export_to_buffer(&records(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("03/03/2025,"));
    }

    #[test]
    fn test_xlsx_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controle_salas.xlsx");
        let exporter = OccupancyExporter::new(&ExportConfig::default());

        let written = exporter
            .export_to_file(&records(), &path, ExportFormat::Xlsx)
            .unwrap();
        assert_eq!(written, 2);

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Controle de Salas".to_string()]);
        let range = workbook.worksheet_range("Controle de Salas").unwrap();

        assert_eq!(range.get_size(), (3, 5));
        assert_eq!(range.get_value((0, 2)), Some(&Data::String("Período".to_string())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("03/03/2025".to_string())));
        assert_eq!(range.get_value((1, 3)), Some(&Data::String("Math101".to_string())));
        assert_eq!(range.get_value((2, 4)), Some(&Data::String("Livre".to_string())));
    }

    #[test]
    fn test_xlsx_export_empty_result_keeps_header() {
        let exporter = OccupancyExporter::new(&ExportConfig::default());
        let bytes = exporter.export_to_buffer(&[], ExportFormat::Xlsx).unwrap();
        assert!(!bytes.is_empty());
    }
}
