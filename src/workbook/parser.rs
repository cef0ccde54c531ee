// ==========================================
// 批量抄表工作台 - 工作簿解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 按位置的原始行（表头行由上层按内容定位，
//       因为模板顶部有说明块，表头不一定在第一行）
// ==========================================

use crate::workbook::error::{WorkbookError, WorkbookResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_to_rows(&self, file_path: &Path) -> WorkbookResult<Vec<Vec<String>>> {
        if !file_path.exists() {
            return Err(WorkbookError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        let file = File::open(file_path)
            .map_err(|e| WorkbookError::CsvParseError(e.to_string()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头由上层按内容定位
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| WorkbookError::CsvParseError(e.to_string()))?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
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

impl ExcelParser {
    pub fn parse_to_rows(&self, file_path: &Path) -> WorkbookResult<Vec<Vec<String>>> {
        if !file_path.exists() {
            return Err(WorkbookError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| WorkbookError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| WorkbookError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| WorkbookError::ExcelParseError(e.to_string()))?;

        let mut rows = Vec::new();
        for data_row in range.rows() {
            let row: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 通用工作簿解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalWorkbookParser;

impl UniversalWorkbookParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> WorkbookResult<Vec<Vec<String>>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_rows(path),
            "xlsx" | "xls" => ExcelParser.parse_to_rows(path),
            _ => Err(WorkbookError::UnsupportedFormat(ext)),
        }
    }
}
