// ==========================================
// 批量抄表工作台 - 抄表模板导出
// ==========================================
// 工具: rust_xlsxwriter
// 结构: 说明块 + 固定四列表头 + 每单元一行（预填单元编号）
// ==========================================

use crate::domain::BulkReadingRow;
use crate::workbook::error::{WorkbookError, WorkbookResult};
use crate::workbook::{HEADERS, HEADER_ROW_HINT};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// 模板顶部说明块（每行一条）
const INSTRUCTIONS: [&str; 3] = [
    "填写说明：只填写「电表读数」「水表读数」两列，数值不得为负；",
    "「单元编号」列请勿修改，导入时按编号精确匹配；",
    "本期已抄表的单元无需填写，导入时会自动跳过。",
];

pub struct TemplateWriter;

impl TemplateWriter {
    /// 导出抄表模板
    ///
    /// # 参数
    /// - path: 输出文件路径（.xlsx）
    /// - rows: 当前加载的抄表行（按行集顺序预填单元编号）
    pub fn write<P: AsRef<Path>>(path: P, rows: &[BulkReadingRow]) -> WorkbookResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("抄表模板")
            .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;

        let bold = Format::new().set_bold();

        // 说明块
        for (i, line) in INSTRUCTIONS.iter().enumerate() {
            worksheet
                .write_string(i as u32, 0, *line)
                .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;
        }

        // 表头（固定四列）
        let header_row = HEADER_ROW_HINT;
        for (col, header) in HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(header_row, col as u16, *header, &bold)
                .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;
        }

        // 数据行: 预填单元编号，读数与备注留空
        for (i, row) in rows.iter().enumerate() {
            worksheet
                .write_string(header_row + 1 + i as u32, 0, &row.unit_no)
                .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;
        }

        // 列宽
        for (col, width) in [(0u16, 14.0), (1, 14.0), (2, 14.0), (3, 24.0)] {
            worksheet
                .set_column_width(col, width)
                .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;
        }

        workbook
            .save(path.as_ref())
            .map_err(|e| WorkbookError::ExcelWriteError(e.to_string()))?;

        tracing::info!(
            "抄表模板已导出: path={}, units={}",
            path.as_ref().display(),
            rows.len()
        );
        Ok(())
    }
}
