// ==========================================
// 批量抄表工作台 - 工作簿导入校验
// ==========================================
// 职责: 表头定位与校验、逐行检查、产出候选读数与跳过摘要
// 约定:
// - 表头行按内容定位（说明块在上方）；四列缺一 → 整文件拒绝
// - 行级失败只丢弃该行并记录原因，不中断导入
// - 摘要最多展示前 5 条跳过明细
// ==========================================

use crate::domain::BulkReadingRow;
use crate::workbook::error::{WorkbookError, WorkbookResult};
use crate::workbook::{HEADER_ELECTRICITY, HEADER_NOTES, HEADER_UNIT_NO, HEADER_WATER, HEADERS};
use std::collections::HashMap;

/// 跳过摘要展示的明细上限
const SKIP_DETAIL_LIMIT: usize = 5;

// ==========================================
// 导入结果结构
// ==========================================

/// 候选读数（校验通过的一行）
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateReading {
    /// 源文件行号（1 起）
    pub row_number: usize,
    pub unit_id: String,
    pub unit_no: String,
    /// 电表读数（该列留空则为 None）
    pub electricity: Option<f64>,
    /// 水表读数
    pub water: Option<f64>,
    /// 备注
    pub notes: Option<String>,
}

/// 被跳过的行
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row_number: usize,
    pub unit_no: String,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub candidates: Vec<CandidateReading>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportOutcome {
    /// 人读摘要: 导入/跳过计数 + 前 5 条跳过明细
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "导入 {} 行，跳过 {} 行",
            self.candidates.len(),
            self.skipped.len()
        )];
        for skip in self.skipped.iter().take(SKIP_DETAIL_LIMIT) {
            lines.push(format!(
                "  第{}行 [{}]: {}",
                skip.row_number, skip.unit_no, skip.reason
            ));
        }
        if self.skipped.len() > SKIP_DETAIL_LIMIT {
            lines.push(format!(
                "  …另有 {} 行未展示",
                self.skipped.len() - SKIP_DETAIL_LIMIT
            ));
        }
        lines.join("\n")
    }
}

// ==========================================
// 表头定位
// ==========================================

/// 表头列位置
#[derive(Debug, Clone)]
struct HeaderColumns {
    unit_no: usize,
    electricity: usize,
    water: usize,
    notes: usize,
}

// ==========================================
// WorkbookIntake
// ==========================================

pub struct WorkbookIntake;

impl WorkbookIntake {
    /// 在原始行中定位表头行
    ///
    /// # 返回
    /// - Ok((行下标, 列位置)): 找到包含全部四个表头的行
    /// - Err(InvalidTemplate): 任何行都不完整 → 拒绝整个文件
    fn locate_header(rows: &[Vec<String>]) -> WorkbookResult<(usize, HeaderColumns)> {
        for (idx, row) in rows.iter().enumerate() {
            let find = |header: &str| row.iter().position(|cell| cell == header);
            if let (Some(unit_no), Some(electricity), Some(water), Some(notes)) = (
                find(HEADER_UNIT_NO),
                find(HEADER_ELECTRICITY),
                find(HEADER_WATER),
                find(HEADER_NOTES),
            ) {
                return Ok((
                    idx,
                    HeaderColumns {
                        unit_no,
                        electricity,
                        water,
                        notes,
                    },
                ));
            }
        }
        Err(WorkbookError::InvalidTemplate(HEADERS.join("、")))
    }

    /// 解析读数单元格
    ///
    /// # 返回
    /// - Ok(None): 留空
    /// - Ok(Some(v)): 非负数值
    /// - Err(原因): 非数字或负数
    fn parse_value(cell: Option<&String>) -> Result<Option<f64>, String> {
        let raw = cell.map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            return Ok(None);
        }
        let value: f64 = raw
            .parse()
            .map_err(|_| "读数不是有效数字".to_string())?;
        if value < 0.0 {
            return Err("读数不能为负数".to_string());
        }
        Ok(Some(value))
    }

    /// 校验导入的原始行并产出候选读数
    ///
    /// # 逐行规则（任一失败即丢弃该行并计入摘要）
    /// 1. 单元编号留空 → 静默跳过（不计入摘要）
    /// 2. 电/水读数须为非负数值（留空允许）
    /// 3. 两列均留空 → 静默跳过
    /// 4. 单元编号须与当前行集精确匹配
    /// 5. 本期已有读数的单元 → 跳过并记录原因
    ///
    /// # 参数
    /// - raw_rows: 解析器输出的按位置原始行
    /// - session_rows: 当前会话行集（按单元编号索引）
    pub fn collect(
        raw_rows: &[Vec<String>],
        session_rows: &[BulkReadingRow],
    ) -> WorkbookResult<ImportOutcome> {
        if raw_rows.is_empty() {
            return Err(WorkbookError::EmptyWorkbook);
        }

        let (header_idx, columns) = Self::locate_header(raw_rows)?;

        let by_unit_no: HashMap<&str, &BulkReadingRow> = session_rows
            .iter()
            .map(|r| (r.unit_no.as_str(), r))
            .collect();

        let mut outcome = ImportOutcome::default();

        for (offset, row) in raw_rows[header_idx + 1..].iter().enumerate() {
            let row_number = header_idx + offset + 2; // 1 起、含表头行

            // 规则 1: 单元编号留空 → 静默跳过
            let unit_no = row
                .get(columns.unit_no)
                .map(|s| s.trim())
                .unwrap_or("");
            if unit_no.is_empty() {
                continue;
            }

            // 规则 2: 读数解析
            let electricity = match Self::parse_value(row.get(columns.electricity)) {
                Ok(v) => v,
                Err(reason) => {
                    outcome.skipped.push(SkippedRow {
                        row_number,
                        unit_no: unit_no.to_string(),
                        reason,
                    });
                    continue;
                }
            };
            let water = match Self::parse_value(row.get(columns.water)) {
                Ok(v) => v,
                Err(reason) => {
                    outcome.skipped.push(SkippedRow {
                        row_number,
                        unit_no: unit_no.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            // 规则 3: 两列均留空 → 静默跳过
            if electricity.is_none() && water.is_none() {
                continue;
            }

            // 规则 4: 单元编号精确匹配
            let Some(session_row) = by_unit_no.get(unit_no) else {
                outcome.skipped.push(SkippedRow {
                    row_number,
                    unit_no: unit_no.to_string(),
                    reason: "单元编号不存在".to_string(),
                });
                continue;
            };

            // 规则 5: 本期已抄表 → 跳过
            if session_row.has_any_reading() {
                outcome.skipped.push(SkippedRow {
                    row_number,
                    unit_no: unit_no.to_string(),
                    reason: "该单元本期已有抄表记录".to_string(),
                });
                continue;
            }

            let notes = row
                .get(columns.notes)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            outcome.candidates.push(CandidateReading {
                row_number,
                unit_id: session_row.unit_id.clone(),
                unit_no: unit_no.to_string(),
                electricity,
                water,
                notes,
            });
        }

        tracing::info!(
            "工作簿导入校验完成: candidates={}, skipped={}",
            outcome.candidates.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}
