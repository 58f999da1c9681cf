//! 输出格式化模块
//!
//! 负责逐文件进度行、批处理汇总表格以及JSON报告的格式化。

use super::utils;
use crate::error::ExportResult;
use crate::processing::{BatchProgress, BatchSummary, ExportOutcome, ExportRequest};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 单个文件处理结束时的输出行
pub fn format_file_result(
    index: usize,
    total: usize,
    path: &Path,
    outcome: &ExportOutcome,
) -> String {
    let name = utils::extract_filename_lossy(path);
    let prefix = format!("[{}/{}]", index + 1, total);

    match outcome {
        ExportOutcome::Saved { path: saved } => format!(
            "[OK] {prefix} {name} -> {}",
            utils::extract_filename_lossy(saved)
        ),
        ExportOutcome::Displayed => format!("[OK] {prefix} {name} (已展示 / displayed)"),
        ExportOutcome::Failed { reason, .. } => format!("[FAIL] {prefix} {name}: {reason}"),
    }
}

/// 进度行："进度 / Progress: 2/4 (50.0%)"
pub fn format_progress(progress: &BatchProgress) -> String {
    format!(
        "进度 / Progress: {}/{} ({:.1}%)",
        progress.completed,
        progress.total,
        progress.percent()
    )
}

/// 批处理汇总表格
pub fn create_summary_table(summary: &BatchSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Item / 项目", "Count / 数量", "Files / 文件"]);

    add_count_row(&mut table, "Total / 总数", summary.total, String::new());
    add_count_row(&mut table, "Saved / 已保存", summary.saved, String::new());
    add_count_row(&mut table, "Displayed / 已展示", summary.displayed, String::new());
    add_count_row(&mut table, "Failed / 失败", summary.failed, String::new());

    for (category, files) in &summary.failures_by_category {
        add_count_row(&mut table, category.display_name(), files.len(), files.join(", "));
    }

    table
}

fn add_count_row(table: &mut Table, name: &str, count: usize, files: String) {
    table.add_row(vec![
        Cell::new(name),
        Cell::new(count).set_alignment(CellAlignment::Right),
        Cell::new(files),
    ]);
}

/// JSON报告中的单文件记录
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub input: &'a Path,
    #[serde(flatten)]
    pub outcome: &'a ExportOutcome,
}

/// JSON批处理报告
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub tool_version: &'static str,
    pub generated_at: String,
    pub request: &'a ExportRequest,
    pub summary: &'a BatchSummary,
    pub files: Vec<FileReport<'a>>,
}

impl<'a> BatchReport<'a> {
    /// `outcomes` 与 `request.input_paths` 一一对应
    pub fn new(
        request: &'a ExportRequest,
        outcomes: &'a [ExportOutcome],
        summary: &'a BatchSummary,
    ) -> Self {
        let files = request
            .input_paths
            .iter()
            .zip(outcomes)
            .map(|(input, outcome)| FileReport {
                input: input.as_path(),
                outcome,
            })
            .collect();

        Self {
            tool_version: VERSION,
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            request,
            summary,
            files,
        }
    }

    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 写入JSON报告，返回写入路径
pub fn write_report(path: &Path, report: &BatchReport<'_>) -> ExportResult<PathBuf> {
    std::fs::write(path, report.to_json()?)?;
    Ok(path.to_path_buf())
}
