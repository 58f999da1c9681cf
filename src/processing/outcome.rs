//! 处理结果与进度模块
//!
//! 每个输入文件恰好产生一个结果；进度在每个文件完成后推进。

use crate::error::{ErrorCategory, ExportError};
use crate::tools::constants::report::SUMMARY_MIN_FILES;
use crate::tools::utils;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 单个文件的最终结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// 已保存标注后的波形图
    Saved { path: PathBuf },
    /// 已交互展示
    Displayed,
    /// 处理失败（不会中断批处理）
    Failed {
        category: ErrorCategory,
        reason: String,
    },
}

impl ExportOutcome {
    /// 由单文件错误构造失败结果
    pub fn failed(error: &ExportError) -> Self {
        ExportOutcome::Failed {
            category: ErrorCategory::from_export_error(error),
            reason: error.to_string(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        !matches!(self, ExportOutcome::Failed { .. })
    }

    /// 保存路径（仅保存成功时存在）
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match self {
            ExportOutcome::Saved { path } => Some(path),
            _ => None,
        }
    }
}

/// 批处理进度（0.0 ~ 1.0）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// 完成比例；空批次视为已完成
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed.min(self.total)) as f64 / self.total as f64
        }
    }

    /// 百分比形式（用于进度显示）
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// 批处理汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub saved: usize,
    pub displayed: usize,
    pub failed: usize,
    /// 失败文件名按错误类别分组（保持输入顺序）
    pub failures_by_category: BTreeMap<ErrorCategory, Vec<String>>,
}

impl BatchSummary {
    /// 从输入路径和与之一一对应的结果序列统计汇总
    pub fn from_outcomes(inputs: &[PathBuf], outcomes: &[ExportOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                ExportOutcome::Saved { .. } => summary.saved += 1,
                ExportOutcome::Displayed => summary.displayed += 1,
                ExportOutcome::Failed { category, .. } => {
                    summary.failed += 1;
                    let name = inputs
                        .get(index)
                        .map(|path| utils::extract_filename_lossy(path))
                        .unwrap_or_else(|| format!("#{}", index + 1));
                    summary
                        .failures_by_category
                        .entry(*category)
                        .or_default()
                        .push(name);
                }
            }
        }

        summary
    }

    /// 成功数（保存 + 展示）
    #[inline]
    pub fn succeeded(&self) -> usize {
        self.saved + self.displayed
    }

    /// 是否输出汇总：仅当请求的文件数超过1个时
    #[inline]
    pub fn should_announce(&self) -> bool {
        self.total > SUMMARY_MIN_FILES
    }

    /// 汇总文本："N succeeded, M failed"
    pub fn message(&self) -> String {
        format!(
            "全部文件处理完成 / All files have been processed: {} succeeded, {} failed",
            self.succeeded(),
            self.failed
        )
    }
}
