//! 导出请求模块
//!
//! 一次批处理的全部参数。请求在提交时整体校验，校验失败时不处理任何文件。

use crate::error::{self, ExportResult};
use crate::tools::constants::export::{
    DEFAULT_DPI, MAX_GAIN_DB, MIN_GAIN_DB, OUTPUT_EXTENSION, OUTPUT_SUFFIX, SUPPORTED_DPI,
};
use crate::tools::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 导出请求（不可变值）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    /// 输入音频文件（按处理顺序）
    pub input_paths: Vec<PathBuf>,
    /// 输出目录：存在时保存图片，缺省时交互展示
    pub output_dir: Option<PathBuf>,
    /// 输出分辨率
    pub dpi: u32,
    /// 音量调整（dB）
    pub gain_db: f64,
    /// 标注文本；为空时使用输入文件名
    pub label: String,
}

impl ExportRequest {
    /// 创建展示模式的请求（默认DPI、无增益、无标签）
    pub fn new(input_paths: Vec<PathBuf>) -> Self {
        Self {
            input_paths,
            output_dir: None,
            dpi: DEFAULT_DPI,
            gain_db: 0.0,
            label: String::new(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_gain_db(mut self, gain_db: f64) -> Self {
        self.gain_db = gain_db;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// 是否为保存模式
    #[inline]
    pub fn is_save_mode(&self) -> bool {
        self.output_dir.is_some()
    }

    /// 请求级前置校验
    pub fn validate(&self) -> ExportResult<()> {
        if self.input_paths.is_empty() {
            return Err(error::invalid_parameter("输入文件列表为空", "no input files"));
        }

        if !SUPPORTED_DPI.contains(&self.dpi) {
            return Err(error::invalid_parameter(
                "不支持的DPI",
                format!("{}（支持: {SUPPORTED_DPI:?}）", self.dpi),
            ));
        }

        if !self.gain_db.is_finite() || !(MIN_GAIN_DB..=MAX_GAIN_DB).contains(&self.gain_db) {
            return Err(error::invalid_parameter(
                "增益超出范围",
                format!("{} dB（范围: {MIN_GAIN_DB}..={MAX_GAIN_DB}）", self.gain_db),
            ));
        }

        if let Some(dir) = &self.output_dir
            && !dir.is_dir()
        {
            return Err(error::invalid_parameter(
                "输出目录不存在或不是目录",
                dir.display(),
            ));
        }

        Ok(())
    }

    /// 某个输入文件的标注文本：优先使用请求标签，否则为文件名（含扩展名）
    pub fn label_for(&self, input: &Path) -> String {
        if self.label.is_empty() {
            utils::extract_filename_lossy(input)
        } else {
            self.label.clone()
        }
    }

    /// 某个输入文件的最终输出路径：`<output_dir>/<stem>_waveform.jpg`
    pub fn final_path_for(&self, output_dir: &Path, input: &Path) -> PathBuf {
        output_dir.join(output_file_name(input))
    }
}

/// 输出文件名：`<stem>_waveform.jpg`
pub fn output_file_name(input: &Path) -> String {
    format!(
        "{}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
        utils::extract_file_stem_string(input)
    )
}
