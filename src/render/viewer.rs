//! 波形图查看模块
//!
//! 未指定输出目录时，波形图交由查看器展示而不写入输出目录。

use super::waveform::WaveformPlot;
use crate::error::{self, ExportResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempPath;

/// 查看器预览使用的DPI
pub const PREVIEW_DPI: u32 = 100;

/// 波形图查看器trait（交互展示的协作者）
pub trait WaveformViewer: Send + Sync {
    /// 展示波形图；返回即表示展示已完成（或已交给外部程序）
    fn present(&self, plot: &WaveformPlot, title: &str) -> ExportResult<()>;
}

/// 系统查看器：将预览写入系统临时目录，并用平台默认程序打开
///
/// 外部程序可能在 `present` 返回后才读取文件，因此预览文件在查看器存活期间保留，
/// 查看器释放时（会话结束）统一删除。
#[derive(Debug)]
pub struct SystemViewer {
    dpi: u32,
    previews: Mutex<Vec<TempPath>>,
}

impl SystemViewer {
    pub fn new() -> Self {
        Self {
            dpi: PREVIEW_DPI,
            previews: Mutex::new(Vec::new()),
        }
    }

    /// 渲染预览PNG到系统临时目录，返回其路径
    pub fn write_preview(&self, plot: &WaveformPlot, title: &str) -> ExportResult<PathBuf> {
        let image = plot.rasterize(self.dpi)?;

        let prefix = format!("{}-preview-", sanitize_for_filename(title));
        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".png")
            .tempfile()?
            .into_temp_path();

        image.save_with_format(&temp, image::ImageFormat::Png)?;
        let path = temp.to_path_buf();
        self.previews
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(temp);
        Ok(path)
    }
}

impl Default for SystemViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveformViewer for SystemViewer {
    fn present(&self, plot: &WaveformPlot, title: &str) -> ExportResult<()> {
        let path = self.write_preview(plot, title)?;
        tracing::debug!(path = %path.display(), "打开波形预览 / opening preview");

        let status = opener_command(&path).status()?;
        if !status.success() {
            return Err(error::render_error(
                "无法打开波形预览",
                format!("{} ({status})", path.display()),
            ));
        }
        Ok(())
    }
}

/// 平台默认打开程序
fn opener_command(path: &Path) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(path);
        command
    }
    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// 标题转为可用作文件名前缀的字符串
fn sanitize_for_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(48)
        .collect();
    if cleaned.is_empty() {
        "waveform".to_string()
    } else {
        cleaned
    }
}
