//! 文件扫描模块
//!
//! 将命令行输入展开为待处理的音频文件列表：目录按解码器支持的扩展名过滤并排序，
//! 显式给出的文件原样保留（由导出器在处理时报告失败）。

use super::cli::AppConfig;
use super::utils;
use crate::audio::FormatSupport;
use crate::error::{self, ExportError, ExportResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 展开所有输入路径，保持命令行给出的顺序
pub fn collect_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    formats: &FormatSupport,
) -> ExportResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(scan_audio_files(input, recursive, formats)?);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}

/// 扫描目录中的音频文件
///
/// 非递归时只看目录本身；结果按路径排序。
pub fn scan_audio_files(
    dir_path: &Path,
    recursive: bool,
    formats: &FormatSupport,
) -> ExportResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(ExportError::IoFailure(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(error::invalid_parameter(
            "路径不是目录",
            dir_path.display(),
        ));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut audio_files = Vec::new();

    for entry in WalkDir::new(dir_path).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "跳过无法访问的条目 / skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(ext) = utils::extract_extension_lowercase(entry.path())
            && formats.supports_extension(&ext)
        {
            audio_files.push(entry.into_path());
        }
    }

    audio_files.sort();
    Ok(audio_files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, audio_files: &[PathBuf], formats: &FormatSupport) {
    if audio_files.is_empty() {
        println!("[WARNING] 没有找到可处理的音频文件 / No audio files found");
        println!(
            "   支持的格式 / Supported formats: {}",
            formats.extensions.join(", ").to_uppercase()
        );
        return;
    }

    println!(
        "[INFO] 找到 {} 个音频文件 / Found {} audio file(s)",
        audio_files.len(),
        audio_files.len()
    );

    if config.verbose {
        for (i, file) in audio_files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}
