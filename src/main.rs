//! MacinMeter Waveform Tool - 主程序入口
//!
//! 纯流程控制器：解析参数、扫描输入、提交后台批处理并输出逐文件结果和汇总。

use macinmeter_waveform_tool::{
    audio::{AudioDecoder, UniversalDecoder},
    error::{ErrorCategory, ExportError},
    processing::{BatchEvent, BatchExporter, BatchSummary, BatchWorker},
    tools::{self, AppConfig},
};
use std::process;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/输入错误
    pub const PARAMETER_ERROR: i32 = 2;
    /// 解码失败
    pub const DECODING_ERROR: i32 = 3;
    /// 渲染失败
    pub const RENDER_ERROR: i32 = 4;
}

/// 获取错误建议文本
fn get_error_suggestion(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Parameter => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check if command-line arguments are correct, use --help to see full usage"
        }
        ErrorCategory::Io => {
            "检查文件路径是否正确，文件是否存在且可读写 / Check if paths are correct, files exist and are readable/writable"
        }
        ErrorCategory::Decoding => {
            "文件可能损坏或使用不支持的音频编码 / File may be corrupted or use unsupported audio encoding"
        }
        ErrorCategory::Render => {
            "波形绘制或图像写入失败，请检查输出目录剩余空间 / Rendering failed, check free space in the output directory"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: ExportError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");

    let category = ErrorCategory::from_export_error(&error);
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));

    if matches!(category, ErrorCategory::Parameter) {
        let decoder = UniversalDecoder::new();
        let uppercase_formats: Vec<String> = decoder
            .supported_formats()
            .extensions
            .iter()
            .map(|s| s.to_uppercase())
            .collect();
        eprintln!(
            "   Supported formats / 支持的格式: {}",
            uppercase_formats.join(", ")
        );
    }

    let exit_code = match category {
        ErrorCategory::Parameter => exit_codes::PARAMETER_ERROR,
        ErrorCategory::Decoding => exit_codes::DECODING_ERROR,
        ErrorCategory::Render => exit_codes::RENDER_ERROR,
        ErrorCategory::Io => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 初始化诊断日志：`RUST_LOG` 优先，否则默认warn（--verbose 时为debug）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 提交批处理并逐个输出工作线程事件
fn process_batch(config: &AppConfig) -> Result<(), ExportError> {
    let exporter = BatchExporter::new();
    let formats = exporter.decoder().supported_formats();
    let files = tools::collect_inputs(&config.inputs, config.recursive, formats)?;
    tools::show_scan_results(config, &files, formats);

    if files.is_empty() {
        return Ok(());
    }

    let request = config.to_request(files);
    let worker = BatchWorker::new(exporter);
    let handle = worker.submit(request.clone())?;

    for event in handle.events().iter() {
        match event {
            BatchEvent::FileStarted { index, total, path } => {
                if config.verbose {
                    println!(
                        "[PROCESSING] [{}/{}] 处理 / Processing: {}",
                        index + 1,
                        total,
                        tools::utils::extract_filename_lossy(&path)
                    );
                }
            }
            BatchEvent::FileFinished {
                index,
                path,
                outcome,
            } => {
                println!(
                    "{}",
                    tools::format_file_result(index, handle.total(), &path, &outcome)
                );
            }
            BatchEvent::Progress(progress) => {
                if config.verbose {
                    println!("   {}", tools::format_progress(&progress));
                }
            }
        }
    }

    let outcomes = handle.wait()?;
    let summary = BatchSummary::from_outcomes(&request.input_paths, &outcomes);

    if summary.should_announce() {
        println!();
        println!("[OK] {}", summary.message());
        if config.verbose || summary.failed > 0 {
            println!("{}", tools::create_summary_table(&summary));
        }
    }

    if let Some(report_path) = &config.report_path {
        let report = tools::BatchReport::new(&request, &outcomes, &summary);
        let written = tools::write_report(report_path, &report)?;
        println!("[INFO] 报告已写入 / Report written: {}", written.display());
    }

    Ok(())
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), ExportError> {
    // 1. 解析命令行参数
    let config = tools::parse_args();
    init_tracing(config.verbose);

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 执行批处理
    process_batch(&config)?;

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
