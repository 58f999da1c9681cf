//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::export::{DEFAULT_DPI, MAX_GAIN_DB, MIN_GAIN_DB, SUPPORTED_DPI};
use crate::processing::ExportRequest;
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件或目录（按命令行顺序）
    pub inputs: Vec<PathBuf>,

    /// 输出目录：缺省时逐个打开预览
    pub output_dir: Option<PathBuf>,

    /// 输出分辨率
    pub dpi: u32,

    /// 音量调整（dB）
    pub gain_db: f64,

    /// 标注文本（为空时使用文件名）
    pub label: String,

    /// 目录输入是否递归扫描
    pub recursive: bool,

    /// JSON报告输出路径（可选）
    pub report_path: Option<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 以扫描后的文件列表构造导出请求
    pub fn to_request(&self, files: Vec<PathBuf>) -> ExportRequest {
        let request = ExportRequest::new(files)
            .with_dpi(self.dpi)
            .with_gain_db(self.gain_db)
            .with_label(self.label.clone());

        match &self.output_dir {
            Some(dir) => request.with_output_dir(dir.clone()),
            None => request,
        }
    }
}

/// 构建命令定义（测试中通过 `try_get_matches_from` 复用）
pub fn build_command() -> Command {
    Command::new("macinmeter-waveform")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("MacinMeter Team")
        .arg(
            Arg::new("INPUT")
                .help("音频文件或目录 (WAV, FLAC, MP3, AAC, OGG, AIFF...)")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .help("保存波形图的目录；不指定时逐个打开预览")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dpi")
                .long("dpi")
                .help(format!("输出分辨率（支持: {SUPPORTED_DPI:?}）"))
                .value_name("DPI")
                .value_parser(value_parser!(u32))
                .default_value("300"),
        )
        .arg(
            Arg::new("gain-db")
                .long("gain-db")
                .help(format!("音量调整，单位dB（{MIN_GAIN_DB} ~ {MAX_GAIN_DB}）"))
                .value_name("DB")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("0"),
        )
        .arg(
            Arg::new("label")
                .long("label")
                .help("图片右上角的标注文本；不指定时使用文件名")
                .value_name("TEXT"),
        )
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .short('r')
                .help("递归扫描目录输入")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("将批处理结果写入JSON报告")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(ArgAction::SetTrue),
        )
}

/// 从匹配结果创建配置
pub fn config_from_matches(matches: &clap::ArgMatches) -> AppConfig {
    AppConfig {
        inputs: matches
            .get_many::<PathBuf>("INPUT")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        output_dir: matches.get_one::<PathBuf>("output-dir").cloned(),
        dpi: matches.get_one::<u32>("dpi").copied().unwrap_or(DEFAULT_DPI),
        gain_db: matches.get_one::<f64>("gain-db").copied().unwrap_or(0.0),
        label: matches.get_one::<String>("label").cloned().unwrap_or_default(),
        recursive: matches.get_flag("recursive"),
        report_path: matches.get_one::<PathBuf>("report").cloned(),
        verbose: matches.get_flag("verbose"),
    }
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AppConfig {
    config_from_matches(&build_command().get_matches())
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("MacinMeter Waveform Tool v{VERSION}");
    println!("{DESCRIPTION}");
    if config.verbose {
        match &config.output_dir {
            Some(dir) => println!("[INFO] 输出目录 / Output directory: {}", dir.display()),
            None => println!("[INFO] 预览模式 / Preview mode (no files written)"),
        }
        println!(
            "[INFO] DPI: {} | 增益 / Gain: {:+.1} dB",
            config.dpi, config.gain_db
        );
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("[OK] 所有任务处理完成 / All tasks finished");
    }
}
