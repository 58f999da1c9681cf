//! 工具模块集合
//!
//! 包含CLI、文件扫描和格式化等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod formatter;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use formatter::{
    BatchReport, create_summary_table, format_file_result, format_progress, write_report,
};
pub use scanner::{collect_inputs, scan_audio_files, show_scan_results};
pub use utils::path;
