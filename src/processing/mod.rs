//! 批量波形导出处理模块
//!
//! 请求校验、逐文件导出、结果汇总以及后台工作线程。

pub mod exporter;
pub mod outcome;
pub mod request;
pub mod worker;

// 重新导出公共接口
pub use exporter::{BatchExporter, ExportObserver, NoopObserver};
pub use outcome::{BatchProgress, BatchSummary, ExportOutcome};
pub use request::{ExportRequest, output_file_name};
pub use worker::{BatchEvent, BatchHandle, BatchWorker, ChannelObserver};
