//! MacinMeter Waveform Tool
//!
//! 批量音频波形图导出：解码 → 音量调整 → 波形绘制 → 文本标注 → 原子保存。
//!
//! ## 核心特性
//! - hound + symphonia 统一解码，多声道平均下混为单声道，保持原始采样率
//! - 以dB为单位的音量调整：`10^(dB/20)` 线性因子，0 dB 时样本逐位不变
//! - 10 × 4 英寸无坐标轴波形图，按DPI栅格化并紧贴波形裁切
//! - 右上角文字标注（距顶部/右侧10像素），按背景亮度选择文字颜色
//! - 输出目录内临时文件 + 原子重命名为 `<stem>_waveform.jpg`
//! - 后台工作线程逐文件推送事件和进度，单文件失败不中断批处理

pub mod audio;
pub mod error;
pub mod processing;
pub mod render;
pub mod tools;

// 重新导出核心类型
pub use audio::{AudioDecoder, DecodedAudio, UniversalDecoder};
pub use error::{ErrorCategory, ExportError, ExportResult};
pub use processing::{
    BatchEvent, BatchExporter, BatchHandle, BatchProgress, BatchSummary, BatchWorker,
    ExportObserver, ExportOutcome, ExportRequest,
};
pub use render::{FigureOptions, SystemViewer, WaveformPlot, WaveformViewer};
