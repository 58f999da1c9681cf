//! 渲染模块
//!
//! 波形绘制、绘图区裁剪、标签标注与交互展示。

pub mod annotate;
pub mod viewer;
pub mod waveform;

pub use annotate::{ANNOTATION_INSET, TextPlacement, annotate, annotate_file, write_jpeg};
pub use viewer::{SystemViewer, WaveformViewer};
pub use waveform::{FigureOptions, WaveformPlot};
