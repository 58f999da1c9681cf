//! 批量波形导出器
//!
//! 逐个处理输入文件：解码 → 增益 → 绘制 →（保存模式）栅格化 + 标注 + 原子重命名 → 进度。
//! 单文件错误在文件边界被捕获并记录为该文件的结果，不会中断批处理。

use super::outcome::{BatchProgress, ExportOutcome};
use super::request::ExportRequest;
use crate::audio::{self, AudioDecoder, UniversalDecoder};
use crate::error::ExportResult;
use crate::render::{self, FigureOptions, SystemViewer, WaveformPlot, WaveformViewer};
use crate::tools::constants::export::{OUTPUT_EXTENSION, TEMP_FILE_PREFIX};
use crate::tools::utils;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 批处理观察者：接收逐文件事件和进度
///
/// 所有回调按输入顺序、在处理线程上同步调用。
pub trait ExportObserver {
    /// 开始处理第 `index` 个文件（从0开始）
    fn on_file_started(&mut self, _index: usize, _total: usize, _path: &Path) {}

    /// 第 `index` 个文件处理结束
    fn on_file_finished(&mut self, _index: usize, _path: &Path, _outcome: &ExportOutcome) {}

    /// 进度推进（每个文件结束后恰好一次）
    fn on_progress(&mut self, _progress: BatchProgress) {}
}

/// 不关心任何事件的观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExportObserver for NoopObserver {}

/// 批量波形导出器
pub struct BatchExporter {
    decoder: Box<dyn AudioDecoder>,
    viewer: Box<dyn WaveformViewer>,
    figure: FigureOptions,
}

impl BatchExporter {
    /// 使用默认协作者创建导出器（统一解码器 + 系统查看器）
    pub fn new() -> Self {
        Self {
            decoder: Box::new(UniversalDecoder::new()),
            viewer: Box::new(SystemViewer::new()),
            figure: FigureOptions::default(),
        }
    }

    /// 替换解码器
    pub fn with_decoder(mut self, decoder: Box<dyn AudioDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// 替换查看器
    pub fn with_viewer(mut self, viewer: Box<dyn WaveformViewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// 替换画布配置
    pub fn with_figure(mut self, figure: FigureOptions) -> Self {
        self.figure = figure;
        self
    }

    pub fn decoder(&self) -> &dyn AudioDecoder {
        self.decoder.as_ref()
    }

    /// 执行整个批处理
    ///
    /// 请求校验失败时立即返回 `InvalidParameter`，不产生任何结果；
    /// 否则返回与 `input_paths` 等长、同序的结果序列。
    pub fn export(
        &self,
        request: &ExportRequest,
        observer: &mut dyn ExportObserver,
    ) -> ExportResult<Vec<ExportOutcome>> {
        request.validate()?;

        let total = request.input_paths.len();
        let mut outcomes = Vec::with_capacity(total);

        tracing::debug!(
            total,
            dpi = request.dpi,
            gain_db = request.gain_db,
            save_mode = request.is_save_mode(),
            "开始批处理 / batch started"
        );

        for (index, path) in request.input_paths.iter().enumerate() {
            observer.on_file_started(index, total, path);

            let outcome = match self.process_file(request, path) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "文件处理失败 / file failed");
                    ExportOutcome::failed(&e)
                }
            };

            observer.on_file_finished(index, path, &outcome);
            observer.on_progress(BatchProgress::new(index + 1, total));
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// 处理单个文件（错误由调用方记录为失败结果）
    pub fn process_file(&self, request: &ExportRequest, path: &Path) -> ExportResult<ExportOutcome> {
        let plot = self.prepare_plot(path, request.gain_db)?;

        match &request.output_dir {
            Some(dir) => {
                let saved = self.save_plot(&plot, request, dir, path)?;
                Ok(ExportOutcome::Saved { path: saved })
            }
            None => {
                self.viewer
                    .present(&plot, &utils::extract_filename_lossy(path))?;
                Ok(ExportOutcome::Displayed)
            }
        }
    }

    /// 解码并应用增益，得到待绘制的波形图
    pub fn prepare_plot(&self, path: &Path, gain_db: f64) -> ExportResult<WaveformPlot> {
        let decoded = self.decoder.decode(path)?;
        let duration = decoded.duration_seconds();
        let mut samples = decoded.samples;
        let factor = audio::apply_gain(&mut samples, gain_db);

        tracing::debug!(
            path = %path.display(),
            duration,
            gain_db,
            factor,
            "增益已应用 / gain applied"
        );

        Ok(WaveformPlot::new(
            samples,
            decoded.sample_rate,
            self.figure.clone(),
        ))
    }

    /// 保存模式：栅格化到临时文件 → 标注 → 原子重命名为最终文件
    ///
    /// 临时文件位于输出目录内（保证同一文件系统上的原子重命名），
    /// 任一步骤失败时临时文件随 `NamedTempFile` 释放而删除。
    fn save_plot(
        &self,
        plot: &WaveformPlot,
        request: &ExportRequest,
        output_dir: &Path,
        input: &Path,
    ) -> ExportResult<PathBuf> {
        let image = plot.rasterize(request.dpi)?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&format!(".{OUTPUT_EXTENSION}"))
            .tempfile_in(output_dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            render::write_jpeg(&image, &mut writer, request.dpi)?;
            writer.flush()?;
        }

        let label = request.label_for(input);
        render::annotate_file(temp.path(), &label, request.dpi)?;

        let final_path = request.final_path_for(output_dir, input);
        // 同名文件直接覆盖
        temp.persist(&final_path)?;

        tracing::debug!(path = %final_path.display(), label = %label, "波形图已保存 / saved");
        Ok(final_path)
    }
}

impl Default for BatchExporter {
    fn default() -> Self {
        Self::new()
    }
}
