//! 波形绘制模块
//!
//! 使用plotters在内存位图上绘制无坐标轴的波形图（时间为x轴、振幅为y轴），
//! 并裁剪到绘图区（去掉四周留白，但保留完整的坐标窗口，静音文件同样得到正常尺寸的图像）。

use crate::error::{self, ExportResult};
use image::RgbImage;
use plotters::prelude::*;
use rayon::prelude::*;

/// 画布与配色配置
///
/// 画布尺寸以英寸表示，乘以DPI得到像素尺寸；边距为画布比例，
/// 与常见绘图库的默认子图布局一致。
#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    /// 画布宽度（英寸）
    pub width_in: f64,
    /// 画布高度（英寸）
    pub height_in: f64,
    /// 绘图区左边界（画布宽度比例）
    pub left: f64,
    /// 绘图区右边界（画布宽度比例）
    pub right: f64,
    /// 绘图区下边界（画布高度比例，自下而上）
    pub bottom: f64,
    /// 绘图区上边界（画布高度比例，自下而上）
    pub top: f64,
    pub wave_color: RGBColor,
    pub background_color: RGBColor,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 4.0,
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wave_color: RGBColor(31, 119, 180),
            background_color: WHITE,
        }
    }
}

impl FigureOptions {
    /// 指定DPI下的画布像素尺寸
    pub fn canvas_size(&self, dpi: u32) -> (u32, u32) {
        let width = (self.width_in * dpi as f64).round().max(1.0) as u32;
        let height = (self.height_in * dpi as f64).round().max(1.0) as u32;
        (width, height)
    }

    /// 绘图区在画布中的矩形 (x, y, width, height)
    pub fn plot_area(&self, dpi: u32) -> (u32, u32, u32, u32) {
        let (width, height) = self.canvas_size(dpi);
        let (left, right, top, bottom) = self.margins_px(width, height);
        (
            left,
            top,
            width.saturating_sub(left + right).max(1),
            height.saturating_sub(top + bottom).max(1),
        )
    }

    /// 绘图区四周边距（像素）：左、右、上、下
    fn margins_px(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let w = width as f64;
        let h = height as f64;
        (
            (self.left * w).round() as u32,
            ((1.0 - self.right) * w).round() as u32,
            ((1.0 - self.top) * h).round() as u32,
            (self.bottom * h).round() as u32,
        )
    }
}

/// 待渲染的波形图
///
/// 持有增益调整后的样本；`rasterize` 可按不同DPI多次调用。
#[derive(Debug, Clone)]
pub struct WaveformPlot {
    samples: Vec<f32>,
    sample_rate: u32,
    options: FigureOptions,
}

impl WaveformPlot {
    pub fn new(samples: Vec<f32>, sample_rate: u32, options: FigureOptions) -> Self {
        Self {
            samples,
            sample_rate,
            options,
        }
    }

    /// 绘制所用的振幅序列
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn options(&self) -> &FigureOptions {
        &self.options
    }

    /// 时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// 在指定DPI下栅格化，并裁剪到绘图区
    ///
    /// 裁剪范围与振幅无关：静音或直流输入得到与普通输入相同尺寸的图像。
    pub fn rasterize(&self, dpi: u32) -> ExportResult<RgbImage> {
        if self.samples.is_empty() || self.sample_rate == 0 {
            return Err(error::render_error("无法绘制波形", "no samples to plot"));
        }

        let canvas = self.draw_canvas(dpi)?;
        let (x, y, width, height) = self.options.plot_area(dpi);
        Ok(image::imageops::crop_imm(&canvas, x, y, width, height).to_image())
    }

    /// 绘制完整画布（未裁剪）
    fn draw_canvas(&self, dpi: u32) -> ExportResult<RgbImage> {
        let (width, height) = self.options.canvas_size(dpi);
        let (left, right, top, bottom) = self.options.margins_px(width, height);
        let (_, _, plot_width, plot_height) = self.options.plot_area(dpi);

        let duration = self.duration_seconds();
        let peak = crate::audio::peak_amplitude(&self.samples) as f64;
        // 静音文件使用默认量程，避免零高度坐标系
        let y_limit = if peak > 0.0 { peak * 1.05 } else { 1.0 };
        // 每列最小高度为两个像素，保证平坦段也可见
        let min_span = 4.0 * y_limit / plot_height as f64;

        let columns = column_envelope(&self.samples, plot_width as usize);
        let column_count = columns.len().max(1) as f64;

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&self.options.background_color)
                .map_err(|e| error::render_error("填充背景失败", e))?;

            let mut chart = ChartBuilder::on(&root)
                .margin_left(left)
                .margin_right(right)
                .margin_top(top)
                .margin_bottom(bottom)
                .build_cartesian_2d(0.0..duration, -y_limit..y_limit)
                .map_err(|e| error::render_error("创建坐标系失败", e))?;

            let style = self.options.wave_color.stroke_width(1);
            chart
                .draw_series(columns.iter().enumerate().map(|(i, &(lo, hi))| {
                    let t = (i as f64 + 0.5) * duration / column_count;
                    let (mut lo, mut hi) = (lo as f64, hi as f64);
                    if hi - lo < min_span {
                        let mid = (hi + lo) / 2.0;
                        lo = mid - min_span / 2.0;
                        hi = mid + min_span / 2.0;
                    }
                    PathElement::new(vec![(t, lo), (t, hi)], style)
                }))
                .map_err(|e| error::render_error("绘制波形失败", e))?;

            root.present()
                .map_err(|e| error::render_error("提交画布失败", e))?;
        }

        tracing::trace!(width, height, plot_width, plot_height, "波形画布绘制完成 / canvas drawn");

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| error::render_error("画布缓冲区尺寸不匹配", format!("{width}x{height}")))
    }
}

/// 按列计算最小/最大振幅包络
///
/// 每个像素列对应一段连续样本；样本数少于列数时相邻列共享同一样本。
pub fn column_envelope(samples: &[f32], columns: usize) -> Vec<(f32, f32)> {
    if samples.is_empty() || columns == 0 {
        return Vec::new();
    }

    let len = samples.len();
    (0..columns)
        .into_par_iter()
        .map(|c| {
            let start = (c * len / columns).min(len - 1);
            let end = ((c + 1) * len / columns).clamp(start + 1, len);
            samples[start..end]
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                    (lo.min(s), hi.max(s))
                })
        })
        .collect()
}
