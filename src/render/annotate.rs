//! 图像标注模块
//!
//! 在栅格化后的波形图右上角绘制标签文本。使用内置8×8点阵字体，
//! 无需依赖系统字体；字号随DPI等比放大。

use crate::error::ExportResult;
use font8x8::{BASIC_FONTS, GREEK_FONTS, LATIN_FONTS, UnicodeFonts};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{Rgb, RgbImage};
use std::io::{BufWriter, Write};
use std::path::Path;

/// 标签距离上边缘和右边缘的像素距离
pub const ANNOTATION_INSET: u32 = 10;

/// 点阵字体的基础字形尺寸（像素）
const GLYPH_SIZE: u32 = 8;

/// JPEG编码质量
const JPEG_QUALITY: u8 = 95;

const TEXT_DARK: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// 标签的实际落点信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgb<u8>,
}

/// 根据DPI计算字形放大倍数（100 DPI为1倍）
#[inline]
pub fn glyph_scale_for_dpi(dpi: u32) -> u32 {
    (dpi / 100).max(1)
}

/// 标签文本的像素尺寸
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    (chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale)
}

/// 在图像右上角绘制标签（就地修改）
///
/// 文本右边缘距图像右边缘、上边缘距图像上边缘各 `ANNOTATION_INSET` 像素；
/// 图像过窄时文本左对齐到0并被裁剪。颜色根据文本区域背景亮度选择黑或白。
pub fn annotate(image: &mut RgbImage, text: &str, scale: u32) -> TextPlacement {
    let scale = scale.max(1);
    let (text_width, text_height) = text_size(text, scale);
    let x = image
        .width()
        .saturating_sub(text_width)
        .saturating_sub(ANNOTATION_INSET);
    let y = ANNOTATION_INSET.min(image.height().saturating_sub(1));

    let color = contrasting_color(image, x, y, text_width, text_height);

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as u32 * GLYPH_SIZE * scale;
        draw_glyph(image, glyph_for(ch), origin_x, y, scale, color);
    }

    TextPlacement {
        x,
        y,
        width: text_width,
        height: text_height,
        color,
    }
}

/// 打开图像文件，绘制标签后写回原路径（JPEG）
pub fn annotate_file(path: &Path, text: &str, dpi: u32) -> ExportResult<TextPlacement> {
    let mut image = image::open(path)?.to_rgb8();
    let placement = annotate(&mut image, text, glyph_scale_for_dpi(dpi));

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_jpeg(&image, &mut writer, dpi)?;
    writer.flush()?;

    Ok(placement)
}

/// 以JPEG格式编码图像，并写入DPI像素密度信息
pub fn write_jpeg<W: Write>(image: &RgbImage, writer: W, dpi: u32) -> ExportResult<()> {
    let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    encoder.set_pixel_density(PixelDensity::dpi(dpi.min(u16::MAX as u32) as u16));
    encoder.encode_image(image)?;
    Ok(())
}

/// 查找字形：基本拉丁 → 拉丁扩展 → 希腊字母，缺失时以 `?` 代替
fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// 绘制单个放大后的字形（超出图像边界的像素被丢弃）
fn draw_glyph(image: &mut RgbImage, glyph: [u8; 8], x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH_SIZE {
            // 每行的最低位对应最左侧像素
            if bits & (1 << col) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + col * scale + dx;
                    let py = y + row as u32 * scale + dy;
                    if px < image.width() && py < image.height() {
                        image.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

/// 根据文本区域的平均亮度选择对比色
fn contrasting_color(image: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> Rgb<u8> {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());

    let mut total = 0.0f64;
    let mut count = 0u64;
    for py in y..y_end {
        for px in x..x_end {
            let Rgb([r, g, b]) = *image.get_pixel(px, py);
            total += 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            count += 1;
        }
    }

    if count == 0 {
        return TEXT_DARK;
    }

    if total / count as f64 > 127.5 {
        TEXT_DARK
    } else {
        TEXT_LIGHT
    }
}
