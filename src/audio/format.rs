//! 解码结果与格式支持信息模块
//!
//! 定义单个文件解码后的音频数据结构，以及解码器支持的格式列表

use crate::error::{self, ExportResult};

/// 解码后的音频数据（单声道）
///
/// 仅在单个文件的处理过程中存在，渲染完成后即被丢弃。
/// 多声道源在解码时按声道平均下混为单声道。
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// 单声道样本（浮点振幅，满量程为 ±1.0）
    pub samples: Vec<f32>,
    /// 源文件的原生采样率（不做重采样）
    pub sample_rate: u32,
    /// 源文件声道数（下混前）
    pub source_channels: u16,
}

impl DecodedAudio {
    /// 创建新的解码结果
    pub fn new(samples: Vec<f32>, sample_rate: u32, source_channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            source_channels,
        }
    }

    /// 验证解码结果的有效性
    pub fn validate(&self) -> ExportResult<()> {
        if self.sample_rate == 0 {
            return Err(error::decode_error("采样率不能为0", "sample rate is zero"));
        }
        if self.source_channels == 0 {
            return Err(error::decode_error("声道数不能为0", "channel count is zero"));
        }
        if self.samples.is_empty() {
            return Err(error::decode_error("未解码到任何样本", "no samples decoded"));
        }
        Ok(())
    }

    /// 获取持续时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// 格式支持信息
#[derive(Debug, Clone)]
pub struct FormatSupport {
    /// 支持的文件扩展名（小写）
    pub extensions: &'static [&'static str],
}

impl FormatSupport {
    /// 检查扩展名是否受支持（大小写不敏感）
    pub fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.extensions.contains(&ext_lower.as_str())
    }
}
