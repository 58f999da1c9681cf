//! 统一音频解码器
//!
//! 提供统一的音频解码接口，支持多种格式的自动检测和解码。
//! WAV优先走hound快速路径，其余格式（以及hound失败的WAV）交给symphonia。

use super::error_handling::handle_symphonia_error;
use super::format::{DecodedAudio, FormatSupport};
use crate::error::{self, ExportError, ExportResult};
use std::path::Path;

/// 音频解码器trait
///
/// 解码协作者的抽象：输入文件路径，输出单声道样本与原生采样率。
pub trait AudioDecoder: Send + Sync {
    /// 获取解码器名称
    fn name(&self) -> &'static str;

    /// 获取支持的格式信息
    fn supported_formats(&self) -> &FormatSupport;

    /// 检测是否能解码指定文件（基于扩展名）
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| self.supported_formats().supports_extension(ext))
    }

    /// 完整解码文件
    fn decode(&self, path: &Path) -> ExportResult<DecodedAudio>;
}

/// 统一解码器（hound + symphonia）
#[derive(Debug, Default, Clone, Copy)]
pub struct UniversalDecoder;

impl UniversalDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for UniversalDecoder {
    fn name(&self) -> &'static str {
        "Universal Decoder"
    }

    fn supported_formats(&self) -> &FormatSupport {
        static SUPPORT: FormatSupport = FormatSupport {
            extensions: &[
                "wav", "flac", "mp3", "m4a", "aac", "ogg", "aiff", "aif", "caf", "au", "mkv",
                "webm",
            ],
        };
        &SUPPORT
    }

    fn decode(&self, path: &Path) -> ExportResult<DecodedAudio> {
        let is_wav = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

        // 先尝试hound（WAV专用，更快）
        let decoded = if is_wav {
            match decode_with_hound(path) {
                Ok(audio) => Ok(audio),
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "hound解码失败，使用symphonia后备解码器 / hound failed, falling back to symphonia"
                    );
                    decode_with_symphonia(path)
                }
            }
        } else {
            decode_with_symphonia(path)
        };

        // 读取阶段的I/O错误（文件不存在、不可读）同样属于解码失败
        let audio = decoded.map_err(|e| match e {
            ExportError::IoFailure(io) => error::decode_error("无法读取音频文件", io),
            other => other,
        })?;

        audio.validate()?;

        tracing::debug!(
            path = %path.display(),
            sample_rate = audio.sample_rate,
            channels = audio.source_channels,
            frames = audio.samples.len(),
            "解码完成 / decoded"
        );

        Ok(audio)
    }
}

/// 使用hound解码WAV文件
fn decode_with_hound(path: &Path) -> ExportResult<DecodedAudio> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|s| s as f32 / 128.0))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / 32768.0))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32 / 8388608.0))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| (s as f64 / 2147483648.0) as f32))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(error::decode_error(
                "不支持的WAV样本格式",
                format!("{format:?} {bits}位"),
            ));
        }
    };

    let samples = downmix_interleaved(&interleaved, spec.channels as usize);
    Ok(DecodedAudio::new(samples, spec.sample_rate, spec.channels))
}

/// 使用symphonia通用解码
fn decode_with_symphonia(path: &Path) -> ExportResult<DecodedAudio> {
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension() {
        hint.with_extension(&extension.to_string_lossy());
    }

    let meta_opts = MetadataOptions::default();
    let fmt_opts = FormatOptions::default();

    let detected = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| error::decode_error("格式探测失败", e))?;

    let mut format_reader = detected.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| error::decode_error("未找到音频轨道", path.display()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| error::decode_error("创建解码器失败", e))?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|ch| ch.count() as u16);
    let mut samples = Vec::new();

    loop {
        let Some(packet) =
            handle_symphonia_error!(format_reader.next_packet(), decoder, "读取包失败")
        else {
            continue;
        };

        if packet.track_id() != track_id {
            continue;
        }

        if let Some(audio_buf) = handle_symphonia_error!(decoder.decode(&packet), decoder, "解码失败")
        {
            // 部分容器在首个包解码前不提供采样率/声道信息
            let spec = audio_buf.spec();
            sample_rate.get_or_insert(spec.rate);
            channels.get_or_insert(spec.channels.count() as u16);

            mix_buffer_to_mono(&audio_buf, &mut samples);
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| error::decode_error("无法获取采样率", path.display()))?;
    let channels = channels.ok_or_else(|| error::decode_error("无法获取声道数", path.display()))?;

    Ok(DecodedAudio::new(samples, sample_rate, channels))
}

/// 交错样本按帧平均下混为单声道
fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    let scale = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// 转换symphonia缓冲区为单声道样本（按声道平均）
fn mix_buffer_to_mono(audio_buf: &symphonia::core::audio::AudioBufferRef, samples: &mut Vec<f32>) {
    use symphonia::core::audio::{AudioBufferRef, Signal};

    // 🔥 使用宏简化样本转换逻辑
    macro_rules! mix_samples {
        ($buf:expr, $converter:expr) => {{
            let channel_count = $buf.spec().channels.count();
            let frame_count = $buf.frames();
            samples.reserve(frame_count);

            if channel_count == 1 {
                samples.extend($buf.chan(0).iter().map(|&s| $converter(s)));
            } else if channel_count > 1 {
                let scale = 1.0 / channel_count as f32;
                for frame in 0..frame_count {
                    let mut acc = 0.0f32;
                    for ch in 0..channel_count {
                        acc += $converter($buf.chan(ch)[frame]);
                    }
                    samples.push(acc * scale);
                }
            }
        }};
    }

    // 每种格式使用专门的转换器
    match audio_buf {
        AudioBufferRef::F32(buf) => mix_samples!(buf, |s: f32| s),
        AudioBufferRef::S16(buf) => mix_samples!(buf, |s: i16| (s as f32) / 32768.0),
        AudioBufferRef::S24(buf) => {
            mix_samples!(buf, |s: symphonia::core::sample::i24| (s.inner() as f32)
                / 8388608.0)
        }
        AudioBufferRef::S32(buf) => {
            mix_samples!(buf, |s: i32| (s as f64 / 2147483648.0) as f32)
        }
        AudioBufferRef::F64(buf) => mix_samples!(buf, |s: f64| s as f32),
        AudioBufferRef::U8(buf) => mix_samples!(buf, |s: u8| ((s as f32) - 128.0) / 128.0),
        AudioBufferRef::U16(buf) => {
            mix_samples!(buf, |s: u16| ((s as f32) - 32768.0) / 32768.0)
        }
        AudioBufferRef::U24(buf) => {
            mix_samples!(buf, |s: symphonia::core::sample::u24| ((s.inner() as f32)
                - 8388608.0)
                / 8388608.0)
        }
        AudioBufferRef::U32(buf) => {
            mix_samples!(buf, |s: u32| (((s as f64) - 2147483648.0) / 2147483648.0)
                as f32)
        }
        AudioBufferRef::S8(buf) => mix_samples!(buf, |s: i8| (s as f32) / 128.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav(path: &Path, channels: u16, frames: &[Vec<i16>]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_downmix_interleaved_stereo() {
        let mixed = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mixed, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_is_identity() {
        let input = vec![0.1, -0.2, 0.3];
        assert_eq!(downmix_interleaved(&input, 1), input);
    }

    #[test]
    fn test_decode_mono_wav_keeps_native_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, &[vec![16384], vec![-16384], vec![0]]);

        let audio = UniversalDecoder::new().decode(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.source_channels, 1);
        assert_eq!(audio.samples, vec![0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_decode_stereo_wav_downmixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, &[vec![16384, 0], vec![-16384, -16384]]);

        let audio = UniversalDecoder::new().decode(&path).unwrap();
        assert_eq!(audio.source_channels, 2);
        assert_eq!(audio.samples, vec![0.25, -0.5]);
    }

    #[test]
    fn test_missing_file_is_decode_failure() {
        let result = UniversalDecoder::new().decode(&PathBuf::from("/nonexistent/none.wav"));
        assert!(matches!(result, Err(ExportError::DecodeFailure(_))));
    }

    #[test]
    fn test_garbage_file_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.mp3");
        std::fs::write(&path, b"definitely not an mp3 stream").unwrap();

        let result = UniversalDecoder::new().decode(&path);
        assert!(matches!(result, Err(ExportError::DecodeFailure(_))));
    }

    #[test]
    fn test_can_decode_by_extension() {
        let decoder = UniversalDecoder::new();
        assert!(decoder.can_decode(Path::new("a.FLAC")));
        assert!(decoder.can_decode(Path::new("b.mp3")));
        assert!(!decoder.can_decode(Path::new("notes.txt")));
        assert!(!decoder.can_decode(Path::new("no_extension")));
    }
}
