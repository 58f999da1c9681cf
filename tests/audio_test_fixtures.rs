//! 音频测试固件生成器
//!
//! 在临时目录中用hound生成测试用WAV文件，测试结束后随目录一并删除。

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 测试固件生成器（每个测试独占一个临时目录）
pub struct AudioTestFixtures {
    dir: TempDir,
}

impl AudioTestFixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("无法创建测试固件目录"),
        }
    }

    /// 固件目录
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// 获取固件路径
    pub fn get_path(&self, filename: &str) -> PathBuf {
        self.dir.path().join(filename)
    }

    /// 正弦波（各声道相同），16位整数
    pub fn create_sine(
        &self,
        filename: &str,
        channels: u16,
        sample_rate: u32,
        seconds: f32,
        amplitude: f32,
    ) -> PathBuf {
        let path = self.get_path(filename);
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let frames = (sample_rate as f32 * seconds) as usize;

        let mut writer = WavWriter::create(&path, spec).expect("无法创建正弦波文件");
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let value = (amplitude * (2.0 * PI * 440.0 * t).sin() * 32767.0) as i16;
            for _ in 0..channels {
                writer.write_sample(value).expect("无法写入样本");
            }
        }
        writer.finalize().expect("无法完成写入");
        path
    }

    /// 立体声，左右声道反相：下混后应为静音
    pub fn create_opposed_stereo(&self, filename: &str) -> PathBuf {
        let path = self.get_path(filename);
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&path, spec).expect("无法创建立体声文件");
        for i in 0..800 {
            let value = if i % 2 == 0 { 16000i16 } else { -16000 };
            writer.write_sample(value).expect("无法写入样本");
            writer.write_sample(-value).expect("无法写入样本");
        }
        writer.finalize().expect("无法完成写入");
        path
    }

    /// 只有WAV头、没有样本的文件
    pub fn create_zero_length(&self, filename: &str) -> PathBuf {
        let path = self.get_path(filename);
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(&path, spec).expect("无法创建零长度文件");
        writer.finalize().expect("无法完成写入");
        path
    }

    /// 扩展名像音频、内容是文本的伪造文件
    pub fn create_fake_audio(&self, filename: &str) -> PathBuf {
        let path = self.get_path(filename);
        std::fs::write(&path, b"This is not an audio file, just plain text.")
            .expect("无法创建伪造文件");
        path
    }
}

impl Default for AudioTestFixtures {
    fn default() -> Self {
        Self::new()
    }
}
