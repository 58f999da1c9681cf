//! 音频解码模块
//!
//! 提供多格式音频文件的解码支持和音量增益处理。
//!
//! **使用 `UniversalDecoder`** - 统一解码器，hound处理WAV，symphonia处理其余格式

// 内部子模块（仅供universal_decoder使用）
mod error_handling;
mod format;

pub mod gain;
pub mod universal_decoder;

pub use format::{DecodedAudio, FormatSupport};
pub use gain::{apply_gain, db_to_amplitude, peak_amplitude};
pub use universal_decoder::{AudioDecoder, UniversalDecoder};
