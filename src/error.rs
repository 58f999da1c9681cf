//! 统一错误处理框架
//!
//! 波形导出流水线的错误类型定义。单文件错误（解码/I/O/渲染）在文件边界被捕获并记录，
//! 请求级错误（参数非法）在处理任何文件之前直接返回。

use std::fmt;
use std::io;

/// 波形导出相关的统一错误类型
#[derive(Debug)]
pub enum ExportError {
    /// 请求参数非法（DPI不支持、增益越界、输入列表为空等）
    InvalidParameter(String),

    /// 文件I/O错误（输出目录不可写、磁盘已满、重命名失败等）
    IoFailure(io::Error),

    /// 音频解码错误（文件损坏、格式不支持等）
    DecodeFailure(String),

    /// 渲染错误（绘图、栅格化、图像编码失败）
    RenderFailure(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidParameter(msg) => write!(f, "参数非法 / Invalid parameter: {msg}"),
            ExportError::IoFailure(err) => write!(f, "文件I/O错误 / I/O failure: {err}"),
            ExportError::DecodeFailure(msg) => write!(f, "音频解码失败 / Decode failure: {msg}"),
            ExportError::RenderFailure(msg) => write!(f, "渲染失败 / Render failure: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::IoFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::IoFailure(err)
    }
}

impl From<hound::Error> for ExportError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => ExportError::IoFailure(e),
            other => ExportError::DecodeFailure(format!("WAV解码错误: {other}")),
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ExportError::IoFailure(e),
            other => ExportError::RenderFailure(format!("图像处理错误: {other}")),
        }
    }
}

impl From<tempfile::PersistError> for ExportError {
    fn from(err: tempfile::PersistError) -> Self {
        ExportError::IoFailure(err.error)
    }
}

/// 报告序列化失败属于写出阶段的I/O错误，而非渲染错误
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::IoFailure(io::Error::from(err))
    }
}

/// 波形导出操作的标准Result类型
pub type ExportResult<T> = Result<T, ExportError>;

// ==================== 错误转换Helper函数 ====================
// 消除重复的 .map_err(|e| ExportError::XXX(format!(...))) 模式

/// 创建参数错误的helper函数
#[inline]
pub fn invalid_parameter<E: fmt::Display>(context: &str, err: E) -> ExportError {
    ExportError::InvalidParameter(format!("{context}: {err}"))
}

/// 创建解码错误的helper函数
#[inline]
pub fn decode_error<E: fmt::Display>(context: &str, err: E) -> ExportError {
    ExportError::DecodeFailure(format!("{context}: {err}"))
}

/// 创建渲染错误的helper函数
#[inline]
pub fn render_error<E: fmt::Display>(context: &str, err: E) -> ExportError {
    ExportError::RenderFailure(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, serde::Serialize)]
pub enum ErrorCategory {
    /// 解码相关错误（文件损坏、不支持的编码等）
    Decoding,
    /// I/O相关错误（文件不存在、权限不足、磁盘已满等）
    Io,
    /// 渲染相关错误（绘图或图像编码失败）
    Render,
    /// 请求参数错误
    Parameter,
}

impl ErrorCategory {
    /// 从ExportError提取错误类别
    pub fn from_export_error(e: &ExportError) -> Self {
        match e {
            ExportError::DecodeFailure(_) => Self::Decoding,
            ExportError::IoFailure(_) => Self::Io,
            ExportError::RenderFailure(_) => Self::Render,
            ExportError::InvalidParameter(_) => Self::Parameter,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Decoding => "解码错误 / DecodeFailure",
            Self::Io => "I/O错误 / IOFailure",
            Self::Render => "渲染错误 / RenderFailure",
            Self::Parameter => "参数错误 / InvalidParameter",
        }
    }
}
