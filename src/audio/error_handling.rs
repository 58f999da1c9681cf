//! 错误处理模块
//!
//! 提供统一的symphonia错误处理宏
//! 注意：此模块仅供universal_decoder内部使用

/// 🔧 统一的symphonia错误处理宏
///
/// 将 `next_packet()` / `decode()` 的结果归一为三种情况：
/// - `Some(value)`：正常返回
/// - `None`：可恢复（解码器重置、损坏包），调用方继续下一次循环
/// - 文件结束时 `break` 出外层循环，其他错误转为 `DecodeFailure` 直接返回
macro_rules! handle_symphonia_error {
    ($result:expr, $decoder:expr, $context:expr) => {
        match $result {
            Ok(value) => Some(value),
            Err(symphonia::core::errors::Error::ResetRequired) => {
                $decoder.reset();
                None
            }
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // 文件结束
            }
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                None // 跳过错误包，继续循环
            }
            Err(e) => return Err($crate::error::decode_error($context, e)),
        }
    };
}

// 使宏在当前模块可见，但不对外暴露
pub(super) use handle_symphonia_error;
