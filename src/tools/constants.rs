//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 波形导出参数约束
pub mod export {
    /// 支持的输出分辨率（DPI）
    pub const SUPPORTED_DPI: &[u32] = &[100, 200, 300, 500, 600];

    /// 默认输出分辨率
    pub const DEFAULT_DPI: u32 = 300;

    /// 增益下限（dB）
    pub const MIN_GAIN_DB: f64 = -10.0;

    /// 增益上限（dB）
    pub const MAX_GAIN_DB: f64 = 10.0;

    /// 输出文件名后缀：`<stem>_waveform.jpg`
    pub const OUTPUT_SUFFIX: &str = "_waveform";

    /// 输出文件扩展名
    pub const OUTPUT_EXTENSION: &str = "jpg";

    /// 临时文件名前缀（位于输出目录内，随机后缀避免冲突）
    pub const TEMP_FILE_PREFIX: &str = ".temp_waveform_";
}

/// 批处理输出相关常量
pub mod report {
    /// 汇总信息的最小文件数：仅当请求的文件数超过此值时输出汇总
    ///
    /// 0个或1个文件不输出"全部处理完成"汇总
    pub const SUMMARY_MIN_FILES: usize = 1;

    /// 工作线程名称
    pub const WORKER_THREAD_NAME: &str = "waveform-worker";
}
