use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 录制程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 转码错误
    #[error("转码错误: {0}")]
    Transcode(#[from] TranscodeError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建浏览器上下文或页面失败
    #[error("创建录制上下文失败: {source}")]
    ContextFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航超时（包括等待网络空闲）
    #[error("导航到 {url} 超时 ({timeout:?})")]
    NavigationTimedOut { url: String, timeout: Duration },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 屏幕录制失败
    #[error("屏幕录制失败: {reason}")]
    RecordingFailed { reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("创建目录失败 ({}): {source}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("读取目录失败 ({}): {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("重命名失败 ({} -> {}): {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("删除文件失败 ({}): {source}", .path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 未分类的 IO 错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 外部转码器错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// 无法启动转码器（通常是找不到可执行文件）
    #[error("无法启动转码器 {}: {source}", .program.display())]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 转码器返回非零退出码
    #[error("转码器退出码异常 ({code:?}): {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },
    /// 转码器报告成功但没有生成输出文件
    #[error("转码器未生成输出文件: {}", .path.display())]
    OutputMissing { path: PathBuf },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::ScriptFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::Io(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器上下文错误
    pub fn context_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ContextFailed {
            source: Box::new(source),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建录制错误
    pub fn recording_failed(reason: impl Into<String>) -> Self {
        AppError::Browser(BrowserError::RecordingFailed {
            reason: reason.into(),
        })
    }

    /// 创建删除文件错误
    pub fn delete_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::DeleteFailed {
            path: path.into(),
            source,
        })
    }
}

/// 程序结果类型
pub type AppResult<T> = Result<T, AppError>;
