//! 外部转码器
//!
//! 读取临时文件，裁掉开头的若干秒并重新编码，写出最终文件。

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::RecordingConfig;
use crate::error::{AppResult, TranscodeError};

/// stderr 只保留末尾这么多字符放进错误信息
const STDERR_TAIL_CHARS: usize = 600;

/// 一次裁剪转码任务
#[derive(Debug, Clone, Copy)]
pub struct TranscodeJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub trim_start: Duration,
}

/// 转码能力
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// 同步执行转码（等待进程结束）
    async fn transcode(&self, job: TranscodeJob<'_>) -> AppResult<()>;
}

/// 基于 ffmpeg 命令行的转码器
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    codec: String,
    bitrate: String,
}

impl FfmpegTranscoder {
    /// 创建转码器
    ///
    /// # 参数
    /// - `program`: ffmpeg 可执行文件
    /// - `codec`: 视频编码器，例如 `libvpx`
    /// - `bitrate`: 目标码率，例如 `1M`
    pub fn new(
        program: impl Into<PathBuf>,
        codec: impl Into<String>,
        bitrate: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            codec: codec.into(),
            bitrate: bitrate.into(),
        }
    }

    pub fn from_config(config: &RecordingConfig) -> Self {
        Self::new(
            &config.ffmpeg_path,
            &config.video_codec,
            &config.video_bitrate,
        )
    }

    /// `-y -ss <trim> -i <input> -c:v <codec> -b:v <bitrate> <output>`
    pub fn args(&self, job: &TranscodeJob<'_>) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-ss".into(),
            format_seconds(job.trim_start).into(),
            "-i".into(),
            job.input.into(),
            "-c:v".into(),
            self.codec.as_str().into(),
            "-b:v".into(),
            self.bitrate.as_str().into(),
            job.output.into(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, job: TranscodeJob<'_>) -> AppResult<()> {
        let args = self.args(&job);
        debug!("执行转码: {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| TranscodeError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::NonZeroExit {
                code: output.status.code(),
                stderr: tail(&stderr, STDERR_TAIL_CHARS),
            }
            .into());
        }

        if !tokio::fs::try_exists(job.output).await.unwrap_or(false) {
            return Err(TranscodeError::OutputMissing {
                path: job.output.to_path_buf(),
            }
            .into());
        }

        Ok(())
    }
}

/// 秒数格式化：整数秒不带小数点
fn format_seconds(duration: Duration) -> String {
    format!("{}", duration.as_secs_f64())
}

fn tail(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    if count > max_chars {
        text.chars().skip(count - max_chars).collect()
    } else {
        text.to_string()
    }
}
