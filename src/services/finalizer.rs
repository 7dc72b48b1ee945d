//! 视频整理服务 - 业务能力层
//!
//! 上下文关闭后：原始录像 → 改名为临时文件 → 调用转码器裁剪 → 删除临时文件

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, FileError};
use crate::infrastructure::{TranscodeJob, Transcoder};
use crate::models::VideoArtifact;

/// 整理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// 已生成最终文件
    Finalized(PathBuf),
    /// 本次录制没有产生原始录像，什么也没做
    NoRawVideo,
}

/// 视频整理服务
pub struct VideoFinalizer<'a, T: Transcoder> {
    output_dir: &'a Path,
    trim_start: Duration,
    transcoder: &'a T,
}

impl<'a, T: Transcoder> VideoFinalizer<'a, T> {
    pub fn new(output_dir: &'a Path, trim_start: Duration, transcoder: &'a T) -> Self {
        Self {
            output_dir,
            trim_start,
            transcoder,
        }
    }

    /// 整理某个演示的录像
    ///
    /// # 参数
    /// - `name`: 演示名称，决定临时文件和最终文件的名字
    /// - `raw`: 录制上下文关闭时报告的原始录像，`None` 表示没有录到画面
    ///
    /// # 返回
    /// 转码失败时错误会返回给调用方，但临时文件无论如何都会被删除。
    /// 输出目录里其他的原始录像（之前中断的运行留下的）只记录警告，不会被使用。
    pub async fn finalize(&self, name: &str, raw: Option<&Path>) -> AppResult<FinalizeOutcome> {
        for stale in stale_raw_videos(self.output_dir, raw).await? {
            warn!("⚠️ 发现多余的原始录像（未处理）: {}", stale.display());
        }

        let Some(raw) = raw else {
            debug!("[演示 {}] 本次没有录到画面", name);
            return Ok(FinalizeOutcome::NoRawVideo);
        };
        if !fs::try_exists(raw).await? {
            warn!("[演示 {}] 原始录像不存在: {}", name, raw.display());
            return Ok(FinalizeOutcome::NoRawVideo);
        }

        let artifact = VideoArtifact::for_demo(self.output_dir, name);

        remove_if_exists(&artifact.temp).await?;
        fs::rename(raw, &artifact.temp)
            .await
            .map_err(|source| FileError::RenameFailed {
                from: raw.to_path_buf(),
                to: artifact.temp.clone(),
                source,
            })?;

        remove_if_exists(&artifact.final_path).await?;

        info!("[演示 {}] 裁掉开头 {:?}...", name, self.trim_start);
        let job = TranscodeJob {
            input: &artifact.temp,
            output: &artifact.final_path,
            trim_start: self.trim_start,
        };
        let transcoded = self.transcoder.transcode(job).await;

        if let Err(e) = remove_if_exists(&artifact.temp).await {
            warn!("[演示 {}] ⚠️ 清理临时文件失败: {}", name, e);
        }

        transcoded?;

        let final_path = artifact.final_path;
        info!("[演示 {}] ✓ 已保存: {}", name, final_path.display());
        Ok(FinalizeOutcome::Finalized(final_path))
    }
}

/// 列出输出目录中除 `current` 以外的原始录像，最近修改的排在前面
pub async fn stale_raw_videos(
    output_dir: &Path,
    current: Option<&Path>,
) -> AppResult<Vec<PathBuf>> {
    let read_dir_failed = |source| FileError::ReadDirFailed {
        path: output_dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(output_dir).await.map_err(read_dir_failed)?;
    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_failed)? {
        let file_name = entry.file_name();
        if !VideoArtifact::is_raw_name(&file_name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        if current.is_some_and(|current| current == path) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((modified, path));
    }

    candidates.sort_by(|a, b| b.cmp(a));
    Ok(candidates.into_iter().map(|(_, path)| path).collect())
}

async fn remove_if_exists(path: &Path) -> AppResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::delete_failed(path, e)),
    }
}
