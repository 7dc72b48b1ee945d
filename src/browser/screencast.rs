//! 屏幕录制
//!
//! 通过 DevTools 的 `Page.startScreencast` 获取 JPEG 画面帧，按固定帧率写入
//! ffmpeg 的标准输入，编码成原始录像文件（`video-*.webm`）。

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chromiumoxide::cdp::browser_protocol::page::{
    EventScreencastFrame, ScreencastFrameAckParams, StartScreencastFormat, StartScreencastParams,
    StopScreencastParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::Viewport;
use crate::error::{AppError, AppResult};

const FRAME_QUALITY: i64 = 90;
const RAW_BITRATE: &str = "4M";

/// 正在进行的一次录制
pub struct ScreencastRecorder {
    output: PathBuf,
    stop_tx: Option<oneshot::Sender<()>>,
    pump: JoinHandle<AppResult<u64>>,
}

impl ScreencastRecorder {
    /// 开始录制
    ///
    /// 后台任务负责确认每一帧、保留最新画面，并按 `fps` 的节奏把最新画面写给编码器，
    /// 这样画面静止时录像也保持正常时长。
    pub async fn start(
        page: &Page,
        output: PathBuf,
        size: Viewport,
        encoder: &Path,
        fps: u32,
    ) -> AppResult<Self> {
        let mut frames = page.event_listener::<EventScreencastFrame>().await?;

        debug!("启动编码器: {}", encoder.display());
        let mut child = Command::new(encoder)
            .args(raw_encoder_args(fps, size, &output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| encoder_failed("无法启动编码器", e))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::recording_failed("无法获取编码器 stdin"))?;

        page.execute(StartScreencastParams {
            format: Some(StartScreencastFormat::Jpeg),
            quality: Some(FRAME_QUALITY),
            max_width: Some(i64::from(size.width)),
            max_height: Some(i64::from(size.height)),
            every_nth_frame: Some(1),
        })
        .await?;
        debug!("开始录制: {}", output.display());

        let ack_page = page.clone();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let pump = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            let mut latest: Option<Vec<u8>> = None;
            let mut written: u64 = 0;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    frame = frames.next() => match frame {
                        Some(frame) => {
                            let ack = ScreencastFrameAckParams::new(frame.session_id);
                            if let Err(e) = ack_page.execute(ack).await {
                                debug!("确认画面帧失败: {}", e);
                            }
                            match decode_frame(frame.data.as_ref()) {
                                Ok(bytes) => latest = Some(bytes),
                                Err(e) => warn!("画面帧解码失败: {}", e),
                            }
                        }
                        None => break,
                    },
                    _ = ticker.tick() => {
                        if let Some(bytes) = &latest {
                            stdin
                                .write_all(bytes)
                                .await
                                .map_err(|e| encoder_failed("写入编码器失败", e))?;
                            written += 1;
                        }
                    }
                }
            }

            // 关闭 stdin，编码器收到 EOF 后写完文件退出
            drop(stdin);
            let status = child
                .wait()
                .await
                .map_err(|e| encoder_failed("等待编码器退出失败", e))?;

            if !status.success() && written > 0 {
                return Err(AppError::recording_failed(format!(
                    "编码器退出码异常: {:?}",
                    status.code()
                )));
            }

            Ok::<u64, AppError>(written)
        });

        Ok(Self {
            output,
            stop_tx: Some(stop_tx),
            pump,
        })
    }

    /// 原始录像的输出路径
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// 停止录制并等待编码器写完文件
    ///
    /// 返回写入的帧数；没有任何画面时不会生成文件。
    pub async fn stop(mut self, page: &Page) -> AppResult<u64> {
        if let Err(e) = page.execute(StopScreencastParams::default()).await {
            debug!("停止 screencast 失败: {}", e);
        }
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        let written = self
            .pump
            .await
            .map_err(|e| encoder_failed("录制任务异常结束", e))??;

        if written == 0 {
            warn!("⚠️ 没有录到任何画面: {}", self.output.display());
            // 编码器可能留下空文件
            if let Err(e) = tokio::fs::remove_file(&self.output).await {
                debug!("没有需要清理的原始录像: {}", e);
            }
        } else {
            debug!("录制结束，共 {} 帧: {}", written, self.output.display());
        }

        Ok(written)
    }
}

fn encoder_failed(action: &str, e: impl std::fmt::Display) -> AppError {
    AppError::recording_failed(format!("{}: {}", action, e))
}

/// 原始录像编码参数：从 stdin 读取 JPEG 序列，编码为 VP8 webm
fn raw_encoder_args(fps: u32, size: Viewport, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "image2pipe".into(),
        "-framerate".into(),
        fps.to_string().into(),
        "-c:v".into(),
        "mjpeg".into(),
        "-i".into(),
        "-".into(),
        "-an".into(),
        "-vf".into(),
        format!("scale={}:{}", size.width, size.height).into(),
        "-c:v".into(),
        "libvpx".into(),
        "-b:v".into(),
        RAW_BITRATE.into(),
        "-deadline".into(),
        "realtime".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        output.into(),
    ]
}

/// screencast 画面帧是 base64 编码的 JPEG
fn decode_frame(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}
