//! 演示录制流程 - 流程层
//!
//! 核心职责：定义"一个演示"的完整处理流程
//!
//! 流程顺序：
//! 1. 打开录制上下文
//! 2. 滚动录制（出错只记录，不中断）
//! 3. 关闭上下文（录像在这里写入磁盘）
//! 4. 整理本次录制产生的视频文件（裁剪转码）

use tracing::{error, info, warn};

use crate::browser::{BrowserSession, RecordingContext, ScrollPage};
use crate::config::RecordingConfig;
use crate::infrastructure::Transcoder;
use crate::models::DemoDescriptor;
use crate::services::{capture_still, record_scroll_video, FinalizeOutcome, VideoFinalizer};
use crate::workflow::demo_report::{DemoReport, DemoStatus};

/// 演示录制流程
///
/// - 不持有浏览器（由编排层传入）
/// - 每个步骤的错误都转成 `DemoReport`，不向上抛出
pub struct DemoFlow<'a, T: Transcoder> {
    config: &'a RecordingConfig,
    finalizer: VideoFinalizer<'a, T>,
}

impl<'a, T: Transcoder> DemoFlow<'a, T> {
    pub fn new(config: &'a RecordingConfig, transcoder: &'a T) -> Self {
        let finalizer = VideoFinalizer::new(&config.output_dir, config.trim_start, transcoder);
        Self { config, finalizer }
    }

    /// 录制一个演示
    ///
    /// # 参数
    /// - `session`: 共享的浏览器会话
    /// - `demo`: 要录制的演示
    ///
    /// # 返回
    /// 该演示的处理报告。录制出错时仍会关闭上下文并整理已经录到的画面，
    /// 但报告状态以第一个出错的步骤为准。
    pub async fn run<S: BrowserSession>(&self, session: &S, demo: &DemoDescriptor) -> DemoReport {
        info!("\n{} 🎬 开始录制", demo);

        let context = match session.open_context(self.config).await {
            Ok(context) => context,
            Err(e) => {
                error!("{} ❌ 无法创建录制上下文: {}", demo, e);
                return DemoReport::failed(*demo, e);
            }
        };

        let recorded = record_scroll_video(context.page(), demo, self.config).await;
        if let Err(e) = &recorded {
            error!("{} ❌ 录制出错: {}", demo, e);
        }

        // 无论录制是否成功都要关闭上下文，录像在这里写入磁盘
        let closed = context.close().await;
        let raw = match &closed {
            Ok(raw) => raw.clone(),
            Err(e) => {
                error!("{} ❌ 关闭录制上下文失败: {}", demo, e);
                None
            }
        };

        let finalized = self.finalizer.finalize(demo.name, raw.as_deref()).await;
        match &finalized {
            Err(e) => error!("{} ❌ 整理视频失败: {}", demo, e),
            Ok(FinalizeOutcome::Finalized(path)) if recorded.is_err() || closed.is_err() => {
                warn!("{} ⚠️ 已保存不完整的录像: {}", demo, path.display());
            }
            Ok(_) => {}
        }

        let status = match (recorded, closed, finalized) {
            (Err(e), _, _) | (Ok(_), Err(e), _) | (Ok(_), Ok(_), Err(e)) => {
                DemoStatus::Failed(e.to_string())
            }
            (Ok(_), Ok(_), Ok(FinalizeOutcome::Finalized(path))) => DemoStatus::Saved(path),
            (Ok(_), Ok(_), Ok(FinalizeOutcome::NoRawVideo)) => {
                warn!("{} ⚠️ 没有找到录像文件", demo);
                DemoStatus::NoVideo
            }
        };

        DemoReport::new(*demo, status)
    }

    /// 截取一个演示的静态预览图
    pub async fn run_still<S: BrowserSession>(
        &self,
        session: &S,
        demo: &DemoDescriptor,
    ) -> DemoReport {
        let page = match session.open_page(self.config.still_viewport).await {
            Ok(page) => page,
            Err(e) => {
                error!("{} ❌ 无法打开页面: {}", demo, e);
                return DemoReport::failed(*demo, e);
            }
        };

        let captured = capture_still(&page, demo, self.config).await;

        if let Err(e) = page.close().await {
            warn!("{} 关闭页面失败: {}", demo, e);
        }

        match captured {
            Ok(path) => DemoReport::new(*demo, DemoStatus::Saved(path)),
            Err(e) => {
                error!("{} ❌ 截图失败: {}", demo, e);
                DemoReport::failed(*demo, e)
            }
        }
    }
}
