//! 基于 chromiumoxide 的浏览器会话与录制上下文

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::launch::launch_browser;
use super::screencast::ScreencastRecorder;
use super::{BrowserSession, RecordingContext, ScrollPage};
use crate::config::{RecordingConfig, Viewport};
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::JsExecutor;
use crate::models::VideoArtifact;

/// 整个运行期间共享的浏览器进程
///
/// 每个录制上下文持有一份 `Arc<Browser>`，用于关闭时销毁自己的浏览器上下文。
pub struct ChromeSession {
    browser: Arc<Browser>,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(config: &RecordingConfig) -> AppResult<Self> {
        let (browser, handler_task) = launch_browser(config).await?;
        Ok(Self {
            browser: Arc::new(browser),
            handler_task,
        })
    }

    async fn new_page(
        &self,
        context_id: Option<BrowserContextId>,
        viewport: Viewport,
    ) -> AppResult<Page> {
        let mut params = CreateTargetParams::builder().url("about:blank");
        if let Some(context_id) = context_id {
            params = params.browser_context_id(context_id);
        }
        let params = params
            .build()
            .map_err(|e| BrowserError::ContextFailed { source: e.into() })?;

        let page = self
            .browser
            .new_page(params)
            .await
            .map_err(AppError::context_failed)?;

        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            1.0,
            false,
        ))
        .await
        .map_err(AppError::context_failed)?;

        Ok(page)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Context = ChromeContext;
    type Page = JsExecutor;

    async fn open_context(&self, config: &RecordingConfig) -> AppResult<ChromeContext> {
        let context_id = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(AppError::context_failed)?
            .result
            .browser_context_id;
        debug!("创建浏览器上下文: {:?}", context_id);

        let scoped = Some(context_id.clone());
        let page = match self.new_page(scoped, config.viewport).await {
            Ok(page) => page,
            Err(e) => {
                dispose_context(&self.browser, context_id).await;
                return Err(e);
            }
        };

        let raw_path = VideoArtifact::raw_path(&config.output_dir);
        let started = ScreencastRecorder::start(
            &page,
            raw_path,
            config.viewport,
            &config.ffmpeg_path,
            config.recording_fps,
        )
        .await;
        let recorder = match started {
            Ok(recorder) => recorder,
            Err(e) => {
                let _ = page.close().await;
                dispose_context(&self.browser, context_id).await;
                return Err(e);
            }
        };

        Ok(ChromeContext {
            browser: Arc::clone(&self.browser),
            context_id,
            executor: JsExecutor::new(page),
            recorder,
        })
    }

    async fn open_page(&self, viewport: Viewport) -> AppResult<JsExecutor> {
        let page = self.new_page(None, viewport).await?;
        Ok(JsExecutor::new(page))
    }

    async fn close(self) -> AppResult<()> {
        match Arc::try_unwrap(self.browser) {
            Ok(mut browser) => {
                browser.close().await?;
                if let Err(e) = browser.wait().await {
                    debug!("等待浏览器进程退出失败: {}", e);
                }
            }
            Err(_) => warn!("⚠️ 仍有录制上下文未关闭，浏览器进程将随程序退出"),
        }
        self.handler_task.abort();
        Ok(())
    }
}

/// 单个演示的隔离上下文，持有一个页面和一个录制任务
pub struct ChromeContext {
    browser: Arc<Browser>,
    context_id: BrowserContextId,
    executor: JsExecutor,
    recorder: ScreencastRecorder,
}

#[async_trait]
impl RecordingContext for ChromeContext {
    type Page = JsExecutor;

    fn page(&self) -> &JsExecutor {
        &self.executor
    }

    async fn close(self) -> AppResult<Option<PathBuf>> {
        let Self {
            browser,
            context_id,
            executor,
            recorder,
        } = self;

        // 先停止录制，保证原始录像在上下文销毁前写完
        let raw_path = recorder.output().to_path_buf();
        let recorded = recorder.stop(executor.page()).await;

        if let Err(e) = ScrollPage::close(executor).await {
            warn!("关闭页面失败: {}", e);
        }
        dispose_context(&browser, context_id).await;

        if recorded? == 0 {
            return Ok(None);
        }
        debug!("上下文已关闭，录像: {}", raw_path.display());
        Ok(Some(raw_path))
    }
}

async fn dispose_context(browser: &Browser, context_id: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams::new(context_id))
        .await
    {
        warn!("销毁浏览器上下文失败: {}", e);
    }
}
