//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"和录制流程需要的页面能力

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout as with_timeout, Instant};
use tracing::debug;

use crate::browser::ScrollPage;
use crate::error::{AppError, AppResult, BrowserError};
use crate::models::PageMetrics;
use crate::utils::eased_scroll_script;

/// 网络状态轮询间隔
const NETWORK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 整页截图质量
const STILL_QUALITY: i64 = 85;

const NETWORK_STATE_JS: &str = r#"({
    readyState: document.readyState,
    resources: performance.getEntriesByType('resource').length
})"#;

const METRICS_JS: &str = r#"({
    scrollHeight: (document.body || document.documentElement).scrollHeight,
    viewportHeight: window.innerHeight
})"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkState {
    ready_state: String,
    resources: u64,
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识演示列表，不处理录制流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码，返回 Promise 时等待其完成
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    ///
    /// # 返回
    /// 结果与 `T` 的结构不符时返回脚本错误
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 等待网络空闲
    ///
    /// 文档加载完成，并且资源请求数量在 `idle_window` 内没有变化。
    ///
    /// # 参数
    /// - `idle_window`: 资源数量需要保持不变的时长
    ///
    /// 本身不设超时，由调用方（`navigate`）限定总时长。
    pub async fn wait_for_network_idle(&self, idle_window: Duration) -> AppResult<()> {
        let mut last_count: Option<u64> = None;
        let mut quiet_since = Instant::now();

        loop {
            let state: NetworkState = self.eval_as(NETWORK_STATE_JS).await?;

            if state.ready_state != "complete" || last_count != Some(state.resources) {
                last_count = Some(state.resources);
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= idle_window {
                debug!("网络空闲，资源数: {}", state.resources);
                return Ok(());
            }

            sleep(NETWORK_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ScrollPage for JsExecutor {
    async fn navigate(&self, url: &str, timeout: Duration, idle_window: Duration) -> AppResult<()> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| AppError::navigation_failed(url, e))?;
            self.wait_for_network_idle(idle_window).await
        };

        match with_timeout(timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::NavigationTimedOut {
                url: url.to_string(),
                timeout,
            }
            .into()),
        }
    }

    async fn scroll_to_top(&self) -> AppResult<()> {
        self.eval("window.scrollTo(0, 0); window.scrollY").await?;
        Ok(())
    }

    async fn measure(&self) -> AppResult<PageMetrics> {
        self.eval_as(METRICS_JS).await
    }

    async fn animate_scroll(&self, distance: i64, duration: Duration) -> AppResult<f64> {
        self.eval_as(eased_scroll_script(distance, duration)).await
    }

    async fn capture_full_page(&self, path: &Path) -> AppResult<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Webp)
            .quality(STILL_QUALITY)
            .full_page(true)
            .build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }

    async fn close(self) -> AppResult<()> {
        self.page.close().await?;
        Ok(())
    }
}
