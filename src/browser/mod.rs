//! 浏览器层
//!
//! 定义录制流程依赖的三个能力接口，以及基于 chromiumoxide 的实现：
//!
//! - `BrowserSession` - 整个运行期间共享的一个浏览器进程
//! - `RecordingContext` - 每个演示一个隔离的浏览器上下文，负责录制一个原始视频
//! - `ScrollPage` - 录制流程对页面的全部操作

pub mod context;
pub mod launch;
pub mod screencast;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{RecordingConfig, Viewport};
use crate::error::AppResult;
use crate::models::PageMetrics;

pub use context::{ChromeContext, ChromeSession};
pub use launch::launch_browser;
pub use screencast::ScreencastRecorder;

/// 录制流程对页面的操作
#[async_trait]
pub trait ScrollPage: Send + Sync {
    /// 导航并等待网络空闲，整个过程受 `timeout` 限制
    async fn navigate(&self, url: &str, timeout: Duration, idle_window: Duration) -> AppResult<()>;

    /// 滚动到页面顶部
    async fn scroll_to_top(&self) -> AppResult<()>;

    /// 读取文档高度和视口高度
    async fn measure(&self) -> AppResult<PageMetrics>;

    /// 执行平滑滚动，动画结束后返回最终的 scrollY
    async fn animate_scroll(&self, distance: i64, duration: Duration) -> AppResult<f64>;

    /// 保存整页截图
    async fn capture_full_page(&self, path: &Path) -> AppResult<()>;

    /// 关闭页面
    async fn close(self) -> AppResult<()>;
}

/// 单个演示的录制上下文
///
/// 关闭时录像才会被完整写入输出目录。
#[async_trait]
pub trait RecordingContext: Send + Sync {
    type Page: ScrollPage;

    fn page(&self) -> &Self::Page;

    /// 关闭上下文并写完录像
    ///
    /// # 返回
    /// 本次录制生成的原始录像路径；没有录到任何画面时返回 `None`
    async fn close(self) -> AppResult<Option<PathBuf>>;
}

/// 共享的浏览器会话
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Context: RecordingContext;
    type Page: ScrollPage;

    /// 打开一个开启录像的隔离上下文
    async fn open_context(&self, config: &RecordingConfig) -> AppResult<Self::Context>;

    /// 打开一个不录像的普通页面
    async fn open_page(&self, viewport: Viewport) -> AppResult<Self::Page>;

    async fn close(self) -> AppResult<()>;
}
