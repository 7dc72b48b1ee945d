use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::config::RecordingConfig;
use crate::error::{AppResult, BrowserError};

/// 启动浏览器
///
/// 默认显示浏览器窗口，便于直接观察录制过程；`headless` 为 true 时使用新版无头模式。
///
/// # 返回
/// 浏览器和后台事件处理任务
pub async fn launch_browser(config: &RecordingConfig) -> AppResult<(Browser, JoinHandle<()>)> {
    let mode = if config.headless {
        "无头模式"
    } else {
        "可见窗口"
    };
    info!("🚀 启动浏览器 ({})...", mode);

    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport.width, config.viewport.height)
        .args(vec![
            "--hide-scrollbars",       // 录像里不出现滚动条
            "--mute-audio",
            "--disable-dev-shm-usage", // 防止共享内存不足
        ]);

    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &config.chrome_executable {
        debug!("使用指定的浏览器: {}", executable.display());
        builder = builder.chrome_executable(executable);
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: e.into() }
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed {
            source: Box::new(e),
        }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            // 个别 CDP 消息解析失败不影响后续事件
            if let Err(e) = h {
                debug!("浏览器事件处理出错: {}", e);
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    Ok((browser, handler_task))
}
