//! 静态预览图服务 - 业务能力层
//!
//! 为演示页面保存整页 WebP 截图（`<name>-preview.webp`）

use std::path::PathBuf;

use tokio::time::sleep;
use tracing::info;

use crate::browser::ScrollPage;
use crate::config::RecordingConfig;
use crate::error::AppResult;
use crate::models::DemoDescriptor;

/// 预览图路径
pub fn still_path(config: &RecordingConfig, demo: &DemoDescriptor) -> PathBuf {
    let file_name = format!("{}-preview.webp", demo.name);
    config.output_dir.join(file_name)
}

/// 加载页面、等待动画稳定后保存整页截图
///
/// # 参数
/// - `page`: 已按预览图视口打开的页面
/// - `demo`: 要截图的演示
/// - `config`: 录制配置（地址、等待时间、输出目录）
///
/// # 返回
/// 保存的预览图路径
pub async fn capture_still<P: ScrollPage>(
    page: &P,
    demo: &DemoDescriptor,
    config: &RecordingConfig,
) -> AppResult<PathBuf> {
    info!("{} 📸 正在截取预览图...", demo);
    page.navigate(
        &config.page_url(demo),
        config.navigation_timeout,
        config.network_idle_window,
    )
    .await?;

    sleep(config.pre_scroll_wait).await;

    let path = still_path(config, demo);
    page.capture_full_page(&path).await?;
    info!("{} ✓ 预览图已保存: {}", demo, path.display());
    Ok(path)
}
