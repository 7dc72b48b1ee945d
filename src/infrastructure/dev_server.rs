//! 开发服务器检查
//!
//! 录制前确认 `base_url` 上的服务器已经启动，避免启动浏览器后每个演示都导航失败。

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(5);

/// 检查开发服务器是否可达
///
/// 只要服务器返回任意 HTTP 响应就认为可达（首页 404 也算）。
///
/// # 参数
/// - `base_url`: 开发服务器地址
pub async fn ensure_reachable(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(PREFLIGHT_TIMEOUT)
        .build()
        .context("无法创建 HTTP 客户端")?;

    let response = client
        .get(base_url)
        .send()
        .await
        .with_context(|| format!("开发服务器不可达: {}（请先启动开发服务器）", base_url))?;

    debug!("开发服务器响应状态: {}", response.status());
    info!("✓ 开发服务器在线: {}", base_url);
    Ok(())
}
