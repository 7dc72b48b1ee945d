//! 滚动录制驱动 - 业务能力层
//!
//! 只描述"一次滚动录制"的动作顺序，不关心上下文的创建与视频文件处理

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::browser::ScrollPage;
use crate::config::RecordingConfig;
use crate::error::AppResult;
use crate::models::{DemoDescriptor, PageMetrics};

/// 等待页面端滚动动画结束时，在动画时长之外额外允许的时间
const SCROLL_COMPLETION_GRACE: Duration = Duration::from_secs(1);

/// 一次滚动录制的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollReport {
    pub name: &'static str,
    pub metrics: PageMetrics,
    /// 动画结束时页面报告的 scrollY；等待超时时为 None
    pub final_scroll_y: Option<f64>,
}

/// 在页面上完成一次完整的滚动编排
///
/// 1. 导航并等待网络空闲
/// 2. 等待页面动画稳定
/// 3. 回到顶部并停留
/// 4. 平滑滚动到底部，等待动画完成信号
/// 5. 在底部停留
///
/// # 返回
/// 页面尺寸和动画结束时的滚动位置。导航、脚本执行出错时返回错误，
/// 动画超时只记录警告。
pub async fn record_scroll_video<P: ScrollPage>(
    page: &P,
    demo: &DemoDescriptor,
    config: &RecordingConfig,
) -> AppResult<ScrollReport> {
    let url = config.page_url(demo);
    info!("{} 正在加载 {}...", demo, demo.url);
    let idle = config.network_idle_window;
    page.navigate(&url, config.navigation_timeout, idle).await?;

    // 等待入场动画
    sleep(config.pre_scroll_wait).await;

    page.scroll_to_top().await?;

    info!("{} 在顶部停留 {:?}...", demo, config.top_pause);
    sleep(config.top_pause).await;

    let metrics = page.measure().await?;
    let distance = metrics.scroll_distance();
    info!(
        "{} 页面高度: {}px，滚动 {}px...",
        demo, metrics.scroll_height, distance
    );

    let bound = config.scroll_duration + SCROLL_COMPLETION_GRACE;
    let animation = page.animate_scroll(distance, config.scroll_duration);
    let final_scroll_y = match timeout(bound, animation).await {
        Ok(result) => Some(result?),
        Err(_) => {
            warn!("{} ⚠️ 滚动动画在 {:?} 内没有结束，继续录制", demo, bound);
            None
        }
    };

    sleep(config.bottom_pause).await;

    info!("{} 录制完成!", demo);
    Ok(ScrollReport {
        name: demo.name,
        metrics,
        final_scroll_y,
    })
}
