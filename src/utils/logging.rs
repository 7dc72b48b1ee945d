//! 日志工具模块
//!
//! 提供日志初始化和进度输出的辅助函数

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::RecordingConfig;
use crate::models::DemoDescriptor;
use crate::orchestrator::RunSummary;

/// 初始化日志输出
///
/// 默认级别 info，可以通过 `RUST_LOG` 调整。重复调用不会 panic。
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &RecordingConfig) {
    info!("{}", "=".repeat(50));
    info!("🎥 录制演示页面滚动视频");
    info!("{}", "=".repeat(50));
    info!("开发服务器: {}", config.base_url);
    info!("输出目录: {}", config.output_dir.display());
    info!(
        "视口: {}x{}，滚动时长: {:?}，裁剪开头: {:?}",
        config.viewport.width, config.viewport.height, config.scroll_duration, config.trim_start
    );
}

/// 记录单个演示开始
///
/// # 参数
/// - `index`: 从 1 开始的序号
/// - `total`: 演示总数
/// - `demo`: 当前演示
pub fn log_demo_progress(index: usize, total: usize, demo: &DemoDescriptor) {
    info!("\n{}", "─".repeat(50));
    info!(
        "📄 第 {}/{} 个演示: {} ({})",
        index, total, demo.name, demo.url
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 本次运行的汇总（录像和预览图）
/// - `config`: 用于显示输出目录
pub fn print_final_stats(summary: &RunSummary, config: &RecordingConfig) {
    info!("\n{}", "=".repeat(50));
    info!("📊 录制完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(50));
    for report in summary.reports() {
        if report.is_success() {
            info!("{}", report);
        } else {
            error!("{}", report);
        }
    }
    info!("{}", "=".repeat(50));
    info!("✅ 成功: {}", summary.succeeded());
    info!("❌ 失败: {}", summary.failed());
    info!("视频保存在: {}", config.output_dir.display());
    info!("{}", "=".repeat(50));
}
