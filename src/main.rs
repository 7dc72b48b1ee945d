use std::process::ExitCode;

use anyhow::Result;
use record_scroll_videos::utils::logging;
use record_scroll_videos::{App, RecordingConfig, DEMOS};
use tracing::error;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = RecordingConfig::from_env();

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run(DEMOS).await?;

    if summary.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("有 {} 个任务失败，请检查输出目录", summary.failed());
        Ok(ExitCode::FAILURE)
    }
}
