//! 批量录制器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建输出目录、检查开发服务器、启动浏览器
//! 2. **顺序录制**：逐个演示创建录制上下文，委托 `DemoFlow` 处理
//! 3. **故障隔离**：单个演示失败只记录结果，继续下一个
//! 4. **资源管理**：持有浏览器会话，运行结束后关闭
//! 5. **全局统计**：汇总所有演示的结果

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use crate::browser::{BrowserSession, ChromeSession};
use crate::config::RecordingConfig;
use crate::error::FileError;
use crate::infrastructure::{dev_server, FfmpegTranscoder, Transcoder};
use crate::models::DemoDescriptor;
use crate::utils::logging::{log_demo_progress, log_startup, print_final_stats};
use crate::workflow::{DemoFlow, DemoReport};

/// 应用主结构
pub struct App<S: BrowserSession, T: Transcoder> {
    config: RecordingConfig,
    session: S,
    transcoder: T,
}

impl App<ChromeSession, FfmpegTranscoder> {
    /// 初始化应用
    pub async fn initialize(config: RecordingConfig) -> Result<Self> {
        log_startup(&config);
        config.validate()?;

        dev_server::ensure_reachable(&config.base_url).await?;

        info!("\n正在启动浏览器...");
        let session = ChromeSession::launch(&config)
            .await
            .context("启动浏览器失败")?;

        let transcoder = FfmpegTranscoder::from_config(&config);

        Ok(Self::with_parts(config, session, transcoder))
    }
}

impl<S: BrowserSession, T: Transcoder> App<S, T> {
    /// 使用已有的浏览器会话和转码器组装应用
    pub fn with_parts(config: RecordingConfig, session: S, transcoder: T) -> Self {
        Self {
            config,
            session,
            transcoder,
        }
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `demos`: 按顺序录制的演示列表
    ///
    /// # 返回
    /// 每个演示的结果；浏览器在返回前关闭。配置无效或无法创建输出目录时直接返回错误。
    pub async fn run(self, demos: &[DemoDescriptor]) -> Result<RunSummary> {
        self.config.validate()?;
        ensure_output_dir(&self.config).await?;

        let flow = DemoFlow::new(&self.config, &self.transcoder);
        let mut summary = RunSummary::default();

        for (index, demo) in demos.iter().enumerate() {
            log_demo_progress(index + 1, demos.len(), demo);
            summary.videos.push(flow.run(&self.session, demo).await);
        }

        if self.config.capture_stills {
            info!("\n📸 开始截取静态预览图...");
            for demo in demos {
                let report = flow.run_still(&self.session, demo).await;
                summary.stills.push(report);
            }
        }

        drop(flow);
        if let Err(e) = self.session.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
        }

        print_final_stats(&summary, &self.config);

        Ok(summary)
    }
}

/// 运行汇总
#[derive(Debug, Default)]
pub struct RunSummary {
    pub videos: Vec<DemoReport>,
    pub stills: Vec<DemoReport>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.reports().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports().filter(|r| !r.is_success()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn reports(&self) -> impl Iterator<Item = &DemoReport> {
        self.videos.iter().chain(self.stills.iter())
    }
}

/// 确保输出目录存在（已存在不报错）
async fn ensure_output_dir(config: &RecordingConfig) -> Result<()> {
    fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| FileError::CreateDirFailed {
            path: config.output_dir.clone(),
            source,
        })?;
    Ok(())
}
