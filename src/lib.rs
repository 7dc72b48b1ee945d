//! # Record Scroll Videos
//!
//! 为作品集预览录制演示页面的平滑滚动视频
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure / Browser）
//! - `browser/` - 启动浏览器，创建隔离的录制上下文，用 screencast 录制原始视频
//! - `infrastructure/JsExecutor` - 唯一的 page owner，提供 eval() 和页面操作能力
//! - `infrastructure/transcoder` - 调用 ffmpeg 裁剪并重新编码
//!
//! ### ② 业务能力层（Services）
//! - `scroll_driver` - 加载页面、停顿、平滑滚动
//! - `finalizer` - 原始录像 → 临时文件 → 最终文件
//! - `stills` - 整页静态预览图
//!
//! ### ③ 流程层（Workflow）
//! - `DemoFlow` - 单个演示的完整流程（上下文 → 滚动 → 关闭 → 整理）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_recorder` - 持有浏览器，按顺序处理演示列表并汇总结果

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{BrowserSession, RecordingContext, ScrollPage};
pub use config::{RecordingConfig, Viewport};
pub use error::{AppError, AppResult};
pub use infrastructure::{FfmpegTranscoder, JsExecutor, TranscodeJob, Transcoder};
pub use models::{DemoDescriptor, PageMetrics, DEMOS};
pub use orchestrator::{App, RunSummary};
pub use workflow::{DemoFlow, DemoReport, DemoStatus};
