//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整个录制批次的调度，是唯一持有浏览器会话的模块。
//!
//! ### `batch_recorder` - 批量录制器
//! - 准备输出目录，检查开发服务器
//! - 启动并最终关闭浏览器
//! - 按顺序逐个录制演示（不并发，避免资源争用，日志也更清晰）
//! - 汇总每个演示的结果，决定退出码
//!
//! ## 层次关系
//!
//! ```text
//! batch_recorder (处理演示列表)
//!     ↓
//! workflow::DemoFlow (处理单个演示)
//!     ↓
//! services (能力层：scroll_driver / finalizer / stills)
//!     ↓
//! browser + infrastructure (浏览器会话、JsExecutor、转码器)
//! ```

pub mod batch_recorder;

pub use batch_recorder::{App, RunSummary};
