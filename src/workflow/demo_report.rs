//! 单个演示的处理结果

use std::fmt::Display;
use std::path::PathBuf;

use crate::models::DemoDescriptor;

/// 处理状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoStatus {
    /// 已生成输出文件
    Saved(PathBuf),
    /// 流程没有报错，但没有产生录像
    NoVideo,
    /// 失败（错误信息）
    Failed(String),
}

/// 单个演示的处理报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub demo: DemoDescriptor,
    pub status: DemoStatus,
}

impl DemoReport {
    pub fn new(demo: DemoDescriptor, status: DemoStatus) -> Self {
        Self { demo, status }
    }

    pub fn failed(demo: DemoDescriptor, error: impl Display) -> Self {
        Self::new(demo, DemoStatus::Failed(error.to_string()))
    }

    /// 只有生成了输出文件才算成功
    pub fn is_success(&self) -> bool {
        matches!(self.status, DemoStatus::Saved(_))
    }
}

impl Display for DemoReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.status {
            DemoStatus::Saved(path) => write!(f, "✅ {} -> {}", self.demo.name, path.display()),
            DemoStatus::NoVideo => write!(f, "⚠️ {} -> 没有生成录像", self.demo.name),
            DemoStatus::Failed(reason) => write!(f, "❌ {} -> {}", self.demo.name, reason),
        }
    }
}
