pub mod demo_flow;
pub mod demo_report;

pub use demo_flow::DemoFlow;
pub use demo_report::{DemoReport, DemoStatus};
