pub mod artifact;
pub mod demo;
pub mod metrics;

pub use artifact::{VideoArtifact, RAW_VIDEO_PREFIX};
pub use demo::{DemoDescriptor, DEMOS};
pub use metrics::PageMetrics;
