pub mod dev_server;
pub mod js_executor;
pub mod transcoder;

pub use js_executor::JsExecutor;
pub use transcoder::{FfmpegTranscoder, TranscodeJob, Transcoder};
