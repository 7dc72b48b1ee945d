pub mod finalizer;
pub mod scroll_driver;
pub mod stills;

pub use finalizer::{FinalizeOutcome, VideoFinalizer};
pub use scroll_driver::{record_scroll_video, ScrollReport};
pub use stills::capture_still;
