pub mod easing;
pub mod logging;

pub use easing::{ease_in_out_cubic, eased_scroll_script, scroll_offset};
