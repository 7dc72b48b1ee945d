//! 视频文件在磁盘上的三种名字
//!
//! raw（录制引擎生成，`video-*.webm`）→ temp（`temp-<name>.webm`）→ final（`<name>-scroll.webm`）

use std::path::{Path, PathBuf};

/// 录制引擎生成的原始视频前缀
pub const RAW_VIDEO_PREFIX: &str = "video-";

const VIDEO_EXTENSION: &str = "webm";

/// 某个演示在输出目录中的文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    pub temp: PathBuf,
    pub final_path: PathBuf,
}

impl VideoArtifact {
    pub fn for_demo(output_dir: &Path, name: &str) -> Self {
        let temp_name = format!("temp-{}.{}", name, VIDEO_EXTENSION);
        let final_name = format!("{}-scroll.{}", name, VIDEO_EXTENSION);
        Self {
            temp: output_dir.join(temp_name),
            final_path: output_dir.join(final_name),
        }
    }

    /// 为新录像生成原始文件路径
    pub fn raw_path(output_dir: &Path) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S-%3f");
        let file_name = format!("{}{}.{}", RAW_VIDEO_PREFIX, stamp, VIDEO_EXTENSION);
        output_dir.join(file_name)
    }

    /// 判断文件名是否是原始录像（`video-` 前缀且扩展名为 webm）
    pub fn is_raw_name(file_name: &str) -> bool {
        let is_webm = Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == VIDEO_EXTENSION);
        file_name.starts_with(RAW_VIDEO_PREFIX) && is_webm
    }
}
