use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::DemoDescriptor;

/// 视口尺寸（同时也是录制画面尺寸）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// 录制配置
///
/// 启动时创建一次，之后只读，以引用的形式传给各个组件。
#[derive(Clone, Debug)]
pub struct RecordingConfig {
    /// 开发服务器地址（需要事先启动）
    pub base_url: String,
    /// 视频输出目录
    pub output_dir: PathBuf,
    /// 浏览器视口
    pub viewport: Viewport,
    /// 静态预览图使用的视口（桌面尺寸）
    pub still_viewport: Viewport,
    /// 平滑滚动时长
    pub scroll_duration: Duration,
    /// 页面加载后等待动画稳定的时间
    pub pre_scroll_wait: Duration,
    /// 滚动前在顶部停留的时间
    pub top_pause: Duration,
    /// 滚动结束后在底部停留的时间
    pub bottom_pause: Duration,
    /// 转码时从开头裁掉的时长
    pub trim_start: Duration,
    /// 导航（含等待网络空闲）的超时时间
    pub navigation_timeout: Duration,
    /// 网络空闲判定窗口
    pub network_idle_window: Duration,
    /// 是否无头模式（默认显示浏览器，方便观察）
    pub headless: bool,
    /// 浏览器可执行文件，None 时由 chromiumoxide 自动查找
    pub chrome_executable: Option<PathBuf>,
    /// ffmpeg 可执行文件
    pub ffmpeg_path: PathBuf,
    pub video_codec: String,
    pub video_bitrate: String,
    /// 原始录像帧率
    pub recording_fps: u32,
    /// 是否额外生成整页静态预览图
    pub capture_stills: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            output_dir: PathBuf::from("public").join("previews"),
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            still_viewport: Viewport {
                width: 1280,
                height: 800,
            },
            scroll_duration: Duration::from_secs(6),
            pre_scroll_wait: Duration::from_secs(2),
            top_pause: Duration::from_secs(1),
            bottom_pause: Duration::from_secs(1),
            trim_start: Duration::from_secs(2),
            navigation_timeout: Duration::from_secs(30),
            network_idle_window: Duration::from_millis(500),
            headless: false,
            chrome_executable: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            video_codec: "libvpx".to_string(),
            video_bitrate: "1M".to_string(),
            recording_fps: 25,
            capture_stills: false,
        }
    }
}

impl RecordingConfig {
    /// 从环境变量读取配置，未设置或无法解析的值使用默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            viewport: Viewport {
                width: env_parse("VIEWPORT_WIDTH")
                    .unwrap_or(default.viewport.width),
                height: env_parse("VIEWPORT_HEIGHT")
                    .unwrap_or(default.viewport.height),
            },
            still_viewport: Viewport {
                width: env_parse("STILL_VIEWPORT_WIDTH")
                    .unwrap_or(default.still_viewport.width),
                height: env_parse("STILL_VIEWPORT_HEIGHT")
                    .unwrap_or(default.still_viewport.height),
            },
            scroll_duration: env_secs("SCROLL_DURATION_SECS")
                .unwrap_or(default.scroll_duration),
            pre_scroll_wait: env_secs("WAIT_BEFORE_SCROLL_SECS")
                .unwrap_or(default.pre_scroll_wait),
            top_pause: env_secs("PAUSE_AT_TOP_SECS").unwrap_or(default.top_pause),
            bottom_pause: env_secs("PAUSE_AT_BOTTOM_SECS")
                .unwrap_or(default.bottom_pause),
            trim_start: env_secs("TRIM_START_SECS").unwrap_or(default.trim_start),
            navigation_timeout: env_secs("NAVIGATION_TIMEOUT_SECS")
                .unwrap_or(default.navigation_timeout),
            network_idle_window: default.network_idle_window,
            headless: env_flag("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_PATH")
                .ok()
                .map(PathBuf::from)
                .or(default.chrome_executable),
            ffmpeg_path: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.ffmpeg_path),
            video_codec: default.video_codec,
            video_bitrate: default.video_bitrate,
            recording_fps: env_parse("RECORDING_FPS").unwrap_or(default.recording_fps),
            capture_stills: env_flag("CAPTURE_STILLS").unwrap_or(default.capture_stills),
        }
    }

    /// 检查配置是否能用于录制
    ///
    /// # 返回
    /// 地址为空、视口为零或帧率为零时返回 `AppError::Config`
    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("BASE_URL 不能为空".to_string()));
        }
        check_viewport("视口", self.viewport)?;
        check_viewport("预览图视口", self.still_viewport)?;
        if self.recording_fps == 0 {
            return Err(AppError::Config("RECORDING_FPS 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 拼接演示页面的完整地址
    pub fn page_url(&self, demo: &DemoDescriptor) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), demo.url)
    }
}

fn check_viewport(label: &str, viewport: Viewport) -> AppResult<()> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(AppError::Config(format!(
            "{}尺寸无效: {}x{}",
            label, viewport.width, viewport.height
        )));
    }
    Ok(())
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// 开关类变量：1/true/yes/on 为真，0/false/no/off 为假
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse::<f64>(name)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_recording_constants() {
        let config = RecordingConfig::default();
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(
            config.viewport,
            Viewport {
                width: 1280,
                height: 720
            }
        );
        assert_eq!(config.scroll_duration, Duration::from_secs(6));
        assert_eq!(config.pre_scroll_wait, Duration::from_secs(2));
        assert_eq!(config.top_pause, Duration::from_secs(1));
        assert_eq!(config.trim_start, Duration::from_secs(2));
        assert!(!config.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stills_use_desktop_viewport() {
        let config = RecordingConfig::default();
        assert_eq!(
            config.still_viewport,
            Viewport {
                width: 1280,
                height: 800
            }
        );
        assert_ne!(config.still_viewport, config.viewport);
    }

    #[test]
    fn test_page_url_joins_without_double_slash() {
        let demo = DemoDescriptor {
            name: "swiss",
            url: "/demo/swiss.html",
        };
        let mut config = RecordingConfig::default();
        assert_eq!(
            config.page_url(&demo),
            "http://localhost:4000/demo/swiss.html"
        );

        config.base_url = "http://127.0.0.1:3000/".to_string();
        assert_eq!(
            config.page_url(&demo),
            "http://127.0.0.1:3000/demo/swiss.html"
        );
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let zero_fps = RecordingConfig {
            recording_fps: 0,
            ..RecordingConfig::default()
        };
        assert!(matches!(zero_fps.validate(), Err(AppError::Config(_))));

        let flat = RecordingConfig {
            viewport: Viewport {
                width: 1280,
                height: 0,
            },
            ..RecordingConfig::default()
        };
        assert!(matches!(flat.validate(), Err(AppError::Config(_))));

        let no_url = RecordingConfig {
            base_url: "  ".to_string(),
            ..RecordingConfig::default()
        };
        assert!(matches!(no_url.validate(), Err(AppError::Config(_))));
    }
}
