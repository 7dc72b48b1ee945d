use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use record_scroll_videos::error::TranscodeError;
use record_scroll_videos::utils::{logging, scroll_offset};
use record_scroll_videos::{
    App, AppError, AppResult, BrowserSession, DemoDescriptor, DemoStatus, PageMetrics,
    RecordingConfig, RecordingContext, ScrollPage, TranscodeJob, Transcoder, Viewport,
};

const SWISS: DemoDescriptor = DemoDescriptor {
    name: "swiss",
    url: "/demo/swiss.html",
};

const BROKEN: DemoDescriptor = DemoDescriptor {
    name: "broken",
    url: "/demo/broken.html",
};

/// 模拟页面：导航到包含 "broken" 的地址会失败
struct StubPage {
    metrics: PageMetrics,
    scroll_y: Mutex<f64>,
    visited: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ScrollPage for StubPage {
    async fn navigate(&self, url: &str, _timeout: Duration, _idle: Duration) -> AppResult<()> {
        self.visited.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            let refused = ErrorKind::ConnectionRefused;
            let source = std::io::Error::new(refused, "net::ERR_FAILED");
            return Err(AppError::navigation_failed(url, source));
        }
        Ok(())
    }

    async fn scroll_to_top(&self) -> AppResult<()> {
        *self.scroll_y.lock().unwrap() = 0.0;
        Ok(())
    }

    async fn measure(&self) -> AppResult<PageMetrics> {
        Ok(self.metrics)
    }

    async fn animate_scroll(&self, distance: i64, _duration: Duration) -> AppResult<f64> {
        let max = self.metrics.scroll_distance().max(0) as f64;
        let mut y = self.scroll_y.lock().unwrap();
        *y = scroll_offset(*y, distance, 1.0).clamp(0.0, max);
        Ok(*y)
    }

    async fn capture_full_page(&self, path: &Path) -> AppResult<()> {
        std::fs::write(path, b"still")?;
        Ok(())
    }

    async fn close(self) -> AppResult<()> {
        Ok(())
    }
}

/// 模拟录制上下文：关闭时在输出目录写出一个原始录像
///
/// `raw_path` 为 None 时模拟什么都没录到的上下文。
struct StubContext {
    page: StubPage,
    raw_path: Option<PathBuf>,
}

#[async_trait]
impl RecordingContext for StubContext {
    type Page = StubPage;

    fn page(&self) -> &StubPage {
        &self.page
    }

    async fn close(self) -> AppResult<Option<PathBuf>> {
        if let Some(raw_path) = &self.raw_path {
            std::fs::write(raw_path, b"raw frames")?;
        }
        Ok(self.raw_path)
    }
}

struct StubSession {
    metrics: PageMetrics,
    visited: Arc<Mutex<Vec<String>>>,
    page_viewports: Arc<Mutex<Vec<Viewport>>>,
    contexts: AtomicUsize,
    silent: bool,
}

impl StubSession {
    fn new(scroll_height: i64, viewport_height: i64) -> Self {
        Self {
            metrics: PageMetrics {
                scroll_height,
                viewport_height,
            },
            visited: Arc::new(Mutex::new(Vec::new())),
            page_viewports: Arc::new(Mutex::new(Vec::new())),
            contexts: AtomicUsize::new(0),
            silent: false,
        }
    }

    /// 上下文关闭时不产生任何录像
    fn silent() -> Self {
        Self {
            silent: true,
            ..Self::new(2000, 720)
        }
    }

    fn page(&self) -> StubPage {
        StubPage {
            metrics: self.metrics,
            scroll_y: Mutex::new(0.0),
            visited: Arc::clone(&self.visited),
        }
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    type Context = StubContext;
    type Page = StubPage;

    async fn open_context(&self, config: &RecordingConfig) -> AppResult<StubContext> {
        let n = self.contexts.fetch_add(1, Ordering::SeqCst);
        let raw_path = if self.silent {
            None
        } else {
            Some(config.output_dir.join(format!("video-{}.webm", n)))
        };
        Ok(StubContext {
            page: self.page(),
            raw_path,
        })
    }

    async fn open_page(&self, viewport: Viewport) -> AppResult<StubPage> {
        self.page_viewports.lock().unwrap().push(viewport);
        Ok(self.page())
    }

    async fn close(self) -> AppResult<()> {
        Ok(())
    }
}

/// 把输入原样复制到输出
struct CopyTranscoder;

#[async_trait]
impl Transcoder for CopyTranscoder {
    async fn transcode(&self, job: TranscodeJob<'_>) -> AppResult<()> {
        tokio::fs::copy(job.input, job.output).await?;
        Ok(())
    }
}

struct FailingTranscoder;

#[async_trait]
impl Transcoder for FailingTranscoder {
    async fn transcode(&self, _job: TranscodeJob<'_>) -> AppResult<()> {
        Err(TranscodeError::NonZeroExit {
            code: Some(1),
            stderr: "Unknown encoder".to_string(),
        }
        .into())
    }
}

fn fast_config(output_dir: &Path) -> RecordingConfig {
    RecordingConfig {
        output_dir: output_dir.to_path_buf(),
        viewport: Viewport {
            width: 1280,
            height: 720,
        },
        scroll_duration: Duration::from_millis(10),
        pre_scroll_wait: Duration::ZERO,
        top_pause: Duration::ZERO,
        bottom_pause: Duration::ZERO,
        ..RecordingConfig::default()
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn read_final(output: &Path) -> Vec<u8> {
    std::fs::read(output.join("swiss-scroll.webm")).unwrap()
}

#[tokio::test]
async fn test_swiss_demo_produces_only_final_file() {
    logging::init();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("previews");
    let session = StubSession::new(2000, 720);

    let app = App::with_parts(fast_config(&output), session, CopyTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(
        summary.videos[0].status,
        DemoStatus::Saved(output.join("swiss-scroll.webm"))
    );
    assert_eq!(file_names(&output), vec!["swiss-scroll.webm"]);
    assert_eq!(read_final(&output), b"raw frames");
}

#[tokio::test]
async fn test_rerun_overwrites_existing_final_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let previous = output.join("swiss-scroll.webm");
    std::fs::write(&previous, b"previous run").unwrap();
    let session = StubSession::new(2000, 720);

    let app = App::with_parts(fast_config(&output), session, CopyTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(file_names(&output), vec!["swiss-scroll.webm"]);
    assert_eq!(read_final(&output), b"raw frames");
}

#[tokio::test]
async fn test_leftover_raw_video_is_not_saved_as_this_demo() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let leftover = output.join("video-crashed-run.webm");
    std::fs::write(&leftover, b"blueprint frames").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&leftover)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(24 * 3600))
        .unwrap();

    let session = StubSession::silent();
    let app = App::with_parts(fast_config(&output), session, CopyTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    assert_eq!(summary.videos[0].status, DemoStatus::NoVideo);
    assert!(!summary.all_succeeded());
    assert!(!output.join("swiss-scroll.webm").exists());
    assert_eq!(std::fs::read(&leftover).unwrap(), b"blueprint frames");
}

#[tokio::test]
async fn test_failing_demo_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let session = StubSession::new(2000, 720);
    let visited = Arc::clone(&session.visited);

    let app = App::with_parts(fast_config(&output), session, CopyTranscoder);
    let summary = app.run(&[BROKEN, SWISS]).await.unwrap();

    assert_eq!(summary.videos.len(), 2);
    let first = &summary.videos[0].status;
    assert!(matches!(first, DemoStatus::Failed(_)));
    assert!(summary.videos[1].is_success());
    assert_eq!(summary.failed(), 1);
    assert!(!summary.all_succeeded());

    assert_eq!(
        *visited.lock().unwrap(),
        vec![
            "http://localhost:4000/demo/broken.html".to_string(),
            "http://localhost:4000/demo/swiss.html".to_string(),
        ]
    );

    // 失败的演示仍会关闭上下文并整理录像，不会留下临时文件或原始录像
    for name in file_names(&output) {
        assert!(!name.starts_with("temp-"), "残留临时文件: {}", name);
        assert!(!name.starts_with("video-"), "残留原始录像: {}", name);
    }
    assert!(output.join("swiss-scroll.webm").exists());
}

#[tokio::test]
async fn test_navigation_error_is_reported_when_transcode_also_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let session = StubSession::new(2000, 720);

    let app = App::with_parts(fast_config(&output), session, FailingTranscoder);
    let summary = app.run(&[BROKEN]).await.unwrap();

    match &summary.videos[0].status {
        DemoStatus::Failed(reason) => {
            assert!(reason.contains("net::ERR_FAILED"), "{}", reason);
        }
        other => panic!("导航失败应该被报告，实际: {:?}", other),
    }
    // 转码失败时临时文件也要清理掉
    assert!(file_names(&output).is_empty());
}

#[tokio::test]
async fn test_transcoder_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let session = StubSession::new(2000, 720);

    let app = App::with_parts(fast_config(&output), session, FailingTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    match &summary.videos[0].status {
        DemoStatus::Failed(reason) => assert!(reason.contains("Unknown encoder")),
        other => panic!("转码失败应该被报告，实际: {:?}", other),
    }
    assert!(file_names(&output).is_empty());
}

#[tokio::test]
async fn test_short_page_still_records() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let session = StubSession::new(400, 720);

    let app = App::with_parts(fast_config(&output), session, CopyTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(file_names(&output), vec!["swiss-scroll.webm"]);
}

#[tokio::test]
async fn test_stills_are_captured_after_videos() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let config = RecordingConfig {
        capture_stills: true,
        ..fast_config(&output)
    };
    let session = StubSession::new(2000, 720);
    let page_viewports = Arc::clone(&session.page_viewports);

    let app = App::with_parts(config, session, CopyTranscoder);
    let summary = app.run(&[SWISS]).await.unwrap();

    assert_eq!(summary.stills.len(), 1);
    assert!(summary.all_succeeded());
    assert_eq!(
        file_names(&output),
        vec!["swiss-preview.webp", "swiss-scroll.webm"]
    );
    assert_eq!(
        *page_viewports.lock().unwrap(),
        vec![Viewport {
            width: 1280,
            height: 800
        }]
    );
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_recording() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().to_path_buf();
    let config = RecordingConfig {
        recording_fps: 0,
        ..fast_config(&output)
    };
    let session = StubSession::new(2000, 720);
    let visited = Arc::clone(&session.visited);

    let app = App::with_parts(config, session, CopyTranscoder);
    let result = app.run(&[SWISS]).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("RECORDING_FPS"), "{}", err);
    assert!(visited.lock().unwrap().is_empty());
    assert!(file_names(&output).is_empty());
}

/// 需要本机有 Chrome、ffmpeg，并且开发服务器已经启动
#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_record_single_demo_with_real_browser() {
    logging::init();

    let dir = tempfile::tempdir().unwrap();
    let config = RecordingConfig {
        output_dir: dir.path().to_path_buf(),
        headless: true,
        ..RecordingConfig::from_env()
    };

    let app = App::initialize(config).await.expect("初始化失败");
    let summary = app.run(&[SWISS]).await.expect("录制失败");

    assert!(summary.all_succeeded(), "录制应该成功: {:?}", summary);
    assert!(dir.path().join("swiss-scroll.webm").exists());
}
