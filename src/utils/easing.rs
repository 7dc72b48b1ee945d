//! 平滑滚动曲线
//!
//! Rust 侧的缓动函数与注入页面的脚本使用同一条曲线（ease-in-out cubic）。

use std::time::Duration;

/// ease-in-out cubic：前半段加速，后半段减速
///
/// 输入会被限制在 [0, 1] 区间内。
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// 进度为 `progress` 时的滚动位置
pub fn scroll_offset(start_y: f64, distance: i64, progress: f64) -> f64 {
    start_y + distance as f64 * ease_in_out_cubic(progress)
}

/// 生成页面端的平滑滚动脚本
///
/// 脚本返回一个 Promise，动画结束（progress >= 1）时以最终的 scrollY resolve，
/// 调用方等待它即可知道滚动何时完成。
pub fn eased_scroll_script(distance: i64, duration: Duration) -> String {
    format!(
        r#"
        new Promise((resolve) => {{
            const scrollDistance = {distance};
            const duration = {duration_ms};
            const startTime = performance.now();
            const startY = window.scrollY;

            function easeInOutCubic(t) {{
                return t < 0.5 ? 4 * t * t * t : 1 - Math.pow(-2 * t + 2, 3) / 2;
            }}

            function scroll() {{
                const elapsed = performance.now() - startTime;
                const progress = duration > 0 ? Math.min(elapsed / duration, 1) : 1;
                window.scrollTo(0, startY + scrollDistance * easeInOutCubic(progress));

                if (progress < 1) {{
                    requestAnimationFrame(scroll);
                }} else {{
                    resolve(window.scrollY);
                }}
            }}

            scroll();
        }})
        "#,
        distance = distance,
        duration_ms = duration.as_millis(),
    )
}
