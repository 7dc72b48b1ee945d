use serde::Deserialize;

/// 页面尺寸信息（从浏览器读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    /// 文档总高度
    pub scroll_height: i64,
    /// 视口高度
    pub viewport_height: i64,
}

impl PageMetrics {
    /// 需要滚动的距离；页面比视口短时为 0 或负数
    pub fn scroll_distance(&self) -> i64 {
        self.scroll_height - self.viewport_height
    }
}
