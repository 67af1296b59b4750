use serde::{Serialize, Serializer};
use crate::query::QueryResult;

/// 默认显示的页码按钮数量
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// 省略号
pub const GAP: &str = "…";

/// 页码按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Gap,
}

// 页码序列化为数字，省略号序列化为 "…"
impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Gap => serializer.serialize_str(GAP),
        }
    }
}

/// 计算当前页附近要显示的页码
///
/// 只有一页时返回空序列。窗口宽度为 `min(max_visible, total_pages)`，以当前页为中心，
/// 不越过首尾；窗口没有覆盖到首页/尾页时补上首页/尾页，中间有间隔时插入省略号。
pub fn page_window(current_page: usize, total_pages: usize, max_visible: usize) -> Vec<PageMarker> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let width = max_visible.max(1).min(total_pages);
    let current = current_page.clamp(1, total_pages);

    let mut start = current.saturating_sub(width / 2).max(1);
    let end = (start + width - 1).min(total_pages);
    if end - start + 1 < width {
        start = (end + 1).saturating_sub(width).max(1);
    }

    let mut markers = Vec::with_capacity(width + 4);

    if start > 1 {
        markers.push(PageMarker::Page(1));
        if start > 2 {
            markers.push(PageMarker::Gap);
        }
    }

    markers.extend((start..=end).map(PageMarker::Page));

    if end < total_pages {
        if end < total_pages - 1 {
            markers.push(PageMarker::Gap);
        }
        markers.push(PageMarker::Page(total_pages));
    }

    markers
}

/// 分页控件的渲染数据
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// 当前页第一条的序号（从1开始，无结果时为0）
    pub first_item: usize,
    /// 当前页最后一条的序号
    pub last_item: usize,
    pub matched_count: usize,
    pub markers: Vec<PageMarker>,
}

impl Pagination {
    pub fn from_result(result: &QueryResult, max_visible: usize) -> Self {
        let first_item = if result.matched_count == 0 {
            0
        } else {
            (result.page - 1) * result.page_size + 1
        };
        let last_item = (result.page * result.page_size).min(result.matched_count);

        Self {
            page: result.page,
            total_pages: result.total_pages,
            has_previous: result.page > 1,
            has_next: result.page < result.total_pages,
            first_item,
            last_item,
            matched_count: result.matched_count,
            markers: page_window(result.page, result.total_pages, max_visible),
        }
    }

    /// 例如 "Showing 13-24 of 40 resources"
    pub fn summary(&self) -> String {
        format!(
            "Showing {}-{} of {} resources",
            self.first_item, self.last_item, self.matched_count
        )
    }
}
