//! 资源目录查询：搜索 + 分类筛选 + 排序 + 分页
//!
//! `evaluate` 是纯函数：同样的输入总是得到同样的输出，不修改记录也不修改查询。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use utils_common::models::Resource;

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// 排序方式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// 上传时间从新到旧
    #[default]
    Newest,
    /// 上传时间从旧到新
    Oldest,
    /// 下载次数从多到少
    MostDownloaded,
    /// 点赞数从多到少
    MostLiked,
    /// 标题字母顺序
    Alphabetical,
    /// 不排序，保持输入顺序
    Unsorted,
}

impl SortKey {
    /// 解析排序参数，未知值不报错，退化为保持原顺序
    pub fn parse(raw: &str) -> Self {
        match raw {
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "most-downloaded" => SortKey::MostDownloaded,
            "most-liked" => SortKey::MostLiked,
            "alphabetical" => SortKey::Alphabetical,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::MostDownloaded => "most-downloaded",
            SortKey::MostLiked => "most-liked",
            SortKey::Alphabetical => "alphabetical",
            SortKey::Unsorted => "unsorted",
        }
    }
}

/// 分类筛选条件，`None` 或空字符串表示不限
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryFilters {
    pub year: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
    pub exam_type: Option<String>,
    pub file_type: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl CategoryFilters {
    /// 是否没有任何分类条件
    pub fn is_empty(&self) -> bool {
        [&self.year, &self.semester, &self.subject, &self.exam_type, &self.file_type]
            .into_iter()
            .all(|v| selected(v).is_none())
    }

    /// 精确匹配（区分大小写）
    pub fn matches(&self, resource: &Resource) -> bool {
        let checks = [
            (&self.year, &resource.year),
            (&self.semester, &resource.semester),
            (&self.subject, &resource.subject),
            (&self.exam_type, &resource.exam_type),
            (&self.file_type, &resource.file_type),
        ];

        checks
            .into_iter()
            .all(|(wanted, actual)| selected(wanted).map_or(true, |w| w == actual.as_str()))
    }
}

/// 一次查询的完整视图状态
///
/// 不可变值：页面每次交互都用 `with_*` 生成新的查询替换旧的。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub search: String,
    pub filters: CategoryFilters,
    pub sort: SortKey,
    pub page: usize,
    pub page_size: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: CategoryFilters::default(),
            sort: SortKey::Newest,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self { search: search.into(), ..self }
    }

    pub fn with_filters(self, filters: CategoryFilters) -> Self {
        Self { filters, ..self }
    }

    pub fn with_sort(self, sort: SortKey) -> Self {
        Self { sort, ..self }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }
}

/// 查询参数 - 页面传递的 JSON
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// 搜索关键词 (可选)
    pub search: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
    pub exam_type: Option<String>,
    pub file_type: Option<String>,
    /// 排序方式 (可选, 默认为 newest)
    pub sort: Option<String>,
    /// 当前页码 (可选, 默认为1)
    pub page: Option<usize>,
    /// 每页条数 (可选, 默认为12)
    pub limit: Option<usize>,
}

impl From<QueryParams> for Query {
    fn from(params: QueryParams) -> Self {
        Query {
            search: params.search.unwrap_or_default(),
            filters: CategoryFilters {
                year: params.year,
                semester: params.semester,
                subject: params.subject,
                exam_type: params.exam_type,
                file_type: params.file_type,
            },
            sort: params.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
            page: params.page.unwrap_or(1).max(1),
            page_size: params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        }
    }
}

/// 查询结果
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// 当前页的资源
    pub page_items: Vec<Resource>,
    /// 筛选后的总数（分页前）
    pub matched_count: usize,
    /// 实际使用的页码（已夹到有效范围）
    pub page: usize,
    /// 每页条数
    pub page_size: usize,
    /// 总页数，至少为1
    pub total_pages: usize,
}

/// 执行查询
pub fn evaluate(records: &[Resource], query: &Query) -> QueryResult {
    let needle = query.search.to_lowercase();
    let unfiltered = query.filters.is_empty();

    let mut matched: Vec<&Resource> = records
        .iter()
        .filter(|r| matches_search(r, &needle) && (unfiltered || query.filters.matches(r)))
        .collect();

    apply_sorting(&mut matched, query.sort);

    let page_size = query.page_size.max(1);
    let matched_count = matched.len();
    let total_pages = matched_count.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(matched_count);
    let end = (start + page_size).min(matched_count);

    QueryResult {
        page_items: matched[start..end].iter().map(|r| (*r).clone()).collect(),
        matched_count,
        page,
        page_size,
        total_pages,
    }
}

/// 关键词匹配：标题、描述、科目或任一标签包含关键词（不区分大小写）
///
/// `needle` 必须已经转为小写。
pub fn matches_search(resource: &Resource, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    resource.title.to_lowercase().contains(needle)
        || resource.description.to_lowercase().contains(needle)
        || resource.subject.to_lowercase().contains(needle)
        || resource.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

// 稳定排序，相同键保持输入顺序
fn apply_sorting(resources: &mut [&Resource], sort: SortKey) {
    match sort {
        SortKey::Newest => resources.sort_by(|a, b| b.upload_date.cmp(&a.upload_date)),
        SortKey::Oldest => resources.sort_by(|a, b| a.upload_date.cmp(&b.upload_date)),
        SortKey::MostDownloaded => resources.sort_by(|a, b| b.download_count.cmp(&a.download_count)),
        SortKey::MostLiked => resources.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::Alphabetical => resources.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::Unsorted => {}
    }
}

/// 近似浏览器 `localeCompare` 的标题比较
///
/// 依次比较：去掉重音并忽略大小写的基本字母；重音（无重音在前）；大小写（小写在前）。
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
        title
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
    }

    fn accented(title: &str) -> impl Iterator<Item = char> + '_ {
        title.nfkd().flat_map(char::to_lowercase)
    }

    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| b.cmp(a))
}
