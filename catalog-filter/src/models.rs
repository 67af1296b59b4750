use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utils_common::models::{Comment, Resource};

/// 快照格式版本
pub const INDEX_VERSION: [u8; 2] = [1, 0];

/// 目录索引 - 存储所有资源、评论和筛选项
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CatalogIndex {
    /// 所有资源
    pub resources: Vec<Resource>,
    /// 所有评论
    pub comments: Vec<Comment>,
    /// 各分类字段的可选值
    pub facets: Facets,
    /// 索引创建时间
    #[serde(with = "utils_common::models::date_format")]
    pub created_at: DateTime<Utc>,
}

/// 筛选下拉框的可选值（去重、排序）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub years: Vec<String>,
    pub semesters: Vec<String>,
    pub subjects: Vec<String>,
    pub exam_types: Vec<String>,
    pub file_types: Vec<String>,
}

impl Facets {
    pub fn from_resources(resources: &[Resource]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values
                .filter(|v| !v.is_empty())
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        Self {
            years: distinct(resources.iter().map(|r| &r.year)),
            semesters: distinct(resources.iter().map(|r| &r.semester)),
            subjects: distinct(resources.iter().map(|r| &r.subject)),
            exam_types: distinct(resources.iter().map(|r| &r.exam_type)),
            file_types: distinct(resources.iter().map(|r| &r.file_type)),
        }
    }
}

/// 首页统计
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_resources: usize,
    pub total_downloads: u64,
    pub total_likes: u64,
}

/// 新评论
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub resource_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}
