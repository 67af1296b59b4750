//! 内存中的资源目录：浏览、详情、首页和上传页面都通过它读写数据

use chrono::{DateTime, Utc};
use std::io;
use utils_common::compression::{from_compressed, to_compressed};
use utils_common::models::{Comment, Resource, Uploader};
use utils_common::upload::{file_type_label, format_file_size, FieldErrors, UploadDraft};

use crate::models::{CatalogIndex, CatalogStats, Facets, NewComment, INDEX_VERSION};
use crate::query::{evaluate, Query, QueryResult, SortKey};

/// 首页热门资源数量
pub const POPULAR_COUNT: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
    comments: Vec<Comment>,
    facets: Facets,
}

impl From<CatalogIndex> for Catalog {
    fn from(index: CatalogIndex) -> Self {
        Self {
            resources: index.resources,
            comments: index.comments,
            facets: index.facets,
        }
    }
}

impl Catalog {
    pub fn new(resources: Vec<Resource>, comments: Vec<Comment>) -> Self {
        let facets = Facets::from_resources(&resources);
        Self { resources, comments, facets }
    }

    /// 从压缩快照恢复
    pub fn from_compressed(data: &[u8]) -> Result<Self, io::Error> {
        from_compressed::<CatalogIndex>(data).map(Catalog::from)
    }

    /// 重新编码为压缩快照，用于持久化
    pub fn to_compressed(&self) -> Result<Vec<u8>, io::Error> {
        let index = CatalogIndex {
            resources: self.resources.clone(),
            comments: self.comments.clone(),
            facets: self.facets.clone(),
            created_at: Utc::now(),
        };
        to_compressed(&index, INDEX_VERSION)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn query(&self, query: &Query) -> QueryResult {
        evaluate(&self.resources, query)
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// 资源的评论，按时间从早到晚
    pub fn comments_for(&self, resource_id: &str) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.resource_id == resource_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        comments
    }

    /// 下载次数加一，返回新的次数
    pub fn record_download(&mut self, id: &str) -> Option<u64> {
        let resource = self.resources.iter_mut().find(|r| r.id == id)?;
        resource.download_count = resource.download_count.saturating_add(1);
        Some(resource.download_count)
    }

    /// 点赞数加一，返回新的点赞数
    pub fn record_like(&mut self, id: &str) -> Option<u64> {
        let resource = self.resources.iter_mut().find(|r| r.id == id)?;
        resource.likes = resource.likes.saturating_add(1);
        Some(resource.likes)
    }

    /// 下载最多的前 `count` 个资源
    pub fn popular(&self, count: usize) -> Vec<Resource> {
        if count == 0 {
            return Vec::new();
        }
        let query = Query::new().with_sort(SortKey::MostDownloaded).with_page_size(count);
        self.query(&query).page_items
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_resources: self.resources.len(),
            total_downloads: self.resources.iter().map(|r| r.download_count).sum(),
            total_likes: self.resources.iter().map(|r| r.likes).sum(),
        }
    }

    // 以毫秒时间戳作为ID，冲突时追加序号
    fn next_id(&self, now: DateTime<Utc>, existing: impl Fn(&str) -> bool) -> String {
        let base = now.timestamp_millis().to_string();
        if !existing(&base) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !existing(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// 发布上传表单，校验失败时返回字段错误
    pub fn add_resource(
        &mut self,
        draft: &UploadDraft,
        uploader: &Uploader,
        now: DateTime<Utc>,
    ) -> Result<Resource, FieldErrors> {
        let errors = draft.validate();
        let file = match (&draft.file, errors.is_empty()) {
            (Some(file), true) => file,
            _ => return Err(errors),
        };

        let id = self.next_id(now, |candidate| self.resource(candidate).is_some());
        let resource = Resource {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            file_name: file.name.clone(),
            file_url: "#".to_string(),
            file_size: format_file_size(file.size),
            file_type: file_type_label(&file.mime_type).to_string(),
            year: draft.year.clone(),
            semester: draft.semester.clone(),
            subject: draft.subject.clone(),
            exam_type: draft.exam_type.clone(),
            uploader_id: uploader.id.clone(),
            uploader_name: uploader.name.clone(),
            upload_date: now,
            download_count: 0,
            likes: 0,
            is_approved: false,
            tags: draft.normalized_tags(),
        };

        self.resources.push(resource.clone());
        self.facets = Facets::from_resources(&self.resources);
        Ok(resource)
    }

    /// 添加评论，资源必须存在且内容不能为空
    pub fn add_comment(&mut self, new_comment: NewComment, now: DateTime<Utc>) -> Result<Comment, String> {
        if self.resource(&new_comment.resource_id).is_none() {
            return Err(format!("资源不存在: {}", new_comment.resource_id));
        }
        let content = new_comment.content.trim();
        if content.is_empty() {
            return Err("评论内容不能为空".to_string());
        }

        let id = self.next_id(now, |candidate| self.comments.iter().any(|c| c.id == candidate));
        let comment = Comment {
            id,
            resource_id: new_comment.resource_id,
            user_id: new_comment.user_id,
            user_name: new_comment.user_name,
            content: content.to_string(),
            timestamp: now,
            likes: 0,
            dislikes: 0,
            replies: Vec::new(),
        };

        self.comments.push(comment.clone());
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use utils_common::sample::{sample_comments, sample_resources};
    use utils_common::upload::{FileInfo, REQUIRED_MESSAGE};

    fn sample_catalog() -> Catalog {
        Catalog::new(sample_resources().unwrap(), sample_comments().unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    fn draft() -> UploadDraft {
        UploadDraft {
            title: " Compiler Design T3 ".to_string(),
            description: "Parsing and code generation".to_string(),
            year: "3rd Year".to_string(),
            semester: "Semester 6".to_string(),
            subject: "Compiler Design".to_string(),
            exam_type: "T3".to_string(),
            tags: vec!["Parsing".to_string(), "Parsing".to_string(), " ".to_string()],
            file: Some(FileInfo {
                name: "CD_T3.pptx".to_string(),
                mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation"
                    .to_string(),
                size: 1536,
            }),
            original_content: true,
            community_guidelines: true,
            moderation_process: true,
        }
    }

    #[test]
    fn downloads_only_go_up() {
        let mut catalog = sample_catalog();

        assert_eq!(catalog.record_download("4"), Some(55));
        assert_eq!(catalog.record_download("4"), Some(56));
        assert_eq!(catalog.record_like("4"), Some(13));
        assert_eq!(catalog.record_download("nope"), None);
        assert_eq!(catalog.resource("4").unwrap().download_count, 56);
    }

    #[test]
    fn popular_and_stats() {
        let catalog = sample_catalog();

        let popular: Vec<u64> = catalog.popular(3).iter().map(|r| r.download_count).collect();
        assert_eq!(popular, vec![142, 95, 89]);
        assert_eq!(catalog.popular(POPULAR_COUNT).len(), 6);
        assert!(catalog.popular(0).is_empty());

        let stats = catalog.stats();
        assert_eq!(stats.total_resources, 6);
        assert_eq!(stats.total_downloads, 523);
        assert_eq!(stats.total_likes, 133);
    }

    #[test]
    fn comments_are_oldest_first() {
        let catalog = sample_catalog();

        let ids: Vec<String> = catalog.comments_for("1").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(catalog.comments_for("6").is_empty());
    }

    #[test]
    fn upload_creates_unapproved_resource() {
        let mut catalog = sample_catalog();
        let uploader = Uploader { id: "3".to_string(), name: "Jane Smith".to_string() };

        let resource = catalog.add_resource(&draft(), &uploader, now()).unwrap();

        assert_eq!(resource.id, now().timestamp_millis().to_string());
        assert_eq!(resource.title, "Compiler Design T3");
        assert_eq!(resource.file_type, "PPTX");
        assert_eq!(resource.file_size, "1.5 KB");
        assert_eq!(resource.file_url, "#");
        assert_eq!(resource.tags, vec!["Parsing".to_string()]);
        assert_eq!((resource.download_count, resource.likes), (0, 0));
        assert!(!resource.is_approved);
        assert!(catalog.facets().subjects.contains(&"Compiler Design".to_string()));

        let again = catalog.add_resource(&draft(), &uploader, now()).unwrap();
        assert_eq!(again.id, format!("{}-1", now().timestamp_millis()));
        assert_eq!(catalog.stats().total_resources, 8);
    }

    #[test]
    fn invalid_upload_is_rejected_with_field_errors() {
        let mut catalog = sample_catalog();
        let mut incomplete = draft();
        incomplete.subject.clear();

        let errors = catalog.add_resource(&incomplete, &Uploader::anonymous(), now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["subject"], REQUIRED_MESSAGE);
        assert_eq!(catalog.resources().len(), 6);
    }

    #[test]
    fn comments_need_a_resource_and_content() {
        let mut catalog = sample_catalog();
        let comment = |resource_id: &str, content: &str| NewComment {
            resource_id: resource_id.to_string(),
            user_id: "1".to_string(),
            user_name: "John Doe".to_string(),
            content: content.to_string(),
        };

        assert!(catalog.add_comment(comment("missing", "hi"), now()).is_err());
        assert!(catalog.add_comment(comment("6", "   "), now()).is_err());

        let added = catalog.add_comment(comment("6", " Very clear slides "), now()).unwrap();
        assert_eq!(added.content, "Very clear slides");
        assert_eq!(catalog.comments_for("6"), vec![added]);
    }

    #[test]
    fn snapshot_survives_reencoding() {
        let mut catalog = sample_catalog();
        catalog.record_download("2");

        let data = catalog.to_compressed().unwrap();
        let restored = Catalog::from_compressed(&data).unwrap();

        assert_eq!(restored.resources(), catalog.resources());
        assert_eq!(restored.facets(), catalog.facets());
        assert_eq!(restored.comments_for("1").len(), 2);
    }
}
