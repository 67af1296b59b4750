use utils_common::models::{Comment, Resource};
use utils_common::compression::to_compressed;
use crate::models::{CatalogIndex, Facets, INDEX_VERSION};
use chrono::Utc;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;

/// 目录索引构建器
#[derive(Default)]
pub struct CatalogBuilder {
    resources: Vec<Resource>,
    comments: Vec<Comment>,
    ids: HashSet<String>,
}

impl CatalogBuilder {
    /// 创建新的目录索引构建器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// 添加资源，ID 重复时拒绝
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), String> {
        if !self.ids.insert(resource.id.clone()) {
            return Err(format!("资源ID重复: {}", resource.id));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// 添加评论
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// 构建目录索引，指向不存在资源的评论会被跳过
    pub fn build_catalog_index(&self) -> CatalogIndex {
        let comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| self.ids.contains(&c.resource_id))
            .cloned()
            .collect();

        let skipped = self.comments.len() - comments.len();
        if skipped > 0 {
            println!("跳过 {} 条找不到对应资源的评论", skipped);
        }

        let facets = Facets::from_resources(&self.resources);
        println!(
            "索引构建完成，资源数量: {}, 评论数量: {}, 科目数量: {}",
            self.resources.len(),
            comments.len(),
            facets.subjects.len()
        );

        CatalogIndex {
            resources: self.resources.clone(),
            comments,
            facets,
            created_at: Utc::now(),
        }
    }

    /// 构建并压缩目录索引
    pub fn to_compressed(&self) -> Result<Vec<u8>, String> {
        let index = self.build_catalog_index();
        to_compressed(&index, INDEX_VERSION).map_err(|e| format!("压缩目录索引失败: {}", e))
    }

    /// 保存目录索引到文件
    pub fn save_catalog_index(&self, path: &str) -> Result<(), String> {
        println!("开始保存目录索引到文件: {}", path);

        let compressed_data = self.to_compressed()?;

        let mut file = File::create(path).map_err(|e| format!("无法创建目录索引文件: {}", e))?;
        file.write_all(&compressed_data)
            .map_err(|e| format!("无法写入目录索引文件: {}", e))?;

        println!("目录索引已成功写入文件: {}，大小: {} 字节", path, compressed_data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use utils_common::compression::from_compressed;
    use utils_common::sample::{sample_comments, sample_resources};

    fn sample_builder() -> CatalogBuilder {
        let mut builder = CatalogBuilder::new();
        for resource in sample_resources().unwrap() {
            builder.add_resource(resource).unwrap();
        }
        for comment in sample_comments().unwrap() {
            builder.add_comment(comment);
        }
        builder
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = sample_builder();
        let again = sample_resources().unwrap().remove(0);

        assert!(builder.add_resource(again).is_err());
        assert_eq!(builder.resource_count(), 6);
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let index = sample_builder().build_catalog_index();

        assert_eq!(index.facets.years, vec!["2nd Year", "3rd Year", "4th Year"]);
        assert_eq!(index.facets.file_types, vec!["DOCX", "PDF", "PPTX"]);
        assert_eq!(index.facets.subjects.len(), 6);
        assert_eq!(index.facets.subjects[0], "Computer Networks");
    }

    #[test]
    fn orphan_comments_are_dropped() {
        let mut builder = sample_builder();
        let mut orphan = sample_comments().unwrap().remove(0);
        orphan.id = "99".to_string();
        orphan.resource_id = "missing".to_string();
        builder.add_comment(orphan);

        let index = builder.build_catalog_index();
        assert_eq!(index.comments.len(), 3);
    }

    #[test]
    fn saved_index_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog_index.bin");
        let path = path.to_str().unwrap();

        sample_builder().save_catalog_index(path).unwrap();

        let data = std::fs::read(path).unwrap();
        let index: CatalogIndex = from_compressed(&data).unwrap();
        assert_eq!(index.resources, sample_resources().unwrap());
        assert_eq!(index.comments.len(), 3);
    }
}
