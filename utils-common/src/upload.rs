use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 上传文件大小上限（10MB）
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 每个资源最多的标签数量
pub const MAX_TAGS: usize = 10;

/// 允许上传的 MIME 类型及其展示名称
const FILE_TYPES: [(&str, &str); 8] = [
    ("application/pdf", "PDF"),
    ("application/msword", "DOC"),
    ("application/vnd.openxmlformats-officedocument.wordprocessingml.document", "DOCX"),
    ("application/vnd.ms-powerpoint", "PPT"),
    ("application/vnd.openxmlformats-officedocument.presentationml.presentation", "PPTX"),
    ("image/jpeg", "JPEG"),
    ("image/jpg", "JPG"),
    ("image/png", "PNG"),
];

pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please select a PDF, DOC, PPT, or image file.";
pub const TOO_LARGE_MESSAGE: &str = "File is too large. Maximum size allowed is 10MB.";
pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const AGREEMENT_MESSAGE: &str = "You must agree to this requirement";
pub const MISSING_FILE_MESSAGE: &str = "Please select a file to upload";

/// 字段名 -> 错误信息；为空表示校验通过
pub type FieldErrors = BTreeMap<String, String>;

/// MIME 类型对应的展示名称，未知类型返回 "File"
pub fn file_type_label(mime_type: &str) -> &'static str {
    FILE_TYPES
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, label)| *label)
        .unwrap_or("File")
}

/// 格式化文件大小（1024进制，最多两位小数，去掉多余的0）
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// 待上传的文件信息（内容本身不做存储）
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileInfo {
    /// 检查文件类型和大小
    pub fn check(&self) -> Result<(), String> {
        if !FILE_TYPES.iter().any(|(mime, _)| *mime == self.mime_type) {
            return Err(INVALID_TYPE_MESSAGE.to_string());
        }
        if self.size > MAX_FILE_SIZE {
            return Err(TOO_LARGE_MESSAGE.to_string());
        }
        Ok(())
    }
}

/// 标签列表：去空白、不重复、最多 MAX_TAGS 个
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加标签，不符合规则时忽略并返回 false
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.0.len() >= MAX_TAGS || self.0.iter().any(|t| t == tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) {
        self.0.retain(|t| t != tag);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = TagList::new();
        for tag in iter {
            tags.add(tag.as_ref());
        }
        tags
    }
}

/// 上传表单
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub year: String,
    pub semester: String,
    pub subject: String,
    pub exam_type: String,
    pub tags: Vec<String>,
    pub file: Option<FileInfo>,
    pub original_content: bool,
    pub community_guidelines: bool,
    pub moderation_process: bool,
}

impl UploadDraft {
    /// 校验表单，返回所有字段错误
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match &self.file {
            None => {
                errors.insert("file".to_string(), MISSING_FILE_MESSAGE.to_string());
            }
            Some(file) => {
                if let Err(message) = file.check() {
                    errors.insert("file".to_string(), message);
                }
            }
        }

        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("year", &self.year),
            ("semester", &self.semester),
            ("subject", &self.subject),
            ("examType", &self.exam_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.insert(field.to_string(), REQUIRED_MESSAGE.to_string());
            }
        }

        let agreements = [
            ("originalContent", self.original_content),
            ("communityGuidelines", self.community_guidelines),
            ("moderationProcess", self.moderation_process),
        ];
        for (field, agreed) in agreements {
            if !agreed {
                errors.insert(field.to_string(), AGREEMENT_MESSAGE.to_string());
            }
        }

        errors
    }

    /// 按标签规则整理后的标签
    pub fn normalized_tags(&self) -> Vec<String> {
        self.tags.iter().collect::<TagList>().into_vec()
    }

    /// 生成可持久化的草稿（不包含文件本身）
    pub fn to_saved(&self, now: DateTime<Utc>) -> SavedDraft {
        SavedDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            year: self.year.clone(),
            semester: self.semester.clone(),
            subject: self.subject.clone(),
            exam_type: self.exam_type.clone(),
            tags: self.normalized_tags(),
            file_name: self.file.as_ref().map(|f| f.name.clone()).unwrap_or_default(),
            saved_at: now,
        }
    }
}

/// 存储中的上传草稿
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub exam_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(with = "crate::models::date_format")]
    pub saved_at: DateTime<Utc>,
}

impl SavedDraft {
    /// 从存储的 JSON 读取草稿，格式错误时返回错误，由调用方丢弃
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("草稿解析失败: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("草稿序列化失败: {}", e))
    }

    /// 恢复为表单；文件和确认项需要重新填写
    pub fn restore(self) -> UploadDraft {
        UploadDraft {
            title: self.title,
            description: self.description,
            year: self.year,
            semester: self.semester,
            subject: self.subject,
            exam_type: self.exam_type,
            tags: self.tags.iter().collect::<TagList>().into_vec(),
            ..UploadDraft::default()
        }
    }
}
