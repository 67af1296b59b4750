use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 资源 - 目录中的一条上传文档记录
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// 资源唯一标识符
    pub id: String,
    /// 标题
    pub title: String,
    /// 描述
    pub description: String,
    /// 原始文件名
    #[serde(default)]
    pub file_name: String,
    /// 文件地址（本地存储中固定为 "#"）
    #[serde(default)]
    pub file_url: String,
    /// 展示用文件大小，例如 "2.4 MB"
    #[serde(default)]
    pub file_size: String,
    /// 文件类型，例如 PDF、DOCX
    pub file_type: String,
    /// 年级
    pub year: String,
    /// 学期
    pub semester: String,
    /// 科目
    pub subject: String,
    /// 考试类型
    pub exam_type: String,
    /// 上传者ID
    #[serde(default)]
    pub uploader_id: String,
    /// 上传者名称
    #[serde(default)]
    pub uploader_name: String,
    /// 上传时间
    #[serde(with = "date_format")]
    pub upload_date: DateTime<Utc>,
    /// 下载次数，只增不减
    #[serde(default)]
    pub download_count: u64,
    /// 点赞数，只增不减
    #[serde(default)]
    pub likes: u64,
    /// 是否已审核
    #[serde(default)]
    pub is_approved: bool,
    /// 标签列表
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 评论
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub resource_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    #[serde(with = "date_format")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// 上传者信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Uploader {
    pub id: String,
    pub name: String,
}

impl Uploader {
    /// 未登录时使用的匿名上传者
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            name: "Anonymous".to_string(),
        }
    }
}

/// 解析日期字符串：支持 RFC 3339 时间戳和 `YYYY-MM-DD` 纯日期（按 UTC 零点处理）
pub fn parse_upload_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("无法解析日期: {}", raw))
}

/// 日期字段的序列化：写出 RFC 3339，读入时显式解析
///
/// 只经过 `String` 往返，bincode 与 JSON 共用同一套实现。
pub mod date_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_upload_date(&raw).map_err(serde::de::Error::custom)
    }
}
