pub mod compression;
pub mod models;
pub mod sample;
pub mod upload;

// 重新导出常用模块和函数，方便直接使用
pub use compression::{to_compressed, from_compressed, to_binary, from_binary, validate_compressed_data};
pub use models::{Comment, Resource, Uploader, parse_upload_date};
pub use upload::{FieldErrors, FileInfo, SavedDraft, TagList, UploadDraft};
