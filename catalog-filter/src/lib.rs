use wasm_bindgen::prelude::*;
use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use web_sys::console;
use utils_common::models::Uploader;
use utils_common::sample::{sample_comments, sample_resources};
use utils_common::upload::{SavedDraft, UploadDraft};

// 导出模块
pub mod builder;
pub mod catalog;
pub mod models;
pub mod pagination;
pub mod query;

use crate::catalog::Catalog;
use crate::models::{CatalogStats, Facets, NewComment};
use crate::pagination::{page_window, Pagination, DEFAULT_MAX_VISIBLE};
use crate::query::{Query, QueryParams, QueryResult};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// 全局目录存储
static CATALOG: OnceCell<Mutex<Option<Catalog>>> = OnceCell::new();

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 目录过滤器 - 持有当前目录并处理查询
pub struct CatalogFilter;

impl CatalogFilter {
    fn lock() -> Result<MutexGuard<'static, Option<Catalog>>, String> {
        CATALOG
            .get_or_init(|| Mutex::new(None))
            .lock()
            .map_err(|_| "获取目录锁失败".to_string())
    }

    fn with_catalog<T>(f: impl FnOnce(&Catalog) -> T) -> Result<T, String> {
        let guard = Self::lock()?;
        let catalog = guard.as_ref().ok_or("目录未初始化")?;
        Ok(f(catalog))
    }

    fn with_catalog_mut<T>(f: impl FnOnce(&mut Catalog) -> T) -> Result<T, String> {
        let mut guard = Self::lock()?;
        let catalog = guard.as_mut().ok_or("目录未初始化")?;
        Ok(f(catalog))
    }

    /// 替换当前目录
    pub fn install(catalog: Catalog) -> Result<(), String> {
        *Self::lock()? = Some(catalog);
        Ok(())
    }

    /// 加载压缩的目录快照
    pub fn load_index(data: &[u8]) -> Result<(), String> {
        let catalog = Catalog::from_compressed(data).map_err(|e| format!("解析目录失败: {}", e))?;
        Self::install(catalog)
    }

    /// 使用示例数据初始化
    pub fn load_sample() -> Result<(), String> {
        Self::install(Catalog::new(sample_resources()?, sample_comments()?))
    }

    /// 筛选资源
    pub fn filter_resources(params: QueryParams) -> Result<QueryResult, String> {
        let query = Query::from(params);
        Self::with_catalog(|catalog| catalog.query(&query))
    }

    /// 分页控件数据
    pub fn pagination(params: QueryParams) -> Result<Pagination, String> {
        let result = Self::filter_resources(params)?;
        Ok(Pagination::from_result(&result, DEFAULT_MAX_VISIBLE))
    }

    pub fn facets() -> Result<Facets, String> {
        Self::with_catalog(|catalog| catalog.facets().clone())
    }

    pub fn stats() -> Result<CatalogStats, String> {
        Self::with_catalog(Catalog::stats)
    }

    pub fn export_index() -> Result<Vec<u8>, String> {
        Self::with_catalog(Catalog::to_compressed)?.map_err(|e| format!("压缩目录失败: {}", e))
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}

fn decode_json<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("解析{}失败: {}", what, e))
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<T, JsValue> {
    decode_json(raw, what).map_err(js_error)
}

fn js_error(message: String) -> JsValue {
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// 目录过滤器JS接口 - 提供给JavaScript使用的API
#[wasm_bindgen]
pub struct CatalogFilterJS;

#[wasm_bindgen]
impl CatalogFilterJS {
    /// 初始化过滤器并加载目录快照
    #[wasm_bindgen]
    pub fn init(index_data: &[u8]) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        CatalogFilter::load_index(index_data).map_err(|e| js_error(format!("初始化过滤器失败: {}", e)))
    }

    /// 存储为空时使用示例数据初始化
    #[wasm_bindgen]
    pub fn init_sample() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        CatalogFilter::load_sample().map_err(js_error)
    }

    /// 筛选资源
    #[wasm_bindgen]
    pub fn filter_resources(params_json: &str) -> Result<JsValue, JsValue> {
        let params: QueryParams = parse_json(params_json, "参数")?;
        let result = CatalogFilter::filter_resources(params).map_err(js_error)?;
        to_js(&result)
    }

    /// 分页控件数据
    #[wasm_bindgen]
    pub fn pagination(params_json: &str) -> Result<JsValue, JsValue> {
        let params: QueryParams = parse_json(params_json, "参数")?;
        let pagination = CatalogFilter::pagination(params).map_err(js_error)?;
        to_js(&pagination)
    }

    /// 页码窗口
    #[wasm_bindgen]
    pub fn page_window(current_page: usize, total_pages: usize, max_visible: usize) -> Result<JsValue, JsValue> {
        to_js(&page_window(current_page, total_pages, max_visible))
    }

    /// 获取筛选项
    #[wasm_bindgen]
    pub fn get_facets() -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::facets().map_err(js_error)?)
    }

    /// 获取单个资源，不存在时返回 null
    #[wasm_bindgen]
    pub fn get_resource(id: &str) -> Result<JsValue, JsValue> {
        let resource = CatalogFilter::with_catalog(|c| c.resource(id).cloned()).map_err(js_error)?;
        to_js(&resource)
    }

    /// 获取资源的评论
    #[wasm_bindgen]
    pub fn get_comments(resource_id: &str) -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::with_catalog(|c| c.comments_for(resource_id)).map_err(js_error)?)
    }

    /// 记录一次下载，返回新的下载次数（资源不存在时为 null）
    #[wasm_bindgen]
    pub fn record_download(id: &str) -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::with_catalog_mut(|c| c.record_download(id)).map_err(js_error)?)
    }

    /// 记录一次点赞
    #[wasm_bindgen]
    pub fn record_like(id: &str) -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::with_catalog_mut(|c| c.record_like(id)).map_err(js_error)?)
    }

    /// 热门资源
    #[wasm_bindgen]
    pub fn popular(count: usize) -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::with_catalog(|c| c.popular(count)).map_err(js_error)?)
    }

    /// 首页统计
    #[wasm_bindgen]
    pub fn stats() -> Result<JsValue, JsValue> {
        to_js(&CatalogFilter::stats().map_err(js_error)?)
    }

    /// 发布上传表单；校验失败时以 `{字段: 错误信息}` 对象拒绝
    #[wasm_bindgen]
    pub fn add_resource(draft_json: &str, uploader_json: Option<String>) -> Result<JsValue, JsValue> {
        let draft: UploadDraft = parse_json(draft_json, "上传表单")?;
        let uploader = match uploader_json {
            Some(raw) => parse_json::<Uploader>(&raw, "上传者")?,
            None => Uploader::anonymous(),
        };

        let outcome = CatalogFilter::with_catalog_mut(|c| c.add_resource(&draft, &uploader, Utc::now()))
            .map_err(js_error)?;
        match outcome {
            Ok(resource) => to_js(&resource),
            Err(errors) => Err(to_js(&errors)?),
        }
    }

    /// 添加评论
    #[wasm_bindgen]
    pub fn add_comment(comment_json: &str) -> Result<JsValue, JsValue> {
        let new_comment: NewComment = parse_json(comment_json, "评论")?;
        let comment = CatalogFilter::with_catalog_mut(|c| c.add_comment(new_comment, Utc::now()))
            .map_err(js_error)?
            .map_err(js_error)?;
        to_js(&comment)
    }

    /// 导出当前目录快照，供页面写回存储
    #[wasm_bindgen]
    pub fn export_index() -> Result<Vec<u8>, JsValue> {
        CatalogFilter::export_index().map_err(js_error)
    }

    /// 保存上传草稿，返回需要写入存储的 JSON
    #[wasm_bindgen]
    pub fn save_draft(draft_json: &str) -> Result<String, JsValue> {
        let draft: UploadDraft = parse_json(draft_json, "上传表单")?;
        draft.to_saved(Utc::now()).to_json().map_err(js_error)
    }

    /// 恢复上传草稿；返回错误时调用方应删除存储中的草稿
    #[wasm_bindgen]
    pub fn restore_draft(saved_json: &str) -> Result<JsValue, JsValue> {
        let saved = SavedDraft::from_json(saved_json).map_err(js_error)?;
        to_js(&saved.restore())
    }
}
