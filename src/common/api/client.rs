use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;
use urlencoding::encode;

use super::error::ApiError;
use super::models::{
    DirectoryFile, DownloadRequest, ErrorBody, ListResponse, StatusResponse, SubmitResponse,
};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// 后端任务服务的全部接口。
///
/// 控制器和监控器只依赖这个 trait，测试里可以换成内存实现。
#[async_trait]
pub trait JobService: Send + Sync {
    // 创建下载任务，返回服务端分配的任务 ID
    async fn create_task(&self, request: &DownloadRequest) -> Result<String, ApiError>;

    async fn task_status(&self, task_id: &str) -> Result<StatusResponse, ApiError>;

    // 列出下载目录中已有的文件
    async fn list_downloads(&self) -> Result<Vec<DirectoryFile>, ApiError>;

    // 在宿主机的文件管理器中打开下载目录
    async fn open_downloads(&self) -> Result<(), ApiError>;

    // 在文件管理器中定位单个文件
    async fn reveal(&self, filename: &str) -> Result<(), ApiError>;

    // 输出文件的直接下载地址
    fn file_url(&self, filename: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub list_limit: usize,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
            list_limit: 200,
        }
    }

    pub fn parse(server: &str) -> Result<Self, ApiError> {
        Ok(Self::new(Url::parse(server)?))
    }
}

// 基于 reqwest 的任务服务客户端
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: Client,
    base: String,
    list_limit: usize,
}

impl ServiceClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let inner = ClientBuilder::new().timeout(config.timeout).build()?;

        Ok(Self {
            inner,
            base: config.base_url.as_str().trim_end_matches('/').to_string(),
            list_limit: config.list_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // 处理响应：非 2xx 转成 Rejected，其余按 T 解析
    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let raw_body = resp.bytes().await?;
        debug!("Status: {}, 响应长度: {} 字节", status, raw_body.len());

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&raw_body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("未知错误")
                        .to_string()
                });
            error!("请求失败 ({}): {}", status, message);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<T>(&raw_body).map_err(|e| {
            error!("响应解析失败: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })
    }

    // 只关心成功与否的 POST 接口
    async fn post_empty(&self, url: &str) -> Result<(), ApiError> {
        let resp = self.inner.post(url).send().await?;
        Self::handle_response::<serde_json::Value>(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl JobService for ServiceClient {
    async fn create_task(&self, request: &DownloadRequest) -> Result<String, ApiError> {
        debug!("提交下载任务: {:?}", request);
        let resp = self
            .inner
            .post(self.endpoint("/api/download"))
            .json(request)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::handle_response(resp).await?;
        Ok(submitted.task_id)
    }

    async fn task_status(&self, task_id: &str) -> Result<StatusResponse, ApiError> {
        let url = self.endpoint(&format!("/api/status/{}", encode(task_id)));
        let resp = self.inner.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn list_downloads(&self) -> Result<Vec<DirectoryFile>, ApiError> {
        let resp = self
            .inner
            .get(self.endpoint("/api/list_downloads"))
            .query(&[("limit", self.list_limit)])
            .send()
            .await?;

        let listing: ListResponse = Self::handle_response(resp).await?;
        Ok(listing.files)
    }

    async fn open_downloads(&self) -> Result<(), ApiError> {
        self.post_empty(&self.endpoint("/api/open_downloads")).await
    }

    async fn reveal(&self, filename: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/reveal/{}", encode(filename)));
        self.post_empty(&url).await
    }

    fn file_url(&self, filename: &str) -> String {
        self.endpoint(&format!("/files/{}", encode(filename)))
    }
}
