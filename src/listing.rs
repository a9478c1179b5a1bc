use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::common::api::client::JobService;
use crate::common::api::models::DirectoryFile;
use crate::render::Renderer;

/// 下载目录的只读视图，与任务的文件列表相互独立，只在显式刷新时更新。
pub struct DirectoryListing {
    service: Arc<dyn JobService>,
    renderer: Arc<dyn Renderer>,
    files: Mutex<Vec<DirectoryFile>>,
}

impl DirectoryListing {
    pub fn new(service: Arc<dyn JobService>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            service,
            renderer,
            files: Mutex::new(Vec::new()),
        }
    }

    // 读取失败时忽略，不影响任务监控
    pub async fn refresh(&self) {
        match self.service.list_downloads().await {
            Ok(files) => {
                debug!("下载目录中共有 {} 个文件", files.len());
                self.renderer.render_directory(&files);
                *self.files.lock().await = files;
            }
            Err(e) => debug!("读取下载目录失败: {}", e),
        }
    }

    // 最近一次成功刷新的结果
    pub async fn files(&self) -> Vec<DirectoryFile> {
        self.files.lock().await.clone()
    }
}
