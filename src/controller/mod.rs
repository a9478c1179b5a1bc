use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::common::api::client::JobService;
use crate::listing::DirectoryListing;
use crate::monitor::view::TaskView;
use crate::monitor::{MonitorContext, POLL_INTERVAL, TaskMonitor};
use crate::render::Renderer;

pub mod error;
pub mod form;

pub use error::ControllerError;
pub use form::{CUSTOM_FORMAT, DownloadForm, FORMAT_PRESETS, FormatChoice};

/// 提交下载任务并监控其进度。
///
/// 同一时刻最多只有一个监控器，提交新任务前会先停止旧的。
pub struct Controller {
    ctx: MonitorContext,
    monitor: Option<TaskMonitor>,
}

impl Controller {
    pub fn new(service: Arc<dyn JobService>, renderer: Arc<dyn Renderer>) -> Self {
        let listing = Arc::new(DirectoryListing::new(
            Arc::clone(&service),
            Arc::clone(&renderer),
        ));

        Self {
            ctx: MonitorContext {
                service,
                renderer,
                listing,
                view: Arc::new(Mutex::new(TaskView::default())),
            },
            monitor: None,
        }
    }

    pub fn listing(&self) -> &Arc<DirectoryListing> {
        &self.ctx.listing
    }

    /// 提交下载任务，返回服务端分配的任务 ID。
    ///
    /// 请求发出前清空上一个任务的展示；失败时报告给操作者，任务面板保持原状。
    pub async fn submit(&mut self, form: &DownloadForm) -> Result<String, ControllerError> {
        let request = form.to_request()?;

        self.stop();
        {
            let mut view = self.ctx.view.lock().await;
            view.reset_presentation();
            self.ctx.renderer.render_task(&view);
        }

        let task_id = match self.ctx.service.create_task(&request).await {
            Ok(task_id) => task_id,
            Err(e) => {
                error!("启动下载失败: {}", e);
                self.ctx.renderer.alert(&format!("启动下载失败: {}", e));
                return Err(e.into());
            }
        };

        info!("任务已创建: {}", task_id);
        {
            let mut view = self.ctx.view.lock().await;
            view.begin(&task_id);
            self.ctx.renderer.render_task(&view);
        }

        self.monitor = Some(TaskMonitor::start(
            &task_id,
            self.ctx.clone(),
            POLL_INTERVAL,
        ));
        Ok(task_id)
    }

    // 停止当前监控，后台任务本身不受影响
    pub fn stop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.stop();
        }
    }

    pub async fn current_state(&self) -> TaskView {
        self.ctx.view.lock().await.clone()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.as_ref().is_some_and(|m| m.is_active())
    }

    pub fn monitored_task(&self) -> Option<&str> {
        self.monitor.as_ref().map(|m| m.task_id())
    }

    // 等待当前监控结束，没有监控时立即返回
    pub async fn wait(&self) {
        if let Some(monitor) = &self.monitor {
            monitor.settled().await;
        }
    }

    pub async fn open_downloads(&self) -> Result<(), ControllerError> {
        self.ctx.service.open_downloads().await.map_err(|e| {
            self.ctx.renderer.alert(&format!("打开下载目录失败: {}", e));
            e.into()
        })
    }

    pub async fn reveal(&self, filename: &str) -> Result<(), ControllerError> {
        self.ctx.service.reveal(filename).await.map_err(|e| {
            self.ctx.renderer.alert(&format!("无法定位文件 {}: {}", filename, e));
            e.into()
        })
    }
}
