#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::time::Duration;

use webdl::common::api::client::JobService;
use webdl::common::api::error::ApiError;
use webdl::common::api::models::{
    DirectoryFile, DownloadRequest, LogEntry, ProgressSnapshot, StatusResponse, TaskStatus,
};
use webdl::monitor::view::TaskView;
use webdl::render::Renderer;

// 一次状态查询的预设结果
#[derive(Clone)]
pub enum Scripted {
    Reply(StatusResponse),
    Delayed(Duration, StatusResponse),
    Fail,
}

/// 内存中的假后端，按脚本返回状态并记录调用次数
#[derive(Default)]
pub struct FakeService {
    task_ids: Mutex<VecDeque<Result<String, String>>>,
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    status_calls: Mutex<HashMap<String, usize>>,
    pub requests: Mutex<Vec<DownloadRequest>>,
    pub list_calls: AtomicUsize,
    pub list_fails: AtomicBool,
    pub listing: Mutex<Vec<DirectoryFile>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, task_id: &str) {
        self.task_ids
            .lock()
            .unwrap()
            .push_back(Ok(task_id.to_string()));
    }

    pub fn reject(&self, message: &str) {
        self.task_ids
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    // 脚本用完后一直重复最后一项
    pub fn script(&self, task_id: &str, steps: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(task_id.to_string(), steps.into());
    }

    pub fn status_calls(&self, task_id: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .get(task_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn next_step(&self, task_id: &str) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(task_id)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl JobService for FakeService {
    async fn create_task(&self, request: &DownloadRequest) -> Result<String, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.task_ids.lock().unwrap().pop_front();
        match next {
            Some(Ok(task_id)) => Ok(task_id),
            Some(Err(message)) => Err(ApiError::Rejected {
                status: 400,
                message,
            }),
            None => Err(ApiError::InvalidResponse("没有预设任务".to_string())),
        }
    }

    async fn task_status(&self, task_id: &str) -> Result<StatusResponse, ApiError> {
        *self
            .status_calls
            .lock()
            .unwrap()
            .entry(task_id.to_string())
            .or_insert(0) += 1;

        match self.next_step(task_id) {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(Scripted::Fail) => Err(ApiError::InvalidResponse("连接被重置".to_string())),
            None => Err(ApiError::Rejected {
                status: 404,
                message: "unknown task".to_string(),
            }),
        }
    }

    async fn list_downloads(&self) -> Result<Vec<DirectoryFile>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(ApiError::InvalidResponse("目录读取失败".to_string()));
        }
        Ok(self.listing.lock().unwrap().clone())
    }

    async fn open_downloads(&self) -> Result<(), ApiError> {
        Err(ApiError::Rejected {
            status: 500,
            message: "no file manager".to_string(),
        })
    }

    async fn reveal(&self, _filename: &str) -> Result<(), ApiError> {
        Ok(())
    }

    fn file_url(&self, filename: &str) -> String {
        format!("http://fake/files/{}", urlencoding::encode(filename))
    }
}

/// 记录每次渲染的渲染器
#[derive(Default)]
pub struct RecordingRenderer {
    pub views: Mutex<Vec<TaskView>>,
    pub alerts: Mutex<Vec<String>>,
    pub directories: Mutex<Vec<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn views(&self) -> Vec<TaskView> {
        self.views.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render_task(&self, view: &TaskView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn render_directory(&self, files: &[DirectoryFile]) {
        self.directories
            .lock()
            .unwrap()
            .push(files.iter().map(|f| f.name.clone()).collect());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

// -----------------------------------------------------------------------------------------------

pub fn status(status: TaskStatus) -> StatusResponse {
    StatusResponse {
        status,
        last_progress: None,
        files: Vec::new(),
        log: Vec::new(),
        error: None,
        created_at: None,
    }
}

pub fn with_progress(mut response: StatusResponse, done: Option<u64>, total: Option<u64>) -> StatusResponse {
    response.last_progress = Some(ProgressSnapshot {
        status: "downloading".to_string(),
        filename: Some("/downloads/clip.mp4".to_string()),
        downloaded_bytes: done,
        total_bytes: total,
        speed: None,
        eta: None,
    });
    response
}

pub fn with_files(mut response: StatusResponse, files: &[&str]) -> StatusResponse {
    response.files = files.iter().map(|f| f.to_string()).collect();
    response
}

pub fn log(msg: &str) -> LogEntry {
    LogEntry {
        ts: "2024-05-01T10:00:00Z".to_string(),
        level: "INFO".to_string(),
        msg: msg.to_string(),
    }
}
