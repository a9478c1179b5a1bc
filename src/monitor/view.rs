use crate::common::api::models::{LogEntry, ProgressSnapshot, StatusResponse, TaskStatus};

use super::reducer::reduce;

/// 当前展示的任务状态，对应页面上的任务面板。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskView {
    pub task_id: Option<String>,
    pub panel_visible: bool,
    pub status: Option<TaskStatus>,
    pub progress_label: String,
    pub bar_percent: f64,
    pub files: Vec<String>,
    pub log: Vec<LogEntry>,
    pub last_progress: Option<ProgressSnapshot>,
    pub error: Option<String>,
    // 已应用的最大查询序号，只在持有锁时读写
    pub applied_seq: u64,
}

impl TaskView {
    // 清空文件列表、进度和日志，任务 ID 与面板可见性保持不变
    pub fn reset_presentation(&mut self) {
        self.files.clear();
        self.progress_label.clear();
        self.bar_percent = 0.0;
        self.log.clear();
        self.last_progress = None;
        self.error = None;
    }

    // 提交成功后切换到新任务
    pub fn begin(&mut self, task_id: &str) {
        self.task_id = Some(task_id.to_string());
        self.panel_visible = true;
        self.status = Some(TaskStatus::Running);
        self.applied_seq = 0;
    }

    /// 序号大于已应用序号时记录并返回 true，否则是过期响应。
    pub fn accept_seq(&mut self, seq: u64) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        true
    }

    /// 应用一次状态查询的结果。
    ///
    /// 文件列表和日志以服务端为准整体替换；完成时进度条强制为 100%。
    pub fn apply(&mut self, response: &StatusResponse) {
        self.status = Some(response.status);

        if let Some(snapshot) = &response.last_progress {
            let display = reduce(snapshot);
            self.progress_label = display.label;
            if let Some(percent) = display.bar_percent {
                self.bar_percent = percent;
            }
            self.last_progress = Some(snapshot.clone());
        }

        self.files = response.files.clone();
        self.log = response.log.clone();
        self.error = response.error.clone();

        if response.status == TaskStatus::Completed {
            self.bar_percent = 100.0;
        }
    }
}
