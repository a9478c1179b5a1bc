use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

use crate::common::api::client::JobService;
use crate::common::api::models::{DirectoryFile, LogEntry, TaskStatus};
use crate::common::logger::PrettyLogger;
use crate::monitor::view::TaskView;

/// 显示层。所有状态计算都在 [`TaskView`] 里完成，渲染器只负责输出。
pub trait Renderer: Send + Sync {
    fn render_task(&self, view: &TaskView);

    // 目录文件只显示名字，不给出链接
    fn render_directory(&self, files: &[DirectoryFile]);

    // 向操作者报告错误
    fn alert(&self, message: &str);
}

// 进度条按千分比推进，保留一位小数的精度
const BAR_SCALE: f64 = 10.0;
const BAR_LENGTH: u64 = 1000;

#[derive(Default)]
struct Rendered {
    task_id: Option<String>,
    status: Option<TaskStatus>,
    files: Vec<String>,
    last_log: Option<LogEntry>,
    bar: Option<ProgressBar>,
}

/// 终端渲染器：indicatif 进度条加上 [`PrettyLogger`] 输出。
///
/// 每次渲染只输出相对上一次的增量（新任务、状态变化、新文件、新日志）。
pub struct TerminalRenderer {
    service: Arc<dyn JobService>,
    state: Mutex<Rendered>,
}

impl TerminalRenderer {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self {
            service,
            state: Mutex::new(Rendered::default()),
        }
    }

    fn new_bar() -> ProgressBar {
        let pb = ProgressBar::new(BAR_LENGTH);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    // 在进度条上方输出，避免打乱进度条
    fn print(bar: Option<&ProgressBar>, f: impl FnOnce()) {
        match bar {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_task(&self, view: &TaskView) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if view.panel_visible && view.task_id != state.task_id {
            if let Some(old) = state.bar.take() {
                old.abandon();
            }
            let task_id = view.task_id.clone().unwrap_or_default();
            PrettyLogger::title(format!("任务 {}", task_id));
            *state = Rendered {
                task_id: view.task_id.clone(),
                bar: Some(Self::new_bar()),
                ..Rendered::default()
            };
        }

        // 重置后的空白面板
        if view.files.is_empty() && view.log.is_empty() {
            state.files.clear();
            state.last_log = None;
        }

        let bar = state.bar.clone();

        if view.status != state.status {
            if let Some(status) = view.status {
                Self::print(bar.as_ref(), || PrettyLogger::info(format!("状态: {}", status)));
            }
            state.status = view.status;
        }

        // 新出现的输出文件
        for name in view.files.iter().filter(|f| !state.files.contains(f)) {
            let link = self.service.file_url(name);
            Self::print(bar.as_ref(), || PrettyLogger::file_info(name, link));
        }
        state.files = view.files.clone();

        // 从上次输出的最后一条之后开始
        let start = state
            .last_log
            .as_ref()
            .and_then(|last| view.log.iter().rposition(|entry| entry == last))
            .map(|pos| pos + 1)
            .unwrap_or(0);
        for entry in &view.log[start..] {
            Self::print(bar.as_ref(), || PrettyLogger::task_log(entry));
        }
        state.last_log = view.log.last().cloned();

        if let Some(pb) = &bar {
            if pb.is_finished() {
                return;
            }
            pb.set_position((view.bar_percent * BAR_SCALE).round() as u64);
            pb.set_message(view.progress_label.clone());

            match view.status {
                Some(TaskStatus::Completed) => {
                    pb.finish_with_message(view.progress_label.clone());
                    PrettyLogger::success("下载完成");
                }
                Some(TaskStatus::Error) => {
                    pb.abandon();
                    PrettyLogger::error(format!(
                        "下载失败: {}",
                        view.error.as_deref().unwrap_or("未知错误")
                    ));
                }
                _ => {}
            }
        }
    }

    fn render_directory(&self, files: &[DirectoryFile]) {
        let bar = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .bar
            .clone()
            .filter(|pb| !pb.is_finished());

        Self::print(bar.as_ref(), || {
            PrettyLogger::separator();
            PrettyLogger::info(format!("下载目录 ({} 个文件)", files.len()));
            for file in files {
                PrettyLogger::list_item(&file.name);
            }
        });
    }

    fn alert(&self, message: &str) {
        crate::log_error!("{}", message);
    }
}
