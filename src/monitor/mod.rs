use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::common::api::client::JobService;
use crate::common::api::models::TaskStatus;
use crate::listing::DirectoryListing;
use crate::render::Renderer;

pub mod reducer;
pub mod view;

use view::TaskView;

// 固定每秒查询一次
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 监控器需要的协作者，控制器持有一份并在每个任务间共享。
#[derive(Clone)]
pub struct MonitorContext {
    pub service: Arc<dyn JobService>,
    pub renderer: Arc<dyn Renderer>,
    pub listing: Arc<DirectoryListing>,
    pub view: Arc<Mutex<TaskView>>,
}

/// 周期定时器的句柄。
///
/// 第一次触发在注册后一个周期，之后按注册时刻对齐。停止或 drop 时取消定时循环。
pub struct PollTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTimer {
    pub fn start<F>(period: Duration, token: CancellationToken, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut seq = 0u64;
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = interval.tick() => {
                        seq += 1;
                        on_tick(seq);
                    }
                }
            }
        });

        Self { token, handle }
    }

    pub fn stop(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 单个任务的状态监控器。
///
/// 每次 tick 独立发起一次状态查询，查询之间可能重叠；每个查询带递增序号，
/// 序号不大于已应用序号的响应直接丢弃。遇到终态或查询失败时停止定时器。
pub struct TaskMonitor {
    task_id: String,
    timer: PollTimer,
    // 终态处理（包括目录刷新）结束后取消
    settled: CancellationToken,
}

impl TaskMonitor {
    pub fn start(task_id: &str, ctx: MonitorContext, period: Duration) -> Self {
        let token = CancellationToken::new();
        let settled = CancellationToken::new();

        info!("开始监控任务: {}", task_id);

        let timer = {
            let task_id = task_id.to_string();
            let token = token.clone();
            let settled = settled.clone();
            PollTimer::start(period, token.clone(), move |seq| {
                tokio::spawn(poll_once(
                    ctx.clone(),
                    task_id.clone(),
                    seq,
                    token.clone(),
                    settled.clone(),
                ));
            })
        };

        Self {
            task_id: task_id.to_string(),
            timer,
            settled,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn stop(&self) {
        if self.timer.is_active() {
            debug!("停止监控任务: {}", self.task_id);
        }
        self.timer.stop();
        self.settled.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    // 等待监控结束：终态处理完成、查询失败或被停止
    pub async fn settled(&self) {
        self.settled.cancelled().await
    }
}

impl Drop for TaskMonitor {
    fn drop(&mut self) {
        self.settled.cancel();
    }
}

async fn poll_once(
    ctx: MonitorContext,
    task_id: String,
    seq: u64,
    token: CancellationToken,
    settled: CancellationToken,
) {
    let result = tokio::select! {
        _ = token.cancelled() => return,
        result = ctx.service.task_status(&task_id) => result,
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            // 查询失败不重试，保留最后一次成功的显示
            if !token.is_cancelled() {
                error!("查询任务状态失败，停止监控: {}, 错误: {}", task_id, e);
                token.cancel();
                settled.cancel();
            }
            return;
        }
    };

    let status = response.status;
    {
        let mut view = ctx.view.lock().await;
        if token.is_cancelled() {
            debug!("监控已停止，忽略响应: {} #{}", task_id, seq);
            return;
        }
        if !view.accept_seq(seq) {
            debug!("丢弃过期响应: {} #{}", task_id, seq);
            return;
        }

        view.apply(&response);
        ctx.renderer.render_task(&view);

        if !status.is_terminal() {
            return;
        }
        // 在锁内取消，保证终态只处理一次
        token.cancel();
    }

    match status {
        TaskStatus::Completed => info!("✅ 任务完成: {}", task_id),
        _ => warn!(
            "❌ 任务失败: {}, 错误: {}",
            task_id,
            response.error.as_deref().unwrap_or("未知错误")
        ),
    }

    // 失败时也可能留下部分输出
    ctx.listing.refresh().await;
    settled.cancel();
}
