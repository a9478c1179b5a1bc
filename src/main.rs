use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};

use webdl::common::api::client::{ClientConfig, JobService, ServiceClient};
use webdl::common::api::models::TaskStatus;
use webdl::controller::Controller;
use webdl::render::TerminalRenderer;
use webdl::{log_info, log_success, log_warning};

mod cli;

use cli::{Cli, Command, DownloadArgs};

/// 提交任务并等待监控结束
async fn run_download(controller: &mut Controller, args: &DownloadArgs) -> Result<()> {
    // 先显示一次下载目录
    controller.listing().refresh().await;

    let form = args.to_form();
    let task_id = controller.submit(&form).await?;
    log_info!("任务已提交: {}", task_id);

    let interrupted = tokio::select! {
        _ = controller.wait() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        controller.stop();
        log_warning!("已停止监控，后台任务仍在运行: {}", task_id);
        return Ok(());
    }

    let state = controller.current_state().await;
    debug!("最终状态: {:?}", state);
    match state.status {
        Some(TaskStatus::Completed) => {
            log_success!("任务完成，共 {} 个输出文件", state.files.len());
            Ok(())
        }
        Some(TaskStatus::Error) => bail!(
            "任务失败: {}",
            state.error.as_deref().unwrap_or("未知错误")
        ),
        _ => {
            warn!("状态查询中断，任务 {} 的最终状态未知", task_id);
            bail!("状态查询中断")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // 初始化日志
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = ClientConfig::parse(&args.server)?;
    config.timeout = Duration::from_secs(args.timeout);
    config.list_limit = args.list_limit;
    info!("下载服务: {}", config.base_url);

    let service: Arc<dyn JobService> = Arc::new(ServiceClient::new(&config)?);
    let renderer = Arc::new(TerminalRenderer::new(Arc::clone(&service)));
    let mut controller = Controller::new(Arc::clone(&service), renderer);

    match &args.command {
        Command::Download(download) => run_download(&mut controller, download).await?,
        Command::List => {
            controller.listing().refresh().await;
            if controller.listing().files().await.is_empty() {
                log_info!("下载目录为空或无法读取");
            }
        }
        Command::OpenDir => {
            controller.open_downloads().await?;
            log_success!("已打开下载目录");
        }
        Command::Reveal { name } => {
            controller.reveal(name).await?;
            log_success!("已在文件管理器中显示: {}", name);
        }
        Command::Link { name } => println!("{}", service.file_url(name)),
    }

    Ok(())
}
