use clap::{Args, Parser, Subcommand};

use webdl::common::api::client::DEFAULT_SERVER;
use webdl::controller::{DownloadForm, FormatChoice};

/// 下载任务客户端
#[derive(Parser, Debug)]
#[command(name = "webdl")]
#[command(version = "1.0")]
#[command(about = "向下载服务提交任务并跟踪进度", long_about = None)]
pub struct Cli {
    /// 下载服务地址
    #[arg(long, global = true, value_name = "URL")]
    #[arg(env = "WEBDL_SERVER", default_value = DEFAULT_SERVER)]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub server: String,

    /// 单次请求超时（秒）
    #[arg(long, global = true, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// 目录列表最多显示的文件数
    #[arg(long, global = true, value_name = "N", default_value_t = 200)]
    pub list_limit: usize,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 提交下载任务并等待完成
    Download(DownloadArgs),
    /// 列出下载目录中的文件
    List,
    /// 在服务端主机上打开下载目录
    OpenDir,
    /// 在服务端主机的文件管理器中定位文件
    Reveal {
        #[arg(value_name = "FILE")]
        name: String,
    },
    /// 打印输出文件的下载地址
    Link {
        #[arg(value_name = "FILE")]
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// 视频链接
    #[arg(long, value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub url: String,

    /// 格式预设，取 __custom__ 时使用 --format
    #[arg(long, value_name = "PRESET", default_value = "")]
    #[arg(help = "格式预设: \"\"(默认), bv*+ba/b, bestaudio/best ... 或 __custom__")]
    pub preset: String,

    /// 自定义格式字符串
    #[arg(long, value_name = "FORMAT", default_value = "")]
    pub format: String,

    #[arg(long, help = "只提取音频")]
    pub audio_only: bool,
    #[arg(long, help = "下载字幕")]
    pub subtitles: bool,
    #[arg(long, help = "嵌入封面")]
    pub embed_thumbnail: bool,
    #[arg(long, help = "只选择 MP4 容器")]
    pub mp4_only: bool,
}

impl DownloadArgs {
    pub fn to_form(&self) -> DownloadForm {
        DownloadForm {
            url: self.url.clone(),
            format: FormatChoice::from_selector(&self.preset, &self.format),
            audio_only: self.audio_only,
            subtitles: self.subtitles,
            embed_thumbnail: self.embed_thumbnail,
            mp4_only: self.mp4_only,
        }
    }
}
