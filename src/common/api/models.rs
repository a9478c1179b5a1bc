use serde::{Deserialize, Deserializer, Serialize};

// -----------------------------------------------------------------------------------------------
// 提交下载任务

// POST /api/download 的请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub audio_only: bool,
    pub format: String,
    pub subtitles: bool,
    pub embed_thumbnail: bool,
    pub mp4_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub task_id: String,
}

// 非 2xx 响应携带的错误信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// -----------------------------------------------------------------------------------------------
// 任务状态

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 后端附在状态响应中的最近一次进度快照。
///
/// 字节数和 eta 可能是整数、浮点数（总大小可能只是估算值）或 null。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub downloaded_bytes: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub total_bytes: Option<u64>,
    #[serde(default)]
    pub speed: Option<f64>, // 字节/秒
    #[serde(default, deserialize_with = "de_opt_count")]
    pub eta: Option<u64>, // 剩余秒数
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: String,
    pub level: String,
    pub msg: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.ts, self.level, self.msg)
    }
}

// GET /api/status/{task_id}
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub last_progress: Option<ProgressSnapshot>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default)]
    pub error: Option<String>, // 任务失败时后端记录的错误
    #[serde(default)]
    pub created_at: Option<String>,
}

// -----------------------------------------------------------------------------------------------
// 下载目录

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryFile {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mtime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub files: Vec<DirectoryFile>,
}

// 接受整数、浮点数或 null，浮点数向下取整，负数视为 0
fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0).trunc() as u64))
}
