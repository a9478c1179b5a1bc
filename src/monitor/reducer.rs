use crate::common::api::models::ProgressSnapshot;
use crate::common::format::{basename, human_bytes, pct_number, pct_text};

pub const LABEL_SEPARATOR: &str = " | ";

/// 进度快照归约后的显示结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDisplay {
    pub label: String,
    // 进度条百分比，无法计算时为 None，此时进度条保持原样
    pub bar_percent: Option<f64>,
}

/// 把后端的进度快照归约成一行标签和进度条宽度。
///
/// 缺失的字段对应的片段会被省略，不会出现 0% 或 NaN。
pub fn reduce(snapshot: &ProgressSnapshot) -> ProgressDisplay {
    let done = snapshot.downloaded_bytes;
    let total = snapshot.total_bytes;

    let parts = [
        Some(snapshot.status.clone()),
        snapshot
            .filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("file: {}", basename(name))),
        pct_text(done, total).map(|pct| format!("progress: {}", pct)),
        snapshot
            .speed
            .map(|speed| format!("speed: {}/s", human_bytes(Some(speed)))),
        snapshot.eta.map(|eta| format!("eta: {}s", eta)),
    ];

    let label = parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR);

    ProgressDisplay {
        label,
        bar_percent: pct_number(done, total),
    }
}
