//! 进度字段的格式化工具，全部是纯函数。

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 把字节数格式化成带单位的文本，保留一位小数。
///
/// `None` 表示字段缺失，返回空字符串；`Some(0.0)` 是合法值，返回 `"0.0 B"`。
pub fn human_bytes(bytes: Option<f64>) -> String {
    let Some(mut n) = bytes else {
        return String::new();
    };

    let mut unit = 0;
    while n >= 1024.0 && unit < UNITS.len() - 1 {
        n /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", n, UNITS[unit])
}

/// 下载百分比，范围限制在 [0, 100]。
///
/// 任一字段缺失或为 0 时无法计算，返回 `None`。
pub fn pct_number(done: Option<u64>, total: Option<u64>) -> Option<f64> {
    match (done, total) {
        (Some(done), Some(total)) if done > 0 && total > 0 => {
            Some((done as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    }
}

// 例如 "50.0%"
pub fn pct_text(done: Option<u64>, total: Option<u64>) -> Option<String> {
    pct_number(done, total).map(|pct| format!("{:.1}%", pct))
}

/// 取路径最后一段（同时支持 `/` 和 `\`），再做百分号解码。
///
/// 存在不完整的转义序列或解码失败时，原样返回最后一段。
pub fn basename(path: &str) -> String {
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if !escapes_well_formed(segment) {
        return segment.to_string();
    }
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

// 每个 % 后面都必须紧跟两位十六进制数字
fn escapes_well_formed(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
