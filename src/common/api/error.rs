use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    // 后端返回非 2xx，message 取自响应体的 error 字段
    #[error("服务端拒绝请求 ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("无效的服务地址: {0}")]
    InvalidBaseUrl(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidBaseUrl(e.to_string())
    }
}
