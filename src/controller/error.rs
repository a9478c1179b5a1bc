use thiserror::Error;

use crate::common::api::error::ApiError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("缺少下载链接")]
    EmptyUrl,

    #[error("未知的格式预设: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
