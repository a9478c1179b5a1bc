use crate::common::api::models::DownloadRequest;

use super::error::ControllerError;

// 选择该值时使用用户自定义的格式字符串
pub const CUSTOM_FORMAT: &str = "__custom__";

// 预设的格式选择器，空字符串表示交给后端默认
pub const FORMAT_PRESETS: &[&str] = &[
    "",
    "bv*+ba/b",
    "bv*[height<=1080]+ba/b[height<=1080]",
    "bv*[height<=720]+ba/b[height<=720]",
    "bestaudio/best",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatChoice {
    Preset(String),
    Custom(String),
}

impl FormatChoice {
    // 下拉框的值为 CUSTOM_FORMAT 时取自定义输入
    pub fn from_selector(preset: &str, custom: &str) -> Self {
        if preset == CUSTOM_FORMAT {
            FormatChoice::Custom(custom.to_string())
        } else {
            FormatChoice::Preset(preset.to_string())
        }
    }

    pub fn resolve(&self) -> Result<&str, ControllerError> {
        match self {
            FormatChoice::Preset(p) if FORMAT_PRESETS.contains(&p.as_str()) => Ok(p.as_str()),
            FormatChoice::Preset(p) => Err(ControllerError::UnknownPreset(p.clone())),
            FormatChoice::Custom(fmt) => Ok(fmt.as_str()),
        }
    }
}

impl Default for FormatChoice {
    fn default() -> Self {
        FormatChoice::Preset(String::new())
    }
}

/// 下载表单的输入
#[derive(Debug, Clone, Default)]
pub struct DownloadForm {
    pub url: String,
    pub format: FormatChoice,
    pub audio_only: bool,
    pub subtitles: bool,
    pub embed_thumbnail: bool,
    pub mp4_only: bool,
}

impl DownloadForm {
    /// 校验并序列化成请求体。
    ///
    /// 只检查链接非空，其余校验交给后端。
    pub fn to_request(&self) -> Result<DownloadRequest, ControllerError> {
        if self.url.trim().is_empty() {
            return Err(ControllerError::EmptyUrl);
        }

        Ok(DownloadRequest {
            url: self.url.clone(),
            audio_only: self.audio_only,
            format: self.format.resolve()?.to_string(),
            subtitles: self.subtitles,
            embed_thumbnail: self.embed_thumbnail,
            mp4_only: self.mp4_only,
        })
    }
}
