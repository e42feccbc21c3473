use schemars::JsonSchema;
use serde::Serialize;

use crate::image_copy::CopyImageError;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct McpErrorDetail {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl McpErrorDetail {
    pub fn invalid_input(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            code: "INVALID_ARGS".to_string(),
            message: message.into(),
            retryable: true,
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self {
            code: "DECODE_FAILED".to_string(),
            message: message.into(),
            retryable: true,
            suggestion: Some(
                "Check that the path exists and points to a PNG, JPEG, GIF, WebP, BMP or other supported image".to_string(),
            ),
        }
    }

    pub fn clipboard_unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "CLIPBOARD_UNAVAILABLE".to_string(),
            message: message.into(),
            retryable: false,
            suggestion: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            retryable: false,
            suggestion: None,
        }
    }
}

impl From<CopyImageError> for McpErrorDetail {
    fn from(err: CopyImageError) -> Self {
        match err {
            CopyImageError::InvalidArgument(reason) => {
                Self::invalid_input(reason, "Provide an absolute path to an image file")
            }
            e @ CopyImageError::Decode { .. } => Self::decode_failed(e.to_string()),
            CopyImageError::Clipboard(e) => Self::clipboard_unavailable(e.to_string()),
        }
    }
}
