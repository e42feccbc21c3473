use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::image_copy::CopiedImage;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CopyImageRequest {
    #[schemars(description = "Path to the image file. Relative paths resolve against the configured base directory.")]
    pub path: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CopyImageResponse {
    pub path: String,
    pub width: usize,
    pub height: usize,
    #[schemars(description = "Human-readable summary. Show this directly to the user.")]
    pub message: String,
}

impl From<&CopiedImage> for CopyImageResponse {
    fn from(copied: &CopiedImage) -> Self {
        let path = copied.path.display().to_string();
        Self {
            message: format!(
                "Copied {} ({}x{}) to the clipboard",
                path, copied.width, copied.height
            ),
            path,
            width: copied.width,
            height: copied.height,
        }
    }
}
