use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, Json,
};
use tracing::{error, info, warn};

use crate::clipboard::{ClipboardProvider, SystemClipboard};
use crate::config::Config;
use crate::image_copy::copy_image_to_clipboard;

use super::errors::McpErrorDetail;
use super::schemas::{CopyImageRequest, CopyImageResponse};

#[derive(Clone)]
pub struct ImageClipboardMcpServer {
    tool_router: ToolRouter<Self>,
    clipboard: Arc<dyn ClipboardProvider>,
    base_dir: Option<PathBuf>,
}

impl ImageClipboardMcpServer {
    pub fn new(config: &Config) -> Self {
        Self::with_clipboard(config, Arc::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(config: &Config, clipboard: Arc<dyn ClipboardProvider>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            clipboard,
            base_dir: config.base_dir.clone(),
        }
    }
}

fn format_error(detail: McpErrorDetail) -> String {
    if detail.retryable {
        warn!(code = %detail.code, message = %detail.message, "Retryable error occurred");
    } else {
        error!(code = %detail.code, message = %detail.message, "Non-retryable error occurred");
    }
    serde_json::to_string(&detail).unwrap_or(detail.message)
}

#[tool_router]
impl ImageClipboardMcpServer {
    #[tool(
        name = "copy_image",
        description = "Load the image file at 'path' and place it on the system clipboard so it can be pasted into other applications."
    )]
    async fn copy_image(
        &self,
        params: Parameters<CopyImageRequest>,
    ) -> Result<Json<CopyImageResponse>, String> {
        let req = params.0;
        info!(path = %req.path, "copy_image called");

        let clipboard = Arc::clone(&self.clipboard);
        let base_dir = self.base_dir.clone();

        let copied = tokio::task::spawn_blocking(move || {
            copy_image_to_clipboard(&req.path, base_dir.as_deref(), clipboard.as_ref())
        })
        .await
        .map_err(|e| format_error(McpErrorDetail::internal(e.to_string())))?
        .map_err(|e| format_error(McpErrorDetail::from(e)))?;

        let response = CopyImageResponse::from(&copied);
        info!(path = %response.path, width = response.width, height = response.height, "copy_image completed");
        Ok(Json(response))
    }
}

#[tool_handler(router = self.tool_router)]
impl rmcp::ServerHandler for ImageClipboardMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image clipboard server.\n\n\
                TOOLS:\n\
                - copy_image: Copy the image file at 'path' to the system clipboard.\n\n\
                NOTES:\n\
                - Prefer absolute paths.\n\
                - Errors are JSON objects with 'code', 'message', 'retryable' and optionally 'suggestion'."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::image_copy::test_support::write_png;
    use tempfile::TempDir;

    fn server_in(dir: &TempDir, clipboard: Arc<MemoryClipboard>) -> ImageClipboardMcpServer {
        let config = Config {
            base_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        ImageClipboardMcpServer::with_clipboard(&config, clipboard)
    }

    #[tokio::test]
    async fn test_copy_image_tool_success() {
        let temp_dir = TempDir::new().unwrap();
        write_png(temp_dir.path(), "shot.png", 8, 6, [10, 20, 30, 255]);
        let clipboard = Arc::new(MemoryClipboard::new());
        let server = server_in(&temp_dir, clipboard.clone());

        let Json(response) = server
            .copy_image(Parameters(CopyImageRequest {
                path: "shot.png".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!((response.width, response.height), (8, 6));
        assert_eq!(clipboard.write_count(), 1);
    }

    #[tokio::test]
    async fn test_copy_image_tool_reports_decode_failure() {
        let temp_dir = TempDir::new().unwrap();
        let clipboard = Arc::new(MemoryClipboard::new());
        let server = server_in(&temp_dir, clipboard.clone());

        let err = server
            .copy_image(Parameters(CopyImageRequest {
                path: "missing.png".to_string(),
            }))
            .await
            .err()
            .unwrap();

        let detail: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(detail["code"], "DECODE_FAILED");
        assert_eq!(clipboard.write_count(), 0);
    }

    #[tokio::test]
    async fn test_copy_image_tool_rejects_blank_path() {
        let temp_dir = TempDir::new().unwrap();
        let server = server_in(&temp_dir, Arc::new(MemoryClipboard::new()));

        let err = server
            .copy_image(Parameters(CopyImageRequest {
                path: "  ".to_string(),
            }))
            .await
            .err()
            .unwrap();

        assert!(err.contains("INVALID_ARGS"));
    }
}
