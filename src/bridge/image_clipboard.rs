use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::channel::{MethodCall, MethodHandler, MethodResult};
use super::errors::BridgeError;
use crate::clipboard::ClipboardProvider;
use crate::config::DecodeFailurePolicy;
use crate::image_copy::{CopyImageError, copy_image_to_clipboard};

pub const COPY_IMAGE: &str = "copyImage";

/// Serves `copyImage`: copy the image file named by the `path` argument to the clipboard.
pub struct ImageClipboardHandler {
    clipboard: Arc<dyn ClipboardProvider>,
    base_dir: Option<PathBuf>,
    decode_failure: DecodeFailurePolicy,
}

impl ImageClipboardHandler {
    pub fn new(clipboard: Arc<dyn ClipboardProvider>) -> Self {
        Self {
            clipboard,
            base_dir: None,
            decode_failure: DecodeFailurePolicy::default(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: Option<PathBuf>) -> Self {
        self.base_dir = base_dir;
        self
    }

    pub fn with_decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.decode_failure = policy;
        self
    }

    fn copy_image(&self, call: &MethodCall) -> MethodResult {
        let Some(path) = call.string_argument("path") else {
            warn!(arguments = ?call.arguments, "copyImage called without a path");
            return MethodResult::error(BridgeError::invalid_args(
                "arguments must be a mapping with a 'path' string",
            ));
        };

        info!(path = %path, "copyImage called");

        match copy_image_to_clipboard(path, self.base_dir.as_deref(), self.clipboard.as_ref()) {
            Ok(_) => MethodResult::success(),
            Err(CopyImageError::InvalidArgument(reason)) => {
                MethodResult::error(BridgeError::invalid_args(reason))
            }
            Err(CopyImageError::Decode { path, reason }) => match self.decode_failure {
                DecodeFailurePolicy::Ignore => MethodResult::success(),
                DecodeFailurePolicy::Report => MethodResult::error(BridgeError::decode_failed(
                    path.display().to_string(),
                    reason,
                )),
            },
            Err(CopyImageError::Clipboard(e)) => {
                error!(error = %e, "Clipboard write failed");
                MethodResult::error(BridgeError::clipboard_unavailable(e.to_string()))
            }
        }
    }
}

impl MethodHandler for ImageClipboardHandler {
    fn methods(&self) -> &[&'static str] {
        &[COPY_IMAGE]
    }

    fn handle(&self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            COPY_IMAGE => self.copy_image(call),
            _ => MethodResult::NotImplemented,
        }
    }
}
