//! Method channel: named calls in, one result or structured error out.

pub mod channel;
pub mod errors;
pub mod image_clipboard;
pub mod transport;

use std::sync::Arc;

pub use channel::{MethodCall, MethodChannel, MethodHandler, MethodResult};
pub use errors::BridgeError;
pub use image_clipboard::{COPY_IMAGE, ImageClipboardHandler};

use crate::clipboard::ClipboardProvider;
use crate::config::Config;

impl MethodChannel {
    /// The standard channel with `copyImage` registered, configured from `config`.
    pub fn image_clipboard(config: &Config, clipboard: Arc<dyn ClipboardProvider>) -> Self {
        let handler = ImageClipboardHandler::new(clipboard)
            .with_base_dir(config.base_dir.clone())
            .with_decode_failure(config.decode_failure);

        let mut channel = MethodChannel::new(config.channel.clone());
        channel.register(Arc::new(handler));
        channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::DecodeFailurePolicy;
    use crate::image_copy::test_support::write_png;
    use serde_json::json;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_standard_channel_serves_copy_image() {
        let config = Config::default();
        let channel = MethodChannel::image_clipboard(&config, Arc::new(MemoryClipboard::new()));

        assert_eq!(channel.name(), "fcode/image_clipboard");
        assert_eq!(channel.methods(), vec![COPY_IMAGE.to_string()]);
        assert_eq!(
            channel.invoke(&MethodCall::new("getPlatformVersion", None)),
            MethodResult::NotImplemented
        );
    }

    #[test]
    fn test_standard_channel_applies_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_dir: Some(temp_dir.path().to_path_buf()),
            decode_failure: DecodeFailurePolicy::Report,
            ..Config::default()
        };
        let channel = MethodChannel::image_clipboard(&config, Arc::new(MemoryClipboard::new()));

        write_png(temp_dir.path(), "ok.png", 1, 1, [0, 0, 0, 255]);
        let ok = channel.invoke(&MethodCall::new(COPY_IMAGE, Some(json!({"path": "ok.png"}))));
        let missing =
            channel.invoke(&MethodCall::new(COPY_IMAGE, Some(json!({"path": "gone.png"}))));

        assert!(ok.is_success());
        assert_eq!(missing.error_code(), Some(errors::DECODE_FAILED));
    }

    #[test]
    fn test_concurrent_calls_leave_one_whole_image() {
        let temp_dir = TempDir::new().unwrap();
        let clipboard = Arc::new(MemoryClipboard::new());
        let channel = Arc::new(MethodChannel::image_clipboard(
            &Config::default(),
            clipboard.clone(),
        ));

        let paths: Vec<_> = (1..=6u8)
            .map(|n| {
                write_png(
                    temp_dir.path(),
                    &format!("{n}.png"),
                    n as u32,
                    n as u32,
                    [n, n, n, 255],
                )
            })
            .collect();

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let channel = Arc::clone(&channel);
                thread::spawn(move || {
                    channel.invoke(&MethodCall::new(COPY_IMAGE, Some(json!({"path": path}))))
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_success());
        }

        let held = clipboard.get_image().unwrap().unwrap();
        let n = held.width;
        assert_eq!(held.height, n);
        assert_eq!(held.bytes.len(), n * n * 4);
        assert!(held.bytes.chunks(4).all(|px| px == [n as u8, n as u8, n as u8, 255]));
        assert_eq!(clipboard.write_count(), 6);
    }
}
