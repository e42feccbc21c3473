use std::borrow::Cow;
use std::sync::Mutex;

use arboard::Clipboard;
use thiserror::Error;
use tracing::debug;
#[cfg(target_os = "linux")]
use tracing::info;

/// Decoded image ready for the clipboard: RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}

impl ClipboardImage {
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write image to clipboard: {0}")]
    Write(String),
    #[error("failed to read clipboard: {0}")]
    Read(String),
}

/// Anything that can hold the image half of a clipboard.
pub trait ClipboardProvider: Send + Sync {
    fn set_image(&self, image: ClipboardImage) -> Result<(), ClipboardError>;

    /// Returns `Ok(None)` when the clipboard holds no image.
    fn get_image(&self) -> Result<Option<ClipboardImage>, ClipboardError>;
}

/// A handle opened on first use and kept for the life of its owner.
///
/// The mutex also makes every use of the handle sequential. A use that fails
/// drops the handle so the next one reopens it.
struct Session<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Session<T> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn with<R, E>(
        &self,
        open: impl FnOnce() -> Result<T, E>,
        operation: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let mut handle = match slot.take() {
            Some(handle) => handle,
            None => open()?,
        };

        let result = operation(&mut handle);
        if result.is_ok() {
            *slot = Some(handle);
        }
        result
    }
}

/// The OS clipboard via `arboard`.
///
/// One `arboard::Clipboard` is opened lazily and kept while this value lives.
/// On X11 the selection is only served while an instance exists, so dropping
/// it after each write would lose the image in long-running servers.
pub struct SystemClipboard {
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    hold: bool,
    session: Session<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            hold: false,
            session: Session::new(),
        }
    }

    /// On Linux, block after writing until another application takes the
    /// selection. X11 and Wayland drop clipboard contents when the owning
    /// process exits, so one-shot commands need this.
    pub fn holding(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }

    fn open() -> Result<Clipboard, ClipboardError> {
        Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }

    #[cfg(target_os = "linux")]
    fn write(&self, clipboard: &mut Clipboard, data: arboard::ImageData<'_>) -> Result<(), arboard::Error> {
        use arboard::SetExtLinux;

        if self.hold {
            info!("Holding clipboard selection until another application replaces it");
            clipboard.set().wait().image(data)
        } else {
            clipboard.set_image(data)
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn write(&self, clipboard: &mut Clipboard, data: arboard::ImageData<'_>) -> Result<(), arboard::Error> {
        clipboard.set_image(data)
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_image(&self, image: ClipboardImage) -> Result<(), ClipboardError> {
        let (width, height) = (image.width, image.height);
        let data = arboard::ImageData {
            width,
            height,
            bytes: Cow::Owned(image.bytes),
        };

        self.session.with(Self::open, |clipboard| {
            self.write(clipboard, data)
                .map_err(|e| ClipboardError::Write(e.to_string()))
        })?;

        debug!(width, height, "Image written to system clipboard");
        Ok(())
    }

    fn get_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        self.session.with(Self::open, |clipboard| match clipboard.get_image() {
            Ok(image) => Ok(Some(ClipboardImage {
                width: image.width,
                height: image.height,
                bytes: image.bytes.into_owned(),
            })),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        })
    }
}

/// In-process clipboard. Used for dry runs and tests.
#[derive(Default)]
pub struct MemoryClipboard {
    image: Mutex<Option<ClipboardImage>>,
    writes: Mutex<usize>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn set_image(&self, image: ClipboardImage) -> Result<(), ClipboardError> {
        let mut slot = self.image.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(image);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn get_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        Ok(self.image.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}
