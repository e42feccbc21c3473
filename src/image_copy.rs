use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardError, ClipboardImage, ClipboardProvider};

#[derive(Debug, Error)]
pub enum CopyImageError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not load image at {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// What ended up on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedImage {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
}

/// Turn a caller-supplied path string into a filesystem path.
///
/// Relative paths are joined onto `base_dir` when one is given and otherwise
/// left relative to the process working directory.
pub fn resolve_path(raw: &str, base_dir: Option<&Path>) -> Result<PathBuf, CopyImageError> {
    if raw.trim().is_empty() {
        return Err(CopyImageError::InvalidArgument(
            "image path is empty".to_string(),
        ));
    }

    let path = PathBuf::from(raw);
    match base_dir {
        Some(base) if path.is_relative() => Ok(base.join(path)),
        _ => Ok(path),
    }
}

/// Decode the file at `path` into RGBA8 pixels.
///
/// The format is sniffed from the file contents, so a PNG saved as `.jpg` still loads.
pub fn load_image(path: &Path) -> Result<ClipboardImage, CopyImageError> {
    let decode_err = |reason: String| CopyImageError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;

    debug!(path = %path.display(), format = ?reader.format(), "Decoding image");

    let decoded = reader.decode().map_err(|e| decode_err(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(ClipboardImage {
        width: width as usize,
        height: height as usize,
        bytes: rgba.into_raw(),
    })
}

/// Load the image at `raw_path` and install it as the clipboard's image content.
pub fn copy_image_to_clipboard(
    raw_path: &str,
    base_dir: Option<&Path>,
    clipboard: &dyn ClipboardProvider,
) -> Result<CopiedImage, CopyImageError> {
    let path = resolve_path(raw_path, base_dir)?;

    let image = load_image(&path).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "Unable to load image");
    })?;

    let copied = CopiedImage {
        path,
        width: image.width,
        height: image.height,
    };

    clipboard.set_image(image)?;

    info!(
        path = %copied.path.display(),
        width = copied.width,
        height = copied.height,
        "Copied image to clipboard"
    );
    Ok(copied)
}
