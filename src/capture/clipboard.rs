//! System clipboard access using the `arboard` crate.
//!
//! This is the infrastructure layer — it talks to the OS. Image data wins
//! over a file list; anything else counts as an empty clipboard.

use super::{image_from_rgba, ClipboardContent, ClipboardError, ClipboardSource};
use arboard::Clipboard;

/// The real OS clipboard.
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }

    fn read_files(&mut self) -> Result<ClipboardContent, ClipboardError> {
        match self.inner.get().file_list() {
            Ok(paths) if !paths.is_empty() => {
                log::info!("[CLIPBOARD] Found {} file path(s)", paths.len());
                Ok(ClipboardContent::FilePaths(paths))
            }
            Ok(_) | Err(arboard::Error::ContentNotAvailable) => Ok(ClipboardContent::Empty),
            // Some backends cannot express a file list at all.
            Err(arboard::Error::ClipboardNotSupported) => Ok(ClipboardContent::Empty),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}

impl ClipboardSource for SystemClipboard {
    fn read(&mut self) -> Result<ClipboardContent, ClipboardError> {
        match self.inner.get_image() {
            Ok(data) => {
                log::info!("[CLIPBOARD] Found image {}x{}", data.width, data.height);
                let image = image_from_rgba(data.width, data.height, data.bytes.into_owned())?;
                Ok(ClipboardContent::Image(image))
            }
            Err(arboard::Error::ContentNotAvailable) => self.read_files(),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}
