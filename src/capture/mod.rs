//! Clipboard capture domain — public API.
//!
//! This module owns everything between the OS clipboard and a PNG on disk.
//! External code should only use the items exported here.

mod clipboard;
mod image_file;

pub use clipboard::SystemClipboard;
pub use image_file::{image_from_rgba, write_png, ImageFileError};

use image::RgbaImage;
use std::path::PathBuf;

/// What the clipboard held at the moment it was read.
#[derive(Debug, Clone)]
pub enum ClipboardContent {
    Image(RgbaImage),
    /// File paths were copied instead of pixel data. Never empty.
    FilePaths(Vec<PathBuf>),
    Empty,
}

/// Anything that can be asked for the current clipboard content.
///
/// The save flow only depends on this trait, so tests can hand it a
/// canned value instead of the real clipboard.
pub trait ClipboardSource {
    fn read(&mut self) -> Result<ClipboardContent, ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard is unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read clipboard: {0}")]
    Read(String),

    #[error(transparent)]
    InvalidImage(#[from] ImageFileError),
}
