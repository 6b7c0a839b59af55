//! Open a folder in the platform file browser.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Program that opens a folder on this platform.
pub fn platform_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Launch the file browser on `path` without waiting for it to close.
pub fn open_in_file_browser(path: &Path) -> Result<(), LaunchError> {
    if !path.exists() {
        return Err(LaunchError::MissingFolder(path.to_path_buf()));
    }

    let opener = platform_opener();
    let program = which::which(opener).map_err(|e| LaunchError::OpenerNotFound {
        opener,
        reason: e.to_string(),
    })?;

    let mut child = Command::new(&program)
        .arg(path)
        .spawn()
        .map_err(|e| LaunchError::SpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;
    log::info!("[LAUNCH] {} {}", program.display(), path.display());

    // Reap the opener in the background so it does not linger as a zombie.
    std::thread::spawn(move || {
        let _ = child.wait();
    });

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Folder does not exist: {}", .0.display())]
    MissingFolder(PathBuf),

    #[error("No `{opener}` on this system: {reason}")]
    OpenerNotFound { opener: &'static str, reason: String },

    #[error("Failed to start {}: {reason}", program.display())]
    SpawnFailed { program: PathBuf, reason: String },
}
