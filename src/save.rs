//! Save operation — clipboard image to a numbered PNG.
//!
//! Single pass, no retries. The counter is reserved (incremented and
//! persisted) before the image is written, so a failed write still leaves
//! the counter advanced.

use crate::capture::{self, ClipboardContent, ClipboardError, ClipboardSource, ImageFileError};
use crate::config::{ConfigError, Session};
use crate::naming::{self, NamingStrategy};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

/// How a save attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The image was written; `image_id` is the id used for its name.
    Saved { path: PathBuf, image_id: u64 },
    /// File paths were on the clipboard. Nothing changed.
    FilePaths(usize),
    /// No image on the clipboard. Nothing changed.
    Empty,
}

impl SaveOutcome {
    /// The line shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Saved { path, .. } => format!("Saved to: {}", path.display()),
            Self::FilePaths(_) => "Clipboard contains file paths, not an image.".to_string(),
            Self::Empty => "No image in clipboard.".to_string(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Save the clipboard image into the configured folder.
///
/// Runs the three phases back to back: [`prepare_destination`], a
/// clipboard read, [`store_content`]. Callers that share the session with
/// other threads can run the phases themselves and keep the clipboard read
/// outside their lock.
pub fn save_clipboard_image<C>(
    session: &mut Session,
    clipboard: &mut C,
    now: NaiveDateTime,
) -> Result<SaveOutcome, SaveError>
where
    C: ClipboardSource + ?Sized,
{
    prepare_destination(session)?;
    let content = clipboard.read()?;
    store_content(session, content, now)
}

/// Re-read the configuration and make sure the destination folder exists.
///
/// The folder is created even when the clipboard later turns out to hold
/// no image.
pub fn prepare_destination(session: &mut Session) -> Result<PathBuf, SaveError> {
    session.reload();
    let folder = session.destination();
    ensure_folder(&folder)?;
    Ok(folder)
}

/// Act on what the clipboard held.
///
/// Only an image touches the configuration: the file is re-read, the
/// counter is reserved and written, then the PNG is written.
pub fn store_content(
    session: &mut Session,
    content: ClipboardContent,
    now: NaiveDateTime,
) -> Result<SaveOutcome, SaveError> {
    let image = match content {
        ClipboardContent::Image(image) => image,
        ClipboardContent::FilePaths(paths) => {
            log::info!("[SAVE] Clipboard holds {} file path(s), skipping", paths.len());
            return Ok(SaveOutcome::FilePaths(paths.len()));
        }
        ClipboardContent::Empty => {
            log::info!("[SAVE] Clipboard holds no image, skipping");
            return Ok(SaveOutcome::Empty);
        }
    };

    // Another writer may have moved the counter since the session was loaded.
    session.reload();
    let folder = session.destination();
    ensure_folder(&folder)?;

    let image_id = session.config.image_id;
    let next_id = image_id.checked_add(1).ok_or(SaveError::CounterExhausted(image_id))?;
    let strategy = NamingStrategy::from_flag(session.config.use_pattern);
    let file_name = naming::file_name(strategy, session.config.effective_pattern(), image_id, now);

    let mut next = session.config.clone();
    next.image_id = next_id;
    session.commit(next)?;

    let path = folder.join(file_name);
    capture::write_png(&image, &path)?;

    log::info!(
        "[SAVE] Wrote {}x{} image #{} to {}",
        image.width(),
        image.height(),
        image_id,
        path.display()
    );

    Ok(SaveOutcome::Saved { path, image_id })
}

fn ensure_folder(folder: &Path) -> Result<(), SaveError> {
    if !folder.exists() {
        fs::create_dir_all(folder).map_err(|source| SaveError::CreateFolder {
            path: folder.to_path_buf(),
            source,
        })?;
        log::info!("[SAVE] Created destination folder {}", folder.display());
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to create folder {}: {source}", path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image counter is exhausted at {0}")]
    CounterExhausted(u64),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Image(#[from] ImageFileError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use chrono::NaiveDate;
    use image::RgbaImage;

    struct Canned(Option<ClipboardContent>);

    impl ClipboardSource for Canned {
        fn read(&mut self) -> Result<ClipboardContent, ClipboardError> {
            self.0
                .take()
                .ok_or_else(|| ClipboardError::Read("already consumed".into()))
        }
    }

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    fn session_in(dir: &std::path::Path, json: &str) -> Session {
        let path = dir.join("save_screens_setup.json");
        std::fs::write(&path, json).unwrap();
        Session::open(ConfigStore::new(path))
    }

    #[test]
    fn saved_image_advances_counter_by_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(
            dir.path(),
            r#"{"folder":"shots","pattern":"shot_{id}_{timestamp}","image_id":3}"#,
        );
        let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(2, 2))));

        let outcome = save_clipboard_image(&mut session, &mut clipboard, clock()).unwrap();

        let expected = dir.path().join("shots").join("shot_3_20240102_030405.png");
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                path: expected.clone(),
                image_id: 3
            }
        );
        assert!(expected.exists());
        assert_eq!(session.config.image_id, 4);
        assert_eq!(session.store.load().image_id, 4);
    }

    #[test]
    fn empty_clipboard_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let original = r#"{"folder": "out", "image_id": 5}"#;
        let mut session = session_in(dir.path(), original);
        let mut clipboard = Canned(Some(ClipboardContent::Empty));

        let outcome = save_clipboard_image(&mut session, &mut clipboard, clock()).unwrap();

        assert_eq!(outcome, SaveOutcome::Empty);
        assert_eq!(outcome.message(), "No image in clipboard.");
        assert_eq!(session.config.image_id, 5);
        let on_disk = std::fs::read_to_string(session.store.path()).unwrap();
        assert_eq!(on_disk, original);
    }

    #[test]
    fn destination_created_even_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), r#"{"folder":"a/b/c"}"#);
        let mut clipboard = Canned(Some(ClipboardContent::Empty));

        save_clipboard_image(&mut session, &mut clipboard, clock()).unwrap();

        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn clipboard_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), r#"{"image_id":9}"#);
        let mut clipboard = Canned(None);

        let result = save_clipboard_image(&mut session, &mut clipboard, clock());

        assert!(matches!(result, Err(SaveError::Clipboard(_))));
        assert_eq!(session.store.load().image_id, 9);
    }

    #[test]
    fn failed_write_keeps_reserved_counter() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the target name makes the PNG write fail.
        std::fs::create_dir_all(dir.path().join("out").join("7.png")).unwrap();
        let mut session = session_in(dir.path(), r#"{"folder":"out","image_id":7}"#);
        let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(1, 1))));

        let result = save_clipboard_image(&mut session, &mut clipboard, clock());

        assert!(matches!(result, Err(SaveError::Image(_))));
        assert_eq!(session.store.load().image_id, 8);
    }

    #[test]
    fn stale_session_uses_counter_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut window = session_in(dir.path(), r#"{"folder":"out","image_id":5}"#);
        let mut other = Session::open(window.store.clone());
        for _ in 0..2 {
            let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(1, 1))));
            save_clipboard_image(&mut other, &mut clipboard, clock()).unwrap();
        }
        assert_eq!(window.config.image_id, 5);

        let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(1, 1))));
        let outcome = save_clipboard_image(&mut window, &mut clipboard, clock()).unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                path: dir.path().join("out").join("7.png"),
                image_id: 7
            }
        );
        assert_eq!(window.store.load().image_id, 8);
    }

    #[test]
    fn content_read_between_phases_sees_fresh_counter() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), r#"{"folder":"out","image_id":2}"#);

        prepare_destination(&mut session).unwrap();
        std::fs::write(session.store.path(), r#"{"folder":"out","image_id":30}"#).unwrap();
        let outcome = store_content(
            &mut session,
            ClipboardContent::Image(RgbaImage::new(1, 1)),
            clock(),
        )
        .unwrap();

        assert!(matches!(outcome, SaveOutcome::Saved { image_id: 30, .. }));
        assert_eq!(session.store.load().image_id, 31);
    }

    #[test]
    fn exhausted_counter_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let original = r#"{"folder":"out","image_id":18446744073709551615}"#;
        let mut session = session_in(dir.path(), original);
        let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(1, 1))));

        let result = save_clipboard_image(&mut session, &mut clipboard, clock());

        assert!(matches!(result, Err(SaveError::CounterExhausted(u64::MAX))));
        assert_eq!(std::fs::read_to_string(session.store.path()).unwrap(), original);
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_config_keeps_counter_and_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the config file should be: reads default, writes fail.
        let config_path = dir.path().join("save_screens_setup.json");
        std::fs::create_dir(&config_path).unwrap();
        let mut session = Session::open(ConfigStore::new(config_path));
        let mut clipboard = Canned(Some(ClipboardContent::Image(RgbaImage::new(1, 1))));

        let result = save_clipboard_image(&mut session, &mut clipboard, clock());

        assert!(matches!(result, Err(SaveError::Config(_))));
        assert_eq!(session.config.image_id, 1);
        assert!(!dir.path().join("1.png").exists());
    }
}
