//! Tauri commands called by the main window.
//!
//! The window, tray and shortcut share one `Session`. Every command re-reads
//! the config file before acting, so saves made by the command-line
//! binaries are picked up. Saves and refreshes run as background tasks and
//! hand back a `TaskReport`; the session lock is never held across the
//! clipboard read or the folder scan.

use crate::capture::{ClipboardSource, SystemClipboard};
use crate::config::Session;
use crate::launcher;
use crate::refresh;
use crate::save;
use crate::task::{self, JobOutput, TaskKind, TaskReport};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

/// Event carrying the `TaskReport` of a save started from tray or shortcut.
pub const TASK_FINISHED_EVENT: &str = "task-finished";

pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Configuration as shown in the window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    pub folder: String,
    pub pattern: String,
    pub use_pattern: bool,
    pub image_id: u64,
    pub config_path: String,
    pub destination: String,
}

impl ConfigView {
    fn of(session: &Session) -> Self {
        Self {
            folder: session.config.folder.clone(),
            pattern: session.config.effective_pattern().to_string(),
            use_pattern: session.config.use_pattern,
            image_id: session.config.image_id,
            config_path: session.store.path().display().to_string(),
            destination: session.destination().display().to_string(),
        }
    }
}

/// Lock the session, apply `edit`, and return the new view.
fn with_session<F>(state: &AppState, edit: F) -> Result<ConfigView, String>
where
    F: FnOnce(&mut Session) -> Result<(), String>,
{
    let mut guard = state.session.lock().map_err(|e| e.to_string())?;
    edit(&mut guard)?;
    Ok(ConfigView::of(&guard))
}

/// Tauri command: current config, freshly read from disk.
#[tauri::command]
pub fn get_config(state: tauri::State<'_, AppState>) -> Result<ConfigView, String> {
    with_session(&state, |session| {
        session.reload();
        Ok(())
    })
}

/// Tauri command: discard in-memory edits and re-read the file.
#[tauri::command]
pub fn reload_config(state: tauri::State<'_, AppState>) -> Result<ConfigView, String> {
    with_session(&state, |session| {
        session.reload();
        log::info!("[GUI] Config reloaded");
        Ok(())
    })
}

/// Tauri command: change the destination folder. Persisted immediately,
/// together with the pattern field's text when it is not empty.
#[tauri::command]
pub fn set_folder(
    state: tauri::State<'_, AppState>,
    folder: String,
    pattern: Option<String>,
) -> Result<ConfigView, String> {
    apply_folder(&state, folder, pattern)
}

fn apply_folder(state: &AppState, folder: String, pattern: Option<String>) -> Result<ConfigView, String> {
    with_session(state, |session| {
        log::info!("[GUI] Folder set to {}", folder);
        session.reload();
        session
            .set_folder(folder, pattern.as_deref())
            .map_err(|e| e.to_string())
    })
}

/// Tauri command: pick the destination folder with the native dialog.
///
/// Returns `None` when the user cancels.
#[tauri::command]
pub async fn browse_folder(
    app: AppHandle,
    state: tauri::State<'_, AppState>,
    pattern: Option<String>,
) -> Result<Option<ConfigView>, String> {
    let start_dir = {
        let guard = state.session.lock().map_err(|e| e.to_string())?;
        let destination = guard.destination();
        if destination.is_dir() {
            destination
        } else {
            dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        }
    };

    let picked = app
        .dialog()
        .file()
        .set_directory(start_dir)
        .blocking_pick_folder();

    let Some(picked) = picked else {
        return Ok(None);
    };
    let path = picked.into_path().map_err(|e| e.to_string())?;
    apply_folder(&state, path.display().to_string(), pattern).map(Some)
}

/// Tauri command: persist the filename pattern. Empty patterns are refused.
#[tauri::command]
pub fn save_pattern(state: tauri::State<'_, AppState>, pattern: String) -> Result<ConfigView, String> {
    let pattern = pattern.trim().to_string();
    if pattern.is_empty() {
        return Err("Pattern cannot be empty".to_string());
    }
    with_session(&state, |session| {
        log::info!("[GUI] Pattern saved: {}", pattern);
        session.reload();
        let mut next = session.config.clone();
        next.pattern = Some(pattern);
        session.commit(next).map_err(|e| e.to_string())
    })
}

/// Tauri command: switch between pattern names and bare counter names.
#[tauri::command]
pub fn set_use_pattern(
    state: tauri::State<'_, AppState>,
    use_pattern: bool,
) -> Result<ConfigView, String> {
    with_session(&state, |session| {
        session.reload();
        let mut next = session.config.clone();
        next.use_pattern = use_pattern;
        session.commit(next).map_err(|e| e.to_string())
    })
}

/// Tauri command: save the clipboard image as a background task.
#[tauri::command]
pub async fn save_clipboard(state: tauri::State<'_, AppState>) -> Result<TaskReport, String> {
    Ok(run_save(state.session.clone()).await)
}

/// Tauri command: refresh the counter from the folder as a background task.
#[tauri::command]
pub async fn refresh_counter(state: tauri::State<'_, AppState>) -> Result<TaskReport, String> {
    let session = state.session.clone();
    let report = task::run_blocking(TaskKind::RefreshCounter, task::DEFAULT_TIMEOUT, move || {
        let (config, folder) = {
            let mut guard = session.lock().map_err(|e| e.to_string())?;
            guard.reload();
            (guard.config.clone(), guard.destination())
        };
        let scan = refresh::scan_folder(&config, &folder).map_err(|e| e.to_string())?;

        let mut guard = session.lock().map_err(|e| e.to_string())?;
        let outcome = refresh::apply_scan(&mut guard, scan).map_err(|e| e.to_string())?;
        Ok(JobOutput::line(outcome.message(), outcome.current))
    })
    .await;
    Ok(report)
}

/// Tauri command: open the destination folder in the file browser.
#[tauri::command]
pub fn open_folder(state: tauri::State<'_, AppState>) -> Result<(), String> {
    let destination = {
        let mut guard = state.session.lock().map_err(|e| e.to_string())?;
        guard.reload();
        guard.destination()
    };
    launcher::open_in_file_browser(&destination).map_err(|e| e.to_string())
}

async fn run_save(session: Arc<Mutex<Session>>) -> TaskReport {
    task::run_blocking(TaskKind::SaveClipboard, task::DEFAULT_TIMEOUT, move || {
        {
            let mut guard = session.lock().map_err(|e| e.to_string())?;
            save::prepare_destination(&mut guard).map_err(|e| e.to_string())?;
        }

        // A stalled clipboard backend must not keep the session locked.
        let mut clipboard = SystemClipboard::new().map_err(|e| e.to_string())?;
        let content = clipboard.read().map_err(|e| e.to_string())?;

        let mut guard = session.lock().map_err(|e| e.to_string())?;
        let now = chrono::Local::now().naive_local();
        let outcome = save::store_content(&mut guard, content, now).map_err(|e| e.to_string())?;
        Ok(JobOutput::line(outcome.message(), guard.config.image_id))
    })
    .await
}

/// Start a save outside the window (tray, shortcut) and broadcast its report.
pub fn spawn_save(app: &AppHandle) {
    let app = app.clone();
    let session = app.state::<AppState>().session.clone();
    tauri::async_runtime::spawn(async move {
        let report = run_save(session).await;
        if let Err(e) = app.emit(TASK_FINISHED_EVENT, &report) {
            log::error!("[GUI] Failed to emit {}: {}", TASK_FINISHED_EVENT, e);
        }
    });
}
