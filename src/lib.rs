//! Save Screens — clipboard image to numbered PNG.
//!
//! The library holds the whole save flow so the command-line binaries and
//! the desktop window share one implementation:
//! - Configuration file (config.rs)
//! - Clipboard capture and PNG writing (capture/)
//! - File naming (naming.rs), counter refresh (refresh.rs)
//! - Background tasks for the window (task.rs)
//!
//! With the `gui` feature it also provides the Tauri app shell: tray,
//! global shortcut and the command handlers the window calls.

pub mod capture;
pub mod config;
pub mod launcher;
pub mod naming;
pub mod refresh;
pub mod save;
pub mod task;

#[cfg(feature = "gui")]
mod commands;
#[cfg(feature = "gui")]
mod tray;

#[cfg(feature = "gui")]
pub use gui::run;

#[cfg(feature = "gui")]
mod gui {
    use crate::commands::{self, AppState};
    use crate::config::{ConfigStore, Session};
    use crate::tray;
    use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut, ShortcutState};

    /// Cmd+Shift+S on macOS, Ctrl+Shift+S elsewhere.
    fn save_shortcut() -> Shortcut {
        #[cfg(target_os = "macos")]
        let primary = Modifiers::SUPER;
        #[cfg(not(target_os = "macos"))]
        let primary = Modifiers::CONTROL;
        Shortcut::new(Some(primary | Modifiers::SHIFT), Code::KeyS)
    }

    /// Entry point — called by the `save-screens-gui` binary.
    pub fn run() {
        env_logger::init();

        let store = ConfigStore::in_working_dir();
        log::info!("[GUI] Using config {}", store.path().display());
        let state = AppState::new(Session::open(store));

        tauri::Builder::default()
            .plugin(tauri_plugin_dialog::init())
            .plugin(
                tauri_plugin_global_shortcut::Builder::new()
                    .with_handler(|app, shortcut, event| {
                        if event.state == ShortcutState::Pressed && shortcut == &save_shortcut() {
                            log::info!("[GUI] Save shortcut pressed");
                            commands::spawn_save(app);
                        }
                    })
                    .build(),
            )
            .manage(state)
            .invoke_handler(tauri::generate_handler![
                commands::get_config,
                commands::reload_config,
                commands::set_folder,
                commands::browse_folder,
                commands::save_pattern,
                commands::set_use_pattern,
                commands::save_clipboard,
                commands::refresh_counter,
                commands::open_folder,
            ])
            .setup(|app| {
                log::info!("[GUI] Save Screens starting up");

                tray::setup_tray(app.handle())?;

                if let Err(e) = app.global_shortcut().register(save_shortcut()) {
                    // Some desktops (e.g. Wayland sessions) refuse global hotkeys.
                    log::warn!("[GUI] Could not register save shortcut: {}", e);
                }
                Ok(())
            })
            .run(tauri::generate_context!())
            .expect("Error running Save Screens");
    }
}
