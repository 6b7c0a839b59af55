//! System tray setup and click handler.
//!
//! The tray lets the user save the clipboard without bringing the window
//! forward. Left click shows the window, the menu holds the actions.

use crate::commands;
use tauri::{
    menu::{MenuBuilder, MenuItemBuilder},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

/// Sets up the tray icon and its menu.
///
/// Left-click: shows the main window.
/// Menu: Save Clipboard, Show Window, Quit.
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let save_item = MenuItemBuilder::with_id("save", "Save Clipboard").build(app)?;
    let show_item = MenuItemBuilder::with_id("show", "Show Window").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit Save Screens").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&save_item)
        .item(&show_item)
        .separator()
        .item(&quit_item)
        .build()?;

    let mut builder = TrayIconBuilder::new()
        .tooltip("Save Screens — save clipboard image")
        .menu(&menu)
        .show_menu_on_left_click(false);

    if let Some(icon) = app.default_window_icon().cloned() {
        builder = builder.icon(icon);
    }

    let _tray = builder
        .on_tray_icon_event(|tray_icon, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                show_main_window(tray_icon.app_handle());
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "save" => {
                log::info!("[GUI] Save requested from tray menu");
                commands::spawn_save(app);
            }
            "show" => show_main_window(app),
            "quit" => {
                log::info!("[GUI] Quit requested from tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}

fn show_main_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window("main") {
        if let Err(e) = window.show().and_then(|_| window.set_focus()) {
            log::warn!("[GUI] Failed to show main window: {}", e);
        }
    }
}
