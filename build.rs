//! Build script for Save Screens.
//!
//! The Tauri context (tauri.conf.json, icons, capabilities) is only generated
//! when the `gui` feature is enabled. The command-line binaries need no
//! build steps.

fn main() {
    #[cfg(feature = "gui")]
    tauri_build::build();
}
