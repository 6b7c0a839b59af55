//! `save-screens` — save the clipboard image once and exit.
//!
//! Reads `save_screens_setup.json` from the working directory, writes the
//! PNG, prints the outcome. Exit code 0 on success (including "nothing to
//! save"), 1 on error.

use save_screens_lib::capture::SystemClipboard;
use save_screens_lib::config::{ConfigStore, Session};
use save_screens_lib::save;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut session = Session::open(ConfigStore::in_working_dir());

    let mut clipboard = match SystemClipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let now = chrono::Local::now().naive_local();
    match save::save_clipboard_image(&mut session, &mut clipboard, now) {
        Ok(outcome) => {
            println!("{}", outcome.message());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
