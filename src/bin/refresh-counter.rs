//! `refresh-counter` — move the counter past the files already saved.

use save_screens_lib::config::{ConfigStore, Session};
use save_screens_lib::refresh;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut session = Session::open(ConfigStore::in_working_dir());
    match refresh::refresh_counter(&mut session) {
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
