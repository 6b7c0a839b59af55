//! Counter refresh — bring `image_id` past the files already on disk.
//!
//! Copying files in by hand, or restoring an old config, can leave the
//! counter pointing at a name that is already taken. Refresh scans the
//! destination folder for names the active strategy would produce and moves
//! the counter past the highest id it finds. It never moves it backwards.

use crate::config::{Config, ConfigError, Session};
use crate::naming::{self, NamingStrategy, ID_TOKEN, TIMESTAMP_TOKEN};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub previous: u64,
    pub current: u64,
    /// Files in the folder whose names matched the strategy.
    pub matched: usize,
    /// Highest id among the matched files.
    pub highest: Option<u64>,
}

impl RefreshOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    pub fn message(&self) -> String {
        if self.changed() {
            format!(
                "Counter moved from {} to {} ({} matching file(s)).",
                self.previous, self.current, self.matched
            )
        } else {
            format!(
                "Counter unchanged at {} ({} matching file(s)).",
                self.current, self.matched
            )
        }
    }
}

/// Recognises the file names one naming template produces.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    template: String,
    id_slots: usize,
    regex: Regex,
}

impl NameMatcher {
    /// Matcher for the strategy `config` selects.
    ///
    /// Returns `None` when names carry no id, i.e. a pattern without `{id}`.
    pub fn for_config(config: &Config) -> Option<Self> {
        let template = match NamingStrategy::from_flag(config.use_pattern) {
            NamingStrategy::Pattern => config.effective_pattern(),
            NamingStrategy::Counter => ID_TOKEN,
        };
        let id_slots = template.matches(ID_TOKEN).count();
        if id_slots == 0 {
            return None;
        }

        match compile_template(template, None) {
            Ok(regex) => Some(Self {
                template: template.to_string(),
                id_slots,
                regex,
            }),
            Err(e) => {
                log::warn!("[REFRESH] Could not compile matcher for {}: {}", template, e);
                None
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.id_of(name).is_some()
    }

    /// The id `name` was saved under, if it fits the template.
    ///
    /// Ids too long for u64 are ignored rather than wrapped.
    pub fn id_of(&self, name: &str) -> Option<u64> {
        let caps = self.regex.captures(name)?;
        let first = caps.get(1)?;
        if self.id_slots == 1 {
            return first.as_str().parse().ok();
        }

        // Every `{id}` repeats the same digits, which a regex without
        // backreferences cannot say. Pin each prefix of the first digit run
        // and keep the one that fits the whole name.
        let run = &name[first.start()..];
        let digits = run.len() - run.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        (1..=digits).find_map(|len| {
            let id = &run[..len];
            let pinned = compile_template(&self.template, Some(id)).ok()?;
            if pinned.is_match(name) {
                id.parse().ok()
            } else {
                None
            }
        })
    }
}

/// Anchored regex for `template`. `{id}` becomes a digit group, or the
/// literal `id` when one is given.
fn compile_template(template: &str, id: Option<&str>) -> Result<Regex, regex::Error> {
    let id_source = match id {
        Some(id) => regex::escape(id),
        None => r"(\d+)".to_string(),
    };

    let mut source = String::from("^");
    for (i, id_piece) in template.split(ID_TOKEN).enumerate() {
        if i > 0 {
            source.push_str(&id_source);
        }
        for (j, piece) in id_piece.split(TIMESTAMP_TOKEN).enumerate() {
            if j > 0 {
                source.push_str(r"\d{8}_\d{6}");
            }
            source.push_str(&regex::escape(piece));
        }
    }
    if !naming::has_png_extension(template) {
        source.push_str(r"(?i:\.png)");
    }
    source.push('$');

    Regex::new(&source)
}

/// Ids found in a folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderScan {
    pub matched: usize,
    pub highest: Option<u64>,
}

/// List `folder` and collect the ids of names `config` would produce.
///
/// Touches neither the session nor the config file, so callers can run it
/// without holding any lock. A missing folder yields an empty scan.
pub fn scan_folder(config: &Config, folder: &Path) -> Result<FolderScan, RefreshError> {
    let Some(matcher) = NameMatcher::for_config(config) else {
        log::info!("[REFRESH] Pattern has no {} token, nothing to scan", ID_TOKEN);
        return Ok(FolderScan::default());
    };

    if !folder.is_dir() {
        log::info!("[REFRESH] Folder {} does not exist yet", folder.display());
        return Ok(FolderScan::default());
    }

    let entries = fs::read_dir(folder).map_err(|source| RefreshError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut scan = FolderScan::default();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(id) = name.to_str().and_then(|n| matcher.id_of(n)) else {
            continue;
        };
        scan.matched += 1;
        scan.highest = Some(scan.highest.map_or(id, |h| h.max(id)));
    }
    Ok(scan)
}

/// Re-read the config and raise its counter past `scan.highest`.
///
/// The file is only written when the counter actually moves.
pub fn apply_scan(session: &mut Session, scan: FolderScan) -> Result<RefreshOutcome, RefreshError> {
    session.reload();
    let previous = session.config.image_id;
    let current = match scan.highest {
        Some(h) => previous.max(h.saturating_add(1)),
        None => previous,
    };

    if current != previous {
        let mut next = session.config.clone();
        next.image_id = current;
        session.commit(next)?;
        log::info!("[REFRESH] Counter {} -> {}", previous, current);
    } else {
        log::info!("[REFRESH] Counter stays at {}", current);
    }

    Ok(RefreshOutcome {
        previous,
        current,
        matched: scan.matched,
        highest: scan.highest,
    })
}

/// Raise the counter past every id found in the destination folder and
/// persist it if it moved.
pub fn refresh_counter(session: &mut Session) -> Result<RefreshOutcome, RefreshError> {
    session.reload();
    let scan = scan_folder(&session.config, &session.destination())?;
    apply_scan(session, scan)
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Failed to list folder {}: {source}", path.display())]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
