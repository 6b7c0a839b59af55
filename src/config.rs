//! Configuration store — the `save_screens_setup.json` file.
//!
//! Reads are forgiving: a missing file, broken JSON or a key of the wrong
//! type falls back to defaults and is only logged. Writes overwrite the whole
//! file; there is no locking, the last writer wins.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the configuration, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "save_screens_setup.json";

/// Pattern used when the file carries none.
pub const DEFAULT_PATTERN: &str = "{id}";

pub const DEFAULT_FOLDER: &str = ".";

pub const DEFAULT_IMAGE_ID: u64 = 1;

/// In-memory view of the configuration file.
///
/// `pattern` and `use_pattern` stay absent on rewrite when they were absent
/// on load, and unknown keys are carried through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub image_id: u64,
    #[serde(skip_serializing_if = "is_true")]
    pub use_pattern: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_true(value: &bool) -> bool {
    *value
}

impl Default for Config {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            pattern: None,
            image_id: DEFAULT_IMAGE_ID,
            use_pattern: true,
            extra: Map::new(),
        }
    }
}

impl Config {
    /// The pattern in effect, falling back to `{id}`.
    pub fn effective_pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Builds a record from parsed JSON, one key at a time.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            log::warn!("[CONFIG] Root is not a JSON object, using defaults");
            return Self::default();
        };

        let mut config = Self::default();

        match map.remove("folder") {
            Some(Value::String(folder)) => config.folder = folder,
            Some(other) => log::warn!("[CONFIG] Ignoring non-string folder: {}", other),
            None => {}
        }

        match map.remove("pattern") {
            Some(Value::String(pattern)) => config.pattern = Some(pattern),
            Some(other) => log::warn!("[CONFIG] Ignoring non-string pattern: {}", other),
            None => {}
        }

        match map.remove("image_id") {
            Some(value) => match value.as_u64() {
                Some(id) => config.image_id = id,
                None => log::warn!("[CONFIG] Ignoring invalid image_id: {}", value),
            },
            None => {}
        }

        match map.remove("use_pattern") {
            Some(Value::Bool(flag)) => config.use_pattern = flag,
            Some(other) => log::warn!("[CONFIG] Ignoring non-bool use_pattern: {}", other),
            None => {}
        }

        config.extra = map;
        config
    }
}

/// Location of the configuration file plus load/save.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `save_screens_setup.json` in the current working directory.
    pub fn in_working_dir() -> Self {
        Self::new(CONFIG_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration. Never fails; problems are logged and
    /// defaults are returned.
    pub fn load(&self) -> Config {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => Config::from_value(value),
                Err(e) => {
                    log::warn!("[CONFIG] Failed to parse {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(e) => {
                log::info!(
                    "[CONFIG] No readable config at {} ({}), using defaults",
                    self.path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    /// Overwrite the file with `config`.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string(config)?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("[CONFIG] Wrote {}", self.path.display());
        Ok(())
    }

    /// Destination folder, with relative paths taken from the config file's directory.
    pub fn resolve_folder(&self, config: &Config) -> PathBuf {
        let folder = Path::new(&config.folder);
        if folder.is_absolute() {
            return folder.to_path_buf();
        }
        match self.path.parent() {
            Some(base) if !base.as_os_str().is_empty() => base.join(folder),
            _ => folder.to_path_buf(),
        }
    }
}

/// A loaded configuration together with the store it persists to.
///
/// The GUI keeps one of these behind a mutex; the command-line binaries
/// create one per run.
#[derive(Debug, Clone)]
pub struct Session {
    pub store: ConfigStore,
    pub config: Config,
}

impl Session {
    pub fn open(store: ConfigStore) -> Self {
        let config = store.load();
        Self { store, config }
    }

    /// Re-read the file, discarding the in-memory record.
    pub fn reload(&mut self) {
        self.config = self.store.load();
    }

    pub fn persist(&self) -> Result<(), ConfigError> {
        self.store.save(&self.config)
    }

    /// Write `next` to disk, then adopt it. On a failed write the
    /// in-memory record is left as it was.
    pub fn commit(&mut self, next: Config) -> Result<(), ConfigError> {
        self.store.save(&next)?;
        self.config = next;
        Ok(())
    }

    /// Change the destination folder, carrying a non-empty pattern along
    /// with it. Both are written at once.
    pub fn set_folder(&mut self, folder: String, pattern: Option<&str>) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.folder = folder;
        if let Some(pattern) = pattern.map(str::trim).filter(|p| !p.is_empty()) {
            next.pattern = Some(pattern.to_string());
        }
        self.commit(next)
    }

    pub fn destination(&self) -> PathBuf {
        self.store.resolve_folder(&self.config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}
