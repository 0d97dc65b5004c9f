#![forbid(unsafe_code)]

//! Dashkit Preference Store
//!
//! Durable client-side key-value storage for UI preferences. The dashboard
//! chrome persists exactly one preference today (the `sidebarCollapsed`
//! flag), but the store is a small string map behind a pluggable backend:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PreferenceStore                          │
//! │   - In-memory cache with dirty tracking                       │
//! │   - Typed accessors over string values                        │
//! │   - load at startup / flush at teardown                       │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PrefStorage                             │
//! │   - MemoryStorage: ephemeral (testing, no durable storage)    │
//! │   - FileStorage: JSON file, atomic write-then-rename          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; a missing or
//!    corrupt file degrades to defaults and is logged.
//! 2. **Atomic writes**: the file backend writes a temp file and renames it,
//!    so a crash mid-save never corrupts the stored preferences.
//! 3. **Boolean encoding**: boolean preferences are the strings `"true"` /
//!    `"false"`; anything else reads back as "not stored".

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Key for the single sidebar preference (see the sidebar controller).
pub const SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during preference storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// JSON encode/decode failure.
    Serialization(String),
    /// Stored file exists but is not a preference file we understand.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable backend holding the preference map durably.
///
/// `load` should be resilient: a first run (nothing stored yet) returns an
/// empty map rather than an error. `save` replaces all stored preferences.
pub trait PrefStorage {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load all stored preferences.
    fn load(&mut self) -> StorageResult<HashMap<String, String>>;

    /// Save all preferences, replacing existing state.
    fn save(&mut self, prefs: &HashMap<String, String>) -> StorageResult<()>;

    /// Remove all stored preferences.
    fn clear(&mut self) -> StorageResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory backend for tests and pages without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create a new empty memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with preferences.
    #[must_use]
    pub fn with_prefs(data: HashMap<String, String>) -> Self {
        Self { data }
    }
}

impl PrefStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&mut self) -> StorageResult<HashMap<String, String>> {
        Ok(self.data.clone())
    }

    fn save(&mut self, prefs: &HashMap<String, String>) -> StorageResult<()> {
        self.data = prefs.clone();
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.data.clear();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk file format (JSON).
#[derive(Serialize, Deserialize)]
struct PrefFile {
    /// Format version for future migrations.
    format_version: u32,
    /// Preference key -> string value.
    prefs: HashMap<String, String>,
}

impl PrefFile {
    const FORMAT_VERSION: u32 = 1;
}

/// JSON-file backend with atomic write-then-rename saves.
///
/// # File Format
///
/// ```json
/// {
///   "format_version": 1,
///   "prefs": { "sidebarCollapsed": "true" }
/// }
/// ```
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file backend at the given path.
    ///
    /// The file does not need to exist; it is created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Storage at the default location for an application name.
    ///
    /// Uses `$XDG_STATE_HOME/dashkit/{app_name}/prefs.json`, falling back to
    /// `~/.local/state` and finally the current directory.
    #[must_use]
    pub fn default_for_app(app_name: &str) -> Self {
        let base = state_dir_or_fallback();
        Self {
            path: base.join("dashkit").join(app_name).join("prefs.json"),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

fn state_dir_or_fallback() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("state");
    }
    PathBuf::from(".")
}

impl PrefStorage for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn load(&mut self) -> StorageResult<HashMap<String, String>> {
        if !self.path.exists() {
            // First run, nothing stored yet.
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let pref_file: PrefFile = serde_json::from_reader(reader)
            .map_err(|e| StorageError::Serialization(format!("failed to parse prefs file: {e}")))?;

        if pref_file.format_version != PrefFile::FORMAT_VERSION {
            return Err(StorageError::Corruption(format!(
                "unsupported prefs format version {} (expected {})",
                pref_file.format_version,
                PrefFile::FORMAT_VERSION
            )));
        }

        Ok(pref_file.prefs)
    }

    fn save(&mut self, prefs: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pref_file = PrefFile {
            format_version: PrefFile::FORMAT_VERSION,
            prefs: prefs.clone(),
        };

        // Temp file + rename so a crash mid-write leaves the old file intact.
        let tmp_path = self.temp_path();
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &pref_file)
                .map_err(|e| StorageError::Serialization(format!("failed to encode prefs: {e}")))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = prefs.len(), "saved preferences");
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage").field("path", &self.path).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preference Store
// ─────────────────────────────────────────────────────────────────────────────

/// Cached preference map over a [`PrefStorage`] backend.
///
/// Reads are served from the cache; writes mark the store dirty, and
/// [`flush`](Self::flush) persists only when something changed. The shell
/// loads once at startup and flushes once at page teardown.
pub struct PreferenceStore {
    backend: Box<dyn PrefStorage>,
    cache: HashMap<String, String>,
    dirty: bool,
}

impl PreferenceStore {
    /// Create a store over the given backend. Call [`load`](Self::load)
    /// before reading.
    #[must_use]
    pub fn new(backend: Box<dyn PrefStorage>) -> Self {
        Self {
            backend,
            cache: HashMap::new(),
            dirty: false,
        }
    }

    /// Ephemeral store for tests and pages without durable storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Store backed by a JSON file at the given path.
    #[must_use]
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Load preferences from the backend, replacing the cache.
    pub fn load(&mut self) -> StorageResult<usize> {
        let prefs = self.backend.load()?;
        let count = prefs.len();
        self.cache = prefs;
        self.dirty = false;
        tracing::debug!(backend = %self.backend.name(), count, "loaded preferences");
        Ok(count)
    }

    /// Persist the cache if anything changed since the last flush.
    ///
    /// Returns `Ok(true)` if data was written.
    pub fn flush(&mut self) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.backend.save(&self.cache)?;
        self.dirty = false;
        Ok(true)
    }

    /// Raw string value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cache.get(key).map(String::as_str)
    }

    /// Set a raw string value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cache.insert(key.into(), value.into());
        self.dirty = true;
    }

    /// Boolean read: `"true"` / `"false"`, anything else is "not stored".
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                tracing::warn!(key, value = other, "unparsable boolean preference");
                None
            }
            None => None,
        }
    }

    /// Boolean write, stored as `"true"` / `"false"`.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }

    /// The persisted sidebar flag, if one is stored.
    #[must_use]
    pub fn sidebar_collapsed(&self) -> Option<bool> {
        self.get_bool(SIDEBAR_COLLAPSED)
    }

    /// Record the sidebar flag for the next flush.
    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.set_bool(SIDEBAR_COLLAPSED, collapsed);
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("backend", &self.backend.name())
            .field("entries", &self.cache.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
