//! Durable storage for profiles
//!
//! A [`PersistenceAdapter`] stores one serialized [`ProfileRecord`] per named
//! slot plus a single pointer naming the active profile. Adapters do plain I/O:
//! no retries, no business rules. Failures are returned to the store, which
//! decides whether to log and carry on.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProfileRecord;
use crate::constants::storage::*;

/// Result type for adapter operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Slot content could not be parsed as a profile
    #[error("Failed to decode profile '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode profile '{name}': {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, PersistenceError::Decode { .. })
    }
}

/// Slot storage used by the profile store
pub trait PersistenceAdapter {
    /// Names of all persisted slots
    /// A missing or unreadable storage location yields an empty set
    fn list_profile_names(&self) -> BTreeSet<String>;

    fn read_profile(&self, name: &str) -> PersistenceResult<ProfileRecord>;

    /// Replace the slot's content; readers never observe a partial write
    fn write_profile(&mut self, name: &str, record: &ProfileRecord) -> PersistenceResult<()>;

    /// Remove a slot; removing a slot that doesn't exist succeeds
    fn delete_profile(&mut self, name: &str) -> PersistenceResult<()>;

    /// Name of the active profile, empty when none was ever written
    fn read_active_pointer(&self) -> PersistenceResult<String>;

    fn write_active_pointer(&mut self, name: &str) -> PersistenceResult<()>;
}

/// Lets a session borrow an adapter the caller keeps inspecting afterwards
impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for &mut T {
    fn list_profile_names(&self) -> BTreeSet<String> {
        (**self).list_profile_names()
    }

    fn read_profile(&self, name: &str) -> PersistenceResult<ProfileRecord> {
        (**self).read_profile(name)
    }

    fn write_profile(&mut self, name: &str, record: &ProfileRecord) -> PersistenceResult<()> {
        (**self).write_profile(name, record)
    }

    fn delete_profile(&mut self, name: &str) -> PersistenceResult<()> {
        (**self).delete_profile(name)
    }

    fn read_active_pointer(&self) -> PersistenceResult<String> {
        (**self).read_active_pointer()
    }

    fn write_active_pointer(&mut self, name: &str) -> PersistenceResult<()> {
        (**self).write_active_pointer(name)
    }
}

fn encode(name: &str, record: &ProfileRecord) -> PersistenceResult<String> {
    serde_json::to_string_pretty(record).map_err(|source| PersistenceError::Encode {
        name: name.to_string(),
        source,
    })
}

fn decode(name: &str, contents: &str) -> PersistenceResult<ProfileRecord> {
    serde_json::from_str(contents).map_err(|source| PersistenceError::Decode {
        name: name.to_string(),
        source,
    })
}

// ==============================================================================
// Filesystem adapter
// ==============================================================================

/// Profiles as `<root>/configs/<name>.json`, active pointer in `<root>/active.txt`
#[derive(Debug, Clone)]
pub struct FileAdapter {
    root: PathBuf,
}

impl FileAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root under the platform config directory
    pub fn default_root() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(PROFILES_DIR)
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir()
            .join(format!("{name}.{PROFILE_EXTENSION}"))
    }

    fn active_path(&self) -> PathBuf {
        self.root.join(ACTIVE_FILE)
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_atomic(path: &Path, contents: &str) -> PersistenceResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(TEMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, contents).map_err(|e| PersistenceError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistenceError::io(path, e));
        }
        debug!(path = %path.display(), "Wrote file");
        Ok(())
    }
}

impl PersistenceAdapter for FileAdapter {
    fn list_profile_names(&self) -> BTreeSet<String> {
        let dir = self.profiles_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %dir.display(), error = %e, "Failed to list profiles");
                }
                return BTreeSet::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == PROFILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .filter(|name| !name.is_empty())
            .collect()
    }

    fn read_profile(&self, name: &str) -> PersistenceResult<ProfileRecord> {
        let path = self.profile_path(name);
        let contents = fs::read_to_string(&path).map_err(|e| PersistenceError::io(&path, e))?;
        decode(name, &contents)
    }

    fn write_profile(&mut self, name: &str, record: &ProfileRecord) -> PersistenceResult<()> {
        let contents = encode(name, record)?;
        Self::write_atomic(&self.profile_path(name), &contents)
    }

    fn delete_profile(&mut self, name: &str) -> PersistenceResult<()> {
        let path = self.profile_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::io(path, e)),
        }
    }

    fn read_active_pointer(&self) -> PersistenceResult<String> {
        let path = self.active_path();
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(PersistenceError::io(path, e)),
        }
    }

    fn write_active_pointer(&mut self, name: &str) -> PersistenceResult<()> {
        Self::write_atomic(&self.active_path(), name)
    }
}

// ==============================================================================
// In-memory adapter
// ==============================================================================

/// Adapter backed by a map of serialized slots
/// Stores JSON text rather than records so corrupt slots can be represented.
/// Failure switches let callers exercise the store's error paths.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    slots: BTreeMap<String, String>,
    active: Option<String>,
    fail_writes: bool,
    fail_deletes: bool,
    fail_active_writes: bool,
    writes: usize,
    log: Vec<String>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw slot content in place, bypassing encoding
    pub fn insert_raw(&mut self, name: &str, contents: &str) {
        self.slots.insert(name.to_string(), contents.to_string());
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn active_pointer(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active_pointer(&mut self, name: &str) {
        self.active = Some(name.to_string());
    }

    /// Make every subsequent profile write fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn fail_deletes(&mut self, fail: bool) {
        self.fail_deletes = fail;
    }

    pub fn fail_active_writes(&mut self, fail: bool) {
        self.fail_active_writes = fail;
    }

    /// Number of successful writes and deletes
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Operations applied so far, e.g. `write:Combat`, `delete:Old`, `active:Combat`
    pub fn operations(&self) -> Vec<String> {
        self.log.clone()
    }

    fn record(&mut self, op: String) {
        self.writes += 1;
        self.log.push(op);
    }

    fn simulated_failure(name: &str) -> PersistenceError {
        PersistenceError::io(
            name,
            io::Error::new(io::ErrorKind::PermissionDenied, "simulated failure"),
        )
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn list_profile_names(&self) -> BTreeSet<String> {
        self.slots.keys().cloned().collect()
    }

    fn read_profile(&self, name: &str) -> PersistenceResult<ProfileRecord> {
        let contents = self.slots.get(name).ok_or_else(|| {
            PersistenceError::io(name, io::Error::new(io::ErrorKind::NotFound, "no such slot"))
        })?;
        decode(name, contents)
    }

    fn write_profile(&mut self, name: &str, record: &ProfileRecord) -> PersistenceResult<()> {
        if self.fail_writes {
            return Err(Self::simulated_failure(name));
        }
        let contents = encode(name, record)?;
        self.slots.insert(name.to_string(), contents);
        self.record(format!("write:{name}"));
        Ok(())
    }

    fn delete_profile(&mut self, name: &str) -> PersistenceResult<()> {
        if self.fail_deletes {
            return Err(Self::simulated_failure(name));
        }
        self.slots.remove(name);
        self.record(format!("delete:{name}"));
        Ok(())
    }

    fn read_active_pointer(&self) -> PersistenceResult<String> {
        Ok(self.active.clone().unwrap_or_default())
    }

    fn write_active_pointer(&mut self, name: &str) -> PersistenceResult<()> {
        if self.fail_active_writes {
            return Err(Self::simulated_failure(ACTIVE_FILE));
        }
        self.active = Some(name.to_string());
        self.record(format!("active:{name}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = FileAdapter::new(temp_dir.path().join("nowhere"));
        assert!(adapter.list_profile_names().is_empty());
    }

    #[test]
    fn test_write_then_read_profile() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        let record = ProfileRecord {
            size: 1.25,
            position_x: -30.0,
            rotation_roll: 15.0,
            no_swing: true,
            ..ProfileRecord::default()
        };

        adapter.write_profile("Combat", &record).unwrap();

        assert!(adapter.profile_path("Combat").exists());
        assert_eq!(adapter.read_profile("Combat").unwrap(), record);
        assert_eq!(
            adapter.list_profile_names(),
            BTreeSet::from(["Combat".to_string()])
        );
    }

    #[test]
    fn test_written_file_is_pretty_json() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        adapter.write_profile("Default", &ProfileRecord::default()).unwrap();

        let contents = fs::read_to_string(adapter.profile_path("Default")).unwrap();
        assert!(contents.contains('\n'));
        assert!(contents.contains("\"positionX\""));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        adapter.write_profile("Default", &ProfileRecord::default()).unwrap();
        adapter.write_profile("Default", &ProfileRecord::default()).unwrap();

        let names: Vec<_> = fs::read_dir(adapter.profiles_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Default.json".to_string()]);
    }

    #[test]
    fn test_list_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        adapter.write_profile("Default", &ProfileRecord::default()).unwrap();

        let dir = adapter.profiles_dir();
        fs::write(dir.join("notes.txt"), "hello").unwrap();
        fs::write(dir.join("Stale.json.tmp"), "{}").unwrap();
        fs::write(dir.join("Upper.JSON"), "{}").unwrap();
        fs::write(dir.join("Combat.json"), "{}").unwrap();
        fs::create_dir(dir.join("folder.json")).unwrap();

        let names = adapter.list_profile_names();
        assert_eq!(
            names,
            BTreeSet::from(["Combat".to_string(), "Default".to_string()])
        );
    }

    #[test]
    fn test_read_malformed_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = FileAdapter::new(temp_dir.path());
        fs::create_dir_all(adapter.profiles_dir()).unwrap();
        fs::write(adapter.profile_path("Broken"), "{ not json").unwrap();

        let err = adapter.read_profile("Broken").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_delete_profile() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        adapter.write_profile("Old", &ProfileRecord::default()).unwrap();

        adapter.delete_profile("Old").unwrap();
        assert!(!adapter.profile_path("Old").exists());

        // Deleting again is fine
        adapter.delete_profile("Old").unwrap();
    }

    #[test]
    fn test_active_pointer() {
        let temp_dir = TempDir::new().unwrap();
        let mut adapter = FileAdapter::new(temp_dir.path());
        assert_eq!(adapter.read_active_pointer().unwrap(), "");

        adapter.write_active_pointer("Combat").unwrap();
        assert_eq!(adapter.read_active_pointer().unwrap(), "Combat");
    }

    #[test]
    fn test_active_pointer_is_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = FileAdapter::new(temp_dir.path());
        fs::write(temp_dir.path().join(ACTIVE_FILE), "  Combat\n").unwrap();
        assert_eq!(adapter.read_active_pointer().unwrap(), "Combat");
    }

    #[test]
    fn test_memory_adapter_failures() {
        let mut adapter = MemoryAdapter::new();
        adapter.fail_writes(true);
        assert!(adapter.write_profile("A", &ProfileRecord::default()).is_err());
        assert!(!adapter.contains("A"));

        adapter.fail_writes(false);
        adapter.write_profile("A", &ProfileRecord::default()).unwrap();
        adapter.fail_deletes(true);
        assert!(adapter.delete_profile("A").is_err());
        assert!(adapter.contains("A"));
        assert_eq!(adapter.operations(), vec!["write:A".to_string()]);
    }

    #[test]
    fn test_memory_adapter_decode_error() {
        let mut adapter = MemoryAdapter::new();
        adapter.insert_raw("Broken", "[1, 2");
        assert!(adapter.read_profile("Broken").unwrap_err().is_decode());
    }
}
