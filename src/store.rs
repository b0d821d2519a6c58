//! Named profile store
//!
//! Owns every known profile, the name of the active one and the live working
//! copy that editing code mutates between saves. All mutating operations go
//! through the [`PersistenceAdapter`] synchronously. Storage failures are
//! logged and never escape: callers get a `bool`/`Option` they can turn into a
//! status message.
//!
//! Invariants after every public call:
//! - the map is never empty and always contains [`DEFAULT_NAME`]
//! - the active name is a key of the map
//! - names are unique and free of path-unsafe characters

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use crate::config::ProfileRecord;
use crate::constants::profile::*;
use crate::persistence::PersistenceAdapter;

/// Clean a user-supplied name for use as a slot name
/// Strips path-unsafe and control characters, trims, and caps the length.
/// Returns `None` when nothing usable is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();
    let capped: String = stripped.trim().chars().take(MAX_NAME_LEN).collect();
    let name = capped.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Like [`clean_name`], but an empty result becomes [`DEFAULT_NAME`]
pub fn sanitize_name(raw: &str) -> String {
    clean_name(raw).unwrap_or_else(|| DEFAULT_NAME.to_string())
}

/// Whether a name found in storage can be used as a key as-is
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name
            .chars()
            .any(|c| FORBIDDEN_CHARS.contains(&c) || c.is_control())
}

pub struct ProfileStore<A: PersistenceAdapter> {
    adapter: A,
    profiles: BTreeMap<String, ProfileRecord>,
    active_name: String,
    /// Working copy of `profiles[active_name]`, written back by `save_current`
    active: ProfileRecord,
}

impl<A: PersistenceAdapter> ProfileStore<A> {
    /// Store holding only an in-memory default profile
    /// Nothing is read or written until [`ProfileStore::load`].
    pub fn new(adapter: A) -> Self {
        let active = ProfileRecord::default();
        Self {
            adapter,
            profiles: BTreeMap::from([(DEFAULT_NAME.to_string(), active)]),
            active_name: DEFAULT_NAME.to_string(),
            active,
        }
    }

    /// Create a store and load it from storage
    pub fn open(adapter: A) -> Self {
        let mut store = Self::new(adapter);
        store.load();
        store
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    /// Read all persisted profiles and the active pointer
    /// Unreadable profiles are skipped. A missing default profile is recreated,
    /// and a pointer naming an unknown profile falls back to the default.
    /// Ends with `save_current` so storage reflects the resolved state.
    pub fn load(&mut self) {
        let mut profiles = BTreeMap::new();

        for name in self.adapter.list_profile_names() {
            if !is_valid_name(&name) {
                warn!(profile = %name, "Ignoring profile with an unusable name");
                continue;
            }
            match self.adapter.read_profile(&name) {
                Ok(mut record) => {
                    record.clamp_to_ranges();
                    profiles.insert(name, record);
                }
                Err(e) => {
                    warn!(profile = %name, error = %e, "Failed to load profile, skipping");
                }
            }
        }

        if !profiles.contains_key(DEFAULT_NAME) {
            let record = ProfileRecord::default();
            match self.adapter.write_profile(DEFAULT_NAME, &record) {
                Ok(()) => info!(profile = DEFAULT_NAME, "Default profile created"),
                Err(e) => warn!(error = %e, "Failed to persist default profile"),
            }
            profiles.insert(DEFAULT_NAME.to_string(), record);
        }

        let saved = self.adapter.read_active_pointer().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read active profile pointer");
            String::new()
        });
        let saved = saved.trim();
        let active_name = if profiles.contains_key(saved) {
            saved.to_string()
        } else {
            if !saved.is_empty() {
                warn!(profile = %saved, fallback = DEFAULT_NAME, "Active profile not found, falling back");
            }
            DEFAULT_NAME.to_string()
        };

        self.active = profiles.get(&active_name).copied().unwrap_or_default();
        self.profiles = profiles;
        self.active_name = active_name;
        info!(
            count = self.profiles.len(),
            active = %self.active_name,
            "Loaded profiles"
        );

        self.save_current();
    }

    /// Copy the working copy into the map, then persist it and the active pointer
    /// Both writes are attempted; returns false if either failed.
    pub fn save_current(&mut self) -> bool {
        self.profiles.insert(self.active_name.clone(), self.active);

        let mut saved = true;
        if let Err(e) = self.adapter.write_profile(&self.active_name, &self.active) {
            warn!(profile = %self.active_name, error = %e, "Failed to save profile");
            saved = false;
        }
        if let Err(e) = self.adapter.write_active_pointer(&self.active_name) {
            warn!(profile = %self.active_name, error = %e, "Failed to save active profile pointer");
            saved = false;
        }
        debug!(profile = %self.active_name, saved, "Saved current profile");
        saved
    }

    /// Switch the active profile
    /// The outgoing profile is saved first; returns false for an unknown name.
    pub fn set_active(&mut self, name: &str) -> bool {
        if !self.profiles.contains_key(name) {
            info!(profile = %name, "Cannot switch to unknown profile");
            return false;
        }

        self.save_current();
        if let Some(record) = self.profiles.get(name) {
            self.active = *record;
            self.active_name = name.to_string();
        }
        self.save_current();
        info!(profile = %name, "Switched profile");
        true
    }

    /// Create a profile with factory settings and make it active
    /// Returns the sanitized name, or `None` if a profile with that name exists.
    /// A name that sanitizes to nothing gets a numbered default name instead.
    pub fn create_config(&mut self, raw_name: &str) -> Option<String> {
        let name = match clean_name(raw_name) {
            Some(name) => name,
            None => self.unique_name(DEFAULT_NAME),
        };
        if self.profiles.contains_key(&name) {
            info!(profile = %name, "Profile already exists");
            return None;
        }

        self.insert_and_activate(name, ProfileRecord::default())
    }

    /// Create a profile seeded with another profile's settings and make it active
    /// An empty name becomes "<source> (copy)", numbered if needed.
    pub fn duplicate_config(&mut self, source: &str, raw_name: &str) -> Option<String> {
        let Some(record) = self.profile(source) else {
            info!(profile = %source, "Cannot duplicate unknown profile");
            return None;
        };
        let name = match clean_name(raw_name) {
            Some(name) => name,
            None => self.unique_name(&format!("{source} (copy)")),
        };
        if self.profiles.contains_key(&name) {
            info!(profile = %name, "Profile already exists");
            return None;
        }

        self.insert_and_activate(name, record)
    }

    fn insert_and_activate(&mut self, name: String, record: ProfileRecord) -> Option<String> {
        self.save_current();
        self.profiles.insert(name.clone(), record);
        self.active_name = name.clone();
        self.active = record;
        self.save_current();
        info!(profile = %name, "Created profile");
        Some(name)
    }

    /// `base` if unused, otherwise `base 2`, `base 3`, ...
    fn unique_name(&self, base: &str) -> String {
        if !self.profiles.contains_key(base) {
            return base.to_string();
        }
        (FIRST_SUFFIX..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| !self.profiles.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Remove a profile and its stored slot
    /// The default profile and the last remaining profile can't be deleted.
    /// Deleting the active profile activates the first remaining name.
    pub fn delete_config(&mut self, name: &str) -> bool {
        if !self.profiles.contains_key(name) {
            info!(profile = %name, "Cannot delete unknown profile");
            return false;
        }
        if self.is_default(name) || self.profiles.len() <= 1 {
            info!(profile = %name, "Refusing to delete protected profile");
            return false;
        }

        self.profiles.remove(name);
        if let Err(e) = self.adapter.delete_profile(name) {
            error!(profile = %name, error = %e, "Failed to delete stored profile");
        }

        if self.active_name == name {
            if let Some((first, record)) = self.profiles.iter().next() {
                self.active_name = first.clone();
                self.active = *record;
            }
        }

        self.save_current();
        info!(profile = %name, active = %self.active_name, "Deleted profile");
        true
    }

    /// Rename a profile, returning the sanitized new name
    /// Fails for unknown names, the default profile, and names already in use
    /// (including the profile's own name). The new slot is written before the
    /// old one is removed; if that write fails nothing changes.
    pub fn rename_config(&mut self, old_name: &str, raw_new_name: &str) -> Option<String> {
        let Some(record) = self.profile(old_name) else {
            info!(profile = %old_name, "Cannot rename unknown profile");
            return None;
        };
        if self.is_default(old_name) {
            info!(profile = %old_name, "Refusing to rename default profile");
            return None;
        }
        let new_name = sanitize_name(raw_new_name);
        if self.profiles.contains_key(&new_name) {
            info!(profile = %new_name, "Profile already exists");
            return None;
        }

        if let Err(e) = self.adapter.write_profile(&new_name, &record) {
            error!(from = %old_name, to = %new_name, error = %e, "Failed to write renamed profile");
            return None;
        }
        if let Err(e) = self.adapter.delete_profile(old_name) {
            warn!(profile = %old_name, error = %e, "Failed to remove old profile slot after rename");
        }

        self.profiles.remove(old_name);
        self.profiles.insert(new_name.clone(), record);
        if self.active_name == old_name {
            self.active_name = new_name.clone();
        }

        self.save_current();
        info!(from = %old_name, to = %new_name, "Renamed profile");
        Some(new_name)
    }

    /// Restore factory settings in the working copy
    /// Like any live edit, this is persisted by the next save.
    pub fn reset_current(&mut self) {
        self.active.reset_to_defaults();
        debug!(profile = %self.active_name, "Reset profile to defaults");
    }

    pub fn is_default(&self, name: &str) -> bool {
        name == DEFAULT_NAME
    }

    /// Whether rename/delete are allowed for `name`
    pub fn can_modify(&self, name: &str) -> bool {
        self.profiles.contains_key(name) && !self.is_default(name) && self.profiles.len() > 1
    }

    /// All profile names in sorted order
    pub fn config_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn current_name(&self) -> &str {
        &self.active_name
    }

    /// The working copy of the active profile
    pub fn active(&self) -> &ProfileRecord {
        &self.active
    }

    /// Live edits go here; call `save_current` (or notify a scheduler) afterwards
    pub fn active_mut(&mut self) -> &mut ProfileRecord {
        &mut self.active
    }

    /// Settings of a profile; the working copy for the active one
    pub fn profile(&self, name: &str) -> Option<ProfileRecord> {
        if name == self.active_name {
            Some(self.active)
        } else {
            self.profiles.get(name).copied()
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
