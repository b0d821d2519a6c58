//! Editing session
//!
//! Ties a [`ProfileStore`] to a [`SaveScheduler`] for the lifetime of one
//! settings screen. Opening loads the store, edits schedule a debounced save,
//! and closing (or dropping) the session flushes so no edit is lost.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::ProfileRecord;
use crate::persistence::PersistenceAdapter;
use crate::scheduler::SaveScheduler;
use crate::store::ProfileStore;

pub struct EditSession<A: PersistenceAdapter> {
    store: ProfileStore<A>,
    scheduler: SaveScheduler,
    closed: bool,
}

impl<A: PersistenceAdapter> EditSession<A> {
    /// Load the store and start a session with the default debounce
    pub fn open(adapter: A) -> Self {
        Self::with_scheduler(adapter, SaveScheduler::default())
    }

    pub fn with_scheduler(adapter: A, scheduler: SaveScheduler) -> Self {
        let store = ProfileStore::open(adapter);
        info!(profile = %store.current_name(), "Opened edit session");
        Self {
            store,
            scheduler,
            closed: false,
        }
    }

    pub fn store(&self) -> &ProfileStore<A> {
        &self.store
    }

    pub fn scheduler(&self) -> &SaveScheduler {
        &self.scheduler
    }

    /// Mutate the working copy and schedule a save
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut ProfileRecord) -> R) -> R {
        self.edit_at(Instant::now(), f)
    }

    pub fn edit_at<R>(&mut self, now: Instant, f: impl FnOnce(&mut ProfileRecord) -> R) -> R {
        let result = f(self.store.active_mut());
        self.scheduler.notify_at(now);
        result
    }

    /// Host tick; returns true when a pending save was written
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.scheduler.poll_at(&mut self.store, now)
    }

    pub fn reset_current(&mut self) {
        self.edit(|record| record.reset_to_defaults());
    }

    // Profile management persists synchronously. A deadline still pending
    // afterwards just saves the (new) active profile once more.

    pub fn switch_to(&mut self, name: &str) -> bool {
        self.store.set_active(name)
    }

    pub fn create(&mut self, raw_name: &str) -> Option<String> {
        self.store.create_config(raw_name)
    }

    pub fn duplicate(&mut self, source: &str, raw_name: &str) -> Option<String> {
        self.store.duplicate_config(source, raw_name)
    }

    pub fn rename(&mut self, old_name: &str, raw_new_name: &str) -> Option<String> {
        self.store.rename_config(old_name, raw_new_name)
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.store.delete_config(name)
    }

    /// Flush pending edits and end the session
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scheduler.flush(&mut self.store);
        debug!(profile = %self.store.current_name(), "Closed edit session");
    }
}

impl<A: PersistenceAdapter> Drop for EditSession<A> {
    fn drop(&mut self) {
        self.finish();
    }
}
