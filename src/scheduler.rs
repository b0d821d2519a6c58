//! Debounced saving
//!
//! Live edits (a slider being dragged) arrive far faster than they need to be
//! written. Each notification pushes a single deadline forward; the host polls
//! once per tick and the save fires once the deadline passes with no newer
//! notification. No timer thread is involved.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::save::DEBOUNCE_MS;
use crate::persistence::PersistenceAdapter;
use crate::store::ProfileStore;

#[derive(Debug, Clone)]
pub struct SaveScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record an edit; the save moves to `delay` after now
    pub fn notify(&mut self) {
        self.notify_at(Instant::now());
    }

    pub fn notify_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Per-tick check; saves and returns true once the deadline has passed
    pub fn poll<A: PersistenceAdapter>(&mut self, store: &mut ProfileStore<A>) -> bool {
        self.poll_at(store, Instant::now())
    }

    pub fn poll_at<A: PersistenceAdapter>(&mut self, store: &mut ProfileStore<A>, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                debug!("Debounce elapsed, saving");
                store.save_current();
                true
            }
            _ => false,
        }
    }

    /// Save right away and drop any pending deadline
    pub fn flush<A: PersistenceAdapter>(&mut self, store: &mut ProfileStore<A>) {
        self.deadline = None;
        store.save_current();
    }
}
