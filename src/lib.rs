//! Named viewmodel settings profiles
//!
//! Several independent profiles are persisted side by side; one is active and
//! its working copy is edited live, with saves debounced and flushed on close.
//!
//! - [`store::ProfileStore`]: profiles, active selection, lifecycle operations
//! - [`persistence`]: storage adapters (filesystem and in-memory)
//! - [`scheduler::SaveScheduler`]: debounced saving driven by host ticks
//! - [`session::EditSession`]: store plus scheduler for one editing session

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod persistence;
pub mod scheduler;
pub mod session;
pub mod store;

pub use config::{FieldValue, ProfileField, ProfileRecord};
pub use persistence::{FileAdapter, MemoryAdapter, PersistenceAdapter, PersistenceError};
pub use scheduler::SaveScheduler;
pub use session::EditSession;
pub use store::ProfileStore;
