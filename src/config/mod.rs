//! Profile settings payload
//!
//! - **profile**: `ProfileRecord`, the serialized settings of one profile
//! - **field**: per-field access used by the CLI and host code editing by key

pub mod field;
pub mod profile;

// Re-export commonly used types
pub use field::{FieldValue, ProfileField};
pub use profile::ProfileRecord;
