//! Application-wide constants
//!
//! Storage layout names, profile naming rules and the valid ranges of each
//! numeric setting live here so every module agrees on them.

/// Storage layout constants
pub mod storage {
    /// Directory under the platform config dir that holds everything
    pub const APP_DIR: &str = "viewmodel";

    /// Subdirectory holding one file per profile
    pub const PROFILES_DIR: &str = "configs";

    /// File holding the plain-text name of the active profile
    pub const ACTIVE_FILE: &str = "active.txt";

    /// Extension of profile slot files (compared case-insensitively)
    pub const PROFILE_EXTENSION: &str = "json";

    /// Suffix appended to a slot path while it is being written
    pub const TEMP_SUFFIX: &str = ".tmp";

    /// Environment variable overriding the storage root
    pub const DIR_ENV: &str = "VIEWMODEL_DIR";
}

/// Profile naming rules
pub mod profile {
    /// Name of the profile that always exists and can't be renamed or deleted
    pub const DEFAULT_NAME: &str = "Default";

    /// Characters that are unsafe in a storage slot name
    pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

    /// Longest accepted profile name, in characters
    pub const MAX_NAME_LEN: usize = 32;

    /// First counter tried when an empty name has to be disambiguated
    pub const FIRST_SUFFIX: u32 = 2;
}

/// Save debounce
pub mod save {
    /// Delay between the last edit and the write it triggers
    pub const DEBOUNCE_MS: u64 = 300;
}

/// Valid ranges for numeric settings
pub mod validation {
    /// Held item scale multiplier
    pub const MIN_SIZE: f32 = 0.2;
    pub const MAX_SIZE: f32 = 2.5;

    /// Positional offset on each axis
    pub const MIN_OFFSET: f32 = -80.0;
    pub const MAX_OFFSET: f32 = 80.0;

    /// Rotation on each axis, in degrees
    pub const MIN_DEGREES: f32 = -180.0;
    pub const MAX_DEGREES: f32 = 180.0;
}
