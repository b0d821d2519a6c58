//! Profile record - one complete set of viewmodel settings
//!
//! The record is stored as a single JSON document per profile. Every field
//! carries a serde default so files written by older builds (missing fields)
//! still load, and unknown keys are ignored so newer files load on older builds.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::validation::*;

/// Settings payload for one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Scale multiplier applied to the held item
    #[serde(default = "default_size")]
    pub size: f32,

    // Positional offsets
    #[serde(default)]
    pub position_x: f32,
    #[serde(default)]
    pub position_y: f32,
    #[serde(default)]
    pub position_z: f32,

    // Rotation in degrees
    #[serde(default)]
    pub rotation_yaw: f32,
    #[serde(default)]
    pub rotation_pitch: f32,
    #[serde(default)]
    pub rotation_roll: f32,

    /// Suppress the hand swing animation entirely
    #[serde(default)]
    pub no_swing: bool,
    /// Scale the swing animation along with `size`
    #[serde(default)]
    pub scale_swing: bool,
}

fn default_size() -> f32 {
    1.0
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            size: default_size(),
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            rotation_yaw: 0.0,
            rotation_pitch: 0.0,
            rotation_roll: 0.0,
            no_swing: false,
            scale_swing: false,
        }
    }
}

impl ProfileRecord {
    /// Restore factory values in place
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Validate and clamp numeric values to their slider ranges
    /// Called after reading a record from disk; non-finite values fall back to the default
    pub fn clamp_to_ranges(&mut self) {
        let defaults = Self::default();
        clamp_field("size", &mut self.size, defaults.size, MIN_SIZE, MAX_SIZE);
        clamp_field("positionX", &mut self.position_x, defaults.position_x, MIN_OFFSET, MAX_OFFSET);
        clamp_field("positionY", &mut self.position_y, defaults.position_y, MIN_OFFSET, MAX_OFFSET);
        clamp_field("positionZ", &mut self.position_z, defaults.position_z, MIN_OFFSET, MAX_OFFSET);
        clamp_field("rotationYaw", &mut self.rotation_yaw, defaults.rotation_yaw, MIN_DEGREES, MAX_DEGREES);
        clamp_field("rotationPitch", &mut self.rotation_pitch, defaults.rotation_pitch, MIN_DEGREES, MAX_DEGREES);
        clamp_field("rotationRoll", &mut self.rotation_roll, defaults.rotation_roll, MIN_DEGREES, MAX_DEGREES);
    }
}

fn clamp_field(name: &str, value: &mut f32, default: f32, min: f32, max: f32) {
    if !value.is_finite() {
        warn!(field = name, value = *value, using = default, "Non-finite value, using default");
        *value = default;
    } else if *value < min {
        warn!(field = name, value = *value, min, "Value below minimum, clamping");
        *value = min;
    } else if *value > max {
        warn!(field = name, value = *value, max, "Value exceeds maximum, clamping");
        *value = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = ProfileRecord::default();
        assert_eq!(record.size, 1.0);
        assert_eq!(record.position_x, 0.0);
        assert!(!record.no_swing);
        assert!(!record.scale_swing);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let json = serde_json::to_string(&ProfileRecord::default()).unwrap();
        assert!(json.contains("\"positionX\""));
        assert!(json.contains("\"rotationYaw\""));
        assert!(json.contains("\"noSwing\""));
        assert!(!json.contains("position_x"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        // Older file that predates the swing toggles and roll
        let json = r#"{ "size": 1.5, "positionX": -12.0, "rotationYaw": 45.0 }"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.size, 1.5);
        assert_eq!(record.position_x, -12.0);
        assert_eq!(record.rotation_yaw, 45.0);
        assert_eq!(record.rotation_roll, 0.0);
        assert!(!record.scale_swing);
    }

    #[test]
    fn test_empty_object_is_default() {
        let record: ProfileRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, ProfileRecord::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{ "size": 2.0, "handedness": "left", "extra": { "nested": true } }"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.size, 2.0);
    }

    #[test]
    fn test_integer_values_accepted() {
        let record: ProfileRecord = serde_json::from_str(r#"{ "positionY": 10 }"#).unwrap();
        assert_eq!(record.position_y, 10.0);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let result = serde_json::from_str::<ProfileRecord>(r#"{ "size": "big" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_clamp_to_ranges() {
        let mut record = ProfileRecord {
            size: 9.0,
            position_x: -500.0,
            rotation_pitch: 720.0,
            rotation_roll: f32::NAN,
            ..ProfileRecord::default()
        };
        record.clamp_to_ranges();

        assert_eq!(record.size, MAX_SIZE);
        assert_eq!(record.position_x, MIN_OFFSET);
        assert_eq!(record.rotation_pitch, MAX_DEGREES);
        assert_eq!(record.rotation_roll, 0.0);
    }

    #[test]
    fn test_clamp_leaves_valid_values_alone() {
        let mut record = ProfileRecord {
            size: 0.75,
            position_z: 33.0,
            rotation_yaw: -90.0,
            no_swing: true,
            ..ProfileRecord::default()
        };
        let before = record;
        record.clamp_to_ranges();
        assert_eq!(record, before);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut record = ProfileRecord {
            size: 2.0,
            scale_swing: true,
            ..ProfileRecord::default()
        };
        record.reset_to_defaults();
        assert_eq!(record, ProfileRecord::default());
    }
}
