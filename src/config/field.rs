//! Addressing individual settings by key
//!
//! Host code and the CLI edit the working copy one field at a time. Keys accept
//! the serialized camelCase form or a snake_case alias.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

use crate::config::profile::ProfileRecord;
use crate::constants::validation::*;

/// One settable field of a [`ProfileRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Size,
    PositionX,
    PositionY,
    PositionZ,
    RotationYaw,
    RotationPitch,
    RotationRoll,
    NoSwing,
    ScaleSwing,
}

/// Current value of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f32),
    Flag(bool),
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Size,
        ProfileField::PositionX,
        ProfileField::PositionY,
        ProfileField::PositionZ,
        ProfileField::RotationYaw,
        ProfileField::RotationPitch,
        ProfileField::RotationRoll,
        ProfileField::NoSwing,
        ProfileField::ScaleSwing,
    ];

    /// Key used in the serialized record
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Size => "size",
            ProfileField::PositionX => "positionX",
            ProfileField::PositionY => "positionY",
            ProfileField::PositionZ => "positionZ",
            ProfileField::RotationYaw => "rotationYaw",
            ProfileField::RotationPitch => "rotationPitch",
            ProfileField::RotationRoll => "rotationRoll",
            ProfileField::NoSwing => "noSwing",
            ProfileField::ScaleSwing => "scaleSwing",
        }
    }

    /// Valid range for numeric fields, `None` for toggles
    pub fn range(self) -> Option<RangeInclusive<f32>> {
        match self {
            ProfileField::Size => Some(MIN_SIZE..=MAX_SIZE),
            ProfileField::PositionX | ProfileField::PositionY | ProfileField::PositionZ => {
                Some(MIN_OFFSET..=MAX_OFFSET)
            }
            ProfileField::RotationYaw | ProfileField::RotationPitch | ProfileField::RotationRoll => {
                Some(MIN_DEGREES..=MAX_DEGREES)
            }
            ProfileField::NoSwing | ProfileField::ScaleSwing => None,
        }
    }

    pub fn get(self, record: &ProfileRecord) -> FieldValue {
        match self {
            ProfileField::NoSwing => FieldValue::Flag(record.no_swing),
            ProfileField::ScaleSwing => FieldValue::Flag(record.scale_swing),
            ProfileField::Size => FieldValue::Number(record.size),
            ProfileField::PositionX => FieldValue::Number(record.position_x),
            ProfileField::PositionY => FieldValue::Number(record.position_y),
            ProfileField::PositionZ => FieldValue::Number(record.position_z),
            ProfileField::RotationYaw => FieldValue::Number(record.rotation_yaw),
            ProfileField::RotationPitch => FieldValue::Number(record.rotation_pitch),
            ProfileField::RotationRoll => FieldValue::Number(record.rotation_roll),
        }
    }

    /// Parse `raw` and store it in `record`
    /// Numbers are clamped into the field's range; toggles accept true/false, on/off, 1/0
    pub fn set(self, record: &mut ProfileRecord, raw: &str) -> Result<FieldValue> {
        let raw = raw.trim();
        match self {
            ProfileField::NoSwing => {
                record.no_swing = parse_flag(raw)?;
                Ok(FieldValue::Flag(record.no_swing))
            }
            ProfileField::ScaleSwing => {
                record.scale_swing = parse_flag(raw)?;
                Ok(FieldValue::Flag(record.scale_swing))
            }
            numeric => {
                let value: f32 = raw
                    .parse()
                    .map_err(|_| anyhow!("'{raw}' is not a number"))?;
                if !value.is_finite() {
                    bail!("'{raw}' is not a finite number");
                }
                let clamped = numeric
                    .range()
                    .map_or(value, |range| value.clamp(*range.start(), *range.end()));
                if let Some(slot) = numeric.number_mut(record) {
                    *slot = clamped;
                }
                Ok(FieldValue::Number(clamped))
            }
        }
    }

    fn number_mut(self, record: &mut ProfileRecord) -> Option<&mut f32> {
        match self {
            ProfileField::Size => Some(&mut record.size),
            ProfileField::PositionX => Some(&mut record.position_x),
            ProfileField::PositionY => Some(&mut record.position_y),
            ProfileField::PositionZ => Some(&mut record.position_z),
            ProfileField::RotationYaw => Some(&mut record.rotation_yaw),
            ProfileField::RotationPitch => Some(&mut record.rotation_pitch),
            ProfileField::RotationRoll => Some(&mut record.rotation_roll),
            ProfileField::NoSwing | ProfileField::ScaleSwing => None,
        }
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => bail!("'{raw}' is not a toggle value (use true/false)"),
    }
}

impl FromStr for ProfileField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ProfileField::ALL
            .into_iter()
            .find(|field| {
                field.key().eq_ignore_ascii_case(wanted)
                    || field.key().eq_ignore_ascii_case(&wanted.replace('_', ""))
            })
            .ok_or_else(|| anyhow!("Unknown setting '{wanted}'"))
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Flag(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_aliases() {
        assert_eq!("positionX".parse::<ProfileField>().unwrap(), ProfileField::PositionX);
        assert_eq!("position_x".parse::<ProfileField>().unwrap(), ProfileField::PositionX);
        assert_eq!("NO_SWING".parse::<ProfileField>().unwrap(), ProfileField::NoSwing);
        assert!("handedness".parse::<ProfileField>().is_err());
    }

    #[test]
    fn test_set_number_clamps() {
        let mut record = ProfileRecord::default();

        let value = ProfileField::Size.set(&mut record, "10").unwrap();
        assert_eq!(value, FieldValue::Number(MAX_SIZE));
        assert_eq!(record.size, MAX_SIZE);

        ProfileField::RotationRoll.set(&mut record, "-45.5").unwrap();
        assert_eq!(record.rotation_roll, -45.5);
    }

    #[test]
    fn test_set_number_rejects_garbage() {
        let mut record = ProfileRecord::default();
        assert!(ProfileField::PositionY.set(&mut record, "left").is_err());
        assert!(ProfileField::PositionY.set(&mut record, "NaN").is_err());
        assert_eq!(record, ProfileRecord::default());
    }

    #[test]
    fn test_set_flags() {
        let mut record = ProfileRecord::default();
        ProfileField::NoSwing.set(&mut record, "on").unwrap();
        ProfileField::ScaleSwing.set(&mut record, "TRUE").unwrap();
        assert!(record.no_swing);
        assert!(record.scale_swing);

        ProfileField::NoSwing.set(&mut record, "0").unwrap();
        assert!(!record.no_swing);
        assert!(ProfileField::ScaleSwing.set(&mut record, "maybe").is_err());
    }

    #[test]
    fn test_get_matches_record() {
        let record = ProfileRecord {
            position_z: 12.0,
            scale_swing: true,
            ..ProfileRecord::default()
        };
        assert_eq!(ProfileField::PositionZ.get(&record), FieldValue::Number(12.0));
        assert_eq!(ProfileField::ScaleSwing.get(&record), FieldValue::Flag(true));
        assert_eq!(ProfileField::Size.get(&record), FieldValue::Number(1.0));
    }

    #[test]
    fn test_toggles_have_no_range() {
        assert!(ProfileField::NoSwing.range().is_none());
        assert_eq!(ProfileField::RotationYaw.range(), Some(MIN_DEGREES..=MAX_DEGREES));
    }
}
