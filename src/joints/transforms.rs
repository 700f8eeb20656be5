//! Per-joint value transforms
//!
//! Most joints take their commanded value as an angle unchanged. A few do
//! not: the gripper is driven by an opening percentage and the wrist roll is
//! mounted mirrored. Those cases live in a [`ValueTransformTable`] so new ones
//! are added as table entries rather than branches in the engine loop.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::registry::normalize_name;

/// Units of the angles in a joint command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnits {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnits {
    #[inline]
    #[must_use]
    pub fn to_degrees(self, value: f32) -> f32 {
        match self {
            AngleUnits::Degrees => value,
            AngleUnits::Radians => value.to_degrees(),
        }
    }
}

/// Maps a commanded joint value to an angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueTransform {
    /// The value is the angle.
    Identity,
    /// The angle is the value negated.
    Negate,
    /// The value is an opening in `[0, 100]`, mapped linearly onto
    /// `[0, -full_open_degrees]`.
    OpeningPercent { full_open_degrees: f32 },
}

impl ValueTransform {
    /// Converts a commanded value into degrees.
    ///
    /// `units` applies to angle-valued joints only; an opening percentage
    /// has no angular unit.
    #[must_use]
    pub fn to_degrees(self, value: f32, units: AngleUnits) -> f32 {
        match self {
            ValueTransform::Identity => units.to_degrees(value),
            ValueTransform::Negate => -units.to_degrees(value),
            ValueTransform::OpeningPercent { full_open_degrees } => {
                -(value / 100.0) * full_open_degrees
            }
        }
    }

    /// Whether a positive command produces a negative angle.
    #[must_use]
    pub fn inverts_sign(self) -> bool {
        !matches!(self, ValueTransform::Identity)
    }
}

pub const GRIPPER_JOINT: &str = "gripper";
pub const WRIST_ROLL_JOINT: &str = "wrist_roll";

/// Full opening of the gripper jaw, degrees.
pub const GRIPPER_FULL_OPEN_DEGREES: f32 = 127.0;

/// Value transforms keyed by lower-cased joint name. Joints without an entry
/// use [`ValueTransform::Identity`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTransformTable {
    entries: FxHashMap<String, ValueTransform>,
}

impl ValueTransformTable {
    /// A table with no special cases.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, joint_name: &str, transform: ValueTransform) {
        self.entries.insert(normalize_name(joint_name), transform);
    }

    #[must_use]
    pub fn with(mut self, joint_name: &str, transform: ValueTransform) -> Self {
        self.insert(joint_name, transform);
        self
    }

    #[must_use]
    pub fn get(&self, joint_name: &str) -> ValueTransform {
        self.entries
            .get(&normalize_name(joint_name))
            .copied()
            .unwrap_or(ValueTransform::Identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ValueTransform)> {
        self.entries.iter().map(|(name, &t)| (name.as_str(), t))
    }
}

impl Default for ValueTransformTable {
    /// The SO-101 arm: percentage gripper and mirrored wrist roll.
    fn default() -> Self {
        Self::empty()
            .with(
                GRIPPER_JOINT,
                ValueTransform::OpeningPercent {
                    full_open_degrees: GRIPPER_FULL_OPEN_DEGREES,
                },
            )
            .with(WRIST_ROLL_JOINT, ValueTransform::Negate)
    }
}
