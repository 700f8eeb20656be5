use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::TwinError;

/// One of the three principal local rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Reads this axis' component of an Euler rotation.
    #[inline]
    #[must_use]
    pub fn component(self, rotation: Vec3) -> f32 {
        match self {
            Axis::X => rotation.x,
            Axis::Y => rotation.y,
            Axis::Z => rotation.z,
        }
    }

    /// Writes this axis' component of an Euler rotation.
    #[inline]
    pub fn set_component(self, rotation: &mut Vec3, value: f32) {
        match self {
            Axis::X => rotation.x = value,
            Axis::Y => rotation.y = value,
            Axis::Z => rotation.z = value,
        }
    }

    /// Sign applied to angles about this axis.
    ///
    /// Rotation about Y is inverted to match the handedness the arm model was
    /// authored in; X and Z pass through.
    #[inline]
    #[must_use]
    pub fn handedness_sign(self) -> f32 {
        match self {
            Axis::Y => -1.0,
            Axis::X | Axis::Z => 1.0,
        }
    }
}

impl FromStr for Axis {
    type Err = TwinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(TwinError::InvalidAxis(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(s)
    }
}
