use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::Result;
use crate::joints::axis::Axis;
use crate::joints::engine::clean_joint_name;

#[derive(Debug, Deserialize)]
struct RawAxisConfig {
    #[serde(default)]
    joints: BTreeMap<String, String>,
}

/// Rotation axis per joint, keyed by cleaned joint name (lower-cased, `.pos`
/// stripped) so keys match command names however either side spells them.
///
/// Loaded once from `{ "joints": { "<name>": "x" | "y" | "z" } }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointAxisConfig {
    axes: FxHashMap<String, Axis>,
}

impl JointAxisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON form. Entries with an unrecognised axis are dropped
    /// with a warning; malformed JSON is an error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawAxisConfig = serde_json::from_str(json)?;
        let mut config = Self::new();

        for (name, axis) in raw.joints {
            match axis.parse::<Axis>() {
                Ok(axis) => config.insert(&name, axis),
                Err(err) => log::warn!("Ignoring axis entry for joint '{name}': {err}"),
            }
        }

        log::info!("Loaded rotation axes for {} joints", config.len());
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, joint_name: &str, axis: Axis) {
        self.axes.insert(clean_joint_name(joint_name), axis);
    }

    #[must_use]
    pub fn with(mut self, joint_name: &str, axis: Axis) -> Self {
        self.insert(joint_name, axis);
        self
    }

    #[must_use]
    pub fn axis_for(&self, joint_name: &str) -> Option<Axis> {
        self.axes.get(&clean_joint_name(joint_name)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Axis)> {
        self.axes.iter().map(|(name, &axis)| (name.as_str(), axis))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}
