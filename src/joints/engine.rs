//! Joint transform engine
//!
//! Applies joint commands to the scene. Every rotation is written as
//! `rest + delta` on a single Euler component, never accumulated, so
//! replaying or reordering a command cannot drift the pose.

use crate::errors::TwinError;
use crate::joints::axis::Axis;
use crate::joints::config::JointAxisConfig;
use crate::joints::transforms::{AngleUnits, ValueTransformTable};
use crate::registry::{SceneNodeRegistry, normalize_name};
use crate::scene::Scene;
use crate::utils::RedrawRequest;

/// Suffix the robot side appends to position readings (`"elbow_flex.pos"`).
pub const POSITION_SUFFIX: &str = ".pos";

/// Strips [`POSITION_SUFFIX`] and normalises case.
#[must_use]
pub fn clean_joint_name(name: &str) -> String {
    let name = normalize_name(name);
    match name.strip_suffix(POSITION_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// One commanded joint value, optionally carrying its axis.
///
/// The axis is only consulted when no [`JointAxisConfig`] is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointValue {
    pub value: f32,
    pub axis: Option<Axis>,
}

impl From<f32> for JointValue {
    fn from(value: f32) -> Self {
        Self { value, axis: None }
    }
}

impl From<(Axis, f32)> for JointValue {
    fn from((axis, value): (Axis, f32)) -> Self {
        Self {
            value,
            axis: Some(axis),
        }
    }
}

/// Why a joint entry was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty name after cleaning.
    EmptyName,
    /// NaN or infinite value.
    NonFiniteValue,
    /// Axis configuration is loaded but lacks this joint, or no configuration
    /// is loaded and the entry carried no axis.
    MissingAxis,
    /// No scene node matches the name.
    UnknownJoint,
}

impl SkipReason {
    /// The error a single-joint caller sees for this skip.
    #[must_use]
    pub fn to_error(self, joint_name: String) -> TwinError {
        match self {
            SkipReason::EmptyName | SkipReason::UnknownJoint => TwinError::UnknownJoint(joint_name),
            SkipReason::NonFiniteValue => TwinError::NonFiniteValue(joint_name),
            SkipReason::MissingAxis => TwinError::MissingAxis(joint_name),
        }
    }
}

/// Outcome of one [`JointTransformEngine::apply_joint_values`] batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointApplyReport {
    /// Cleaned names of joints that were written.
    pub applied: Vec<String>,
    /// Cleaned names of joints that were skipped, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
}

impl JointApplyReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct JointTransformEngine {
    axis_config: Option<JointAxisConfig>,
    transforms: ValueTransformTable,
    redraw: RedrawRequest,
}

impl JointTransformEngine {
    /// Creates an engine without axis configuration (axes must then be
    /// supplied per command) and with the default value transforms.
    #[must_use]
    pub fn new(redraw: RedrawRequest) -> Self {
        Self {
            axis_config: None,
            transforms: ValueTransformTable::default(),
            redraw,
        }
    }

    #[must_use]
    pub fn with_transforms(mut self, transforms: ValueTransformTable) -> Self {
        self.transforms = transforms;
        self
    }

    /// Installs the axis configuration.
    ///
    /// Joints whose value transform already inverts the sign and which are
    /// configured on `y` get inverted twice (once by the transform, once by
    /// the Y handedness flip). That combination is reported, not corrected.
    pub fn set_axis_config(&mut self, config: JointAxisConfig) {
        for (name, axis) in config.iter() {
            if axis == Axis::Y && self.transforms.get(name).inverts_sign() {
                log::warn!(
                    "Joint '{name}' has a sign-inverting value transform and rotates about y; \
                     its angle is inverted twice"
                );
            }
        }
        self.axis_config = Some(config);
    }

    pub fn clear_axis_config(&mut self) {
        self.axis_config = None;
    }

    #[must_use]
    pub fn axis_config(&self) -> Option<&JointAxisConfig> {
        self.axis_config.as_ref()
    }

    #[must_use]
    pub fn transforms(&self) -> &ValueTransformTable {
        &self.transforms
    }

    /// Signed rotation delta in radians for a commanded value on `axis`.
    #[must_use]
    pub fn rotation_delta(&self, joint_name: &str, axis: Axis, value: f32, units: AngleUnits) -> f32 {
        let degrees = self.transforms.get(joint_name).to_degrees(value, units);
        (degrees * axis.handedness_sign()).to_radians()
    }

    /// Applies a batch of joint values.
    ///
    /// Each entry is handled independently: entries that cannot be applied
    /// are skipped with a diagnostic and the rest of the batch continues.
    /// Touched nodes have their world matrices refreshed immediately and a
    /// render is requested once the batch is done.
    pub fn apply_joint_values<I, K, V>(
        &mut self,
        scene: &mut Scene,
        registry: &mut SceneNodeRegistry,
        values: I,
        units: AngleUnits,
    ) -> JointApplyReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<JointValue>,
    {
        let mut report = JointApplyReport::default();

        for (raw_name, value) in values {
            let value: JointValue = value.into();
            let name = clean_joint_name(raw_name.as_ref());

            match self.apply_one(scene, registry, &name, value, units) {
                Ok(()) => report.applied.push(name),
                Err(reason) => report.skipped.push((name, reason)),
            }
        }

        self.redraw.request();

        if !report.skipped.is_empty() {
            log::debug!(
                "Applied {} joints, skipped {}",
                report.applied.len(),
                report.skipped.len()
            );
        }
        report
    }

    fn apply_one(
        &self,
        scene: &mut Scene,
        registry: &mut SceneNodeRegistry,
        name: &str,
        value: JointValue,
        units: AngleUnits,
    ) -> Result<(), SkipReason> {
        if name.is_empty() {
            log::warn!("Skipping joint entry with empty name");
            return Err(SkipReason::EmptyName);
        }
        if !value.value.is_finite() {
            log::warn!("Skipping joint '{name}': value {} is not finite", value.value);
            return Err(SkipReason::NonFiniteValue);
        }

        let axis = match &self.axis_config {
            Some(config) => config.axis_for(name).ok_or_else(|| {
                log::warn!("Skipping joint '{name}': no axis configured");
                SkipReason::MissingAxis
            })?,
            None => value.axis.ok_or_else(|| {
                log::warn!("Skipping joint '{name}': no axis configuration loaded and none supplied");
                SkipReason::MissingAxis
            })?,
        };

        let delta = self.rotation_delta(name, axis, value.value, units);

        let Some(resolved) = registry.resolve(scene, name) else {
            log::warn!(
                "Skipping joint '{name}': no matching scene node ({})",
                registry.known_names()
            );
            return Err(SkipReason::UnknownJoint);
        };

        let handle = resolved.target.handle;
        let Some(node) = scene.get_node_mut(handle) else {
            return Err(SkipReason::UnknownJoint);
        };

        let rest = axis.component(resolved.rest_rotation);
        axis.set_component(&mut node.transform.rotation, rest + delta);
        scene.update_subtree(handle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_joint_name_strips_position_suffix() {
        assert_eq!(clean_joint_name("Shoulder_Pan.pos"), "shoulder_pan");
        assert_eq!(clean_joint_name("gripper"), "gripper");
        assert_eq!(clean_joint_name("elbow.position"), "elbow.position");
    }

    #[test]
    fn y_axis_delta_is_inverted() {
        let engine = JointTransformEngine::new(RedrawRequest::new());
        let y = engine.rotation_delta("shoulder_pan", Axis::Y, 30.0, AngleUnits::Degrees);
        let x = engine.rotation_delta("shoulder_pan", Axis::X, 30.0, AngleUnits::Degrees);
        assert!((y + 30f32.to_radians()).abs() < 1e-6);
        assert!((x - 30f32.to_radians()).abs() < 1e-6);
    }
}
