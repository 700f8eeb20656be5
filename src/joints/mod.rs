//! Joint model
//!
//! - [`Axis`]: principal rotation axis and the Y handedness convention
//! - [`JointAxisConfig`]: joint name to axis mapping loaded at startup
//! - [`ValueTransformTable`]: per-joint value transforms (gripper, wrist roll)
//! - [`JointTransformEngine`]: applies joint commands relative to rest pose

pub mod axis;
pub mod config;
pub mod engine;
pub mod transforms;

pub use axis::Axis;
pub use config::JointAxisConfig;
pub use engine::{JointApplyReport, JointTransformEngine, JointValue, SkipReason, clean_joint_name};
pub use transforms::{AngleUnits, ValueTransform, ValueTransformTable};
