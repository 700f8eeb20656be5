#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Visual state of a robotic-arm digital twin: an orbit camera whose pose is
//! kept in sync with remote peers, and a joint engine that poses a loaded
//! model from named joint commands.

pub mod config;
pub mod controls;
pub mod errors;
pub mod joints;
pub mod protocol;
pub mod registry;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use config::{ViewerConfig, ZoomConfig};
pub use controls::{CameraPoseController, PointerEvent, Spherical};
pub use errors::{Result, TwinError};
pub use joints::{AngleUnits, Axis, JointAxisConfig, JointTransformEngine};
pub use protocol::{InboundMessage, PoseTransport, RemoteCameraPose};
pub use registry::SceneNodeRegistry;
pub use scene::{Node, NodeKind, Scene};
pub use viewer::Viewer;
