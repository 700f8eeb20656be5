//! Camera controls
//!
//! - [`CameraPoseController`]: orbit camera with custom zoom and pose sync
//! - [`Spherical`]: spherical/cartesian offset conversion
//! - [`input`]: platform-agnostic pointer events

pub mod input;
pub mod orbit;
pub mod spherical;

pub use input::{ButtonState, CursorHint, InteractionMode, MouseButton, PointerEvent};
pub use orbit::{CameraPoseController, POSE_UPDATE_INTERVAL, ZOOM_INDICATOR_SETTLE};
pub use spherical::Spherical;
