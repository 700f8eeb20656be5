//! Utility Module
//!
//! - [`Throttle`]: fixed-interval rate limiter for outbound pose updates
//! - [`RedrawRequest`]: render request versioning shared by the writers
//! - [`time`]: `Instant`/`Duration` that also work on wasm32

pub mod redraw;
pub mod throttle;
pub mod time;

pub use redraw::{RedrawRequest, RedrawWatcher};
pub use throttle::Throttle;
