//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! Only loading and parsing paths are fallible. The update paths that mutate
//! the scene (joint application, camera zoom, remote camera poses) never
//! return errors: they log a diagnostic and keep the view responsive.
//!
//! ```rust,ignore
//! use arm_twin::errors::{TwinError, Result};
//!
//! fn load() -> Result<()> {
//!     let _config = arm_twin::joints::JointAxisConfig::from_json_str("{\"joints\":{}}")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum TwinError {
    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// An inbound message named a method this viewer does not handle.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    // ========================================================================
    // Joint Errors
    // ========================================================================
    /// An axis name other than `x`, `y` or `z`.
    #[error("Invalid rotation axis: {0:?}")]
    InvalidAxis(String),

    /// No scene node matched the joint name.
    #[error("Unknown joint: {0}")]
    UnknownJoint(String),

    /// The commanded value for the joint was NaN or infinite.
    #[error("Non-finite value for joint: {0}")]
    NonFiniteValue(String),

    /// No axis could be determined for the joint.
    #[error("No rotation axis for joint: {0}")]
    MissingAxis(String),

    // ========================================================================
    // Viewer State Errors
    // ========================================================================
    /// An operation needed a loaded model but none is present.
    #[error("No scene loaded")]
    SceneNotLoaded,
}

/// Alias for `Result<T, TwinError>`.
pub type Result<T> = std::result::Result<T, TwinError>;
