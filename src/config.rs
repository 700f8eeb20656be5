//! Viewer configuration
//!
//! Static records read once at startup. Nothing here is mutated after the
//! viewer is constructed.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Smallest radius the camera may orbit at. Keeps the spherical conversion
/// away from the degenerate zero-length offset.
pub const RADIUS_FLOOR: f32 = 1e-4;

/// Zoom and pointer speed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radius at which the zoom scale is exactly 1.
    pub scale_at_radius: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_radius: 0.1,
            max_radius: 10.0,
            scale_at_radius: 1.0,
            min_scale: 0.1,
            max_scale: 4.0,
            zoom_speed: 0.002,
            rotate_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

impl ZoomConfig {
    /// Returns a copy with ordered ranges and a positive radius floor.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.min_radius > self.max_radius {
            log::warn!(
                "Zoom radius range is inverted ({} > {}), swapping",
                self.min_radius,
                self.max_radius
            );
            std::mem::swap(&mut self.min_radius, &mut self.max_radius);
        }
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.min_radius = self.min_radius.max(RADIUS_FLOOR);
        self.max_radius = self.max_radius.max(self.min_radius);
        if self.scale_at_radius <= 0.0 {
            self.scale_at_radius = 1.0;
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius, self.max_radius)
    }
}

/// Placement of the loaded model relative to the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOffset {
    pub position: [f32; 3],
    /// XYZ Euler angles in degrees.
    pub rotation: [f32; 3],
}

impl ModelOffset {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Rotation in radians.
    #[must_use]
    pub fn rotation_radians(&self) -> Vec3 {
        Vec3::from_array(self.rotation.map(f32::to_radians))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub model: ModelOffset,
    /// Initial camera distance along +Z from the target.
    pub camera_z_offset: f32,
    pub camera_target: [f32; 3],
    pub zoom: ZoomConfig,
    pub wireframe: bool,
    /// Identifier sent with outbound camera updates. Generated when absent.
    pub client_id: Option<String>,
    /// Model name the transport keys camera updates by.
    pub model_name: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: ModelOffset::default(),
            camera_z_offset: 1.0,
            camera_target: [0.0; 3],
            zoom: ZoomConfig::default(),
            wireframe: false,
            client_id: None,
            model_name: "so-101".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn camera_target(&self) -> Vec3 {
        Vec3::from_array(self.camera_target)
    }

    /// The configured client id, or a fresh random one.
    #[must_use]
    pub fn resolve_client_id(&self) -> String {
        self.client_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}
