use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

/// A camera offset expressed as radius, azimuthal angle `theta` and polar
/// angle `phi` (measured from +Y).
///
/// Convention, shared by outbound and inbound camera messages:
///
/// ```text
/// x = r · sin φ · cos θ
/// y = r · cos φ
/// z = r · sin φ · sin θ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    /// Polar angle that puts the camera level with its target.
    pub const LEVEL_PHI: f32 = FRAC_PI_2;

    #[must_use]
    pub fn new(radius: f32, theta: f32, phi: f32) -> Self {
        Self { radius, theta, phi }
    }

    /// Converts a cartesian offset. A zero offset yields radius 0 with the
    /// default angles (`theta = 0`, `phi = π/2`).
    #[must_use]
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self::new(0.0, 0.0, Self::LEVEL_PHI);
        }

        Self {
            radius,
            theta: offset.z.atan2(offset.x),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    #[must_use]
    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.cos(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.sin(),
        )
    }

    /// Keeps `phi` strictly inside `(eps, π - eps)` so the camera never sits
    /// on the vertical axis where `look_at` degenerates.
    #[must_use]
    pub fn make_safe(mut self) -> Self {
        const EPS: f32 = 1e-4;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_uses_level_defaults() {
        let s = Spherical::from_offset(Vec3::ZERO);
        assert_eq!(s.radius, 0.0);
        assert_eq!(s.theta, 0.0);
        assert_eq!(s.phi, FRAC_PI_2);
    }

    #[test]
    fn level_default_points_along_x() {
        let offset = Spherical::new(2.0, 0.0, Spherical::LEVEL_PHI).to_offset();
        assert!((offset - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }
}
