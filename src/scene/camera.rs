use glam::{Mat4, Vec3};

/// Perspective camera.
///
/// Owns its transform. The camera pose controller is the only writer of the
/// position and orientation; renderers read the matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,

    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    target: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            up: Vec3::Y,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            target: Vec3::ZERO,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam.look_at(Vec3::ZERO);
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Points the camera at `target` and rebuilds the view matrix.
    ///
    /// When the camera sits exactly on the target the previous view matrix is
    /// kept; the controller's radius floor prevents that in practice.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        if (self.position - target).length_squared() > f32::EPSILON {
            self.view_matrix = Mat4::look_at_rh(self.position, target, self.up);
        }
    }

    /// The point the camera was last pointed at.
    #[inline]
    #[must_use]
    pub fn looking_at(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Unit vector from the camera toward its target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(45.0, 16.0 / 9.0, 0.01, 100.0)
    }
}
