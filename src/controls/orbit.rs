//! Camera pose controller
//!
//! Orbit camera around a look-at target, driven by three sources:
//!
//! - pointer drags (primary button rotates, secondary pans),
//! - the wheel, through a distance-scaled custom zoom,
//! - remote peers, through [`CameraPoseController::apply_remote_camera_pose`].
//!
//! Drags are ignored until the host reports the viewport size through
//! [`PointerEvent::Resized`], since rotate and pan speeds are per pixel of
//! viewport height.
//!
//! Local changes request a render and broadcast the pose through the injected
//! [`PoseTransport`], rate limited to one message per
//! [`POSE_UPDATE_INTERVAL`]. Remote poses are applied and rendered but never
//! re-broadcast.
//!
//! Every time-dependent entry point has an `_at` variant taking the current
//! instant explicitly; the plain variants read the clock.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::config::{RADIUS_FLOOR, ViewerConfig, ZoomConfig};
use crate::controls::input::{
    ButtonState, CursorHint, CursorTracker, InteractionMode, PointerEvent,
};
use crate::controls::spherical::Spherical;
use crate::protocol::{
    CameraPoseMessage, CameraPoseParams, METHOD_CHANGE_CAMERA, PoseTransport, RemoteCameraPose,
};
use crate::scene::Camera;
use crate::utils::time::{Duration, Instant};
use crate::utils::{RedrawRequest, Throttle};

/// Minimum spacing between two outbound pose messages.
pub const POSE_UPDATE_INTERVAL: Duration = Duration::from_millis(50);

/// How long the zoom cursor stays up after the last wheel event.
pub const ZOOM_INDICATOR_SETTLE: Duration = Duration::from_millis(200);

pub struct CameraPoseController {
    camera: Camera,
    target: Vec3,
    zoom: ZoomConfig,

    home_position: Vec3,
    home_target: Vec3,

    mode: InteractionMode,
    cursor: CursorTracker,
    screen_size: Vec2,
    zoom_indicator_until: Option<Instant>,

    throttle: Throttle,
    client_id: String,
    model_name: String,
    transport: Box<dyn PoseTransport>,
    redraw: RedrawRequest,
}

impl CameraPoseController {
    /// Places the camera `camera_z_offset` in front of the configured target
    /// (clamped to the zoom range) and looks at it.
    pub fn new(
        config: &ViewerConfig,
        transport: Box<dyn PoseTransport>,
        redraw: RedrawRequest,
    ) -> Self {
        let zoom = config.zoom.validated();
        let target = config.camera_target();
        let z_offset = zoom
            .clamp_radius(config.camera_z_offset.abs())
            .copysign(config.camera_z_offset);
        let position = target + Vec3::new(0.0, 0.0, z_offset);

        let mut camera = Camera::default();
        camera.position = position;
        camera.look_at(target);

        let client_id = config.resolve_client_id();
        log::info!("Camera pose controller ready (client id {client_id})");

        Self {
            camera,
            target,
            zoom,
            home_position: position,
            home_target: target,
            mode: InteractionMode::Idle,
            cursor: CursorTracker::default(),
            screen_size: Vec2::ZERO,
            zoom_indicator_until: None,
            throttle: Throttle::new(POSE_UPDATE_INTERVAL),
            client_id,
            model_name: config.model_name.clone(),
            transport,
            redraw,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Host-side projection updates (aspect ratio, fov). Pose fields must be
    /// changed through the controller.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.camera.position
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current offset from the target in spherical form.
    #[must_use]
    pub fn spherical(&self) -> Spherical {
        Spherical::from_offset(self.camera.position - self.target)
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn zoom_config(&self) -> &ZoomConfig {
        &self.zoom
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Feeds one pointer event. Returns `true` when the event was consumed
    /// and the host should suppress its default action.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    pub fn handle_event_at(&mut self, event: PointerEvent, now: Instant) -> bool {
        match event {
            PointerEvent::Button { button, state } => {
                let mode = InteractionMode::for_button(button);
                match state {
                    ButtonState::Pressed => {
                        if self.mode == InteractionMode::Idle
                            && let Some(mode) = mode
                        {
                            self.mode = mode;
                            return true;
                        }
                    }
                    ButtonState::Released => {
                        if mode.is_some_and(|m| m == self.mode) {
                            self.mode = InteractionMode::Idle;
                            return true;
                        }
                    }
                }
                false
            }
            PointerEvent::Moved { position } => {
                let Some(delta) = self.cursor.moved_to(position) else {
                    return false;
                };
                if delta == Vec2::ZERO {
                    return false;
                }
                if self.mode != InteractionMode::Idle && self.screen_size.y < 1.0 {
                    log::debug!("Ignoring drag before the viewport size is known");
                    return false;
                }
                match self.mode {
                    InteractionMode::Rotating => self.rotate_at(delta, now),
                    InteractionMode::Panning => self.pan_at(delta, now),
                    InteractionMode::Idle => return false,
                }
                true
            }
            PointerEvent::Wheel { delta_y } => {
                self.zoom_indicator_until = Some(now + ZOOM_INDICATOR_SETTLE);
                self.zoom_by_at(delta_y, now);
                true
            }
            PointerEvent::ContextMenu => true,
            PointerEvent::Resized { width, height } => {
                self.screen_size = Vec2::new(width as f32, height as f32);
                if height > 0 {
                    self.camera.set_aspect(width as f32 / height as f32);
                }
                false
            }
            PointerEvent::Left => {
                self.mode = InteractionMode::Idle;
                self.cursor.reset();
                false
            }
        }
    }

    /// Orbits by a pointer delta in pixels.
    fn rotate_at(&mut self, delta: Vec2, now: Instant) {
        let rotate_per_pixel = TAU / self.screen_size.y * self.zoom.rotate_speed;

        let mut spherical = self.spherical();
        spherical.theta -= delta.x * rotate_per_pixel;
        spherical.phi -= delta.y * rotate_per_pixel;
        spherical.radius = spherical.radius.max(RADIUS_FLOOR);

        self.place_camera(self.target + spherical.make_safe().to_offset());
        self.on_user_interaction_change_at(now);
    }

    /// Moves target and camera together in the view plane.
    fn pan_at(&mut self, delta: Vec2, now: Instant) {
        let screen_height = self.screen_size.y;
        let distance = (self.camera.position - self.target).length();
        let half_fov = self.camera.fov / 2.0;
        let pixels_to_world = 2.0 * distance * half_fov.tan() / screen_height;

        let forward = self.camera.forward();
        let Some(right) = forward.cross(Vec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward).normalize();

        let pan = (right * -delta.x + up * delta.y) * pixels_to_world * self.zoom.pan_speed;
        self.target += pan;
        self.place_camera(self.camera.position + pan);
        self.on_user_interaction_change_at(now);
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    /// Moves the camera along its current viewing direction.
    ///
    /// The step is `delta · zoom_speed · scale` where `scale` grows with the
    /// current radius (`radius / scale_at_radius`, clamped), so zoom is coarse
    /// far away and fine up close. The resulting radius is clamped to the
    /// configured range.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom_by_at(delta, Instant::now());
    }

    pub fn zoom_by_at(&mut self, delta: f32, now: Instant) {
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite zoom delta {delta}");
            return;
        }

        let offset = self.camera.position - self.target;
        let radius = offset.length();
        let direction = offset.try_normalize().unwrap_or(Vec3::Z);

        let scale = (radius / self.zoom.scale_at_radius).clamp(self.zoom.min_scale, self.zoom.max_scale);
        let next_radius = self
            .zoom
            .clamp_radius(radius + delta * self.zoom.zoom_speed * scale);
        if !next_radius.is_finite() {
            log::warn!("Zoom produced a non-finite radius, keeping the current pose");
            return;
        }

        self.place_camera(self.target + direction * next_radius);
        self.redraw.request();
        self.send_pose_update_at(now);
    }

    /// Whether the zoom indicator is raised at `now`.
    #[must_use]
    pub fn is_zooming_at(&self, now: Instant) -> bool {
        self.zoom_indicator_until.is_some_and(|until| now < until)
    }

    /// Drops the zoom indicator once its settle delay has passed. Returns
    /// `true` on the call that lowers it, so the host can refresh the cursor.
    pub fn poll_zoom_indicator(&mut self, now: Instant) -> bool {
        match self.zoom_indicator_until {
            Some(until) if now >= until => {
                self.zoom_indicator_until = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn cursor_hint_at(&self, now: Instant) -> CursorHint {
        if self.is_zooming_at(now) {
            return CursorHint::Zoom;
        }
        match self.mode {
            InteractionMode::Idle => CursorHint::Default,
            InteractionMode::Rotating => CursorHint::Rotate,
            InteractionMode::Panning => CursorHint::Pan,
        }
    }

    // ========================================================================
    // Outbound sync
    // ========================================================================

    /// Called on every interactive change: renders and broadcasts.
    pub fn on_user_interaction_change(&mut self) {
        self.on_user_interaction_change_at(Instant::now());
    }

    pub fn on_user_interaction_change_at(&mut self, now: Instant) {
        self.redraw.request();
        self.send_pose_update_at(now);
    }

    /// The pose as it would be sent now.
    #[must_use]
    pub fn pose_params(&self) -> CameraPoseParams {
        let spherical = self.spherical();
        let position = self.camera.position;
        CameraPoseParams {
            client_id: self.client_id.clone(),
            radius: spherical.radius,
            theta: spherical.theta,
            phi: spherical.phi,
            cam_x: position.x,
            cam_y: position.y,
            cam_z: position.z,
            target_x: self.target.x,
            target_y: self.target.y,
            target_z: self.target.z,
        }
    }

    /// Broadcasts the current pose unless one was sent less than
    /// [`POSE_UPDATE_INTERVAL`] ago. Suppressed poses are dropped, not
    /// queued. Returns whether a message was sent.
    pub fn send_pose_update(&mut self) -> bool {
        self.send_pose_update_at(Instant::now())
    }

    pub fn send_pose_update_at(&mut self, now: Instant) -> bool {
        if !self.throttle.try_fire_at(now) {
            log::trace!("Camera pose update throttled");
            return false;
        }

        let message = CameraPoseMessage::new(METHOD_CHANGE_CAMERA, self.pose_params());
        self.transport
            .send(&self.client_id, &self.model_name, &message);
        true
    }

    // ========================================================================
    // Inbound sync
    // ========================================================================

    /// Applies a camera pose received from a peer.
    ///
    /// - Target fields that are present replace the current target; missing
    ///   ones keep their current value.
    /// - `camX/camY/camZ`, when all three are present, are used as the
    ///   position directly.
    /// - Otherwise the position is rebuilt from `radius` (clamped; current
    ///   distance when absent), `theta` (default 0) and `phi` (default π/2)
    ///   around the new target.
    ///
    /// Poses carrying this controller's own client id are ignored. Nothing
    /// is broadcast from here. Returns whether the pose was applied.
    pub fn apply_remote_camera_pose(&mut self, pose: &RemoteCameraPose) -> bool {
        if pose.client_id.as_deref() == Some(self.client_id.as_str()) {
            log::trace!("Ignoring echoed camera pose");
            return false;
        }

        let current_distance = (self.camera.position - self.target).length();
        let radius = match pose.radius {
            Some(radius) => self.zoom.clamp_radius(radius),
            None => current_distance.max(RADIUS_FLOOR),
        };

        self.target = Vec3::new(
            pose.target_x.unwrap_or(self.target.x),
            pose.target_y.unwrap_or(self.target.y),
            pose.target_z.unwrap_or(self.target.z),
        );

        let position = match (pose.cam_x, pose.cam_y, pose.cam_z) {
            (Some(x), Some(y), Some(z)) => Vec3::new(x, y, z),
            partial => {
                if partial.0.is_some() || partial.1.is_some() || partial.2.is_some() {
                    log::debug!("Remote camera pose has partial cartesian fields, using spherical");
                }
                let spherical = Spherical::new(
                    radius,
                    pose.theta.unwrap_or(0.0),
                    pose.phi.unwrap_or(Spherical::LEVEL_PHI),
                );
                self.target + spherical.to_offset()
            }
        };

        self.place_camera(position);
        self.redraw.request();
        true
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Restores the initial pose and broadcasts it.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.target = self.home_target;
        self.place_camera(self.home_position);
        self.mode = InteractionMode::Idle;
        self.on_user_interaction_change_at(now);
    }

    fn place_camera(&mut self, position: Vec3) {
        self.camera.position = position;
        self.camera.look_at(self.target);
    }
}
