//! Viewer state
//!
//! [`Viewer`] owns every piece of mutable visual state: the scene graph, the
//! node registry, the joint engine and the camera controller. Nothing else
//! writes camera pose or joint rotations.
//!
//! # Initialisation order
//!
//! 1. configuration (read-only afterwards)
//! 2. render request counter, shared by both writers
//! 3. empty scene and registry
//! 4. joint engine, without axis configuration
//! 5. camera controller, at its configured initial pose
//!
//! After construction the host loads a model ([`Viewer::load_scene`]) and,
//! optionally, an axis configuration. Messages and input may arrive in any
//! order after that; before a model is loaded joint commands are skipped.

use std::fmt::Display;
use std::path::Path;

use crate::config::ViewerConfig;
use crate::controls::{CameraPoseController, PointerEvent};
use crate::errors::{Result, TwinError};
use crate::joints::{AngleUnits, JointApplyReport, JointAxisConfig, JointTransformEngine, JointValue};
use crate::protocol::{InboundMessage, PoseTransport, RemoteCameraPose};
use crate::registry::SceneNodeRegistry;
use crate::scene::Scene;
use crate::utils::{RedrawRequest, RedrawWatcher};

pub struct Viewer {
    config: ViewerConfig,
    redraw: RedrawRequest,
    frame: RedrawWatcher,
    scene: Scene,
    registry: SceneNodeRegistry,
    joints: JointTransformEngine,
    camera: CameraPoseController,
}

impl Viewer {
    pub fn new(config: ViewerConfig, transport: impl PoseTransport + 'static) -> Self {
        let redraw = RedrawRequest::new();
        let frame = redraw.watcher();
        let joints = JointTransformEngine::new(redraw.clone());
        let camera = CameraPoseController::new(&config, Box::new(transport), redraw.clone());

        Self {
            config,
            redraw,
            frame,
            scene: Scene::new(),
            registry: SceneNodeRegistry::default(),
            joints,
            camera,
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Installs the outcome of an external asset load.
    ///
    /// On success the model offset is applied to the root nodes, the registry
    /// is rebuilt and the rest pose captured. On failure, or for an empty
    /// scene, the viewer is left with an empty scene. Returns whether a model
    /// is now loaded.
    pub fn load_scene<E: Display>(&mut self, loaded: std::result::Result<Scene, E>) -> bool {
        let mut scene = match loaded {
            Ok(scene) if !scene.is_empty() => scene,
            Ok(_) => {
                log::error!("Loaded model contains no nodes");
                self.clear_scene();
                return false;
            }
            Err(err) => {
                log::error!("Failed to load model: {err}");
                self.clear_scene();
                return false;
            }
        };

        let offset = self.config.model;
        let rotation = offset.rotation_radians();
        for &root in &scene.root_nodes.clone() {
            if let Some(node) = scene.get_node_mut(root) {
                node.transform.position += offset.position();
                node.transform.rotation += rotation;
            }
        }
        scene.update_matrix_world();

        let mut registry = SceneNodeRegistry::build(&scene);
        registry.capture_rest_pose(&scene);
        log::info!(
            "Model loaded: {} nodes, {} bones, {} named objects",
            scene.len(),
            registry.bone_count(),
            registry.object_count()
        );

        self.scene = scene;
        self.registry = registry;
        self.redraw.request();
        true
    }

    fn clear_scene(&mut self) {
        self.scene = Scene::new();
        self.registry = SceneNodeRegistry::default();
        self.redraw.request();
    }

    /// Installs an axis configuration from JSON. On failure the engine keeps
    /// working in per-command axis mode.
    pub fn load_axis_config_str(&mut self, json: &str) -> bool {
        self.install_axis_config(JointAxisConfig::from_json_str(json))
    }

    pub fn load_axis_config_path(&mut self, path: impl AsRef<Path>) -> bool {
        self.install_axis_config(JointAxisConfig::from_path(path))
    }

    fn install_axis_config(&mut self, config: Result<JointAxisConfig>) -> bool {
        match config {
            Ok(config) => {
                self.joints.set_axis_config(config);
                true
            }
            Err(err) => {
                log::warn!("Joint axis configuration unavailable, axes must be supplied per command: {err}");
                false
            }
        }
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Decodes and applies one inbound message. Returns whether it was
    /// understood; bad messages are logged and dropped.
    pub fn handle_message(&mut self, json: &str) -> bool {
        match InboundMessage::parse(json) {
            Ok(InboundMessage::ChangeCamera(pose)) => {
                self.apply_remote_camera_pose(&pose);
                true
            }
            Ok(InboundMessage::SetJointAngles(command)) => {
                if command.joints.is_empty() {
                    log::warn!("Received empty joint command, skipping");
                    return true;
                }
                self.apply_joint_values(command.joints, command.units);
                true
            }
            Err(err) => {
                log::warn!("Dropping inbound message: {err}");
                false
            }
        }
    }

    pub fn apply_joint_values<I, K, V>(&mut self, values: I, units: AngleUnits) -> JointApplyReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<JointValue>,
    {
        self.joints
            .apply_joint_values(&mut self.scene, &mut self.registry, values, units)
    }

    /// Applies one joint value and reports a skip as an error.
    pub fn set_joint(&mut self, name: &str, value: impl Into<JointValue>, units: AngleUnits) -> Result<()> {
        if self.scene.is_empty() {
            return Err(TwinError::SceneNotLoaded);
        }
        let value: JointValue = value.into();
        let report = self.apply_joint_values([(name, value)], units);
        match report.skipped.into_iter().next() {
            Some((name, reason)) => Err(reason.to_error(name)),
            None => Ok(()),
        }
    }

    pub fn apply_remote_camera_pose(&mut self, pose: &RemoteCameraPose) -> bool {
        self.camera.apply_remote_camera_pose(pose)
    }

    pub fn handle_input(&mut self, event: PointerEvent) -> bool {
        self.camera.handle_event(event)
    }

    /// Returns `true` if anything requested a render since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.frame.take()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn wireframe(&self) -> bool {
        self.config.wireframe
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn registry(&self) -> &SceneNodeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn joints(&self) -> &JointTransformEngine {
        &self.joints
    }

    #[must_use]
    pub fn camera(&self) -> &CameraPoseController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraPoseController {
        &mut self.camera
    }
}
