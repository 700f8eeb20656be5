//! Joint engine and registry tests
//!
//! Tests for:
//! - Registry indexing: bones vs plain objects, case-insensitive names
//! - Rest pose capture and immutability
//! - Rest-relative, idempotent joint application
//! - Axis conventions and per-joint value transforms
//! - Skip diagnostics for unknown joints and missing axes

use arm_twin::joints::{
    AngleUnits, Axis, JointAxisConfig, JointTransformEngine, SkipReason, ValueTransform,
    ValueTransformTable,
};
use arm_twin::registry::SceneNodeRegistry;
use arm_twin::scene::{NodeHandle, NodeKind, Scene};
use arm_twin::utils::RedrawRequest;
use glam::Vec3;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Rig {
    scene: Scene,
    base: NodeHandle,
    shoulder_pan: NodeHandle,
    shoulder_lift: NodeHandle,
    elbow_flex: NodeHandle,
    wrist_roll: NodeHandle,
    gripper: NodeHandle,
}

/// A small SO-101 style chain. `elbow_flex` has a non-zero rest rotation.
fn build_rig() -> Rig {
    let mut scene = Scene::new();
    let base = scene.build_node("Base").build();
    let shoulder_pan = scene
        .build_node("Shoulder_Pan")
        .bone()
        .with_parent(base)
        .with_position(0.0, 0.1, 0.0)
        .build();
    let shoulder_lift = scene
        .build_node("shoulder_lift")
        .bone()
        .with_parent(shoulder_pan)
        .with_position(0.0, 0.05, 0.0)
        .build();
    let elbow_flex = scene
        .build_node("elbow_flex")
        .bone()
        .with_parent(shoulder_lift)
        .with_position(0.0, 0.11, 0.0)
        .with_rotation(0.5, 0.0, 0.0)
        .build();
    let wrist_roll = scene
        .build_node("wrist_roll")
        .bone()
        .with_parent(elbow_flex)
        .with_position(0.0, 0.13, 0.0)
        .build();
    let gripper = scene
        .build_node("gripper")
        .with_parent(wrist_roll)
        .with_position(0.0, 0.05, 0.0)
        .build();
    scene.update_matrix_world();

    Rig {
        scene,
        base,
        shoulder_pan,
        shoulder_lift,
        elbow_flex,
        wrist_roll,
        gripper,
    }
}

fn axis_config() -> JointAxisConfig {
    JointAxisConfig::new()
        .with("shoulder_pan", Axis::Y)
        .with("shoulder_lift", Axis::X)
        .with("elbow_flex", Axis::X)
        .with("wrist_roll", Axis::Z)
        .with("gripper", Axis::Z)
}

fn configured_engine() -> JointTransformEngine {
    let mut engine = JointTransformEngine::new(RedrawRequest::new());
    engine.set_axis_config(axis_config());
    engine
}

fn rotation(rig: &Rig, handle: NodeHandle) -> Vec3 {
    rig.scene.get_node(handle).unwrap().transform.rotation
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn registry_splits_bones_and_objects() {
    let rig = build_rig();
    let registry = SceneNodeRegistry::build(&rig.scene);

    assert_eq!(registry.bone_count(), 4);
    assert_eq!(registry.object_count(), 2);

    let names = registry.known_names();
    assert_eq!(names.bones, vec!["elbow_flex", "shoulder_lift", "shoulder_pan", "wrist_roll"]);
    assert_eq!(names.objects, vec!["base", "gripper"]);
}

#[test]
fn registry_resolves_case_insensitively() {
    let rig = build_rig();
    let registry = SceneNodeRegistry::build(&rig.scene);

    let target = registry.lookup("SHOULDER_PAN").unwrap();
    assert_eq!(target.handle, rig.shoulder_pan);
    assert_eq!(target.kind, NodeKind::Bone);

    let gripper = registry.lookup("gripper").unwrap();
    assert_eq!(gripper.handle, rig.gripper);
    assert_eq!(gripper.kind, NodeKind::Object);

    assert!(registry.lookup("nonexistent").is_none());
}

#[test]
fn registry_prefers_bone_over_object_with_same_name() {
    let mut scene = Scene::new();
    let object = scene.build_node("elbow").build();
    let bone = scene.build_node("Elbow").bone().with_parent(object).build();

    let registry = SceneNodeRegistry::build(&scene);
    let target = registry.lookup("elbow").unwrap();
    assert_eq!(target.handle, bone);
    assert_eq!(target.kind, NodeKind::Bone);
}

#[test]
fn rest_rotation_is_captured_once() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);

    let first = registry.resolve(&rig.scene, "elbow_flex").unwrap();
    assert!(vec3_approx(first.rest_rotation, Vec3::new(0.5, 0.0, 0.0)));

    rig.scene.get_node_mut(rig.elbow_flex).unwrap().transform.rotation.x = 2.0;
    let second = registry.resolve(&rig.scene, "elbow_flex").unwrap();
    assert_eq!(second.rest_rotation, first.rest_rotation);
}

#[test]
fn eager_capture_records_every_indexed_node() {
    let rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    registry.capture_rest_pose(&rig.scene);

    assert_eq!(registry.rest_rotation("elbow_flex"), Some(Vec3::new(0.5, 0.0, 0.0)));
    assert_eq!(registry.rest_rotation("base"), Some(Vec3::ZERO));
    assert_eq!(registry.rest_rotation("nonexistent"), None);
}

// ============================================================================
// Joint application
// ============================================================================

#[test]
fn y_axis_rotation_is_sign_inverted() {
    init_logger();
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_pan", 30.0_f32)],
        AngleUnits::Degrees,
    );

    assert!(report.is_complete());
    assert!(approx_eq(rotation(&rig, rig.shoulder_pan).y, -(30.0_f32.to_radians())));
}

#[test]
fn x_axis_rotation_is_applied_as_is() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_lift", 30.0_f32)],
        AngleUnits::Degrees,
    );

    let r = rotation(&rig, rig.shoulder_lift);
    assert!(approx_eq(r.x, 30.0_f32.to_radians()));
    assert_eq!(r.y, 0.0);
    assert_eq!(r.z, 0.0);
}

#[test]
fn applying_same_values_twice_is_idempotent() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();
    let values = [("shoulder_pan", 12.0_f32), ("elbow_flex", -40.0), ("gripper", 25.0)];

    engine.apply_joint_values(&mut rig.scene, &mut registry, values, AngleUnits::Degrees);
    let once = [
        rotation(&rig, rig.shoulder_pan),
        rotation(&rig, rig.elbow_flex),
        rotation(&rig, rig.gripper),
    ];

    engine.apply_joint_values(&mut rig.scene, &mut registry, values, AngleUnits::Degrees);
    let twice = [
        rotation(&rig, rig.shoulder_pan),
        rotation(&rig, rig.elbow_flex),
        rotation(&rig, rig.gripper),
    ];

    assert_eq!(once, twice);
}

#[test]
fn rotation_is_relative_to_rest_pose() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("elbow_flex", 10.0_f32)], AngleUnits::Degrees);
    assert!(approx_eq(rotation(&rig, rig.elbow_flex).x, 0.5 + 10.0_f32.to_radians()));

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("elbow_flex", 0.0_f32)], AngleUnits::Degrees);
    assert!(approx_eq(rotation(&rig, rig.elbow_flex).x, 0.5));
}

#[test]
fn gripper_percentage_maps_to_closing_angle() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    for (input, degrees) in [(0.0_f32, 0.0_f32), (100.0, -127.0), (50.0, -63.5)] {
        engine.apply_joint_values(&mut rig.scene, &mut registry, [("gripper", input)], AngleUnits::Degrees);
        assert!(
            approx_eq(rotation(&rig, rig.gripper).z, degrees.to_radians()),
            "gripper {input} should map to {degrees} degrees"
        );
    }
}

#[test]
fn wrist_roll_is_negated() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("wrist_roll", 20.0_f32)], AngleUnits::Degrees);
    assert!(approx_eq(rotation(&rig, rig.wrist_roll).z, -(20.0_f32.to_radians())));
}

#[test]
fn wrist_roll_on_y_is_inverted_twice() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = JointTransformEngine::new(RedrawRequest::new());
    engine.set_axis_config(JointAxisConfig::new().with("wrist_roll", Axis::Y));

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("wrist_roll", 20.0_f32)], AngleUnits::Degrees);
    assert!(approx_eq(rotation(&rig, rig.wrist_roll).y, 20.0_f32.to_radians()));
}

#[test]
fn position_suffix_and_case_are_ignored() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("Shoulder_Lift.pos", 15.0_f32)],
        AngleUnits::Degrees,
    );

    assert_eq!(report.applied, vec!["shoulder_lift".to_string()]);
    assert!(approx_eq(rotation(&rig, rig.shoulder_lift).x, 15.0_f32.to_radians()));
}

#[test]
fn radians_are_accepted() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("shoulder_lift", 0.25_f32)], AngleUnits::Radians);
    assert!(approx_eq(rotation(&rig, rig.shoulder_lift).x, 0.25));
}

// ============================================================================
// Diagnostics and partial batches
// ============================================================================

#[test]
fn unknown_joint_leaves_scene_untouched() {
    init_logger();
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = JointTransformEngine::new(RedrawRequest::new());
    engine.set_axis_config(axis_config().with("nonexistent", Axis::X));

    let before: Vec<Vec3> = rig.scene.nodes.values().map(|n| n.transform.rotation).collect();
    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("nonexistent", 10.0_f32)],
        AngleUnits::Degrees,
    );
    let after: Vec<Vec3> = rig.scene.nodes.values().map(|n| n.transform.rotation).collect();

    assert_eq!(before, after);
    assert_eq!(report.skipped, vec![("nonexistent".to_string(), SkipReason::UnknownJoint)]);
}

#[test]
fn missing_axis_entry_skips_only_that_joint() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = JointTransformEngine::new(RedrawRequest::new());
    engine.set_axis_config(JointAxisConfig::new().with("shoulder_lift", Axis::X));

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("elbow_flex", 10.0_f32), ("shoulder_lift", 10.0)],
        AngleUnits::Degrees,
    );

    assert_eq!(report.applied, vec!["shoulder_lift".to_string()]);
    assert_eq!(report.skipped, vec![("elbow_flex".to_string(), SkipReason::MissingAxis)]);
    assert!(approx_eq(rotation(&rig, rig.elbow_flex).x, 0.5));
}

#[test]
fn non_finite_values_are_skipped() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_lift", f32::NAN)],
        AngleUnits::Degrees,
    );

    assert_eq!(report.skipped, vec![("shoulder_lift".to_string(), SkipReason::NonFiniteValue)]);
    assert_eq!(rotation(&rig, rig.shoulder_lift), Vec3::ZERO);
}

#[test]
fn without_axis_config_axis_comes_from_command() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = JointTransformEngine::new(RedrawRequest::new());

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_pan", (Axis::Y, 30.0_f32))],
        AngleUnits::Degrees,
    );
    assert!(report.is_complete());
    assert!(approx_eq(rotation(&rig, rig.shoulder_pan).y, -(30.0_f32.to_radians())));

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_lift", 30.0_f32)],
        AngleUnits::Degrees,
    );
    assert_eq!(report.skipped, vec![("shoulder_lift".to_string(), SkipReason::MissingAxis)]);
}

// ============================================================================
// Propagation and rendering
// ============================================================================

#[test]
fn world_matrices_update_immediately() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = configured_engine();

    let before = rig.scene.get_node(rig.gripper).unwrap().transform.world_position();
    engine.apply_joint_values(&mut rig.scene, &mut registry, [("shoulder_lift", 90.0_f32)], AngleUnits::Degrees);
    let after = rig.scene.get_node(rig.gripper).unwrap().transform.world_position();

    assert!(!vec3_approx(before, after));
    // The base is above the touched joint and must not move.
    let base = rig.scene.get_node(rig.base).unwrap().transform.world_position();
    assert!(vec3_approx(base, Vec3::ZERO));
}

#[test]
fn batch_requests_a_render() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let redraw = RedrawRequest::new();
    let mut watcher = redraw.watcher();
    let mut engine = JointTransformEngine::new(redraw);
    engine.set_axis_config(axis_config());

    engine.apply_joint_values(&mut rig.scene, &mut registry, [("elbow_flex", 5.0_f32)], AngleUnits::Degrees);
    assert!(watcher.take());
}

#[test]
fn custom_transform_table_replaces_defaults() {
    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let table = ValueTransformTable::empty().with("shoulder_lift", ValueTransform::Negate);
    let mut engine = JointTransformEngine::new(RedrawRequest::new()).with_transforms(table);
    engine.set_axis_config(axis_config());

    engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_lift", 10.0_f32), ("gripper", 100.0)],
        AngleUnits::Degrees,
    );

    assert!(approx_eq(rotation(&rig, rig.shoulder_lift).x, -(10.0_f32.to_radians())));
    // Without the default table the gripper value is a plain angle.
    assert!(approx_eq(rotation(&rig, rig.gripper).z, 100.0_f32.to_radians()));
}

#[test]
fn axis_config_parses_json() {
    let config = JointAxisConfig::from_json_str(
        r#"{ "joints": { "Shoulder_Pan": "y", "elbow_flex": "X", "bad": "w" } }"#,
    )
    .unwrap();

    assert_eq!(config.len(), 2);
    assert_eq!(config.axis_for("shoulder_pan"), Some(Axis::Y));
    assert_eq!(config.axis_for("ELBOW_FLEX"), Some(Axis::X));
    assert_eq!(config.axis_for("bad"), None);
}

#[test]
fn axis_config_keys_match_suffixed_commands() {
    let config = JointAxisConfig::from_json_str(r#"{ "joints": { "Shoulder_Lift.pos": "x" } }"#).unwrap();
    assert_eq!(config.axis_for("shoulder_lift"), Some(Axis::X));
    assert_eq!(config.axis_for("shoulder_lift.pos"), Some(Axis::X));

    let mut rig = build_rig();
    let mut registry = SceneNodeRegistry::build(&rig.scene);
    let mut engine = JointTransformEngine::new(RedrawRequest::new());
    engine.set_axis_config(config);

    let report = engine.apply_joint_values(
        &mut rig.scene,
        &mut registry,
        [("shoulder_lift.pos", 30.0_f32)],
        AngleUnits::Degrees,
    );
    assert!(report.is_complete());
    assert!(approx_eq(rotation(&rig, rig.shoulder_lift).x, 30.0_f32.to_radians()));
}
