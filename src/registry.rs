//! Scene node registry
//!
//! Indexes the nodes of a loaded model by lower-cased name so joints can be
//! addressed semantically (`"shoulder_pan"`, `"gripper"`) and keeps the rest
//! rotation of every joint that has been resolved.
//!
//! Skeleton bones and plain named nodes live in separate maps. Resolution
//! prefers a bone and falls back to a plain node, so skinned and rigid
//! assets are driven through the same code path. The kind of each match is
//! decided once, when the registry is built.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, NodeKind, Scene};

/// A named node the registry can drive, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTarget {
    pub handle: NodeHandle,
    pub kind: NodeKind,
}

/// A resolved joint: the node to write and the rotation it had at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedJoint {
    pub target: JointTarget,
    pub rest_rotation: Vec3,
}

/// Names currently known to the registry, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownNames {
    pub bones: Vec<String>,
    pub objects: Vec<String>,
}

impl std::fmt::Display for KnownNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bones: [{}], objects: [{}]",
            self.bones.join(", "),
            self.objects.join(", ")
        )
    }
}

#[derive(Debug, Default)]
pub struct SceneNodeRegistry {
    bones: FxHashMap<String, NodeHandle>,
    objects: FxHashMap<String, NodeHandle>,
    rest_rotations: FxHashMap<String, Vec3>,
}

/// Lower-cases a joint name. All registry keys go through this.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl SceneNodeRegistry {
    /// Builds the registry with a single depth-first walk of `scene`.
    ///
    /// When two nodes of the same kind share a name, the first one in
    /// traversal order wins. Anonymous nodes are not indexed.
    #[must_use]
    pub fn build(scene: &Scene) -> Self {
        let mut registry = Self::default();

        let mut stack: Vec<NodeHandle> = scene.root_nodes.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };

            if !node.name.is_empty() {
                let key = normalize_name(&node.name);
                let map = match node.kind {
                    NodeKind::Bone => &mut registry.bones,
                    NodeKind::Object => &mut registry.objects,
                };
                map.entry(key).or_insert(handle);
            }

            stack.extend(node.children().iter().rev().copied());
        }

        log::debug!(
            "Scene node registry built: {} bones, {} objects",
            registry.bones.len(),
            registry.objects.len()
        );
        registry
    }

    /// Captures the rest rotation of every indexed name that has none yet.
    ///
    /// Call right after load, before the first joint command. Entries that
    /// are already captured are left alone.
    pub fn capture_rest_pose(&mut self, scene: &Scene) {
        let names: Vec<String> = self.bones.keys().chain(self.objects.keys()).cloned().collect();
        for name in names {
            if let Some(target) = self.lookup(&name)
                && let Some(node) = scene.get_node(target.handle)
            {
                self.rest_rotations
                    .entry(name)
                    .or_insert(node.transform.rotation);
            }
        }
    }

    /// Finds the node for `joint_name` without touching the rest table.
    #[must_use]
    pub fn lookup(&self, joint_name: &str) -> Option<JointTarget> {
        let key = normalize_name(joint_name);
        if let Some(&handle) = self.bones.get(&key) {
            return Some(JointTarget {
                handle,
                kind: NodeKind::Bone,
            });
        }
        self.objects.get(&key).map(|&handle| JointTarget {
            handle,
            kind: NodeKind::Object,
        })
    }

    /// Resolves `joint_name` to a node and its rest rotation.
    ///
    /// The first successful resolution of a name records the node's current
    /// rotation as its rest rotation; later calls return the recorded value
    /// unchanged. Returns `None` when the name is unknown or the node is gone.
    pub fn resolve(&mut self, scene: &Scene, joint_name: &str) -> Option<ResolvedJoint> {
        let target = self.lookup(joint_name)?;
        let node = scene.get_node(target.handle)?;

        let rest_rotation = *self
            .rest_rotations
            .entry(normalize_name(joint_name))
            .or_insert(node.transform.rotation);

        Some(ResolvedJoint {
            target,
            rest_rotation,
        })
    }

    #[must_use]
    pub fn rest_rotation(&self, joint_name: &str) -> Option<Vec3> {
        self.rest_rotations.get(&normalize_name(joint_name)).copied()
    }

    /// Sorted bone and object names.
    #[must_use]
    pub fn known_names(&self) -> KnownNames {
        let mut bones: Vec<String> = self.bones.keys().cloned().collect();
        let mut objects: Vec<String> = self.objects.keys().cloned().collect();
        bones.sort_unstable();
        objects.sort_unstable();
        KnownNames { bones, objects }
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty() && self.objects.is_empty()
    }
}
