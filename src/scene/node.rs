use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// What a node represents in the loaded asset.
///
/// Set once when the asset is turned into a [`Scene`](crate::scene::Scene);
/// the registry indexes bones and plain objects separately from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// A joint of a skinned skeleton.
    Bone,
    /// Any other node (mesh, group, empty).
    #[default]
    Object,
}

/// A scene node: name, kind, hierarchy links and transform.
///
/// Links are only changed through [`Scene`](crate::scene::Scene) so parent
/// and child lists stay consistent. Root nodes have no parent.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name as authored in the asset. Empty for anonymous nodes.
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            kind: NodeKind::Object,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bone(&self) -> bool {
        self.kind == NodeKind::Bone
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last propagation. Joint writes refresh it
    /// for the touched subtree right away.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
