//! Transform System
//!
//! Propagates local transforms down the node hierarchy into world matrices.
//! Kept separate from [`Scene`](crate::scene::Scene) so it only borrows the
//! node storage, which lets callers update a subtree while holding other
//! parts of the viewer state.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every tree under `roots`.
///
/// Uses an explicit stack instead of recursion so deep rigs cannot overflow.
/// A node's world matrix is rebuilt only when its local matrix or any
/// ancestor changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    propagate(nodes, &mut stack);
}

/// Updates the world matrices of `root_handle` and all its descendants.
///
/// The subtree is always treated as changed, so this is the call to make
/// right after a direct TRS write that must be visible immediately.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let Some(node) = nodes.get(root_handle) else {
        return;
    };

    let parent_world = node
        .parent
        .and_then(|parent| nodes.get(parent))
        .map_or(Affine3A::IDENTITY, |parent| parent.transform.world_matrix);

    let mut stack = vec![(root_handle, parent_world, true)];
    propagate(nodes, &mut stack);
}

fn propagate(nodes: &mut SlotMap<NodeHandle, Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn two_level() -> (SlotMap<NodeHandle, Node>, NodeHandle, NodeHandle) {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes[parent_handle].children.push(child_handle);
        (nodes, parent_handle, child_handle)
    }

    #[test]
    fn hierarchy_update_composes_parent() {
        let (mut nodes, parent, child) = two_level();
        update_hierarchy_iterative(&mut nodes, &[parent]);

        let child_world_pos = nodes[child].transform.world_position();
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn subtree_update_sees_direct_rotation_write() {
        let (mut nodes, parent, child) = two_level();
        update_hierarchy_iterative(&mut nodes, &[parent]);

        nodes[parent].transform.rotation.z = std::f32::consts::FRAC_PI_2;
        update_subtree(&mut nodes, parent);

        // (0, 1, 0) rotated a quarter turn about Z lands on (-1, 0, 0), then offset by parent.
        let child_world_pos = nodes[child].transform.world_position();
        assert!((child_world_pos.x - 0.0).abs() < 1e-5);
        assert!((child_world_pos.y - 0.0).abs() < 1e-5);
    }
}
