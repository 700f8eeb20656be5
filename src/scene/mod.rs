//! Scene graph
//!
//! - [`Node`]: named node with a kind tag, hierarchy links and a transform
//! - [`Transform`]: position, Euler rotation, scale and cached matrices
//! - [`Scene`]: node arena and root list
//! - [`Camera`]: perspective camera driven by the pose controller
//! - [`transform_system`]: world-matrix propagation

pub mod camera;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::{Node, NodeKind};
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
