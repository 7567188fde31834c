//! Entities wrapping quads in the two scenes
//!
//! An entity ties a name and role to the scene nodes carrying its quad
//! geometry. The screen quad is the single compositing surface; image
//! entities are user-added textured quads in the content scene.

use crate::geometry::QuadGeometry;
use crate::loader::TextureId;

use super::node::NodeId;

/// Identifier for an entity in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Entity roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// The single, non-deletable compositing surface in the output scene
    ScreenQuad,
    /// A user-added textured quad in the content scene
    Image,
}

/// A named node wrapping a quad
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    /// Root node owning the entity's subtree
    pub root: NodeId,
    /// Child node carrying the quad mesh
    pub mesh_node: NodeId,
    /// Child node carrying the selection overlay lines, if currently built
    pub overlay_node: Option<NodeId>,
    pub quad: QuadGeometry,
    pub texture: Option<TextureId>,
}

impl Entity {
    /// Whether this is the protected screen quad
    pub fn is_screen_quad(&self) -> bool {
        self.kind == EntityKind::ScreenQuad
    }
}
