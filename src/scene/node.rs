//! Scene nodes, transforms, and flat node storage
//!
//! A scene is a flat arena of parented nodes. Nodes optionally carry a
//! triangle mesh, overlay lines, and a texture reference.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::geometry::{LineSet, MeshData};
use crate::loader::TextureId;

/// Identifier for a node within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Local transform decomposed into translation, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Local transform matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Where a node's sampled texture comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSource {
    /// The off-screen compositing buffer
    Buffer,
    /// A texture decoded by the image loader
    Loaded(TextureId),
}

/// A node in the scene arena
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub mesh: Option<MeshData>,
    pub lines: Option<LineSet>,
    pub texture: Option<TextureSource>,
    /// Flat color, multiplied with the sampled texture
    pub color: [f32; 4],
    /// Whether the node's geometry receives scene lighting
    pub lit: bool,
    /// Whether picking rays may hit this node's mesh
    pub pickable: bool,
}

/// Light descriptions consumed by the renderer
#[derive(Debug, Clone, Copy)]
pub enum Light {
    Directional {
        direction: Vec3,
        color: [f32; 3],
        intensity: f32,
    },
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
}

/// Flat node storage for one scene
pub struct Scene {
    pub name: String,
    pub lights: Vec<Light>,
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lights: Vec::new(),
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new empty node, optionally under a parent
    pub fn add_node(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let node = Node {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            transform: Transform::IDENTITY,
            mesh: None,
            lines: None,
            texture: None,
            color: [1.0, 1.0, 1.0, 1.0],
            lit: true,
            pickable: false,
        };
        self.nodes.insert(id, node);

        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Remove a node and all of its descendants
    ///
    /// Unknown ids are ignored. Returns the ids that were removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        // Detach from parent or root list first
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|c| *c != id);
            }
        } else {
            self.roots.retain(|r| *r != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                removed.push(current);
            }
        }
        removed
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over all nodes in the scene
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Root node ids
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the scene
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// World transform of a node, walking parent chains
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Walk from a node up through its ancestors, including the node itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            current: Some(id),
        }
    }

    /// Whether `descendant` is inside the subtree rooted at `root`
    pub fn is_descendant_of(&self, descendant: NodeId, root: NodeId) -> bool {
        self.ancestors(descendant).any(|n| n == root)
    }
}

/// Iterator over a node's ancestor chain
pub struct Ancestors<'a> {
    scene: &'a Scene,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.scene.node(id).and_then(|n| n.parent);
        Some(id)
    }
}
