//! Scene graph owning the two scenes and the compositing buffer
//!
//! The content scene is the navigable 3-D scene rendered into the
//! off-screen buffer; the output scene holds the screen quad that samples
//! that buffer. Both are constructed once and live for the program's
//! lifetime; only image entities come and go.

mod camera;
mod entity;
mod node;

pub use camera::{CameraView, OrthographicCamera, PerspectiveCamera};
pub use entity::{Entity, EntityId, EntityKind};
pub use node::{Ancestors, Light, Node, NodeId, Scene, TextureSource, Transform};

use std::collections::HashMap;

use glam::Vec3;

use crate::geometry::{LineSet, QuadGeometry};
use crate::loader::{TextureData, TextureId};

/// Overlay line color for selected quads
const OVERLAY_COLOR: [f32; 4] = [1.0, 0.8, 0.1, 1.0];

/// Off-screen color target bridging the content scene to the screen quad
///
/// Always equal in resolution to the visible viewport; the render backend
/// recreates the GPU texture whenever these dimensions change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffscreenBuffer {
    pub width: u32,
    pub height: u32,
}

/// Owner of the two scenes, their cameras, entities, and the buffer
pub struct SceneGraph {
    /// Navigable 3-D scene holding image entities and lights
    pub content: Scene,
    /// Fixed scene holding the screen quad
    pub output: Scene,
    /// Live camera, moved by the navigation helper in scene mode
    pub content_camera: PerspectiveCamera,
    /// Frozen snapshot camera the compositor reads; independent of the live
    /// camera unless explicitly baked
    pub composite_camera: PerspectiveCamera,
    /// Orthographic camera for the output scene, fixed logical units
    pub output_camera: OrthographicCamera,
    buffer: OffscreenBuffer,
    entities: HashMap<EntityId, Entity>,
    /// Side table resolving content-scene geometry nodes to owning entities
    node_to_entity: HashMap<NodeId, EntityId>,
    pickable_root: NodeId,
    screen_quad: EntityId,
    textures: HashMap<TextureId, TextureData>,
    next_entity: u32,
    next_texture: u64,
    image_count: u32,
}

impl SceneGraph {
    /// Build both scenes, the screen quad, and the buffer descriptor
    pub fn new(width: u32, height: u32) -> Self {
        let mut content = Scene::new("content");
        content.lights.push(Light::Directional {
            direction: Vec3::new(-0.4, -1.0, -0.6).normalize(),
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
        });
        content.lights.push(Light::Ambient {
            color: [1.0, 1.0, 1.0],
            intensity: 0.35,
        });
        let pickable_root = content.add_node("content-root", None);

        let mut output = Scene::new("output");
        let quad = QuadGeometry::screen();
        let quad_root = output.add_node("screen-quad", None);
        let mesh_node = output.add_node("screen-quad-mesh", Some(quad_root));
        {
            let node = output.node_mut(mesh_node).expect("node just added");
            node.mesh = Some(quad.mesh().clone());
            node.texture = Some(TextureSource::Buffer);
            node.lit = false;
        }

        let screen_quad = EntityId(1);
        let mut entities = HashMap::new();
        entities.insert(
            screen_quad,
            Entity {
                id: screen_quad,
                name: "Screen Quad".to_string(),
                kind: EntityKind::ScreenQuad,
                root: quad_root,
                mesh_node,
                overlay_node: None,
                quad,
                texture: None,
            },
        );

        let mut content_camera = PerspectiveCamera::new();
        content_camera.set_aspect(width as f32 / height.max(1) as f32);
        let composite_camera = content_camera.clone();

        Self {
            content,
            output,
            content_camera,
            composite_camera,
            output_camera: OrthographicCamera::new(),
            buffer: OffscreenBuffer { width, height },
            entities,
            node_to_entity: HashMap::new(),
            pickable_root,
            screen_quad,
            textures: HashMap::new(),
            next_entity: 2,
            next_texture: 1,
            image_count: 0,
        }
    }

    /// Current buffer resolution
    pub fn buffer(&self) -> OffscreenBuffer {
        self.buffer
    }

    /// Root node image entities are inserted under
    pub fn pickable_root(&self) -> NodeId {
        self.pickable_root
    }

    /// Id of the protected screen quad entity
    pub fn screen_quad_id(&self) -> EntityId {
        self.screen_quad
    }

    /// Store decoded texture data and return its id
    pub fn add_texture(&mut self, data: TextureData) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, data);
        id
    }

    /// Look up stored texture data
    pub fn texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(&id)
    }

    /// Create an image entity on a default unit quad under the pickable root
    pub fn add_image_entity(&mut self, texture: TextureId) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.image_count += 1;
        let name = format!("Image {}", self.image_count);

        let root = self.content.add_node(name.clone(), Some(self.pickable_root));
        let mesh_node = self.content.add_node(format!("{name}-mesh"), Some(root));
        let quad = QuadGeometry::unit();
        {
            let node = self.content.node_mut(mesh_node).expect("node just added");
            node.mesh = Some(quad.mesh().clone());
            node.texture = Some(TextureSource::Loaded(texture));
            node.pickable = true;
        }

        self.node_to_entity.insert(root, id);
        self.node_to_entity.insert(mesh_node, id);

        self.entities.insert(
            id,
            Entity {
                id,
                name: name.clone(),
                kind: EntityKind::Image,
                root,
                mesh_node,
                overlay_node: None,
                quad,
                texture: Some(texture),
            },
        );

        log::info!("Added image entity '{}' ({:?})", name, id);
        id
    }

    /// Detach an entity and its geometry from the content scene
    ///
    /// The screen quad is never removable through this interface; unknown
    /// ids fail silently.
    pub fn remove_entity(&mut self, id: EntityId) {
        if id == self.screen_quad {
            log::warn!("Ignoring attempt to remove the screen quad");
            return;
        }
        let Some(entity) = self.entities.remove(&id) else {
            return;
        };

        let removed = self.content.remove_subtree(entity.root);
        for node in &removed {
            self.node_to_entity.remove(node);
        }
        log::info!("Removed entity '{}' ({:?})", entity.name, id);
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Ids of all image entities
    pub fn image_entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.kind == EntityKind::Image)
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    /// Resolve a content-scene node to its owning entity
    ///
    /// Walks the node's ancestor chain until one carries a side-table entry.
    pub fn entity_for_node(&self, node: NodeId) -> Option<EntityId> {
        self.content
            .ancestors(node)
            .find_map(|n| self.node_to_entity.get(&n).copied())
    }

    /// Select or deselect an entity's quad, rebuilding its overlay nodes
    pub fn set_entity_selected(&mut self, id: EntityId, selected: bool) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.quad.set_selected(selected);
        self.refresh_entity(id);
    }

    /// Synchronize an entity's scene nodes with its quad geometry
    ///
    /// Called after any corner edit or selection change so the mesh node and
    /// overlay node reflect the quad's current state.
    pub fn refresh_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let scene = match entity.kind {
            EntityKind::ScreenQuad => &mut self.output,
            EntityKind::Image => &mut self.content,
        };

        if let Some(node) = scene.node_mut(entity.mesh_node) {
            node.mesh = Some(entity.quad.mesh().clone());
        }

        match entity.quad.overlay() {
            Some(overlay) => {
                let mut lines = LineSet::default();
                lines.points.extend_from_slice(&overlay.edges.points);
                lines.points.extend_from_slice(&overlay.marker.points);

                let overlay_node = match entity.overlay_node {
                    Some(node) => node,
                    None => {
                        let node =
                            scene.add_node(format!("{}-overlay", entity.name), Some(entity.root));
                        entity.overlay_node = Some(node);
                        node
                    }
                };
                if let Some(node) = scene.node_mut(overlay_node) {
                    node.lines = Some(lines);
                    node.color = OVERLAY_COLOR;
                    node.lit = false;
                }
            }
            None => {
                if let Some(node) = entity.overlay_node.take() {
                    scene.remove_subtree(node);
                }
            }
        }
    }

    /// Resize the buffer and update the perspective projections
    ///
    /// The orthographic output camera keeps its fixed logical units; the
    /// compositing surface always renders 1:1 into the viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.buffer.width == width && self.buffer.height == height {
            return;
        }
        self.buffer = OffscreenBuffer { width, height };
        let aspect = width as f32 / height as f32;
        self.content_camera.set_aspect(aspect);
        self.composite_camera.set_aspect(aspect);
        log::info!("Resized buffer to {}x{}", width, height);
    }

    /// Copy the live navigation camera into the frozen composite camera
    pub fn bake_composite_camera(&mut self) {
        self.composite_camera = self.content_camera.clone();
        log::info!("Baked live camera into composite camera");
    }
}
