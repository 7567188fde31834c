//! Ray-based picking against the content scene
//!
//! Casts a ray from the camera through a normalized device coordinate and
//! returns the nearest intersected owning entity. Purely a query; callers
//! decide what to do with the hit.

use glam::{Vec2, Vec3};

use crate::scene::{EntityId, NodeId, PerspectiveCamera, SceneGraph};

const EPSILON: f32 = 1.0e-7;

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Entity owning the intersected geometry
    pub entity: EntityId,
    /// The geometry node that was actually hit
    pub node: NodeId,
    /// Ray distance to the intersection
    pub distance: f32,
    /// Intersection point in world space
    pub point: Vec3,
}

/// Pick the nearest entity under a normalized device coordinate
///
/// Intersects the ray against every pickable mesh below the content scene's
/// pickable root, breaking ties by strict nearest distance. Nodes that do
/// not resolve to an entity through the side table are skipped. Returns
/// `None` when nothing is hit; callers treat that as "no state change".
pub fn pick(ndc: Vec2, camera: &PerspectiveCamera, graph: &SceneGraph) -> Option<Hit> {
    let (origin, direction) = camera.ray_from_ndc(ndc);
    let root = graph.pickable_root();

    let mut nearest: Option<Hit> = None;
    for node in graph.content.iter() {
        if !node.pickable {
            continue;
        }
        let Some(mesh) = &node.mesh else {
            continue;
        };
        if !graph.content.is_descendant_of(node.id, root) {
            continue;
        }
        let Some(entity) = graph.entity_for_node(node.id) else {
            continue;
        };

        let world = graph.content.world_transform(node.id);
        for triangle in mesh.indices.chunks_exact(3) {
            let v0 = world.transform_point3(Vec3::from(mesh.positions[triangle[0] as usize]));
            let v1 = world.transform_point3(Vec3::from(mesh.positions[triangle[1] as usize]));
            let v2 = world.transform_point3(Vec3::from(mesh.positions[triangle[2] as usize]));

            if let Some(distance) = ray_triangle(origin, direction, v0, v1, v2) {
                let closer = nearest.map(|h| distance < h.distance).unwrap_or(true);
                if closer {
                    nearest = Some(Hit {
                        entity,
                        node: node.id,
                        distance,
                        point: origin + direction * distance,
                    });
                }
            }
        }
    }
    nearest
}

/// Möller-Trumbore ray/triangle intersection
///
/// Returns the ray distance, or `None` when the ray misses or the triangle
/// is behind the origin. Both triangle windings are accepted.
fn ray_triangle(origin: Vec3, direction: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}
