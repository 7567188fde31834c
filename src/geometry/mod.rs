//! Geometry module for quad meshes and overlay primitives
//!
//! Provides the editable screen quad, triangle mesh data, and line sets
//! used for selection overlays.

mod quad;

pub use quad::{Corner, QuadGeometry, SelectionOverlay};

/// CPU-side triangle mesh data consumed by the renderer
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions in local space
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Normal vectors
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Create a unit quad centered at the origin, facing +Z
    ///
    /// This is the canonical default geometry for a newly added image entity.
    pub fn unit_quad() -> Self {
        Self {
            positions: vec![
                [-0.5, 0.5, 0.0],  // top-left
                [0.5, 0.5, 0.0],   // top-right
                [0.5, -0.5, 0.0],  // bottom-right
                [-0.5, -0.5, 0.0], // bottom-left
            ],
            uvs: vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }
}

/// Line segment soup for overlay rendering
///
/// Points are consumed in consecutive pairs, one segment per pair.
#[derive(Debug, Clone, Default)]
pub struct LineSet {
    pub points: Vec<[f32; 3]>,
}

impl LineSet {
    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    /// Append a single segment
    pub fn push_segment(&mut self, a: [f32; 3], b: [f32; 3]) {
        self.points.push(a);
        self.points.push(b);
    }
}
