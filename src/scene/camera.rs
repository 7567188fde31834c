//! Cameras for the content and output scenes
//!
//! The content scene uses a perspective camera (a live navigable one and a
//! frozen compositing snapshot); the output scene uses an orthographic
//! camera at fixed logical units.

use glam::{Mat4, Vec2, Vec3};

/// Matrix snapshot handed to the renderer for a single pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
}

impl CameraView {
    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Perspective camera for the content scene
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width/height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> CameraView {
        CameraView {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            eye: self.position,
        }
    }

    /// Update aspect ratio on resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-space ray through a normalized device coordinate
    ///
    /// NDC is x,y in [-1, 1] with +y up. Returns (origin, direction).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inverse = (self.projection_matrix() * self.view_matrix()).inverse();
        // wgpu clip space has depth in [0, 1]
        let near_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let direction = (far_point - near_point).normalize();
        (near_point, direction)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Orthographic camera for the output scene
///
/// The projection stays at fixed logical units; the compositing surface is
/// always rendered 1:1 into the viewport regardless of resize.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Half-extent of the view along X, in logical units
    pub half_width: f32,
    /// Half-extent of the view along Y, in logical units
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            half_width: 1.0,
            half_height: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            self.near,
            self.far,
        )
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> CameraView {
        CameraView {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            eye: self.position,
        }
    }
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            ..PerspectiveCamera::new()
        };
        let (origin, direction) = camera.ray_from_ndc(Vec2::ZERO);
        assert!(direction.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1.0e-5));
        assert!(origin.x.abs() < 1.0e-5 && origin.y.abs() < 1.0e-5);
    }

    #[test]
    fn test_offcenter_ray_diverges() {
        let camera = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            ..PerspectiveCamera::new()
        };
        let (_, right) = camera.ray_from_ndc(Vec2::new(1.0, 0.0));
        let (_, left) = camera.ray_from_ndc(Vec2::new(-1.0, 0.0));
        assert!(right.x > 0.0);
        assert!(left.x < 0.0);
    }

    #[test]
    fn test_ortho_view_edge_maps_to_clip_edge() {
        let camera = OrthographicCamera::new();
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let corner = view_proj.project_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1.0e-5);
        assert!((corner.y - 1.0).abs() < 1.0e-5);
        assert!(corner.z > 0.0 && corner.z < 1.0);
    }
}
