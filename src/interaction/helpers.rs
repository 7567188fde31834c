//! Navigation and gizmo helpers for scene mode
//!
//! Both helpers exist only while the editor is in scene mode; the
//! controller constructs them on entry and drops them on exit, so their
//! resource lifecycle is tied 1:1 to the mode.

use glam::{Quat, Vec3};

use crate::scene::{NodeId, PerspectiveCamera, Scene};

/// Gizmo operating kinds in their fixed cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformKind {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformKind {
    /// All kinds in cycling order
    pub fn all() -> &'static [TransformKind] {
        &[
            TransformKind::Translate,
            TransformKind::Rotate,
            TransformKind::Scale,
        ]
    }

    /// Next kind in the translate → rotate → scale cycle
    pub fn next(self) -> TransformKind {
        match self {
            TransformKind::Translate => TransformKind::Rotate,
            TransformKind::Rotate => TransformKind::Scale,
            TransformKind::Scale => TransformKind::Translate,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::Rotate => "rotate",
            TransformKind::Scale => "scale",
        }
    }
}

/// Orbit navigation helper for the live content camera
///
/// Spherical coordinates around a target point, pitch clamped to avoid
/// gimbal lock.
pub struct OrbitNavigator {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
}

impl OrbitNavigator {
    /// Derive orbit state from an existing camera so attaching never jumps
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length().max(0.01);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            yaw,
            pitch,
            distance,
            target: camera.target,
        }
    }

    /// Handle mouse drag for orbit
    pub fn on_mouse_drag(&mut self, delta: (f32, f32), sensitivity: f32) {
        self.yaw += delta.0 * sensitivity;
        // Clamp pitch to avoid gimbal lock (~80 degrees)
        self.pitch = (self.pitch - delta.1 * sensitivity).clamp(-1.4, 1.4);
    }

    /// Handle scroll for zoom
    pub fn on_scroll(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.5, 50.0);
    }

    /// Camera position from spherical coordinates
    pub fn eye_position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Write the orbit state back into the live camera
    pub fn apply_to(&self, camera: &mut PerspectiveCamera) {
        camera.position = self.eye_position();
        camera.target = self.target;
    }

    /// Current orbit distance
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Transform gizmo helper tracking an attachment target and operating kind
///
/// The gizmo is attached to an entity's root node by pointer picking;
/// manipulation maps drag amounts onto the node transform according to the
/// current kind.
pub struct TransformGizmo {
    target: Option<NodeId>,
    kind: TransformKind,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self {
            target: None,
            kind: TransformKind::default(),
        }
    }

    /// Attach to a node
    pub fn attach(&mut self, node: NodeId) {
        self.target = Some(node);
    }

    /// Detach from the current node; a no-op when nothing is attached
    pub fn detach(&mut self) {
        self.target = None;
    }

    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: TransformKind) {
        self.kind = kind;
    }

    /// Advance the operating kind in the fixed cycle
    pub fn cycle_kind(&mut self) -> TransformKind {
        self.kind = self.kind.next();
        self.kind
    }

    /// Apply a manipulation along a world axis to the attached node
    ///
    /// Translate moves along the axis, rotate spins around it, scale grows
    /// along it. Without an attached (and still existing) node this does
    /// nothing.
    pub fn manipulate(&self, scene: &mut Scene, axis: Vec3, amount: f32) {
        let Some(target) = self.target else {
            return;
        };
        let Some(node) = scene.node_mut(target) else {
            return;
        };
        match self.kind {
            TransformKind::Translate => {
                node.transform.translation += axis * amount;
            }
            TransformKind::Rotate => {
                node.transform.rotation =
                    Quat::from_axis_angle(axis.normalize_or_zero(), amount) * node.transform.rotation;
            }
            TransformKind::Scale => {
                node.transform.scale += axis * amount;
            }
        }
    }
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_cycle_order() {
        let mut gizmo = TransformGizmo::new();
        assert_eq!(gizmo.kind(), TransformKind::Translate);
        assert_eq!(gizmo.cycle_kind(), TransformKind::Rotate);
        assert_eq!(gizmo.cycle_kind(), TransformKind::Scale);
        assert_eq!(gizmo.cycle_kind(), TransformKind::Translate);
    }

    #[test]
    fn test_detach_without_attach_is_noop() {
        let mut gizmo = TransformGizmo::new();
        gizmo.detach();
        assert!(!gizmo.is_attached());
    }

    #[test]
    fn test_manipulate_translates_target() {
        let mut scene = Scene::new("test");
        let node = scene.add_node("object", None);
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(node);

        gizmo.manipulate(&mut scene, Vec3::X, 2.0);
        assert_eq!(
            scene.node(node).unwrap().transform.translation,
            Vec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_manipulate_without_target_is_noop() {
        let mut scene = Scene::new("test");
        let node = scene.add_node("object", None);
        let gizmo = TransformGizmo::new();
        gizmo.manipulate(&mut scene, Vec3::X, 2.0);
        assert_eq!(scene.node(node).unwrap().transform.translation, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_round_trip_preserves_position() {
        let camera = PerspectiveCamera {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            ..PerspectiveCamera::new()
        };
        let navigator = OrbitNavigator::from_camera(&camera);
        let mut restored = camera.clone();
        restored.position = Vec3::ZERO;
        navigator.apply_to(&mut restored);
        assert!(restored.position.abs_diff_eq(camera.position, 1.0e-4));
    }

    #[test]
    fn test_orbit_pitch_clamped() {
        let mut navigator = OrbitNavigator::from_camera(&PerspectiveCamera::new());
        navigator.on_mouse_drag((0.0, -1000.0), 0.01);
        assert!(navigator.eye_position().is_finite());
    }
}
