//! Editable 4-corner quad with fixed UV mapping
//!
//! The quad is the projection surface model: four ordered corner points,
//! a triangulated mesh rebuilt whenever a corner moves, and an optional
//! selection overlay (edge segments plus a marker at the active corner).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{LineSet, MeshData};

/// Half-size of the cursor marker cross, in logical units
const MARKER_SIZE: f32 = 0.05;

/// Lift applied to overlay lines so they never z-fight the quad surface
const OVERLAY_LIFT: f32 = 0.01;

/// Corner identifiers in the fixed cyclic editing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners in cyclic order
    pub const ORDER: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Index into the corner array
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    /// Next corner in the cyclic order
    pub fn next(self) -> Corner {
        Self::ORDER[(self.index() + 1) % 4]
    }

    /// Fixed UV coordinate for this corner
    ///
    /// The assignment never changes when corners move; dragging a corner
    /// distorts the mapped image but never remaps texture space.
    pub fn uv(self) -> [f32; 2] {
        match self {
            Corner::TopLeft => [0.0, 1.0],
            Corner::TopRight => [1.0, 1.0],
            Corner::BottomRight => [1.0, 0.0],
            Corner::BottomLeft => [0.0, 0.0],
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
        }
    }
}

/// Selection overlay built from the current corner positions
#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    /// One segment per quad edge, in corner order
    pub edges: LineSet,
    /// Cross marker at the active corner
    pub marker: LineSet,
    /// Position of the active corner the marker sits on
    pub marker_position: Vec2,
}

/// Editable planar quad with derived mesh and overlay
#[derive(Debug, Clone)]
pub struct QuadGeometry {
    corners: [Vec2; 4],
    default_corners: [Vec2; 4],
    cursor: Option<Corner>,
    selected: bool,
    mesh: MeshData,
    overlay: Option<SelectionOverlay>,
}

impl QuadGeometry {
    /// Create a quad from corner positions in (TL, TR, BR, BL) order
    pub fn new(corners: [Vec2; 4]) -> Self {
        let mut quad = Self {
            corners,
            default_corners: corners,
            cursor: None,
            selected: false,
            mesh: MeshData::default(),
            overlay: None,
        };
        quad.rebuild();
        quad
    }

    /// Unit quad centered at the origin (image entity default)
    pub fn unit() -> Self {
        Self::new([
            Vec2::new(-0.5, 0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(-0.5, -0.5),
        ])
    }

    /// Quad spanning the fixed orthographic view (screen quad default)
    pub fn screen() -> Self {
        Self::new([
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, -1.0),
        ])
    }

    /// Current corner position
    pub fn corner(&self, which: Corner) -> Vec2 {
        self.corners[which.index()]
    }

    /// All corner positions in (TL, TR, BR, BL) order
    pub fn corners(&self) -> [Vec2; 4] {
        self.corners
    }

    /// Move a single corner; callers rebuild afterwards
    pub fn set_corner(&mut self, which: Corner, point: Vec2) {
        self.corners[which.index()] = point;
    }

    /// Move the active corner by a delta, returning whether anything moved
    ///
    /// A missing cursor makes this a no-op, not a failure.
    pub fn nudge_cursor(&mut self, delta: Vec2) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let current = self.corner(cursor);
        self.set_corner(cursor, current + delta);
        true
    }

    /// Advance the active corner in the fixed cyclic order
    ///
    /// No-op while nothing is selected.
    pub fn cycle_cursor(&mut self) {
        if let Some(cursor) = self.cursor {
            self.cursor = Some(cursor.next());
        }
    }

    /// The currently active corner, if any
    pub fn cursor(&self) -> Option<Corner> {
        self.cursor
    }

    /// Whether the quad is currently selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Select or deselect the quad
    ///
    /// Selecting initializes the cursor at the top-left corner when none is
    /// active; deselecting drops the cursor and the overlay.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        if selected {
            if self.cursor.is_none() {
                self.cursor = Some(Corner::TopLeft);
            }
        } else {
            self.cursor = None;
        }
        self.rebuild();
    }

    /// Regenerate the triangle mesh and, while selected, the overlay
    ///
    /// UVs are assigned per corner by the fixed mapping and never depend on
    /// corner positions. The overlay is discarded entirely when unselected.
    pub fn rebuild(&mut self) {
        let positions: Vec<[f32; 3]> = self
            .corners
            .iter()
            .map(|c| [c.x, c.y, 0.0])
            .collect();
        let uvs: Vec<[f32; 2]> = Corner::ORDER.iter().map(|c| c.uv()).collect();

        self.mesh = MeshData {
            positions,
            uvs,
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
        };

        self.overlay = if self.selected {
            Some(self.build_overlay())
        } else {
            None
        };
    }

    fn build_overlay(&self) -> SelectionOverlay {
        let mut edges = LineSet::default();
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            edges.push_segment([a.x, a.y, OVERLAY_LIFT], [b.x, b.y, OVERLAY_LIFT]);
        }

        let marker_position = self
            .cursor
            .map(|c| self.corner(c))
            .unwrap_or(self.corners[0]);

        let mut marker = LineSet::default();
        marker.push_segment(
            [marker_position.x - MARKER_SIZE, marker_position.y, OVERLAY_LIFT],
            [marker_position.x + MARKER_SIZE, marker_position.y, OVERLAY_LIFT],
        );
        marker.push_segment(
            [marker_position.x, marker_position.y - MARKER_SIZE, OVERLAY_LIFT],
            [marker_position.x, marker_position.y + MARKER_SIZE, OVERLAY_LIFT],
        );

        SelectionOverlay {
            edges,
            marker,
            marker_position,
        }
    }

    /// Derived triangle mesh
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Selection overlay, present only while selected
    pub fn overlay(&self) -> Option<&SelectionOverlay> {
        self.overlay.as_ref()
    }

    /// Reset corners to their construction-time positions
    pub fn reset(&mut self) {
        self.corners = self.default_corners;
        self.rebuild();
    }

    /// Check that the corners form a simple (non-self-intersecting) polygon
    pub fn is_simple(&self) -> bool {
        // Only non-adjacent edge pairs can cross: (TL-TR, BR-BL) and (TR-BR, BL-TL)
        let c = &self.corners;
        !segments_intersect(c[0], c[1], c[2], c[3]) && !segments_intersect(c[1], c[2], c[3], c[0])
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::unit()
    }
}

/// Proper intersection test for two segments (shared endpoints don't count)
fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let orient = |p: Vec2, q: Vec2, r: Vec2| (q - p).perp_dot(r - p);
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    (d1 * d2) < 0.0 && (d3 * d4) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order_returns_after_four() {
        let mut quad = QuadGeometry::screen();
        quad.set_selected(true);
        let start = quad.cursor();
        for _ in 0..4 {
            quad.cycle_cursor();
        }
        assert_eq!(quad.cursor(), start);
    }

    #[test]
    fn test_cycle_without_selection_is_noop() {
        let mut quad = QuadGeometry::screen();
        quad.cycle_cursor();
        assert_eq!(quad.cursor(), None);
    }

    #[test]
    fn test_nudge_moves_corner_exactly() {
        let mut quad = QuadGeometry::screen();
        quad.set_selected(true);
        let before = quad.corner(Corner::TopLeft);
        let delta = Vec2::new(0.01, -0.02);
        assert!(quad.nudge_cursor(delta));
        quad.rebuild();
        assert_eq!(quad.corner(Corner::TopLeft), before + delta);
    }

    #[test]
    fn test_uvs_fixed_under_corner_motion() {
        let mut quad = QuadGeometry::screen();
        quad.set_corner(Corner::BottomRight, Vec2::new(3.0, -2.5));
        quad.rebuild();
        for corner in Corner::ORDER {
            assert_eq!(quad.mesh().uvs[corner.index()], corner.uv());
        }
    }

    #[test]
    fn test_overlay_tracks_selection() {
        let mut quad = QuadGeometry::screen();
        assert!(quad.overlay().is_none());

        quad.set_selected(true);
        assert!(quad.overlay().is_some());
        assert_eq!(quad.overlay().unwrap().edges.segment_count(), 4);

        // Edits while selected must not leak an overlay past deselection
        quad.nudge_cursor(Vec2::new(0.1, 0.1));
        quad.rebuild();
        quad.set_selected(false);
        assert!(quad.overlay().is_none());
        assert_eq!(quad.cursor(), None);
    }

    #[test]
    fn test_marker_follows_cursor() {
        let mut quad = QuadGeometry::screen();
        quad.set_selected(true);
        quad.cycle_cursor();
        quad.rebuild();
        let overlay = quad.overlay().unwrap();
        assert_eq!(overlay.marker_position, quad.corner(Corner::TopRight));
    }

    #[test]
    fn test_reset_restores_corners() {
        let mut quad = QuadGeometry::unit();
        quad.set_corner(Corner::TopLeft, Vec2::new(9.0, 9.0));
        quad.rebuild();
        quad.reset();
        assert_eq!(quad.corner(Corner::TopLeft), Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn test_default_quads_are_simple() {
        assert!(QuadGeometry::unit().is_simple());
        assert!(QuadGeometry::screen().is_simple());
    }

    #[test]
    fn test_crossed_quad_is_not_simple() {
        let mut quad = QuadGeometry::screen();
        // Swap top-left past top-right to force a bowtie
        quad.set_corner(Corner::TopLeft, Vec2::new(2.0, 1.0));
        quad.set_corner(Corner::TopRight, Vec2::new(-2.0, 1.0));
        quad.rebuild();
        assert!(!quad.is_simple());
    }
}
