//! Interaction controller and input event state machine
//!
//! Maps abstract input events onto scene graph and scheduler mutations:
//! render mode switching, selection, gizmo attachment, corner editing, and
//! asynchronous image adds. Events that are meaningless in the current
//! state are silently ignored, never raised as failures.

mod helpers;

pub use helpers::{OrbitNavigator, TransformGizmo, TransformKind};

use std::collections::HashSet;

use glam::{Vec2, Vec3};

use crate::loader::{ImageLoader, LoadResult, TextureId};
use crate::picking;
use crate::render::{RenderMode, RenderScheduler};
use crate::scene::{EntityId, SceneGraph};

/// Corner nudge axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Abstract input events, mapped from raw key/mouse input by the app shell
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ToggleFreeze,
    ToggleMode,
    Cancel,
    SelectScreenQuad,
    CycleTransformKind,
    AddImage { source: String },
    CycleCorner,
    NudgeCorner { axis: Axis, sign: f32 },
    DeleteSelected,
    PointerDown { ndc: Vec2 },
    ResetQuad,
    BakeCamera,
}

/// Exclusive selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    ScreenQuad,
    Image(EntityId),
}

impl Selection {
    pub fn is_none(self) -> bool {
        self == Selection::None
    }

    /// Entity id behind the selection, if any
    pub fn entity_id(self, graph: &SceneGraph) -> Option<EntityId> {
        match self {
            Selection::None => None,
            Selection::ScreenQuad => Some(graph.screen_quad_id()),
            Selection::Image(id) => Some(id),
        }
    }
}

/// The explicit mode/selection state every transition reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub mode: RenderMode,
    pub selection: Selection,
}

/// State machine coordinating selection, helpers, and corner editing
///
/// Runs for the application's lifetime; there is no terminal state. All
/// mutation happens synchronously between frames.
pub struct InteractionController {
    state: InteractionState,
    navigator: Option<OrbitNavigator>,
    gizmo: Option<TransformGizmo>,
    loader: ImageLoader,
    pending_loads: HashSet<u64>,
    nudge_step: f32,
}

impl InteractionController {
    pub fn new(nudge_step: f32) -> Self {
        Self {
            state: InteractionState::default(),
            navigator: None,
            gizmo: None,
            loader: ImageLoader::new(),
            pending_loads: HashSet::new(),
            nudge_step,
        }
    }

    /// Current mode/selection state
    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn mode(&self) -> RenderMode {
        self.state.mode
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    /// Whether the navigation helper currently exists
    pub fn has_navigator(&self) -> bool {
        self.navigator.is_some()
    }

    /// Whether the gizmo helper currently exists
    pub fn has_gizmo(&self) -> bool {
        self.gizmo.is_some()
    }

    /// Whether the gizmo is attached to an object
    pub fn gizmo_attached(&self) -> bool {
        self.gizmo.as_ref().map(|g| g.is_attached()).unwrap_or(false)
    }

    /// Current gizmo kind, while the helper exists
    pub fn gizmo_kind(&self) -> Option<TransformKind> {
        self.gizmo.as_ref().map(|g| g.kind())
    }

    /// Dispatch one abstract input event
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        graph: &mut SceneGraph,
        scheduler: &mut RenderScheduler,
    ) {
        match event {
            InputEvent::ToggleFreeze => {
                scheduler.toggle_frozen();
            }
            InputEvent::ToggleMode => self.toggle_mode(graph),
            InputEvent::Cancel => self.cancel(graph),
            InputEvent::SelectScreenQuad => self.select_screen_quad(graph),
            InputEvent::CycleTransformKind => self.cycle_transform_kind(),
            InputEvent::AddImage { source } => self.add_image(&source),
            InputEvent::CycleCorner => self.cycle_corner(graph),
            InputEvent::NudgeCorner { axis, sign } => self.nudge_corner(graph, axis, sign),
            InputEvent::DeleteSelected => self.delete_selected(graph),
            InputEvent::PointerDown { ndc } => self.pointer_down(graph, ndc),
            InputEvent::ResetQuad => self.reset_quad(graph),
            InputEvent::BakeCamera => graph.bake_composite_camera(),
        }
    }

    /// Plane ⇄ scene; the only point where helpers are built or destroyed
    fn toggle_mode(&mut self, graph: &mut SceneGraph) {
        self.state.mode = self.state.mode.toggled();
        match self.state.mode {
            RenderMode::Scene => {
                self.navigator = Some(OrbitNavigator::from_camera(&graph.content_camera));
                self.gizmo = Some(TransformGizmo::new());
            }
            RenderMode::Plane => {
                self.navigator = None;
                self.gizmo = None;
            }
        }
        log::info!("Switched to {} mode", self.state.mode.name());
    }

    /// Detach the gizmo if it holds an object, otherwise drop the selection
    fn cancel(&mut self, graph: &mut SceneGraph) {
        if let Some(gizmo) = self.gizmo.as_mut() {
            if gizmo.is_attached() {
                gizmo.detach();
                return;
            }
        }
        if !self.state.selection.is_none() {
            self.set_selection(graph, Selection::None);
        }
    }

    /// Toggle selection between none and the screen quad
    fn select_screen_quad(&mut self, graph: &mut SceneGraph) {
        let next = if self.state.selection == Selection::ScreenQuad {
            Selection::None
        } else {
            Selection::ScreenQuad
        };
        self.set_selection(graph, next);
    }

    fn cycle_transform_kind(&mut self) {
        let Some(gizmo) = self.gizmo.as_mut() else {
            return;
        };
        if !gizmo.is_attached() {
            return;
        }
        let kind = gizmo.cycle_kind();
        log::info!("Gizmo kind: {}", kind.name());
    }

    /// Dispatch an asynchronous image load
    fn add_image(&mut self, source: &str) {
        let request = self.loader.request(source);
        self.pending_loads.insert(request);
        log::info!("Loading image '{}' (request {})", source, request);
    }

    /// Advance the active corner of the selected quad
    fn cycle_corner(&mut self, graph: &mut SceneGraph) {
        let Some(id) = self.state.selection.entity_id(graph) else {
            return;
        };
        if let Some(entity) = graph.entity_mut(id) {
            entity.quad.cycle_cursor();
            entity.quad.rebuild();
        }
        graph.refresh_entity(id);
    }

    /// Move the active corner by one step along an axis
    fn nudge_corner(&mut self, graph: &mut SceneGraph, axis: Axis, sign: f32) {
        let Some(id) = self.state.selection.entity_id(graph) else {
            return;
        };
        let delta = match axis {
            Axis::X => Vec2::new(self.nudge_step * sign.signum(), 0.0),
            Axis::Y => Vec2::new(0.0, self.nudge_step * sign.signum()),
        };
        let Some(entity) = graph.entity_mut(id) else {
            return;
        };
        if entity.quad.nudge_cursor(delta) {
            entity.quad.rebuild();
            graph.refresh_entity(id);
        }
    }

    /// Remove the selected image entity; the screen quad is protected
    fn delete_selected(&mut self, graph: &mut SceneGraph) {
        let Selection::Image(id) = self.state.selection else {
            return;
        };
        // Detach a gizmo pointed at the doomed entity first
        if let (Some(gizmo), Some(entity)) = (self.gizmo.as_mut(), graph.entity(id)) {
            if let Some(target) = gizmo.target() {
                if graph.content.is_descendant_of(target, entity.root) {
                    gizmo.detach();
                }
            }
        }
        graph.remove_entity(id);
        self.state.selection = Selection::None;
    }

    /// Pick under the pointer, attaching the gizmo on a hit
    ///
    /// Only meaningful in scene mode while no gizmo object is attached; a
    /// miss changes nothing.
    fn pointer_down(&mut self, graph: &mut SceneGraph, ndc: Vec2) {
        if self.state.mode != RenderMode::Scene {
            return;
        }
        if self.gizmo.as_ref().map(|g| g.is_attached()).unwrap_or(true) {
            return;
        }
        let camera = graph.content_camera.clone();
        let Some(hit) = picking::pick(ndc, &camera, graph) else {
            return;
        };
        let Some(root) = graph.entity(hit.entity).map(|e| e.root) else {
            return;
        };
        if let Some(gizmo) = self.gizmo.as_mut() {
            gizmo.attach(root);
        }
        self.set_selection(graph, Selection::Image(hit.entity));
        log::info!("Picked entity {:?} at distance {:.3}", hit.entity, hit.distance);
    }

    /// Reset the selected quad's corners to their defaults
    fn reset_quad(&mut self, graph: &mut SceneGraph) {
        let Some(id) = self.state.selection.entity_id(graph) else {
            return;
        };
        if let Some(entity) = graph.entity_mut(id) {
            entity.quad.reset();
        }
        graph.refresh_entity(id);
    }

    /// Switch selection, keeping quad selection flags and overlays in sync
    fn set_selection(&mut self, graph: &mut SceneGraph, next: Selection) {
        if let Some(previous) = self.state.selection.entity_id(graph) {
            graph.set_entity_selected(previous, false);
        }
        self.state.selection = next;
        if let Some(current) = next.entity_id(graph) {
            graph.set_entity_selected(current, true);
        }
    }

    /// Orbit the live camera while in scene mode
    pub fn on_pointer_drag(&mut self, graph: &mut SceneGraph, delta: (f32, f32)) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.on_mouse_drag(delta, 0.005);
            navigator.apply_to(&mut graph.content_camera);
        }
    }

    /// Zoom the live camera while in scene mode
    pub fn on_scroll(&mut self, graph: &mut SceneGraph, delta: f32) {
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.on_scroll(delta);
            navigator.apply_to(&mut graph.content_camera);
        }
    }

    /// Drive the gizmo along a world axis while one is attached
    pub fn on_gizmo_drag(&mut self, graph: &mut SceneGraph, axis: Vec3, amount: f32) {
        if let Some(gizmo) = self.gizmo.as_ref() {
            gizmo.manipulate(&mut graph.content, axis, amount);
        }
    }

    /// Map a pointer drag onto gizmo manipulation in the screen plane
    pub fn on_gizmo_pointer_drag(&mut self, graph: &mut SceneGraph, delta: (f32, f32)) {
        const DRAG_SCALE: f32 = 0.01;
        if !self.gizmo_attached() {
            return;
        }
        self.on_gizmo_drag(graph, Vec3::X, delta.0 * DRAG_SCALE);
        self.on_gizmo_drag(graph, Vec3::Y, -delta.1 * DRAG_SCALE);
    }

    /// Apply finished image loads, returning newly stored texture ids
    ///
    /// Completions whose request is no longer pending are dropped; a load
    /// must never attach to an already-removed interest. Failures leave the
    /// scene graph unchanged and only produce a log line.
    pub fn pump_loads(&mut self, graph: &mut SceneGraph) -> Vec<TextureId> {
        let results = self.loader.poll();
        let mut uploaded = Vec::new();
        for completion in results {
            uploaded.extend(self.apply_load_result(completion, graph));
        }
        uploaded
    }

    fn apply_load_result(
        &mut self,
        completion: LoadResult,
        graph: &mut SceneGraph,
    ) -> Option<TextureId> {
        if !self.pending_loads.remove(&completion.request) {
            log::debug!("Dropping stale load completion {}", completion.request);
            return None;
        }
        match completion.result {
            Ok(data) => {
                let texture = graph.add_texture(data);
                graph.add_image_entity(texture);
                Some(texture)
            }
            Err(e) => {
                log::error!("Image load failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadError, TextureData};
    use crate::render::{Color, InsetAnchor};

    fn fixture() -> (SceneGraph, RenderScheduler, InteractionController) {
        let graph = SceneGraph::new(800, 600);
        let scheduler = RenderScheduler::new(Color::BACKGROUND, 0.25, InsetAnchor::BottomRight);
        let controller = InteractionController::new(0.01);
        (graph, scheduler, controller)
    }

    fn add_image(graph: &mut SceneGraph) -> EntityId {
        let texture = graph.add_texture(TextureData::solid(1, 1, [200, 200, 200, 255]));
        graph.add_image_entity(texture)
    }

    #[test]
    fn test_initial_state() {
        let (_, _, controller) = fixture();
        assert_eq!(controller.mode(), RenderMode::Plane);
        assert_eq!(controller.selection(), Selection::None);
        assert!(!controller.has_navigator());
        assert!(!controller.has_gizmo());
    }

    #[test]
    fn test_toggle_mode_round_trip_restores_helper_state() {
        let (mut graph, mut scheduler, mut controller) = fixture();

        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        assert_eq!(controller.mode(), RenderMode::Scene);
        assert!(controller.has_navigator());
        assert!(controller.has_gizmo());

        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        assert_eq!(controller.mode(), RenderMode::Plane);
        assert!(!controller.has_navigator());
        assert!(!controller.has_gizmo());
    }

    #[test]
    fn test_toggle_freeze_flips_scheduler_only() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let before = controller.state();
        controller.handle_event(InputEvent::ToggleFreeze, &mut graph, &mut scheduler);
        assert!(scheduler.is_frozen());
        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_select_screen_quad_toggles() {
        let (mut graph, mut scheduler, mut controller) = fixture();

        controller.handle_event(InputEvent::SelectScreenQuad, &mut graph, &mut scheduler);
        assert_eq!(controller.selection(), Selection::ScreenQuad);
        let quad_id = graph.screen_quad_id();
        assert!(graph.entity(quad_id).unwrap().quad.is_selected());

        controller.handle_event(InputEvent::SelectScreenQuad, &mut graph, &mut scheduler);
        assert_eq!(controller.selection(), Selection::None);
        assert!(!graph.entity(quad_id).unwrap().quad.is_selected());
        assert!(graph.entity(quad_id).unwrap().quad.overlay().is_none());
    }

    #[test]
    fn test_corner_edit_flow() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        controller.handle_event(InputEvent::SelectScreenQuad, &mut graph, &mut scheduler);

        let quad_id = graph.screen_quad_id();
        let before = graph.entity(quad_id).unwrap().quad.corners();

        controller.handle_event(
            InputEvent::NudgeCorner {
                axis: Axis::X,
                sign: 1.0,
            },
            &mut graph,
            &mut scheduler,
        );
        let after = graph.entity(quad_id).unwrap().quad.corners();
        assert_eq!(after[0].x, before[0].x + 0.01);
        assert_eq!(after[0].y, before[0].y);

        controller.handle_event(InputEvent::CycleCorner, &mut graph, &mut scheduler);
        assert_eq!(
            graph.entity(quad_id).unwrap().quad.cursor(),
            Some(crate::geometry::Corner::TopRight)
        );
    }

    #[test]
    fn test_nudge_without_selection_is_ignored() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let quad_id = graph.screen_quad_id();
        let before = graph.entity(quad_id).unwrap().quad.corners();
        controller.handle_event(
            InputEvent::NudgeCorner {
                axis: Axis::Y,
                sign: -1.0,
            },
            &mut graph,
            &mut scheduler,
        );
        assert_eq!(graph.entity(quad_id).unwrap().quad.corners(), before);
    }

    #[test]
    fn test_delete_protects_screen_quad() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        controller.handle_event(InputEvent::SelectScreenQuad, &mut graph, &mut scheduler);
        let before = graph.output.node_count();

        controller.handle_event(InputEvent::DeleteSelected, &mut graph, &mut scheduler);
        assert_eq!(graph.output.node_count(), before);
        assert!(graph.entity(graph.screen_quad_id()).is_some());
        // Selection stays, since nothing was deleted
        assert_eq!(controller.selection(), Selection::ScreenQuad);
    }

    #[test]
    fn test_delete_removes_selected_image_and_detaches_gizmo() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let id = add_image(&mut graph);

        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        graph.content_camera.position = Vec3::new(0.0, 0.0, 5.0);
        graph.content_camera.target = Vec3::ZERO;
        controller.handle_event(
            InputEvent::PointerDown { ndc: Vec2::ZERO },
            &mut graph,
            &mut scheduler,
        );
        assert_eq!(controller.selection(), Selection::Image(id));
        assert!(controller.gizmo_attached());

        controller.handle_event(InputEvent::DeleteSelected, &mut graph, &mut scheduler);
        assert!(graph.entity(id).is_none());
        assert_eq!(controller.selection(), Selection::None);
        assert!(!controller.gizmo_attached());
    }

    #[test]
    fn test_pointer_down_on_empty_scene_changes_nothing() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        controller.handle_event(
            InputEvent::PointerDown { ndc: Vec2::ZERO },
            &mut graph,
            &mut scheduler,
        );
        assert_eq!(controller.selection(), Selection::None);
        assert!(!controller.gizmo_attached());
    }

    #[test]
    fn test_pointer_down_ignored_in_plane_mode() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        add_image(&mut graph);
        graph.content_camera.position = Vec3::new(0.0, 0.0, 5.0);
        graph.content_camera.target = Vec3::ZERO;

        controller.handle_event(
            InputEvent::PointerDown { ndc: Vec2::ZERO },
            &mut graph,
            &mut scheduler,
        );
        assert_eq!(controller.selection(), Selection::None);
    }

    #[test]
    fn test_cancel_detaches_then_deselects() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let id = add_image(&mut graph);
        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        graph.content_camera.position = Vec3::new(0.0, 0.0, 5.0);
        graph.content_camera.target = Vec3::ZERO;
        controller.handle_event(
            InputEvent::PointerDown { ndc: Vec2::ZERO },
            &mut graph,
            &mut scheduler,
        );
        assert!(controller.gizmo_attached());

        // First cancel: detach, selection unchanged
        controller.handle_event(InputEvent::Cancel, &mut graph, &mut scheduler);
        assert!(!controller.gizmo_attached());
        assert_eq!(controller.selection(), Selection::Image(id));

        // Second cancel: deselect
        controller.handle_event(InputEvent::Cancel, &mut graph, &mut scheduler);
        assert_eq!(controller.selection(), Selection::None);
    }

    #[test]
    fn test_cycle_transform_kind_requires_attached_gizmo() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        controller.handle_event(InputEvent::CycleTransformKind, &mut graph, &mut scheduler);
        assert_eq!(controller.gizmo_kind(), None);

        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        controller.handle_event(InputEvent::CycleTransformKind, &mut graph, &mut scheduler);
        // Unattached gizmo keeps its kind
        assert_eq!(controller.gizmo_kind(), Some(TransformKind::Translate));
    }

    #[test]
    fn test_stale_load_completion_is_dropped() {
        let (mut graph, _, mut controller) = fixture();
        let before = graph.image_entity_ids().len();

        let stale = LoadResult {
            request: 77,
            result: Ok(TextureData::solid(1, 1, [0, 0, 0, 255])),
        };
        assert_eq!(controller.apply_load_result(stale, &mut graph), None);
        assert_eq!(graph.image_entity_ids().len(), before);
    }

    #[test]
    fn test_failed_load_leaves_graph_unchanged() {
        let (mut graph, _, mut controller) = fixture();
        controller.pending_loads.insert(5);
        let before = graph.image_entity_ids().len();

        let failed = LoadResult {
            request: 5,
            result: Err(LoadError::Decode {
                source_path: "missing.png".to_string(),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "missing",
                )),
            }),
        };
        assert_eq!(controller.apply_load_result(failed, &mut graph), None);
        assert_eq!(graph.image_entity_ids().len(), before);
    }

    #[test]
    fn test_add_image_then_delete_before_resolve() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        // An image is already selected when the new load is dispatched
        let selected = add_image(&mut graph);
        controller.state.selection = Selection::Image(selected);

        controller.handle_event(
            InputEvent::AddImage {
                source: "/nonexistent/late.png".to_string(),
            },
            &mut graph,
            &mut scheduler,
        );
        controller.handle_event(InputEvent::DeleteSelected, &mut graph, &mut scheduler);
        assert!(graph.entity(selected).is_none());

        // When the load later resolves (here: with an error), nothing is
        // orphaned and nothing panics
        for _ in 0..100 {
            if !controller.pump_loads(&mut graph).is_empty() || controller.pending_loads.is_empty()
            {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(graph.entity(selected).is_none());
    }

    #[test]
    fn test_successful_load_adds_entity() {
        let (mut graph, _, mut controller) = fixture();
        controller.pending_loads.insert(9);
        let completion = LoadResult {
            request: 9,
            result: Ok(TextureData::solid(2, 2, [10, 20, 30, 255])),
        };
        let texture = controller.apply_load_result(completion, &mut graph);
        assert!(texture.is_some());
        assert_eq!(graph.image_entity_ids().len(), 1);
    }

    #[test]
    fn test_gizmo_pointer_drag_moves_entity() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let id = add_image(&mut graph);
        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);
        graph.content_camera.position = Vec3::new(0.0, 0.0, 5.0);
        graph.content_camera.target = Vec3::ZERO;
        controller.handle_event(
            InputEvent::PointerDown { ndc: Vec2::ZERO },
            &mut graph,
            &mut scheduler,
        );
        assert!(controller.gizmo_attached());

        controller.on_gizmo_pointer_drag(&mut graph, (100.0, 0.0));
        let root = graph.entity(id).unwrap().root;
        let translation = graph.content.node(root).unwrap().transform.translation;
        assert!(translation.x > 0.0);
        assert_eq!(translation.y, 0.0);
    }

    #[test]
    fn test_gizmo_pointer_drag_without_attachment_is_noop() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        let id = add_image(&mut graph);
        controller.handle_event(InputEvent::ToggleMode, &mut graph, &mut scheduler);

        controller.on_gizmo_pointer_drag(&mut graph, (100.0, 0.0));
        let root = graph.entity(id).unwrap().root;
        assert_eq!(
            graph.content.node(root).unwrap().transform.translation,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_reset_quad_restores_defaults() {
        let (mut graph, mut scheduler, mut controller) = fixture();
        controller.handle_event(InputEvent::SelectScreenQuad, &mut graph, &mut scheduler);
        controller.handle_event(
            InputEvent::NudgeCorner {
                axis: Axis::X,
                sign: 1.0,
            },
            &mut graph,
            &mut scheduler,
        );
        controller.handle_event(InputEvent::ResetQuad, &mut graph, &mut scheduler);
        let quad = &graph.entity(graph.screen_quad_id()).unwrap().quad;
        assert_eq!(quad.corners()[0], Vec2::new(-1.0, 1.0));
    }
}
