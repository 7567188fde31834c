//! Frame scheduler for the two-pass render
//!
//! Drives the renderer once per frame: content scene into the buffer
//! through the frozen composite camera, then either the output scene
//! full-frame (plane mode) or the content scene full-frame with an inset
//! output preview (scene mode).

use serde::{Deserialize, Serialize};

use crate::scene::SceneGraph;

use super::{Color, RenderTarget, Renderer, Viewport};

/// Which scene is the primary full-frame subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full-frame compositing view; navigation and gizmo disabled
    #[default]
    Plane,
    /// Full-frame content navigation with an inset compositing preview
    Scene,
}

impl RenderMode {
    /// The other mode
    pub fn toggled(self) -> RenderMode {
        match self {
            RenderMode::Plane => RenderMode::Scene,
            RenderMode::Scene => RenderMode::Plane,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Plane => "plane",
            RenderMode::Scene => "scene",
        }
    }
}

/// Frame corner the inset preview is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsetAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Explicit frame scheduler with start/stop control
///
/// The continuous loop lives in the windowing shell; this object renders
/// exactly one frame per call so tests can step it deterministically. The
/// frozen flag skips the passes entirely while leaving the loop armed.
pub struct RenderScheduler {
    running: bool,
    frozen: bool,
    clear_color: Color,
    inset_fraction: f32,
    inset_anchor: InsetAnchor,
}

impl RenderScheduler {
    /// Create a scheduler; the inset fraction is clamped to a sane range
    pub fn new(clear_color: Color, inset_fraction: f32, inset_anchor: InsetAnchor) -> Self {
        Self {
            running: false,
            frozen: false,
            clear_color,
            inset_fraction: inset_fraction.clamp(0.05, 0.5),
            inset_anchor,
        }
    }

    /// Arm the frame loop
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Disarm the frame loop
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Flip the frozen flag, returning the new value
    pub fn toggle_frozen(&mut self) -> bool {
        self.frozen = !self.frozen;
        log::info!(
            "Render loop {}",
            if self.frozen { "frozen" } else { "unfrozen" }
        );
        self.frozen
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Inset preview rectangle for a frame of the given size
    pub fn inset_rect(&self, frame_width: u32, frame_height: u32) -> Viewport {
        let width = ((frame_width as f32) * self.inset_fraction) as u32;
        let height = ((frame_height as f32) * self.inset_fraction) as u32;
        let (x, y) = match self.inset_anchor {
            InsetAnchor::TopLeft => (0, frame_height.saturating_sub(height)),
            InsetAnchor::TopRight => (
                frame_width.saturating_sub(width),
                frame_height.saturating_sub(height),
            ),
            InsetAnchor::BottomLeft => (0, 0),
            InsetAnchor::BottomRight => (frame_width.saturating_sub(width), 0),
        };
        Viewport::new(x, y, width, height)
    }

    /// Render one frame
    ///
    /// While frozen this is a no-op; the last presented frame stays
    /// visible and the caller keeps the loop armed.
    pub fn render_frame(&self, renderer: &mut dyn Renderer, graph: &SceneGraph, mode: RenderMode) {
        if self.frozen {
            return;
        }

        let buffer = graph.buffer();
        let full = Viewport::full(buffer.width, buffer.height);

        renderer.begin_frame();

        // Clear the visible frame to the neutral background
        renderer.set_clear_color(self.clear_color);
        renderer.set_render_target(RenderTarget::Screen);
        renderer.set_scissor_test(false);
        renderer.set_viewport(full);
        renderer.clear();

        // Content scene into the buffer through the frozen composite camera,
        // so live navigation never perturbs what gets composited
        renderer.set_render_target(RenderTarget::Buffer {
            width: buffer.width,
            height: buffer.height,
        });
        renderer.set_viewport(full);
        renderer.clear();
        renderer.render(&graph.content, &graph.composite_camera.view());

        renderer.set_render_target(RenderTarget::Screen);
        match mode {
            RenderMode::Plane => {
                renderer.set_viewport(full);
                renderer.set_scissor(full);
                renderer.render(&graph.output, &graph.output_camera.view());
            }
            RenderMode::Scene => {
                renderer.set_viewport(full);
                renderer.set_scissor(full);
                renderer.render(&graph.content, &graph.content_camera.view());

                let inset = self.inset_rect(buffer.width, buffer.height);
                renderer.set_viewport(inset);
                renderer.set_scissor(inset);
                renderer.set_scissor_test(true);
                renderer.render(&graph.output, &graph.output_camera.view());
                renderer.set_scissor_test(false);
            }
        }

        renderer.end_frame();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::loader::{TextureData, TextureId};
    use crate::scene::{CameraView, Scene};

    /// Renderer that records the call sequence for assertions
    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        pub calls: Vec<Call>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        BeginFrame,
        EndFrame,
        SetSize(u32, u32),
        SetTarget(RenderTarget),
        SetViewport(Viewport),
        SetScissor(Viewport),
        SetScissorTest(bool),
        SetClearColor(Color),
        Clear,
        Render { scene: String, camera: CameraView },
        UploadTexture(TextureId),
    }

    impl Renderer for RecordingRenderer {
        fn set_size(&mut self, width: u32, height: u32) {
            self.calls.push(Call::SetSize(width, height));
        }
        fn set_render_target(&mut self, target: RenderTarget) {
            self.calls.push(Call::SetTarget(target));
        }
        fn set_viewport(&mut self, viewport: Viewport) {
            self.calls.push(Call::SetViewport(viewport));
        }
        fn set_scissor(&mut self, rect: Viewport) {
            self.calls.push(Call::SetScissor(rect));
        }
        fn set_scissor_test(&mut self, enabled: bool) {
            self.calls.push(Call::SetScissorTest(enabled));
        }
        fn set_clear_color(&mut self, color: Color) {
            self.calls.push(Call::SetClearColor(color));
        }
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn render(&mut self, scene: &Scene, camera: &CameraView) {
            self.calls.push(Call::Render {
                scene: scene.name.clone(),
                camera: *camera,
            });
        }
        fn upload_texture(&mut self, id: TextureId, _data: &TextureData) {
            self.calls.push(Call::UploadTexture(id));
        }
        fn begin_frame(&mut self) {
            self.calls.push(Call::BeginFrame);
        }
        fn end_frame(&mut self) {
            self.calls.push(Call::EndFrame);
        }
    }

    impl RecordingRenderer {
        fn renders(&self) -> Vec<(String, CameraView)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Render { scene, camera } => Some((scene.clone(), *camera)),
                    _ => None,
                })
                .collect()
        }
    }

    fn scheduler() -> RenderScheduler {
        RenderScheduler::new(Color::BACKGROUND, 0.25, InsetAnchor::BottomRight)
    }

    #[test]
    fn test_plane_mode_renders_buffer_then_output() {
        let graph = crate::scene::SceneGraph::new(800, 600);
        let mut renderer = RecordingRenderer::default();
        scheduler().render_frame(&mut renderer, &graph, RenderMode::Plane);

        let renders = renderer.renders();
        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0].0, "content");
        assert_eq!(renders[0].1, graph.composite_camera.view());
        assert_eq!(renders[1].0, "output");
        assert_eq!(renders[1].1, graph.output_camera.view());

        // Buffer pass precedes the screen pass
        let buffer_target = renderer
            .calls
            .iter()
            .position(|c| {
                matches!(
                    c,
                    Call::SetTarget(RenderTarget::Buffer {
                        width: 800,
                        height: 600
                    })
                )
            })
            .expect("buffer target set");
        let output_render = renderer
            .calls
            .iter()
            .position(|c| matches!(c, Call::Render { scene, .. } if scene == "output"))
            .unwrap();
        assert!(buffer_target < output_render);
    }

    #[test]
    fn test_scene_mode_adds_live_pass_and_inset() {
        let mut graph = crate::scene::SceneGraph::new(800, 600);
        // Diverge the live camera so the two content passes are distinguishable
        graph.content_camera.position = glam::Vec3::new(1.0, 2.0, 3.0);
        let mut renderer = RecordingRenderer::default();
        scheduler().render_frame(&mut renderer, &graph, RenderMode::Scene);

        let renders = renderer.renders();
        assert_eq!(renders.len(), 3);
        // Compositor pass reads the frozen camera, navigation pass the live one
        assert_eq!(renders[0].1, graph.composite_camera.view());
        assert_eq!(renders[1].0, "content");
        assert_eq!(renders[1].1, graph.content_camera.view());
        assert_eq!(renders[2].0, "output");

        // The inset is scissored and a quarter of the frame, bottom-right
        let inset = Viewport::new(600, 0, 200, 150);
        assert!(renderer.calls.contains(&Call::SetViewport(inset)));
        assert!(renderer.calls.contains(&Call::SetScissor(inset)));
        assert!(renderer.calls.contains(&Call::SetScissorTest(true)));
        assert_eq!(
            renderer.calls.last(),
            Some(&Call::EndFrame),
            "scissor test is disabled before the frame ends"
        );
    }

    #[test]
    fn test_frozen_skips_all_passes() {
        let graph = crate::scene::SceneGraph::new(800, 600);
        let mut renderer = RecordingRenderer::default();
        let mut sched = scheduler();
        sched.set_frozen(true);
        sched.render_frame(&mut renderer, &graph, RenderMode::Plane);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_toggle_frozen_round_trips() {
        let mut sched = scheduler();
        assert!(!sched.is_frozen());
        assert!(sched.toggle_frozen());
        assert!(!sched.toggle_frozen());
    }

    #[test]
    fn test_inset_anchors() {
        let sched = RenderScheduler::new(Color::BACKGROUND, 0.25, InsetAnchor::TopLeft);
        assert_eq!(sched.inset_rect(800, 600), Viewport::new(0, 450, 200, 150));

        let sched = RenderScheduler::new(Color::BACKGROUND, 0.25, InsetAnchor::BottomRight);
        assert_eq!(sched.inset_rect(800, 600), Viewport::new(600, 0, 200, 150));
    }

    #[test]
    fn test_inset_fraction_is_clamped() {
        let sched = RenderScheduler::new(Color::BACKGROUND, 2.0, InsetAnchor::BottomRight);
        let rect = sched.inset_rect(800, 600);
        assert_eq!(rect.width, 400);
    }

    #[test]
    fn test_start_stop() {
        let mut sched = scheduler();
        assert!(!sched.is_running());
        sched.start();
        assert!(sched.is_running());
        sched.stop();
        assert!(!sched.is_running());
    }
}
