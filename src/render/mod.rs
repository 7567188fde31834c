//! Render module for the two-pass compositing pipeline
//!
//! Defines the renderer capability the core drives, plus the frame
//! scheduler. The wgpu implementation lives in `backend`.

mod backend;
mod scheduler;

pub use backend::WgpuRenderer;
pub use scheduler::{InsetAnchor, RenderMode, RenderScheduler};

use serde::{Deserialize, Serialize};

use crate::loader::{TextureData, TextureId};
use crate::scene::{CameraView, Scene};

/// RGBA color with float components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Neutral background used to clear each frame
    pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.15, 1.0);
}

impl From<[f32; 4]> for Color {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Pixel rectangle used for both viewports and scissors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-frame viewport at the origin
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// Draw destination for subsequent clear/render calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// The visible frame
    Screen,
    /// The off-screen compositing buffer at the given resolution
    ///
    /// Carrying the dimensions here lets the backend recreate the GPU
    /// texture lazily whenever the scene graph resizes the buffer.
    Buffer { width: u32, height: u32 },
}

/// Rendering capability the scheduler drives
///
/// The core issues these calls in a fixed per-frame order; implementations
/// turn them into actual draw work. `begin_frame`/`end_frame` bracket one
/// scheduled frame so backends can acquire and present a surface.
pub trait Renderer {
    fn set_size(&mut self, width: u32, height: u32);
    fn set_render_target(&mut self, target: RenderTarget);
    fn set_viewport(&mut self, viewport: Viewport);
    fn set_scissor(&mut self, rect: Viewport);
    fn set_scissor_test(&mut self, enabled: bool);
    fn set_clear_color(&mut self, color: Color);
    fn clear(&mut self);
    fn render(&mut self, scene: &Scene, camera: &CameraView);

    /// Upload decoded pixels for later sampling; no-op by default
    fn upload_texture(&mut self, id: TextureId, data: &TextureData) {
        let _ = (id, data);
    }

    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}
}
