//! ProjMap Author Library
//!
//! An interactive projection mapping authoring tool: a content scene is
//! rendered into an off-screen buffer and composited onto an editable
//! screen quad, with a picking-driven gizmo editor for the content scene.

pub mod app;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod loader;
pub mod picking;
pub mod render;
pub mod scene;

// Re-export commonly used types
pub use app::AuthorApp;
pub use config::AppConfig;
pub use geometry::{Corner, QuadGeometry};
pub use interaction::{InputEvent, InteractionController, InteractionState, Selection};
pub use loader::{ImageLoader, TextureData, TextureId};
pub use render::{RenderMode, RenderScheduler, Renderer, WgpuRenderer};
pub use scene::{Entity, EntityId, SceneGraph};
