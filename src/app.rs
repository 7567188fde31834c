//! Main application state and event handling
//!
//! Thin windowing shell: owns the wgpu renderer, maps raw winit input onto
//! abstract interaction events, and drives the frame scheduler from the
//! redraw loop. The core never reads raw device state itself.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::interaction::{Axis, InputEvent, InteractionController};
use crate::render::{Color, RenderScheduler, Renderer, WgpuRenderer};
use crate::scene::SceneGraph;

/// Main application state
pub struct AuthorApp {
    config: AppConfig,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    graph: SceneGraph,
    scheduler: RenderScheduler,
    controller: InteractionController,
    cursor_position: (f64, f64),
    orbit_dragging: bool,
    gizmo_dragging: bool,
}

impl AuthorApp {
    pub fn new(config: AppConfig) -> Self {
        let mut graph = SceneGraph::new(config.window_width, config.window_height);
        graph.content_camera.fov = config.camera.fov_degrees.to_radians();
        graph.content_camera.position = Vec3::from(config.camera.position);
        graph.content_camera.target = Vec3::from(config.camera.target);
        graph.bake_composite_camera();

        let scheduler = RenderScheduler::new(
            Color::from(config.clear_color),
            config.inset_fraction,
            config.inset_anchor,
        );
        let controller = InteractionController::new(config.nudge_step);

        Self {
            config,
            window: None,
            renderer: None,
            graph,
            scheduler,
            controller,
            cursor_position: (0.0, 0.0),
            orbit_dragging: false,
            gizmo_dragging: false,
        }
    }

    fn initialize_graphics(&mut self, window: Arc<Window>) {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        self.graph.resize(size.width.max(1), size.height.max(1));
        self.renderer = Some(WgpuRenderer::new(device, queue, surface, surface_config));
        self.window = Some(window);
        self.scheduler.start();
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        let width = size.width.max(1);
        let height = size.height.max(1);
        if let Some(renderer) = &mut self.renderer {
            renderer.set_size(width, height);
        }
        self.graph.resize(width, height);
    }

    /// Map key-up events onto abstract interaction events
    fn handle_key(&mut self, key: KeyEvent) {
        if key.state != ElementState::Released {
            return;
        }
        let event = match key.physical_key {
            PhysicalKey::Code(KeyCode::Space) => Some(InputEvent::ToggleFreeze),
            PhysicalKey::Code(KeyCode::KeyM) => Some(InputEvent::ToggleMode),
            PhysicalKey::Code(KeyCode::Escape) => Some(InputEvent::Cancel),
            PhysicalKey::Code(KeyCode::KeyS) => Some(InputEvent::SelectScreenQuad),
            PhysicalKey::Code(KeyCode::KeyT) => Some(InputEvent::CycleTransformKind),
            PhysicalKey::Code(KeyCode::KeyC) => Some(InputEvent::CycleCorner),
            PhysicalKey::Code(KeyCode::KeyR) => Some(InputEvent::ResetQuad),
            PhysicalKey::Code(KeyCode::KeyB) => Some(InputEvent::BakeCamera),
            PhysicalKey::Code(KeyCode::KeyO) => self.prompt_for_image(),
            PhysicalKey::Code(KeyCode::ArrowLeft) => Some(InputEvent::NudgeCorner {
                axis: Axis::X,
                sign: -1.0,
            }),
            PhysicalKey::Code(KeyCode::ArrowRight) => Some(InputEvent::NudgeCorner {
                axis: Axis::X,
                sign: 1.0,
            }),
            PhysicalKey::Code(KeyCode::ArrowUp) => Some(InputEvent::NudgeCorner {
                axis: Axis::Y,
                sign: 1.0,
            }),
            PhysicalKey::Code(KeyCode::ArrowDown) => Some(InputEvent::NudgeCorner {
                axis: Axis::Y,
                sign: -1.0,
            }),
            PhysicalKey::Code(KeyCode::Delete) | PhysicalKey::Code(KeyCode::Backspace) => {
                Some(InputEvent::DeleteSelected)
            }
            _ => None,
        };
        if let Some(event) = event {
            self.controller
                .handle_event(event, &mut self.graph, &mut self.scheduler);
        }
    }

    /// Prompt for a texture source with the native file dialog
    fn prompt_for_image(&self) -> Option<InputEvent> {
        let path = rfd::FileDialog::new()
            .set_title("Add Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif"])
            .pick_file()?;
        Some(InputEvent::AddImage {
            source: path.to_string_lossy().into_owned(),
        })
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => {
                let ndc = self.cursor_ndc();
                self.controller.handle_event(
                    InputEvent::PointerDown { ndc },
                    &mut self.graph,
                    &mut self.scheduler,
                );
                // Once an object is attached, further left-drag manipulates it
                self.gizmo_dragging = self.controller.gizmo_attached();
            }
            (MouseButton::Left, ElementState::Released) => {
                self.gizmo_dragging = false;
            }
            (MouseButton::Right, ElementState::Pressed) => {
                self.orbit_dragging = true;
            }
            (MouseButton::Right, ElementState::Released) => {
                self.orbit_dragging = false;
            }
            _ => {}
        }
    }

    /// Pointer position in normalized device coordinates, +y up
    fn cursor_ndc(&self) -> Vec2 {
        let buffer = self.graph.buffer();
        let x = (self.cursor_position.0 / buffer.width.max(1) as f64) * 2.0 - 1.0;
        let y = 1.0 - (self.cursor_position.1 / buffer.height.max(1) as f64) * 2.0;
        Vec2::new(x as f32, y as f32)
    }

    fn render_frame(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        // Apply finished image loads strictly between frames
        for texture in self.controller.pump_loads(&mut self.graph) {
            if let Some(data) = self.graph.texture(texture) {
                renderer.upload_texture(texture, data);
            }
        }

        self.scheduler
            .render_frame(renderer, &self.graph, self.controller.mode());
    }
}

impl ApplicationHandler for AuthorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("ProjMap Author")
                .with_inner_size(PhysicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            self.initialize_graphics(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.scheduler.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta = (
                    (position.x - self.cursor_position.0) as f32,
                    (position.y - self.cursor_position.1) as f32,
                );
                self.cursor_position = (position.x, position.y);
                if self.orbit_dragging {
                    self.controller.on_pointer_drag(&mut self.graph, delta);
                } else if self.gizmo_dragging {
                    self.controller.on_gizmo_pointer_drag(&mut self.graph, delta);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.controller.on_scroll(&mut self.graph, amount);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();

                // Re-arm the loop; a frozen scheduler skips the passes but
                // keeps the last frame visible
                if self.scheduler.is_running() {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.scheduler.is_running() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}
