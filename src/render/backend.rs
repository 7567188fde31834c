//! wgpu implementation of the renderer capability
//!
//! Turns the scheduler's abstract calls into render passes: one textured
//! mesh pipeline, one line pipeline for overlays, and an off-screen color
//! buffer recreated whenever the scene graph resizes it.
//!
//! Viewport and scissor rectangles arrive with a bottom-left origin and are
//! flipped here to wgpu's top-left framebuffer convention.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::loader::{TextureData, TextureId};
use crate::scene::{CameraView, Light, Scene, TextureSource};

use super::{Color, RenderTarget, Renderer, Viewport};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-pass uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    /// xyz = direction, w unused
    light_direction: [f32; 4],
    /// rgb = color, a = intensity
    light_color: [f32; 4],
    /// rgb = color, a = intensity
    ambient_color: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &CameraView, lights: &[Light]) -> Self {
        let mut light_direction = [0.0, -1.0, 0.0, 0.0];
        let mut light_color = [1.0, 1.0, 1.0, 0.0];
        let mut ambient_color = [1.0, 1.0, 1.0, 1.0];
        for light in lights {
            match *light {
                Light::Directional {
                    direction,
                    color,
                    intensity,
                } => {
                    light_direction = [direction.x, direction.y, direction.z, 0.0];
                    light_color = [color[0], color[1], color[2], intensity];
                }
                Light::Ambient { color, intensity } => {
                    ambient_color = [color[0], color[1], color[2], intensity];
                }
            }
        }
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_direction,
            light_color,
            ambient_color,
        }
    }
}

/// Per-draw uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    /// x = lit flag, rest unused
    params: [f32; 4],
}

/// Vertex format shared by meshes and overlay lines
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
    normal: [f32; 3],
}

impl Vertex {
    const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 20,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Uploaded texture kept for sampling
struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// wgpu renderer driving the visible surface and the off-screen buffer
pub struct WgpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,

    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    frame_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    screen_depth: wgpu::TextureView,

    buffer_texture: Option<wgpu::Texture>,
    buffer_view: Option<wgpu::TextureView>,
    buffer_depth: Option<wgpu::TextureView>,
    buffer_size: (u32, u32),

    white_texture: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,

    target: RenderTarget,
    viewport: Viewport,
    scissor: Viewport,
    scissor_test: bool,
    clear_color: Color,

    frame: Option<wgpu::SurfaceTexture>,
    frame_view: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let color_target = wgpu::ColorTargetState {
            format: config.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        };

        let depth_stencil = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(color_target.clone())],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[Vertex::buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(color_target)],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let screen_depth = create_depth_view(&device, config.width, config.height);
        let white_texture = upload_rgba(
            &device,
            &queue,
            &TextureData::solid(1, 1, [255, 255, 255, 255]),
            "White Texture",
        );

        let width = config.width;
        let height = config.height;

        Self {
            device,
            queue,
            surface,
            config,
            mesh_pipeline,
            line_pipeline,
            frame_layout,
            model_layout,
            texture_layout,
            sampler,
            screen_depth,
            buffer_texture: None,
            buffer_view: None,
            buffer_depth: None,
            buffer_size: (0, 0),
            white_texture,
            textures: HashMap::new(),
            target: RenderTarget::Screen,
            viewport: Viewport::full(width, height),
            scissor: Viewport::full(width, height),
            scissor_test: false,
            clear_color: Color::BACKGROUND,
            frame: None,
            frame_view: None,
        }
    }

    /// Ensure the off-screen buffer exists at the requested resolution
    fn ensure_buffer(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.buffer_size == (width, height) && self.buffer_view.is_some() {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Compositing Buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        self.buffer_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.buffer_texture = Some(texture);
        self.buffer_depth = Some(create_depth_view(&self.device, width, height));
        self.buffer_size = (width, height);
        log::info!("Created compositing buffer {}x{}", width, height);
    }

    /// Dimensions of the current render target
    fn target_size(&self) -> (u32, u32) {
        match self.target {
            RenderTarget::Screen => (self.config.width, self.config.height),
            RenderTarget::Buffer { .. } => self.buffer_size,
        }
    }

    /// Color and depth views for the current render target
    fn target_views(&self) -> Option<(&wgpu::TextureView, &wgpu::TextureView)> {
        match self.target {
            RenderTarget::Screen => Some((self.frame_view.as_ref()?, &self.screen_depth)),
            RenderTarget::Buffer { .. } => {
                Some((self.buffer_view.as_ref()?, self.buffer_depth.as_ref()?))
            }
        }
    }

    /// Flip a bottom-left rectangle into framebuffer coordinates, clamped
    fn to_framebuffer_rect(&self, rect: Viewport) -> (u32, u32, u32, u32) {
        let (target_w, target_h) = self.target_size();
        let w = rect.width.min(target_w);
        let h = rect.height.min(target_h);
        let x = rect.x.min(target_w - w);
        let flipped_y = target_h.saturating_sub(rect.y + h);
        (x, flipped_y, w, h)
    }

    fn texture_view_for(&self, source: Option<TextureSource>) -> &wgpu::TextureView {
        match source {
            Some(TextureSource::Buffer) => {
                self.buffer_view.as_ref().unwrap_or(&self.white_texture.view)
            }
            Some(TextureSource::Loaded(id)) => self
                .textures
                .get(&id)
                .map(|t| &t.view)
                .unwrap_or(&self.white_texture.view),
            None => &self.white_texture.view,
        }
    }
}

impl Renderer for WgpuRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.screen_depth = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    fn set_render_target(&mut self, target: RenderTarget) {
        if let RenderTarget::Buffer { width, height } = target {
            self.ensure_buffer(width, height);
        }
        self.target = target;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_scissor(&mut self, rect: Viewport) {
        self.scissor = rect;
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_test = enabled;
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        let Some((color_view, depth_view)) = self.target_views() else {
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.clear_color.r as f64,
                            g: self.clear_color.g as f64,
                            b: self.clear_color.b as f64,
                            a: self.clear_color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn render(&mut self, scene: &Scene, camera: &CameraView) {
        let Some((color_view, depth_view)) = self.target_views() else {
            return;
        };

        let frame_uniforms = FrameUniforms::new(camera, &scene.lights);
        let frame_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Frame Uniform Buffer"),
                contents: bytemuck::bytes_of(&frame_uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let frame_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &self.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Gather draws up front so the pass borrows no scene data
        struct Draw {
            vertices: wgpu::Buffer,
            indices: Option<(wgpu::Buffer, u32)>,
            vertex_count: u32,
            model_bind_group: wgpu::BindGroup,
            texture_bind_group: wgpu::BindGroup,
            lines: bool,
        }

        let mut draws = Vec::new();
        for node in scene.iter() {
            if node.mesh.is_none() && node.lines.is_none() {
                continue;
            }
            let world = scene.world_transform(node.id);
            let model_uniforms = ModelUniforms {
                model: world.to_cols_array_2d(),
                color: node.color,
                params: [if node.lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            };
            let model_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Model Uniform Buffer"),
                    contents: bytemuck::bytes_of(&model_uniforms),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
            let model_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Bind Group"),
                layout: &self.model_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: model_buffer.as_entire_binding(),
                }],
            });
            let texture_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Node Texture Bind Group"),
                layout: &self.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            self.texture_view_for(node.texture),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

            if let Some(mesh) = &node.mesh {
                let vertices: Vec<Vertex> = (0..mesh.positions.len())
                    .map(|i| Vertex {
                        position: mesh.positions[i],
                        uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                        normal: mesh.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                    })
                    .collect();
                let vertex_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Vertex Buffer"),
                            contents: bytemuck::cast_slice(&vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                let index_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Index Buffer"),
                            contents: bytemuck::cast_slice(&mesh.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        });
                draws.push(Draw {
                    vertices: vertex_buffer,
                    indices: Some((index_buffer, mesh.indices.len() as u32)),
                    vertex_count: vertices.len() as u32,
                    model_bind_group,
                    texture_bind_group,
                    lines: false,
                });
            } else if let Some(lines) = &node.lines {
                if lines.points.is_empty() {
                    continue;
                }
                let vertices: Vec<Vertex> = lines
                    .points
                    .iter()
                    .map(|p| Vertex {
                        position: *p,
                        uv: [0.0, 0.0],
                        normal: [0.0, 0.0, 1.0],
                    })
                    .collect();
                let vertex_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Line Vertex Buffer"),
                            contents: bytemuck::cast_slice(&vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                draws.push(Draw {
                    vertices: vertex_buffer,
                    indices: None,
                    vertex_count: vertices.len() as u32,
                    model_bind_group,
                    texture_bind_group,
                    lines: true,
                });
            }
        }

        let (vx, vy, vw, vh) = self.to_framebuffer_rect(self.viewport);
        let (sx, sy, sw, sh) = if self.scissor_test {
            self.to_framebuffer_rect(self.scissor)
        } else {
            let (w, h) = self.target_size();
            (0, 0, w, h)
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if vw == 0 || vh == 0 || sw == 0 || sh == 0 {
                return;
            }
            pass.set_viewport(vx as f32, vy as f32, vw as f32, vh as f32, 0.0, 1.0);
            pass.set_scissor_rect(sx, sy, sw, sh);
            pass.set_bind_group(0, &frame_bind_group, &[]);

            for draw in &draws {
                pass.set_pipeline(if draw.lines {
                    &self.line_pipeline
                } else {
                    &self.mesh_pipeline
                });
                pass.set_bind_group(1, &draw.model_bind_group, &[]);
                pass.set_bind_group(2, &draw.texture_bind_group, &[]);
                pass.set_vertex_buffer(0, draw.vertices.slice(..));
                match &draw.indices {
                    Some((buffer, count)) => {
                        pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => pass.draw(0..draw.vertex_count, 0..1),
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn upload_texture(&mut self, id: TextureId, data: &TextureData) {
        let texture = upload_rgba(&self.device, &self.queue, data, "Image Texture");
        self.textures.insert(id, texture);
    }

    fn begin_frame(&mut self) {
        match self.surface.get_current_texture() {
            Ok(frame) => {
                self.frame_view = Some(
                    frame
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default()),
                );
                self.frame = Some(frame);
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
            }
        }
    }

    fn end_frame(&mut self) {
        self.frame_view = None;
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &TextureData,
    label: &str,
) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(data.width * 4),
            rows_per_image: Some(data.height),
        },
        wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        },
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}
