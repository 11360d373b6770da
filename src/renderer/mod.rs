//! GPU rendering pipeline using wgpu.
//!
//! This module provides the [`Renderer`] struct which handles:
//! - wgpu device and surface initialization
//! - Shader compilation and pipeline setup
//! - Static geometry upload (sphere, orbit rings, stars)
//! - Per-frame body instances and camera uniforms
//! - HDR bloom and tone mapping (see [`bloom`])

pub mod bloom;
pub mod camera;

use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::catalog::Catalog;
use crate::controls::CameraDirector;
use crate::scene::{orbit_ring, ColorVertex, SolarScene, SphereMesh, Starfield, Vertex};
use crate::ui::Ui;
use bloom::{Bloom, HDR_FORMAT};
use camera::OrbitCamera;

/// Orbit ring color (RGBA).
const ORBIT_COLOR: [f32; 4] = [0.847, 0.827, 0.804, 0.2];

/// Segments per orbit ring.
const ORBIT_SEGMENTS: u32 = 128;

/// Lighting configuration for lit bodies.
#[derive(Debug, Clone, Copy)]
pub struct LightingConfig {
    /// Point light position (the sun)
    pub position: Vec3,
    /// Ambient light strength (0.0 - 1.0)
    pub ambient: f32,
    /// Exponential-squared fog density; fog color is black
    pub fog_density: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: 0.25,
            fog_density: 0.00025,
        }
    }
}

/// Bloom and tone mapping settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomConfig {
    /// Weight of the blurred highlights added back onto the scene
    pub strength: f32,
    /// Blur spread (0.0 - 1.0)
    pub radius: f32,
    /// Luminance above which pixels bloom
    pub threshold: f32,
    /// Tone mapping exposure
    pub exposure: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: 1.5,
            radius: 0.4,
            threshold: 0.85,
            exposure: 0.5,
        }
    }
}

/// Uniform data shared by every shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light: [f32; 4],
    camera: [f32; 4],
}

impl Globals {
    fn new(camera: &OrbitCamera, aspect: f32, lighting: &LightingConfig) -> Self {
        Self {
            view_proj: camera
                .build_view_projection_matrix(aspect)
                .to_cols_array_2d(),
            light: lighting.position.extend(lighting.ambient).to_array(),
            camera: camera.position.extend(lighting.fog_density).to_array(),
        }
    }
}

/// Per-instance data for a sphere draw.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BodyInstance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: f32,
    _pad: [f32; 3],
}

impl BodyInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32,
    ];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(model: Mat4, color: [f32; 3], alpha: f32, emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], alpha],
            emissive,
            _pad: [0.0; 3],
        }
    }
}

/// Build body instances followed by glow shell instances.
///
/// Returns the instances and how many of them are opaque bodies.
fn build_instances(scene: &SolarScene) -> (Vec<BodyInstance>, u32) {
    let mut instances: Vec<BodyInstance> = scene
        .bodies()
        .iter()
        .map(|body| {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(body.radius),
                Quat::from_rotation_y(body.spin),
                body.position,
            );
            BodyInstance::new(model, body.color, 1.0, body.emissive.unwrap_or(0.0))
        })
        .collect();
    let body_count = instances.len() as u32;

    if let Some(star) = scene.star() {
        for shell in &scene.glow_shells {
            let rotation =
                Quat::from_rotation_y(shell.rotation[0]) * Quat::from_rotation_z(shell.rotation[1]);
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(star.radius * shell.scale),
                rotation,
                star.position,
            );
            instances.push(BodyInstance::new(model, shell.color, shell.opacity, 0.0));
        }
    }

    (instances, body_count)
}

/// Options for [`create_pipeline`].
struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    fragment_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    blend: wgpu::BlendState,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// GPU renderer managing wgpu state and rendering.
///
/// Owns the orbit camera; the scene and camera controls are passed in per frame.
pub struct Renderer {
    // Core wgpu objects
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Current window size (for aspect ratio and resize handling)
    pub size: winit::dpi::PhysicalSize<u32>,

    // Depth buffer
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    body_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,

    // Geometry
    sphere_vertex_buffer: wgpu::Buffer,
    sphere_index_buffer: wgpu::Buffer,
    num_sphere_indices: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    orbit_buffer: Option<wgpu::Buffer>,
    num_orbit_vertices: u32,
    star_buffer: Option<wgpu::Buffer>,
    num_stars: u32,

    /// Lighting configuration
    pub lighting: LightingConfig,

    // Post-processing
    bloom: Bloom,

    /// Orbit camera viewing the system
    pub camera: OrbitCamera,

    // egui
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    /// UI state
    pub ui: Ui,

    // Frame timing for FPS calculation
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Body Instance Buffer"),
        size: (capacity.max(1) * std::mem::size_of::<BodyInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl Renderer {
    /// Create a new renderer for the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if GPU initialization fails.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Init egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx,
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_format,
            egui_wgpu::RendererOptions::default(),
        );

        let (depth_texture, depth_view) =
            create_depth_texture(&device, config.width, config.height);

        let body_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Body Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/body.wgsl").into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/lines.wgsl").into()),
        });

        let lighting = LightingConfig::default();
        let camera = OrbitCamera::new();
        let globals = Globals::new(&camera, config.width as f32 / config.height as f32, &lighting);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[globals]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("Globals Bind Group Layout"),
            });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("Globals Bind Group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout],
            push_constant_ranges: &[],
        });

        let sphere_buffers = [Vertex::desc(), BodyInstance::desc()];
        let color_buffers = [ColorVertex::desc()];

        let body_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            HDR_FORMAT,
            PipelineDesc {
                label: "Body Pipeline",
                shader: &body_shader,
                fragment_entry: "fs_main",
                buffers: &sphere_buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            },
        );

        // Glow shells show their inside faces and blend over the sun
        let glow_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            HDR_FORMAT,
            PipelineDesc {
                label: "Glow Pipeline",
                shader: &body_shader,
                fragment_entry: "fs_glow",
                buffers: &sphere_buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Front),
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            },
        );

        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            HDR_FORMAT,
            PipelineDesc {
                label: "Orbit Pipeline",
                shader: &line_shader,
                fragment_entry: "fs_main",
                buffers: &color_buffers,
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            },
        );

        let point_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            HDR_FORMAT,
            PipelineDesc {
                label: "Star Pipeline",
                shader: &line_shader,
                fragment_entry: "fs_main",
                buffers: &color_buffers,
                topology: wgpu::PrimitiveTopology::PointList,
                cull_mode: None,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            },
        );

        let sphere = SphereMesh::new(32, 64);
        let sphere_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&sphere.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sphere_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Index Buffer"),
            contents: bytemuck::cast_slice(&sphere.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = 16;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        let bloom = Bloom::new(
            &device,
            config.format,
            config.width,
            config.height,
            BloomConfig::default(),
        );

        Ok(Self {
            surface,
            device,
            queue,
            size: winit::dpi::PhysicalSize::new(config.width, config.height),
            config,
            depth_texture,
            depth_view,
            globals_buffer,
            globals_bind_group,
            body_pipeline,
            glow_pipeline,
            line_pipeline,
            point_pipeline,
            sphere_vertex_buffer,
            sphere_index_buffer,
            num_sphere_indices: sphere.indices.len() as u32,
            instance_buffer,
            instance_capacity,
            orbit_buffer: None,
            num_orbit_vertices: 0,
            star_buffer: None,
            num_stars: 0,
            lighting,
            bloom,
            camera,
            egui_state,
            egui_renderer,
            ui: Ui::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Handle window event
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Handle window resize.
    ///
    /// Reconfigures the surface, depth buffer and HDR targets for the new size.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;

            self.bloom
                .resize(&self.device, &self.queue, new_size.width, new_size.height);
        }
    }

    /// Upload orbit rings and stars. Called once after scene construction.
    pub fn upload_scene(&mut self, scene: &SolarScene, stars: &Starfield) {
        let rings: Vec<ColorVertex> = scene
            .orbit_distances()
            .flat_map(|d| orbit_ring(d, ORBIT_SEGMENTS, ORBIT_COLOR))
            .collect();

        self.orbit_buffer = (!rings.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Orbit Buffer"),
                    contents: bytemuck::cast_slice(&rings),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
        self.num_orbit_vertices = rings.len() as u32;

        self.star_buffer = (!stars.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Star Buffer"),
                    contents: bytemuck::cast_slice(&stars.points),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
        self.num_stars = stars.len() as u32;

        log::info!(
            "Uploaded {} orbit vertices and {} stars",
            self.num_orbit_vertices,
            self.num_stars
        );
    }

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if surface acquisition fails.
    pub fn render(
        &mut self,
        window: &Window,
        scene: &SolarScene,
        catalog: &Catalog,
        director: &CameraDirector,
    ) -> Result<(), wgpu::SurfaceError> {
        // Update FPS counter
        self.frame_count += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.last_frame = now;
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.size.width as f32 / self.size.height as f32;
        let globals = Globals::new(&self.camera, aspect, &self.lighting);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[globals]));

        let (instances, body_count) = build_instances(scene);
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        let instance_count = instances.len() as u32;

        // Begin egui frame
        let raw_input = self.egui_state.take_egui_input(window);
        let egui_ctx = self.egui_state.egui_ctx().clone();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            self.ui.render(ctx, catalog, director, self.fps);
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        // Scene into the HDR target
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.bloom.hdr_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            if let Some(star_buffer) = &self.star_buffer {
                render_pass.set_pipeline(&self.point_pipeline);
                render_pass.set_vertex_buffer(0, star_buffer.slice(..));
                render_pass.draw(0..self.num_stars, 0..1);
            }

            if let Some(orbit_buffer) = &self.orbit_buffer {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, orbit_buffer.slice(..));
                render_pass.draw(0..self.num_orbit_vertices, 0..1);
            }

            render_pass.set_vertex_buffer(0, self.sphere_vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.set_index_buffer(
                self.sphere_index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );

            render_pass.set_pipeline(&self.body_pipeline);
            render_pass.draw_indexed(0..self.num_sphere_indices, 0, 0..body_count);

            // Transparent shells last
            if instance_count > body_count {
                render_pass.set_pipeline(&self.glow_pipeline);
                render_pass.draw_indexed(0..self.num_sphere_indices, 0, body_count..instance_count);
            }
        }

        self.bloom.run(&mut encoder);

        // Tone-mapped composite and UI into the swapchain
        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Convert to 'static lifetime for egui compatibility
            let mut render_pass = render_pass.forget_lifetime();
            self.bloom.composite(&mut render_pass);

            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
