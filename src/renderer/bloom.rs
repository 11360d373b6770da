//! HDR bloom post-processing.
//!
//! The scene is drawn into an `Rgba16Float` target. [`Bloom::run`] extracts the
//! bright parts into a half-resolution texture and blurs them horizontally,
//! then vertically. [`Bloom::composite`] adds the blurred highlights back onto
//! the scene and tone maps the result into the swapchain.

use wgpu::util::DeviceExt;

use super::BloomConfig;

/// Format of the offscreen scene and bloom textures.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Width of the soft edge above the threshold, in luminance.
const BLOOM_KNEE: f32 = 0.01;

/// Blur tap spacing at `radius = 1.0`, in texels.
const BLUR_SPREAD: f32 = 2.0;

/// Uniform shared by every post pass; each pass reads the fields it needs.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct BloomParams {
    texel_size: [f32; 2],
    direction: [f32; 2],
    threshold: f32,
    knee: f32,
    strength: f32,
    exposure: f32,
}

impl BloomParams {
    fn new(config: &BloomConfig, extent: (u32, u32), direction: [f32; 2]) -> Self {
        Self {
            texel_size: [1.0 / extent.0 as f32, 1.0 / extent.1 as f32],
            direction,
            threshold: config.threshold,
            knee: BLOOM_KNEE,
            strength: config.strength,
            exposure: config.exposure,
        }
    }

    /// Blur step along `axis`, widened by the configured radius.
    fn blur(config: &BloomConfig, extent: (u32, u32), axis: [f32; 2]) -> Self {
        let spacing = 1.0 + config.radius * BLUR_SPREAD;
        Self::new(config, extent, [axis[0] * spacing, axis[1] * spacing])
    }
}

/// Size of the bloom textures for a given scene size.
fn bloom_extent(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

fn create_color_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    label: &str,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn params_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn sampler_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 2,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn create_post_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Draw one fullscreen triangle into `target`.
fn fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

/// Size-dependent textures and the bind groups that read them.
struct BloomTargets {
    _hdr_texture: wgpu::Texture,
    hdr_view: wgpu::TextureView,
    _bright_texture: wgpu::Texture,
    bright_view: wgpu::TextureView,
    _ping_texture: wgpu::Texture,
    ping_view: wgpu::TextureView,
    bright_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
    composite_bind_group: wgpu::BindGroup,
}

/// Per-pass parameter buffers.
struct BloomBuffers {
    bright: wgpu::Buffer,
    blur_h: wgpu::Buffer,
    blur_v: wgpu::Buffer,
    composite: wgpu::Buffer,
}

impl BloomBuffers {
    fn params(config: &BloomConfig, width: u32, height: u32) -> [BloomParams; 4] {
        let full = (width.max(1), height.max(1));
        let half = bloom_extent(width, height);
        [
            BloomParams::new(config, full, [0.0, 0.0]),
            BloomParams::blur(config, half, [1.0, 0.0]),
            BloomParams::blur(config, half, [0.0, 1.0]),
            BloomParams::new(config, full, [0.0, 0.0]),
        ]
    }

    fn new(device: &wgpu::Device, config: &BloomConfig, width: u32, height: u32) -> Self {
        let [bright, blur_h, blur_v, composite] = Self::params(config, width, height);
        let create = |label: &str, params: BloomParams| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        Self {
            bright: create("Bloom Bright Params", bright),
            blur_h: create("Bloom Blur H Params", blur_h),
            blur_v: create("Bloom Blur V Params", blur_v),
            composite: create("Bloom Composite Params", composite),
        }
    }

    fn write(&self, queue: &wgpu::Queue, config: &BloomConfig, width: u32, height: u32) {
        let [bright, blur_h, blur_v, composite] = Self::params(config, width, height);
        queue.write_buffer(&self.bright, 0, bytemuck::bytes_of(&bright));
        queue.write_buffer(&self.blur_h, 0, bytemuck::bytes_of(&blur_h));
        queue.write_buffer(&self.blur_v, 0, bytemuck::bytes_of(&blur_v));
        queue.write_buffer(&self.composite, 0, bytemuck::bytes_of(&composite));
    }
}

/// Bloom pass chain: bright pass, separable blur, tone-mapped composite.
pub struct Bloom {
    config: BloomConfig,
    pass_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    buffers: BloomBuffers,
    targets: BloomTargets,
}

impl Bloom {
    /// Build the pipelines and size-dependent targets.
    ///
    /// `output_format` is the swapchain format the composite writes to.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: BloomConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/post.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Linear Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pass_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Pass BGL"),
            entries: &[params_entry(), texture_entry(1), sampler_entry()],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Composite BGL"),
            entries: &[
                params_entry(),
                texture_entry(1),
                sampler_entry(),
                texture_entry(3),
            ],
        });

        let bright_pipeline = create_post_pipeline(
            device,
            "Bloom Bright Pipeline",
            &pass_layout,
            &shader,
            "fs_bright",
            HDR_FORMAT,
        );
        let blur_pipeline = create_post_pipeline(
            device,
            "Bloom Blur Pipeline",
            &pass_layout,
            &shader,
            "fs_blur",
            HDR_FORMAT,
        );
        let composite_pipeline = create_post_pipeline(
            device,
            "Bloom Composite Pipeline",
            &composite_layout,
            &shader,
            "fs_composite",
            output_format,
        );

        let buffers = BloomBuffers::new(device, &config, width, height);
        let targets = Self::create_targets(
            device,
            &pass_layout,
            &composite_layout,
            &sampler,
            &buffers,
            width,
            height,
        );

        Self {
            config,
            pass_layout,
            composite_layout,
            sampler,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            buffers,
            targets,
        }
    }

    fn create_targets(
        device: &wgpu::Device,
        pass_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        buffers: &BloomBuffers,
        width: u32,
        height: u32,
    ) -> BloomTargets {
        let (half_w, half_h) = bloom_extent(width, height);
        let (hdr_texture, hdr_view) =
            create_color_target(device, width.max(1), height.max(1), "HDR Scene");
        let (bright_texture, bright_view) =
            create_color_target(device, half_w, half_h, "Bloom Bright");
        let (ping_texture, ping_view) = create_color_target(device, half_w, half_h, "Bloom Ping");

        let pass_group = |label: &str, params: &wgpu::Buffer, source: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: pass_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };

        let bright_bind_group = pass_group("Bloom Bright BG", &buffers.bright, &hdr_view);
        // bright -> ping -> bright
        let blur_h_bind_group = pass_group("Bloom Blur H BG", &buffers.blur_h, &bright_view);
        let blur_v_bind_group = pass_group("Bloom Blur V BG", &buffers.blur_v, &ping_view);

        let composite_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bloom Composite BG"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.composite.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&hdr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&bright_view),
                },
            ],
        });

        BloomTargets {
            _hdr_texture: hdr_texture,
            hdr_view,
            _bright_texture: bright_texture,
            bright_view,
            _ping_texture: ping_texture,
            ping_view,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
            composite_bind_group,
        }
    }

    /// Offscreen target the scene pass renders into.
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.targets.hdr_view
    }

    /// Rebuild the targets for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.buffers.write(queue, &self.config, width, height);
        self.targets = Self::create_targets(
            device,
            &self.pass_layout,
            &self.composite_layout,
            &self.sampler,
            &self.buffers,
            width,
            height,
        );
    }

    /// Bright pass and both blur passes. Leaves the blurred highlights in the
    /// bright texture.
    pub fn run(&self, encoder: &mut wgpu::CommandEncoder) {
        let targets = &self.targets;
        fullscreen_pass(
            encoder,
            "Bloom Bright Pass",
            &targets.bright_view,
            &self.bright_pipeline,
            &targets.bright_bind_group,
        );
        fullscreen_pass(
            encoder,
            "Bloom Blur Horizontal",
            &targets.ping_view,
            &self.blur_pipeline,
            &targets.blur_h_bind_group,
        );
        fullscreen_pass(
            encoder,
            "Bloom Blur Vertical",
            &targets.bright_view,
            &self.blur_pipeline,
            &targets.blur_v_bind_group,
        );
    }

    /// Draw the tone-mapped scene plus bloom into the current pass.
    pub fn composite(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &self.targets.composite_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_scene_look() {
        let config = BloomConfig::default();
        assert_eq!(config.strength, 1.5);
        assert_eq!(config.radius, 0.4);
        assert_eq!(config.threshold, 0.85);
        assert_eq!(config.exposure, 0.5);
    }

    #[test]
    fn test_bloom_extent_is_half_and_never_zero() {
        assert_eq!(bloom_extent(1280, 720), (640, 360));
        assert_eq!(bloom_extent(1, 1), (1, 1));
        assert_eq!(bloom_extent(0, 0), (1, 1));
    }

    #[test]
    fn test_pass_chain_params() {
        let config = BloomConfig::default();
        let [bright, blur_h, blur_v, composite] = BloomBuffers::params(&config, 1280, 720);

        // Bright pass samples the full-size scene
        assert_eq!(bright.texel_size, [1.0 / 1280.0, 1.0 / 720.0]);
        assert_eq!(bright.threshold, 0.85);
        assert_eq!(bright.knee, BLOOM_KNEE);

        // Blurs run at half size, one axis each, spread by the radius
        let spacing = 1.0 + 0.4 * BLUR_SPREAD;
        assert_eq!(blur_h.texel_size, [1.0 / 640.0, 1.0 / 360.0]);
        assert_eq!(blur_h.direction, [spacing, 0.0]);
        assert_eq!(blur_v.direction, [0.0, spacing]);

        assert_eq!(composite.strength, 1.5);
        assert_eq!(composite.exposure, 0.5);
    }

    #[test]
    fn test_zero_radius_blurs_adjacent_texels() {
        let config = BloomConfig {
            radius: 0.0,
            ..BloomConfig::default()
        };
        let params = BloomParams::blur(&config, (100, 100), [1.0, 0.0]);
        assert_eq!(params.direction, [1.0, 0.0]);
    }

    #[test]
    fn test_params_match_uniform_layout() {
        // vec2, vec2, then four f32 in the shader struct
        assert_eq!(std::mem::size_of::<BloomParams>(), 32);
    }
}
