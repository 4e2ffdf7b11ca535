//! GPU state: surface, pipelines, mesh buffers and frame submission.

#[cfg(feature = "egui")]
pub mod egui_integration;
pub mod texture;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::mesh::{IcoSphere, Vertex};
use crate::shader::{generate_render_shader, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::textures::NoiseTexture;
use crate::uniforms::ShadingUniforms;
#[cfg(feature = "egui")]
use egui_integration::{EguiFrameOutput, EguiIntegration};
use texture::GpuNoiseTexture;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Faces culled by each fill pass, in draw order. Inner faces go down first
/// so the translucent outer surface always blends over them.
pub(crate) const FILL_PASS_CULLING: [wgpu::Face; 2] = [wgpu::Face::Front, wgpu::Face::Back];

/// Vertex and index buffers of the current mesh.
struct MeshBuffers {
    vertices: wgpu::Buffer,
    triangles: wgpu::Buffer,
    triangle_index_count: u32,
    edges: wgpu::Buffer,
    edge_index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, mesh: &IcoSphere) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let triangles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Triangle Indices"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edges = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Edge Indices"),
            contents: bytemuck::cast_slice(mesh.edge_indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertices,
            triangles,
            triangle_index_count: mesh.indices().len() as u32,
            edges,
            edge_index_count: mesh.edge_indices().len() as u32,
        }
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// One pipeline per entry of [`FILL_PASS_CULLING`].
    fill_pipelines: [wgpu::RenderPipeline; 2],
    wireframe_pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffers,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _noise_texture: GpuNoiseTexture,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        mesh: &IcoSphere,
        noise: &NoiseTexture,
        clear_color: [f64; 4],
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // The fragment shader gamma-corrects itself, so prefer a linear format.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shading Uniform Buffer"),
            size: std::mem::size_of::<ShadingUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let noise_texture = GpuNoiseTexture::upload(&device, &queue, noise);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shading Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shading Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&noise_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&noise_texture.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Iridescent Shader"),
            source: wgpu::ShaderSource::Wgsl(generate_render_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let fill_pipelines = FILL_PASS_CULLING.map(|culled| {
            create_pipeline(
                &device,
                &pipeline_layout,
                &shader,
                config.format,
                wgpu::PrimitiveTopology::TriangleList,
                Some(culled),
                match culled {
                    wgpu::Face::Front => "Fill Pipeline (inner faces)",
                    wgpu::Face::Back => "Fill Pipeline (outer faces)",
                },
            )
        });
        let wireframe_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineList,
            None,
            "Wireframe Pipeline",
        );

        let mesh = MeshBuffers::new(&device, mesh);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            fill_pipelines,
            wireframe_pipeline,
            mesh,
            uniform_buffer,
            bind_group,
            _noise_texture: noise_texture,
            depth_texture,
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: clear_color[3],
            },
        })
    }

    #[cfg(feature = "egui")]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.resize(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
    }

    /// Swap in new geometry. The old buffers are dropped once no submitted
    /// frame uses them.
    pub fn replace_mesh(&mut self, mesh: &IcoSphere) {
        self.mesh = MeshBuffers::new(&self.device, mesh);
    }

    pub fn render(
        &mut self,
        uniforms: &ShadingUniforms,
        wireframe: bool,
        #[cfg(feature = "egui")] ui: Option<(&mut EguiIntegration, &EguiFrameOutput)>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(&self.uniform_buffer, 0, uniforms.as_bytes());

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Surface Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.mesh.vertices.slice(..));

            if wireframe {
                render_pass.set_pipeline(&self.wireframe_pipeline);
                render_pass.set_index_buffer(self.mesh.edges.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.mesh.edge_index_count, 0, 0..1);
            } else {
                render_pass.set_index_buffer(self.mesh.triangles.slice(..), wgpu::IndexFormat::Uint32);
                for pipeline in &self.fill_pipelines {
                    render_pass.set_pipeline(pipeline);
                    render_pass.draw_indexed(0..self.mesh.triangle_index_count, 0, 0..1);
                }
            }
        }

        #[cfg(feature = "egui")]
        let ui = ui.map(|(egui, frame)| {
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: frame.pixels_per_point,
            };
            egui.prepare(&self.device, &self.queue, &mut encoder, frame, &screen);
            {
                let mut ui_pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Egui Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    })
                    .forget_lifetime();
                egui.render(&mut ui_pass, frame, &screen);
            }
            (egui, frame)
        });

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "egui")]
        if let Some((egui, frame)) = ui {
            egui.cleanup(frame);
        }

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_inner_faces_draw_before_outer_faces() {
        assert_eq!(FILL_PASS_CULLING[0], wgpu::Face::Front);
        assert_eq!(FILL_PASS_CULLING[1], wgpu::Face::Back);
    }

    #[test]
    fn test_front_culling_keeps_only_the_far_side() {
        // With `FrontFace::Ccw`, a triangle is front facing when it projects
        // counter-clockwise. Near-side triangles must do so, far-side ones not.
        let camera = OrbitCamera::default();
        let view_proj = camera.view_proj(16.0 / 9.0);
        let eye = camera.position();
        let mesh = IcoSphere::new(2.5, 4);
        let v = mesh.vertices();

        let mut checked = 0;
        for tri in mesh.indices().chunks_exact(3) {
            let world = [0, 1, 2].map(|i| Vec3::from(v[tri[i] as usize].position));
            let centre = (world[0] + world[1] + world[2]) / 3.0;
            let normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize();
            let facing = normal.dot((eye - centre).normalize());
            if facing.abs() < 0.1 {
                continue;
            }

            let ndc = world.map(|p| {
                let clip = view_proj * p.extend(1.0);
                Vec2::new(clip.x / clip.w, clip.y / clip.w)
            });
            let signed_area = (ndc[1] - ndc[0]).perp_dot(ndc[2] - ndc[0]);

            assert_eq!(signed_area > 0.0, facing > 0.0);
            checked += 1;
        }
        assert!(checked > mesh.triangle_count() / 2);
    }
}
