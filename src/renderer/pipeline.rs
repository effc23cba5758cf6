//! WebGPU render pipeline setup
//!
//! All unit meshes live in one vertex buffer. Each frame the scene's draw
//! commands are bucketed by mesh into instance batches and drawn with a
//! lit triangle pipeline (solids) or a flat line pipeline (wireframes).

use std::ops::Range;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::mesh;
use super::scene::{DrawCommand, Paint, Primitive, Scene};
use super::vertex::{CameraUniform, InstanceRaw, MeshVertex, srgb_to_linear};
use crate::error::StartupError;
use crate::settings::QualityPreset;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// World-space direction toward the light
const LIGHT_DIR: Vec3 = Vec3::new(0.3, -1.0, 0.6);

/// Which unit mesh an instance is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Cube,
    Sphere,
    SphereWire,
    Cylinder,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Cube,
        MeshKind::Sphere,
        MeshKind::SphereWire,
        MeshKind::Cylinder,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn is_wire(self) -> bool {
        matches!(self, MeshKind::SphereWire)
    }
}

/// Mesh choice, model matrix and colour for one draw command
///
/// Only spheres have a wireframe mesh; wire paint on other primitives is
/// drawn solid.
pub fn instance_for(command: &DrawCommand, linear_target: bool) -> (MeshKind, InstanceRaw) {
    let (color, wire) = match command.paint {
        Paint::Fill(c) => (c, false),
        Paint::Wire(c) => (c, true),
    };
    let (kind, scale) = match command.primitive {
        Primitive::Box { size } => (MeshKind::Cube, size),
        Primitive::Sphere { radius } if wire => (MeshKind::SphereWire, Vec3::splat(radius)),
        Primitive::Sphere { radius } => (MeshKind::Sphere, Vec3::splat(radius)),
        Primitive::Cylinder { radius, height } => {
            (MeshKind::Cylinder, Vec3::new(radius, height, radius))
        }
    };
    let model = Mat4::from_scale_rotation_translation(scale, command.rotation, command.translation);
    let color = if linear_target {
        srgb_to_linear(color)
    } else {
        color
    };
    (kind, InstanceRaw::new(model, color))
}

/// Bucket a scene's commands by mesh, preserving order within each bucket
pub fn batch_instances(scene: &Scene, linear_target: bool) -> [Vec<InstanceRaw>; 4] {
    let mut batches: [Vec<InstanceRaw>; 4] = Default::default();
    for command in &scene.commands {
        let (kind, instance) = instance_for(command, linear_target);
        batches[kind.index()].push(instance);
    }
    batches
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
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

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    fill_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    mesh_buffer: wgpu::Buffer,
    /// Vertex range of each `MeshKind` within `mesh_buffer`
    mesh_ranges: [Range<u32>; 4],
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        quality: QualityPreset,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("road-rush-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| StartupError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| StartupError::Surface("no supported surface format".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                light_dir: LIGHT_DIR.normalize().extend(0.0).to_array(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str, fragment: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::desc(), InstanceRaw::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
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
                multiview_mask: None,
                cache: None,
            })
        };
        let fill_pipeline = make_pipeline(
            "fill_pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let wire_pipeline =
            make_pipeline("wire_pipeline", "fs_flat", wgpu::PrimitiveTopology::LineList);

        // Mesh detail is fixed for the session
        let mut vertices: Vec<MeshVertex> = Vec::new();
        let mut mesh_ranges: [Range<u32>; 4] = Default::default();
        for kind in MeshKind::ALL {
            let unit = match kind {
                MeshKind::Cube => mesh::cube(),
                MeshKind::Sphere => mesh::sphere(quality.sphere_segments()),
                MeshKind::SphereWire => mesh::sphere_wireframe(quality.sphere_segments()),
                MeshKind::Cylinder => mesh::cylinder(quality.cylinder_segments()),
            };
            let start = vertices.len() as u32;
            vertices.extend(unit);
            mesh_ranges[kind.index()] = start..vertices.len() as u32;
        }
        log::info!(
            "Mesh buffer: {} vertices at {} quality",
            vertices.len(),
            quality.as_str()
        );

        let mesh_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_view = create_depth_view(&device, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            fill_pipeline,
            wire_pipeline,
            camera_buffer,
            camera_bind_group,
            depth_view,
            mesh_buffer,
            mesh_ranges,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_width, new_height);
        }
    }

    /// Upload this frame's instances and render the scene
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let linear_target = self.config.format.is_srgb();

        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: scene.camera.view_proj().to_cols_array_2d(),
                light_dir: LIGHT_DIR.normalize().extend(0.0).to_array(),
            }),
        );

        let batches = batch_instances(scene, linear_target);
        // Recreated per frame (instance counts change every tick)
        let instance_buffers: Vec<Option<(MeshKind, wgpu::Buffer, u32)>> = MeshKind::ALL
            .iter()
            .map(|&kind| {
                let instances = &batches[kind.index()];
                (!instances.is_empty()).then(|| {
                    let buffer =
                        self.device
                            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("instance_buffer"),
                                contents: bytemuck::cast_slice(instances),
                                usage: wgpu::BufferUsages::VERTEX,
                            });
                    (kind, buffer, instances.len() as u32)
                })
            })
            .collect();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let background = if linear_target {
            srgb_to_linear(scene.background)
        } else {
            scene.background
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background[0] as f64,
                            g: background[1] as f64,
                            b: background[2] as f64,
                            a: background[3] as f64,
                        }),
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
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.mesh_buffer.slice(..));
            for (kind, buffer, count) in instance_buffers.iter().flatten() {
                let pipeline = if kind.is_wire() {
                    &self.wire_pipeline
                } else {
                    &self.fill_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(1, buffer.slice(..));
                render_pass.draw(self.mesh_ranges[kind.index()].clone(), 0..*count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
