use std::sync::Arc;

use bytemuck::bytes_of;
use log::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use super::gpu_mesh::GpuMesh;
use super::gpu_texture::GpuTexture;
use super::resources::ResourceTable;
use super::shader::{self, LIGHTING_SHADER, LIGHT_MARKER_SHADER};
use crate::app::InitError;
use crate::config::RuntimeConfig;
use crate::frame::FramePlan;
use crate::scene::{MeshKey, Scene, TextureKey};
use crate::texture::TextureImage;
use crate::uniforms::{GlobalUniforms, ObjectUniforms};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// wgpu renderer for the countertop scene.
///
/// Owns the device, the surface and every GPU resource. Meshes and textures
/// live in keyed tables and are uploaded once; per-instance uniform buffers
/// and material bind groups are created up front and rewritten each frame.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    lighting_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    instance_slots: Vec<ObjectSlot>,
    marker_slots: Vec<ObjectSlot>,
    materials: Vec<Option<wgpu::BindGroup>>,
    meshes: ResourceTable<MeshKey, GpuMesh>,
    textures: ResourceTable<TextureKey, GpuTexture>,
}

impl Renderer {
    /// Initializes the GPU and uploads every resource `scene` refers to.
    pub async fn new(
        window: Arc<Window>,
        scene: &Scene,
        options: &RuntimeConfig,
    ) -> Result<Self, InitError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: Default::default(),
            backend_options: Default::default(),
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let adapter_info = adapter.get_info();
        info!(
            "using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("countertop-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
        };
        let (device, queue) = adapter.request_device(&device_descriptor).await?;

        // Shader output is written as-is, so prefer a linear surface format.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| !format.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(InitError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let global_layout = uniform_layout(
            &device,
            "global-bind-layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<GlobalUniforms>(),
        );
        let object_layout = uniform_layout(
            &device,
            "object-bind-layout",
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<ObjectUniforms>(),
        );
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-bind-layout"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let lighting_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lighting-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let marker_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let lighting_pipeline = build_lighting_pipeline(
            &device,
            &lighting_layout,
            surface_format,
            options.shader.as_deref(),
        );
        let marker_module = shader::builtin_module(&device, "marker-shader", LIGHT_MARKER_SHADER);
        let marker_pipeline = create_pipeline(
            &device,
            "marker-pipeline",
            &marker_layout,
            &marker_module,
            surface_format,
        );

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let mut meshes = ResourceTable::new("meshes");
        let mut required_meshes: Vec<MeshKey> = scene.instances.iter().map(|i| i.mesh).collect();
        if options.show_lights {
            required_meshes.push(MeshKey::UnitCube);
        }
        for key in required_meshes {
            if meshes.contains(key) {
                continue;
            }
            let data = key.build().map_err(|source| InitError::Mesh {
                mesh: key.label(),
                source,
            })?;
            meshes.insert(key, GpuMesh::upload(&device, &data, key.label()));
        }

        let mut textures = ResourceTable::new("textures");
        let mut materials = Vec::with_capacity(scene.len());
        for instance in &scene.instances {
            for key in [instance.diffuse, instance.specular] {
                textures.get_or_insert_with(key, || {
                    let image = TextureImage::load_or_placeholder(&key.path_in(&options.assets));
                    GpuTexture::upload(&device, &queue, &image, key.file_name())
                });
            }
            let (Some(diffuse), Some(specular)) =
                (textures.get(instance.diffuse), textures.get(instance.specular))
            else {
                materials.push(None);
                continue;
            };
            materials.push(Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{}-material", instance.name)),
                layout: &material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&diffuse.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&specular.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&specular.sampler),
                    },
                ],
            })));
        }

        let instance_slots = (0..scene.len())
            .map(|_| ObjectSlot::create(&device, &object_layout, "instance"))
            .collect();
        let marker_slots = if options.show_lights {
            (0..crate::lighting::POINT_LIGHT_COUNT)
                .map(|_| ObjectSlot::create(&device, &object_layout, "light-marker"))
                .collect()
        } else {
            Vec::new()
        };

        info!(
            "uploaded {} meshes and {} textures for {} instances",
            meshes.len(),
            textures.len(),
            scene.len()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            lighting_pipeline,
            marker_pipeline,
            global_buffer,
            global_bind_group,
            instance_slots,
            marker_slots,
            materials,
            meshes,
            textures,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Resizes the swap chain and depth buffer to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Reconfigures the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.resize(size);
    }

    /// Uploads the plan's uniforms and draws it.
    pub fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&plan.globals));
        for draw in &plan.draws {
            if let Some(slot) = self.instance_slots.get(draw.instance) {
                slot.write(&self.queue, draw.model);
            }
        }
        for (slot, model) in self.marker_slots.iter().zip(&plan.light_markers) {
            slot.write(&self.queue, *model);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("countertop-encoder"),
            });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.lighting_pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);
        for draw in &plan.draws {
            let (Some(slot), Some(material), Some(mesh)) = (
                self.instance_slots.get(draw.instance),
                self.materials.get(draw.instance).and_then(Option::as_ref),
                self.meshes.get(draw.mesh),
            ) else {
                warn!("skipping draw for instance {}", draw.instance);
                continue;
            };
            pass.set_bind_group(1, &slot.bind_group, &[]);
            pass.set_bind_group(2, material, &[]);
            mesh.draw(&mut pass);
        }

        if !plan.light_markers.is_empty() {
            if let Some(cube) = self.meshes.get(MeshKey::UnitCube) {
                pass.set_pipeline(&self.marker_pipeline);
                pass.set_bind_group(0, &self.global_bind_group, &[]);
                for slot in self.marker_slots.iter().take(plan.light_markers.len()) {
                    pass.set_bind_group(1, &slot.bind_group, &[]);
                    cube.draw(&mut pass);
                }
            }
        }

        drop(pass);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Releases meshes and textures and reports the resource balance.
    pub fn shutdown(&mut self) {
        self.materials.clear();
        self.instance_slots.clear();
        self.marker_slots.clear();
        self.meshes.release_all();
        self.textures.release_all();
        info!(
            "{}: {} created, {} released; {}: {} created, {} released",
            self.meshes.label(),
            self.meshes.created(),
            self.meshes.released(),
            self.textures.label(),
            self.textures.created(),
            self.textures.released()
        );
    }
}

/// One object uniform buffer and its bind group.
struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectSlot {
    fn create(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-uniform")),
            size: std::mem::size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, model: glam::Mat4) {
        queue.write_buffer(&self.buffer, 0, bytes_of(&ObjectUniforms::new(model)));
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size as u64),
            },
            count: None,
        }],
    })
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

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Builds the lighting pipeline, retrying with the built-in program when an
/// override shader does not fit the pipeline layout.
fn build_lighting_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    override_path: Option<&std::path::Path>,
) -> wgpu::RenderPipeline {
    if override_path.is_some() {
        let module = shader::lighting_module(device, override_path);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = create_pipeline(device, "lighting-pipeline", layout, &module, format);
        match pollster::block_on(device.pop_error_scope()) {
            None => return pipeline,
            Some(err) => error!("lighting shader rejected by pipeline: {err}"),
        }
    }
    let module = shader::builtin_module(device, "lighting-shader", LIGHTING_SHADER);
    create_pipeline(device, "lighting-pipeline", layout, &module, format)
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GpuMesh::layout()],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}
