//! GPU rendering pipeline using wgpu.

use raypick_camera::OrbitCamera;
use raypick_scene::{Color3, Mesh, Scene, Shading, Side};
use wgpu::util::DeviceExt;

use crate::context::RenderContext;
use crate::mesh::MeshVertex;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame data shared by every draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    /// View-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space
    pub camera_pos: [f32; 4],
    /// Summed ambient light
    pub ambient_light: [f32; 4],
    /// Unit vector towards the key light
    pub light_direction: [f32; 4],
    /// Key light color (black when the scene has none)
    pub light_color: [f32; 4],
}

impl GlobalsUniform {
    /// Gather camera and lighting state.
    pub fn new(scene: &Scene, camera: &OrbitCamera) -> Self {
        let position = camera.position();
        let (direction, color) = scene
            .key_light()
            .unwrap_or((glam::Vec3::Y, Color3::BLACK));

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: position.extend(1.0).to_array(),
            ambient_light: scene.ambient_light().to_array4(1.0),
            light_direction: direction.extend(0.0).to_array(),
            light_color: color.to_array4(1.0),
        }
    }
}

/// Per-mesh transform and material.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    /// Model matrix
    pub model: [[f32; 4]; 4],
    /// Ambient response, or the flat color for unlit meshes
    pub ambient: [f32; 4],
    /// Diffuse response
    pub diffuse: [f32; 4],
    /// Specular color; w holds the shininess exponent
    pub specular: [f32; 4],
    /// x: 1 when unlit
    pub flags: [u32; 4],
}

impl MeshUniform {
    /// Pack a mesh's transform and material.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let model = mesh.transform.matrix().to_cols_array_2d();
        match mesh.material.shading {
            Shading::Unlit { color } => Self {
                model,
                ambient: color.to_array4(1.0),
                diffuse: [0.0; 4],
                specular: [0.0; 4],
                flags: [1, 0, 0, 0],
            },
            Shading::Gouraud {
                ambient,
                diffuse,
                specular,
                shininess,
            } => Self {
                model,
                ambient: ambient.to_array4(1.0),
                diffuse: diffuse.to_array4(1.0),
                specular: specular.to_array4(shininess),
                flags: [0; 4],
            },
        }
    }
}

/// Mesh rendering pipeline, one variant per [`Side`].
pub struct MeshPipeline {
    front_pipeline: wgpu::RenderPipeline,
    back_pipeline: wgpu::RenderPipeline,
    double_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    mesh_bind_group_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl MeshPipeline {
    /// Create the pipelines and shared resources.
    pub fn new(ctx: &RenderContext) -> Self {
        let device = &ctx.device;

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout = uniform_layout(
            device,
            "Globals Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let mesh_bind_group_layout =
            uniform_layout(device, "Mesh Bind Group Layout", wgpu::ShaderStages::VERTEX);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &mesh_bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, cull_mode: Option<wgpu::Face>| {
            create_mesh_pipeline(
                device,
                &pipeline_layout,
                &shader,
                ctx.config.format,
                label,
                cull_mode,
            )
        };
        let front_pipeline = build("Mesh Pipeline (front)", Some(wgpu::Face::Back));
        let back_pipeline = build("Mesh Pipeline (back)", Some(wgpu::Face::Front));
        let double_pipeline = build("Mesh Pipeline (double)", None);

        let (depth_texture, depth_view) = create_depth_texture(device, ctx.size);

        Self {
            front_pipeline,
            back_pipeline,
            double_pipeline,
            globals_buffer,
            globals_bind_group,
            mesh_bind_group_layout,
            depth_texture,
            depth_view,
        }
    }

    /// Write per-frame globals.
    pub fn update_globals(&self, queue: &wgpu::Queue, globals: &GlobalsUniform) {
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[*globals]));
    }

    /// Create a uniform buffer and bind group for one mesh.
    pub fn create_mesh_binding(
        &self,
        device: &wgpu::Device,
        uniform: &MeshUniform,
        label: &str,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniform Buffer")),
            contents: bytemuck::cast_slice(&[*uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout: &self.mesh_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        (buffer, bind_group)
    }

    /// Resize depth texture.
    pub fn resize(&mut self, device: &wgpu::Device, new_size: (u32, u32)) {
        let (depth_texture, depth_view) = create_depth_texture(device, new_size);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Begin a render pass that clears color and depth.
    pub fn begin_render_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        clear_color: wgpu::Color,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        })
    }

    /// Pipeline variant drawing the given faces.
    pub fn pipeline(&self, side: Side) -> &wgpu::RenderPipeline {
        match side {
            Side::Front => &self.front_pipeline,
            Side::Back => &self.back_pipeline,
            Side::Double => &self.double_pipeline,
        }
    }

    /// Get the globals bind group.
    pub fn globals_bind_group(&self) -> &wgpu::BindGroup {
        &self.globals_bind_group
    }

    /// Size of the current depth attachment.
    pub fn depth_size(&self) -> (u32, u32) {
        (self.depth_texture.width(), self.depth_texture.height())
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    // position
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    // normal
                    wgpu::VertexAttribute {
                        offset: 12,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
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
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    size: (u32, u32),
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raypick_scene::{Light, Material, Shape};

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 64 + 4 * 16);
        assert_eq!(std::mem::size_of::<MeshUniform>(), 64 + 4 * 16);
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn unlit_mesh_sets_flag_and_color() {
        let magenta = Color3::new(1.0, 0.0, 1.0);
        let mesh = Mesh::new("line", Shape::unit_box()).with_material(Material::unlit(magenta));
        let uniform = MeshUniform::from_mesh(&mesh);
        assert_eq!(uniform.flags[0], 1);
        assert_eq!(uniform.ambient, [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn gouraud_mesh_packs_shininess() {
        let mut mesh = Mesh::new("box", Shape::unit_box());
        mesh.transform.translate_x(-2.0);
        let uniform = MeshUniform::from_mesh(&mesh);
        assert_eq!(uniform.flags[0], 0);
        assert_eq!(uniform.specular[3], 30.0);
        // Translation lives in the last column
        assert_eq!(uniform.model[3][0], -2.0);
    }

    #[test]
    fn globals_default_to_no_key_light() {
        let scene = Scene::new();
        let globals = GlobalsUniform::new(&scene, &OrbitCamera::default());
        assert_eq!(globals.light_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(globals.light_direction, [0.0, 1.0, 0.0, 0.0]);
        assert!((globals.camera_pos[2] - 5.0).abs() < 1e-5);
    }

    #[test]
    fn globals_pick_up_scene_lights() {
        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: Color3::new(0.5, 0.5, 0.5),
        });
        scene.add_light(Light::Directional {
            color: Color3::new(0.6, 0.6, 0.6),
            position: Vec3::new(10.0, 0.0, 0.0),
        });
        let globals = GlobalsUniform::new(&scene, &OrbitCamera::default());
        assert_eq!(globals.ambient_light, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(globals.light_direction, [1.0, 0.0, 0.0, 0.0]);
    }
}
