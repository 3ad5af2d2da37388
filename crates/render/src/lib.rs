#![warn(missing_docs)]
//! Minimal wgpu renderer for a [`raypick_scene::Scene`].

use std::collections::HashMap;
use std::sync::Arc;

use raypick_camera::OrbitCamera;
use raypick_scene::{NodeId, Scene, Shape};

mod context;
mod gpu_mesh;
mod mesh;
mod pipeline;

pub use context::RenderContext;
pub use gpu_mesh::GpuMesh;
pub use mesh::{tessellate, MeshBuffers, MeshVertex};
pub use pipeline::{GlobalsUniform, MeshPipeline, MeshUniform};

/// Background shown where nothing is drawn.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

/// GPU resources for one scene node.
struct GpuNode {
    shape: Shape,
    mesh: GpuMesh,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Main renderer owning GPU resources.
pub struct Renderer {
    context: RenderContext,
    pipeline: MeshPipeline,
    nodes: HashMap<NodeId, GpuNode>,
}

impl Renderer {
    /// Initialize GPU resources for a window.
    pub async fn new(window: Arc<winit::window::Window>) -> anyhow::Result<Self> {
        let context = RenderContext::new(window).await?;
        let pipeline = MeshPipeline::new(&context);

        Ok(Self {
            context,
            pipeline,
            nodes: HashMap::new(),
        })
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size
    }

    /// Resize the surface and depth buffer.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.context.resize(new_size);
        if self.pipeline.depth_size() != new_size {
            self.pipeline.resize(&self.context.device, new_size);
        }
    }

    /// Reconfigure the surface after it was lost or became outdated.
    pub fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Draw every visible mesh of `scene` and present.
    pub fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.pipeline
            .update_globals(&self.context.queue, &GlobalsUniform::new(scene, camera));
        self.sync_nodes(scene);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = self
                .pipeline
                .begin_render_pass(&mut encoder, &view, CLEAR_COLOR);
            pass.set_bind_group(0, self.pipeline.globals_bind_group(), &[]);

            for (id, mesh) in scene.meshes() {
                if !mesh.visible {
                    continue;
                }
                let Some(node) = self.nodes.get(&id) else {
                    continue;
                };

                pass.set_pipeline(self.pipeline.pipeline(mesh.material.side));
                pass.set_bind_group(1, &node.bind_group, &[]);
                pass.set_vertex_buffer(0, node.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(node.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..node.mesh.index_count, 0, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Upload new or reshaped meshes and refresh every mesh uniform.
    fn sync_nodes(&mut self, scene: &Scene) {
        let device = &self.context.device;
        let queue = &self.context.queue;

        for (id, mesh) in scene.meshes() {
            let uniform = MeshUniform::from_mesh(mesh);
            match self.nodes.get(&id) {
                Some(node) if node.shape == mesh.shape => {
                    queue.write_buffer(&node.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
                _ => {
                    let buffers = tessellate(&mesh.shape);
                    let gpu_mesh = GpuMesh::from_mesh_buffers(device, &buffers, &mesh.name);
                    let (uniform_buffer, bind_group) =
                        self.pipeline.create_mesh_binding(device, &uniform, &mesh.name);
                    tracing::debug!(
                        ?id,
                        name = %mesh.name,
                        triangles = buffers.indices.len() / 3,
                        "uploaded mesh"
                    );
                    self.nodes.insert(
                        id,
                        GpuNode {
                            shape: mesh.shape,
                            mesh: gpu_mesh,
                            uniform_buffer,
                            bind_group,
                        },
                    );
                }
            }
        }
    }
}
