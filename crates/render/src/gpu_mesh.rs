use wgpu::util::DeviceExt;

use crate::mesh::MeshBuffers;

/// GPU-side copy of a tessellated shape.
pub struct GpuMesh {
    /// Vertex buffer on GPU.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer on GPU.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a mesh to the GPU.
    pub fn from_mesh_buffers(device: &wgpu::Device, mesh: &MeshBuffers, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}
