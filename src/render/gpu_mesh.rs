use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::mesh::{MeshData, Vertex};

const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Static vertex (and index) buffers for one [`MeshData`].
pub struct GpuMesh {
    vertex: wgpu::Buffer,
    index: Option<wgpu::Buffer>,
    sections: Vec<Range<u32>>,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = mesh.indices().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex,
            index,
            sections: mesh
                .sections()
                .iter()
                .map(|section| section.range.clone())
                .collect(),
        }
    }

    /// Layout shared by every mesh: position, normal, uv.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Binds the buffers and issues one draw per section.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.sections.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex.slice(..));
        match &self.index {
            Some(index) => {
                pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                for range in &self.sections {
                    pass.draw_indexed(range.clone(), 0, 0..1);
                }
            }
            None => {
                for range in &self.sections {
                    pass.draw(range.clone(), 0..1);
                }
            }
        }
    }
}
