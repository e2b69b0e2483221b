//! Vertex/index buffers and uniform buffer helpers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertex with position, normal, and equirectangular UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Per-vertex layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        Self::layout_with_step(wgpu::VertexStepMode::Vertex)
    }

    /// Per-instance layout, for drawing one quad per mesh vertex.
    pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        Self::layout_with_step(wgpu::VertexStepMode::Instance)
    }

    fn layout_with_step(step_mode: wgpu::VertexStepMode) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// An indexed mesh uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[MeshVertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
        }
    }

    /// Bind vertex and index buffers to a render pass.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Bind and draw `instances` copies of the whole mesh.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, instances: u32) {
        self.bind(pass);
        pass.draw_indexed(0..self.index_count, 0, 0..instances);
    }
}

/// Create a `UNIFORM | COPY_DST` buffer initialized with `value`.
pub fn create_uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_stride() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(MeshVertex::layout().array_stride, 32);
    }

    #[test]
    fn test_instance_layout_steps_per_instance() {
        assert_eq!(
            MeshVertex::instance_layout().step_mode,
            wgpu::VertexStepMode::Instance
        );
        assert_eq!(MeshVertex::layout().step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn test_vertex_is_pod() {
        let v = MeshVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.5, 0.25],
        };
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 32);
        let back: &MeshVertex = bytemuck::from_bytes(bytes);
        assert_eq!(*back, v);
    }
}
