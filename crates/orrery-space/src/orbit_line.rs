//! Faint orbit rings, one per planet, merged into a single mesh in the
//! ecliptic (XZ) plane.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use orrery_render::{
    CameraBinding, DepthMode, MeshBuffer, MeshVertex, PipelineDesc, create_pipeline,
    create_shader, create_uniform_buffer, uniform_entry,
};

use crate::geometry::{Mesh, ring_annulus};
use crate::shader_source;

/// Half the width of each orbit ring.
pub const ORBIT_LINE_HALF_WIDTH: f32 = 0.05;
const ORBIT_LINE_SEGMENTS: u32 = 128;
const ORBIT_LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.05];

/// One flat ring per radius, laid into the XZ plane and merged.
pub fn orbit_line_mesh(radii: &[f32]) -> Mesh {
    let to_ecliptic = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
    let mut merged = Mesh::default();
    for &radius in radii {
        let ring = ring_annulus(
            (radius - ORBIT_LINE_HALF_WIDTH).max(0.0),
            radius + ORBIT_LINE_HALF_WIDTH,
            ORBIT_LINE_SEGMENTS,
        );
        let base = merged.vertices.len() as u32;
        merged.vertices.extend(ring.vertices.iter().map(|v| {
            let position = to_ecliptic.transform_point3(Vec3::from_array(v.position));
            let normal = to_ecliptic.transform_vector3(Vec3::from_array(v.normal));
            MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: v.uv,
            }
        }));
        merged.indices.extend(ring.indices.iter().map(|i| i + base));
    }
    merged
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct LineUniform {
    color: [f32; 4],
}

const ORBIT_LINE_SHADER_SOURCE: &str = r#"
struct Line {
    color: vec4<f32>,
};

@group(1) @binding(0) var<uniform> line: Line;

@vertex
fn vs_line(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return camera.view_proj * vec4<f32>(position, 1.0);
}

@fragment
fn fs_line() -> @location(0) vec4<f32> {
    return vec4<f32>(srgb_to_linear(line.color.rgb), line.color.a);
}
"#;

pub struct OrbitLineRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

impl OrbitLineRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera: &CameraBinding,
        radii: &[f32],
    ) -> Self {
        let shader = create_shader(
            device,
            "orbit-line-shader",
            &shader_source(ORBIT_LINE_SHADER_SOURCE),
        );
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbit-line-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::FRAGMENT,
                std::mem::size_of::<LineUniform>() as u64,
            )],
        });
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "orbit-line-pipeline",
                shader: &shader,
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                buffers: &[MeshVertex::layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                cull_mode: None,
                depth: DepthMode::ReadOnly,
            },
        );

        let lines = orbit_line_mesh(radii);
        let mesh = MeshBuffer::new(device, "orbit-lines", &lines.vertices, &lines.indices);
        let uniform_buffer = create_uniform_buffer(
            device,
            "orbit-line-uniform",
            &LineUniform {
                color: ORBIT_LINE_COLOR,
            },
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbit-line-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!("Orbit lines initialized: {} rings", radii.len());

        Self {
            pipeline,
            mesh,
            bind_group,
            visible: false,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if !self.visible {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(pass, 1);
    }
}
