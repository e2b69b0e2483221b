//! The asteroid belt between Mars and Jupiter: seeded instanced
//! dodecahedra in a flat-colored torus that turns slowly as a whole.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use orrery_render::{
    CameraBinding, DepthMode, MeshBuffer, MeshVertex, PipelineDesc, create_pipeline,
    create_shader, create_uniform_buffer, uniform_entry,
};

use crate::geometry::dodecahedron;
use crate::shader_source;

pub const BELT_INNER_RADIUS: f32 = 18.0;
pub const BELT_OUTER_RADIUS: f32 = 22.0;
/// Total vertical spread, centered on the ecliptic.
pub const BELT_THICKNESS: f32 = 1.5;
const ROCK_COLOR: [f32; 4] = [176.0 / 255.0, 160.0 / 255.0, 144.0 / 255.0, 1.0];

/// Placement of one rock in belt space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidInstance {
    pub position: Vec3,
    /// Rotation about X, then Y, in radians.
    pub rotation: [f32; 2],
    pub scale: f32,
}

impl AsteroidInstance {
    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation[0])
            * Mat4::from_rotation_y(self.rotation[1])
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Deterministic belt layout from a seed.
pub struct AsteroidField {
    seed: u64,
    count: u32,
}

impl AsteroidField {
    pub fn new(seed: u64, count: u32) -> Self {
        Self { seed, count }
    }

    pub fn generate(&self) -> Vec<AsteroidInstance> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.count)
            .map(|_| {
                let radius = rng.random_range(BELT_INNER_RADIUS..BELT_OUTER_RADIUS);
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let y = (rng.random::<f32>() - 0.5) * BELT_THICKNESS;
                let rotation = [
                    rng.random::<f32>() * std::f32::consts::PI,
                    rng.random::<f32>() * std::f32::consts::PI,
                ];
                let scale = rng.random::<f32>() * 0.15 + 0.05;
                AsteroidInstance {
                    position: Vec3::new(radius * theta.cos(), y, radius * theta.sin()),
                    rotation,
                    scale,
                }
            })
            .collect()
    }
}

/// Per-instance model matrix, bound at vertex locations 3..=6.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct BeltUniform {
    rotation: [[f32; 4]; 4],
    color: [f32; 4],
}

const ASTEROID_SHADER_SOURCE: &str = r#"
struct Belt {
    rotation: mat4x4<f32>,
    color: vec4<f32>,
};

@group(1) @binding(0) var<uniform> belt: Belt;

struct RockInput {
    @location(0) position: vec3<f32>,
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

@vertex
fn vs_rock(in: RockInput) -> @builtin(position) vec4<f32> {
    let model = mat4x4<f32>(in.model_0, in.model_1, in.model_2, in.model_3);
    return camera.view_proj * belt.rotation * model * vec4<f32>(in.position, 1.0);
}

@fragment
fn fs_rock() -> @location(0) vec4<f32> {
    return vec4<f32>(srgb_to_linear(belt.color.rgb), 1.0);
}
"#;

/// Draws the whole belt in one instanced call.
pub struct AsteroidBelt {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl AsteroidBelt {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera: &CameraBinding,
        field: &AsteroidField,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = create_shader(
            device,
            "asteroid-shader",
            &shader_source(ASTEROID_SHADER_SOURCE),
        );
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("asteroid-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<BeltUniform>() as u64,
            )],
        });
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "asteroid-pipeline",
                shader: &shader,
                vs_entry: "vs_rock",
                fs_entry: "fs_rock",
                buffers: &[MeshVertex::layout(), InstanceRaw::layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth: DepthMode::Opaque,
            },
        );

        let rock = dodecahedron();
        let mesh = MeshBuffer::new(device, "asteroid-rock", &rock.vertices, &rock.indices);

        let instances: Vec<InstanceRaw> = field
            .generate()
            .iter()
            .map(|a| InstanceRaw {
                model: a.model().to_cols_array_2d(),
            })
            .collect();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("asteroid-instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = create_uniform_buffer(
            device,
            "asteroid-uniform",
            &BeltUniform {
                rotation: Mat4::IDENTITY.to_cols_array_2d(),
                color: ROCK_COLOR,
            },
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("asteroid-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!("Asteroid belt initialized: {} rocks", instances.len());

        Self {
            pipeline,
            mesh,
            instance_buffer,
            instance_count: instances.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Turn the belt to `rotation` radians about the Y axis.
    pub fn update(&self, queue: &wgpu::Queue, rotation: f32) {
        let uniform = BeltUniform {
            rotation: Mat4::from_rotation_y(rotation).to_cols_array_2d(),
            color: ROCK_COLOR,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        self.mesh.draw(pass, self.instance_count);
    }
}
