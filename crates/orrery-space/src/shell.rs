//! Solid shells around bodies: the opaque backing spheres that hide the far
//! side of each point cloud, and the back-face additive glows used for the
//! sun's halo and the Martian atmosphere.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use orrery_render::{
    ADDITIVE_BLENDING, CameraBinding, DepthMode, MeshBuffer, MeshVertex, PipelineDesc,
    create_pipeline, create_shader, create_uniform_buffer, uniform_entry,
};
use orrery_sim::body::{OCCLUDER_RADIUS, SUN_CORE_RADIUS};
use orrery_sim::{BodyId, CelestialBody, GlowStyle, SolarSystem};

use crate::geometry::geodesic_sphere;
use crate::shader_source;

const SHELL_DETAIL: u32 = 24;

/// Glow strength for a view-space normal whose Z component is `n_dot_view`.
pub fn glow_intensity(n_dot_view: f32, style: &GlowStyle) -> f32 {
    (style.falloff - n_dot_view).max(0.0).powf(style.power) * style.intensity
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShellUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// falloff, power, intensity, unused
    pub glow: [f32; 4],
}

impl ShellUniform {
    pub fn occluder(color: [f32; 3], model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
            glow: [0.0; 4],
        }
    }

    pub fn glow(style: &GlowStyle, model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [style.color[0], style.color[1], style.color[2], 1.0],
            glow: [style.falloff, style.power, style.intensity, 0.0],
        }
    }
}

pub const SHELL_SHADER_SOURCE: &str = r#"
struct Shell {
    model: mat4x4<f32>,
    color: vec4<f32>,
    glow: vec4<f32>,
};

@group(1) @binding(0) var<uniform> shell: Shell;

struct ShellInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct ShellOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_normal: vec3<f32>,
};

@vertex
fn vs_shell(in: ShellInput) -> ShellOutput {
    var out: ShellOutput;
    let model_view = camera.view * shell.model;
    out.clip_position = camera.proj * model_view * vec4<f32>(in.position, 1.0);
    out.view_normal = (model_view * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_occluder(in: ShellOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(srgb_to_linear(shell.color.rgb), 1.0);
}

@fragment
fn fs_glow(in: ShellOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.view_normal);
    let intensity = pow(max(shell.glow.x - n.z, 0.0), shell.glow.y) * shell.glow.z;
    return vec4<f32>(shell.color.rgb * intensity, intensity);
}
"#;

struct ShellInstance {
    id: BodyId,
    /// Radius in the body's local units.
    radius: f32,
    uniform: ShellUniform,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Owns one shared sphere mesh and two pipelines: opaque occluders and
/// additive glows.
pub struct ShellRenderer {
    occluder_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sphere: MeshBuffer,
    occluders: Vec<ShellInstance>,
    glows: Vec<ShellInstance>,
}

impl ShellRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, camera: &CameraBinding) -> Self {
        let shader = create_shader(device, "shell-shader", &shader_source(SHELL_SHADER_SOURCE));
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shell-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<ShellUniform>() as u64,
            )],
        });
        let buffers = [MeshVertex::layout()];
        let bind_group_layouts = [&camera.layout, &layout];

        let occluder_pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "occluder-pipeline",
                shader: &shader,
                vs_entry: "vs_shell",
                fs_entry: "fs_occluder",
                buffers: &buffers,
                bind_group_layouts: &bind_group_layouts,
                format,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth: DepthMode::Opaque,
            },
        );
        let glow_pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "glow-pipeline",
                shader: &shader,
                vs_entry: "vs_shell",
                fs_entry: "fs_glow",
                buffers: &buffers,
                bind_group_layouts: &bind_group_layouts,
                format,
                blend: Some(ADDITIVE_BLENDING),
                cull_mode: Some(wgpu::Face::Front),
                depth: DepthMode::ReadOnly,
            },
        );

        let mesh = geodesic_sphere(SHELL_DETAIL);
        let sphere = MeshBuffer::new(device, "shell-sphere", &mesh.vertices, &mesh.indices);

        Self {
            occluder_pipeline,
            glow_pipeline,
            layout,
            sphere,
            occluders: Vec::new(),
            glows: Vec::new(),
        }
    }

    fn instance(
        &self,
        device: &wgpu::Device,
        label: &str,
        id: BodyId,
        radius: f32,
        uniform: ShellUniform,
    ) -> ShellInstance {
        let uniform_buffer = create_uniform_buffer(device, label, &uniform);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        ShellInstance {
            id,
            radius,
            uniform,
            uniform_buffer,
            bind_group,
        }
    }

    /// Register the backing sphere and glow of `body`, whichever it has.
    pub fn add_body(&mut self, device: &wgpu::Device, body: &CelestialBody) {
        let name = body.id.key().to_lowercase();
        if let Some(color) = body.surface.and_then(|s| s.occluder) {
            let shell = self.instance(
                device,
                &format!("{name}-occluder"),
                body.id,
                OCCLUDER_RADIUS,
                ShellUniform::occluder(color, Mat4::IDENTITY),
            );
            self.occluders.push(shell);
        }
        if let Some(glow) = body.atmosphere {
            let base = if body.id == BodyId::Sun {
                SUN_CORE_RADIUS
            } else {
                1.0
            };
            let shell = self.instance(
                device,
                &format!("{name}-glow"),
                body.id,
                base * glow.scale,
                ShellUniform::glow(&glow, Mat4::IDENTITY),
            );
            self.glows.push(shell);
        }
        log::debug!(
            "Shells for {}: {} occluders, {} glows",
            body.id,
            self.occluders.len(),
            self.glows.len()
        );
    }

    pub fn update(&mut self, queue: &wgpu::Queue, system: &SolarSystem) {
        for shell in self.occluders.iter_mut().chain(self.glows.iter_mut()) {
            let model = system.body_matrix(shell.id) * Mat4::from_scale(Vec3::splat(shell.radius));
            shell.uniform.model = model.to_cols_array_2d();
            queue.write_buffer(&shell.uniform_buffer, 0, bytemuck::bytes_of(&shell.uniform));
        }
    }

    /// Opaque pass, before the point clouds.
    pub fn render_occluders<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.draw(pass, &self.occluder_pipeline, &self.occluders);
    }

    /// Additive pass, after everything that writes depth.
    pub fn render_glows<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.draw(pass, &self.glow_pipeline, &self.glows);
    }

    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        pipeline: &'a wgpu::RenderPipeline,
        shells: &'a [ShellInstance],
    ) {
        if shells.is_empty() {
            return;
        }
        pass.set_pipeline(pipeline);
        for shell in shells {
            pass.set_bind_group(1, &shell.bind_group, &[]);
            self.sphere.draw(pass, 1);
        }
    }
}
