//! Sun core rendering: a geodesic sphere bulged by animated simplex noise,
//! colored along a deep-red to yellow heat ramp with a bright rim.
//!
//! The halo around the core is a glow shell drawn by
//! [`ShellRenderer`](crate::shell::ShellRenderer).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use orrery_render::{
    CameraBinding, DepthMode, MeshBuffer, MeshVertex, PipelineDesc, create_pipeline,
    create_shader, create_uniform_buffer, uniform_entry,
};
use orrery_sim::body::SUN_CORE_RADIUS;
use orrery_sim::{BodyId, SolarSystem};

use crate::geometry::geodesic_sphere;
use crate::shader_source;

const SUN_DETAIL: u32 = 50;
const SUN_DISPLACEMENT: f32 = 0.15;

const COLOR_DEEP: Vec3 = Vec3::new(176.0 / 255.0, 0.0, 0.0);
const COLOR_MID: Vec3 = Vec3::new(1.0, 69.0 / 255.0, 0.0);
const COLOR_HOT: Vec3 = Vec3::new(1.0, 1.0, 0.0);
const RIM_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.5);

/// Heat ramp for a noise value in `[-1, 1]`: deep red, orange, then yellow.
pub fn plasma_color(noise: f32) -> Vec3 {
    let n = ((noise + 1.0) * 0.5).clamp(0.0, 1.0);
    if n < 0.5 {
        COLOR_DEEP.lerp(COLOR_MID, n * 2.0)
    } else {
        COLOR_MID.lerp(COLOR_HOT, (n - 0.5) * 2.0)
    }
}

/// Rim brightening added on top of the heat ramp.
pub fn rim_light(n_dot_view: f32) -> Vec3 {
    RIM_COLOR * (1.0 - n_dot_view.abs()).powi(3) * 0.5
}

/// GPU uniform for the sun core shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SunUniform {
    pub model: [[f32; 4]; 4],
    pub color_deep: [f32; 4],
    pub color_mid: [f32; 4],
    pub color_hot: [f32; 4],
    /// radius, displacement, unused, unused
    pub params: [f32; 4],
}

impl SunUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color_deep: COLOR_DEEP.extend(1.0).to_array(),
            color_mid: COLOR_MID.extend(1.0).to_array(),
            color_hot: COLOR_HOT.extend(1.0).to_array(),
            params: [SUN_CORE_RADIUS, SUN_DISPLACEMENT, 0.0, 0.0],
        }
    }
}

/// WGSL sun core shader. Time comes from `camera.camera_pos.w`.
pub const SUN_SHADER_SOURCE: &str = r#"
struct Sun {
    model: mat4x4<f32>,
    color_deep: vec4<f32>,
    color_mid: vec4<f32>,
    color_hot: vec4<f32>,
    params: vec4<f32>,
};

@group(1) @binding(0) var<uniform> sun: Sun;

fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn mod289_4(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn permute(x: vec4<f32>) -> vec4<f32> {
    return mod289_4(((x * 34.0) + 1.0) * x);
}

fn taylor_inv_sqrt(r: vec4<f32>) -> vec4<f32> {
    return 1.79284291400159 - 0.85373472095314 * r;
}

// 3D simplex noise in [-1, 1].
fn snoise(v: vec3<f32>) -> f32 {
    let c = vec2<f32>(1.0 / 6.0, 1.0 / 3.0);
    let d = vec4<f32>(0.0, 0.5, 1.0, 2.0);

    var i = floor(v + dot(v, c.yyy));
    let x0 = v - i + dot(i, c.xxx);

    let g = step(x0.yzx, x0.xyz);
    let l = 1.0 - g;
    let i1 = min(g.xyz, l.zxy);
    let i2 = max(g.xyz, l.zxy);

    let x1 = x0 - i1 + c.xxx;
    let x2 = x0 - i2 + c.yyy;
    let x3 = x0 - d.yyy;

    i = mod289_3(i);
    let p = permute(permute(permute(
        i.z + vec4<f32>(0.0, i1.z, i2.z, 1.0))
        + i.y + vec4<f32>(0.0, i1.y, i2.y, 1.0))
        + i.x + vec4<f32>(0.0, i1.x, i2.x, 1.0));

    let n_ = 0.142857142857;
    let ns = n_ * d.wyz - d.xzx;

    let j = p - 49.0 * floor(p * ns.z * ns.z);
    let x_ = floor(j * ns.z);
    let y_ = floor(j - 7.0 * x_);

    let x = x_ * ns.x + ns.yyyy;
    let y = y_ * ns.x + ns.yyyy;
    let h = 1.0 - abs(x) - abs(y);

    let b0 = vec4<f32>(x.xy, y.xy);
    let b1 = vec4<f32>(x.zw, y.zw);
    let s0 = floor(b0) * 2.0 + 1.0;
    let s1 = floor(b1) * 2.0 + 1.0;
    let sh = -step(h, vec4<f32>(0.0));

    let a0 = b0.xzyw + s0.xzyw * sh.xxyy;
    let a1 = b1.xzyw + s1.xzyw * sh.zzww;

    var p0 = vec3<f32>(a0.xy, h.x);
    var p1 = vec3<f32>(a0.zw, h.y);
    var p2 = vec3<f32>(a1.xy, h.z);
    var p3 = vec3<f32>(a1.zw, h.w);

    let norm = taylor_inv_sqrt(vec4<f32>(dot(p0, p0), dot(p1, p1), dot(p2, p2), dot(p3, p3)));
    p0 *= norm.x;
    p1 *= norm.y;
    p2 *= norm.z;
    p3 *= norm.w;

    var m = max(0.6 - vec4<f32>(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), vec4<f32>(0.0));
    m = m * m;
    return 42.0 * dot(m * m, vec4<f32>(dot(p0, x0), dot(p1, x1), dot(p2, x2), dot(p3, x3)));
}

struct SunInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct SunOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_normal: vec3<f32>,
    @location(1) noise: f32,
};

@vertex
fn vs_sun(in: SunInput) -> SunOutput {
    let time = camera.camera_pos.w;
    let p = in.position * sun.params.x;

    let broad = snoise(vec3<f32>(p.x * 0.5, p.y * 0.5, p.z * 0.5 + time * 0.1));
    let detail = snoise(p * 2.0 + vec3<f32>(time * 0.2)) * 0.1;
    let noise = broad + detail;

    let displaced = p + in.normal * (noise * sun.params.y);

    var out: SunOutput;
    out.clip_position = camera.view_proj * sun.model * vec4<f32>(displaced, 1.0);
    out.view_normal = (camera.view * sun.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.noise = noise;
    return out;
}

@fragment
fn fs_sun(in: SunOutput) -> @location(0) vec4<f32> {
    let n = (in.noise + 1.0) * 0.5;
    var color: vec3<f32>;
    if (n < 0.5) {
        color = mix(sun.color_deep.rgb, sun.color_mid.rgb, n * 2.0);
    } else {
        color = mix(sun.color_mid.rgb, sun.color_hot.rgb, (n - 0.5) * 2.0);
    }

    let normal = normalize(in.view_normal);
    let fresnel = pow(1.0 - abs(normal.z), 3.0);
    color += vec3<f32>(1.0, 0.8, 0.5) * fresnel * 0.5;

    return vec4<f32>(srgb_to_linear(color), 1.0);
}
"#;

/// Opaque plasma sphere at the origin.
pub struct SunRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SunRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, camera: &CameraBinding) -> Self {
        let shader = create_shader(device, "sun-shader", &shader_source(SUN_SHADER_SOURCE));
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sun-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<SunUniform>() as u64,
            )],
        });
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "sun-pipeline",
                shader: &shader,
                vs_entry: "vs_sun",
                fs_entry: "fs_sun",
                buffers: &[MeshVertex::layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth: DepthMode::Opaque,
            },
        );

        let sphere = geodesic_sphere(SUN_DETAIL);
        let mesh = MeshBuffer::new(device, "sun-core", &sphere.vertices, &sphere.indices);
        let uniform_buffer =
            create_uniform_buffer(device, "sun-uniform", &SunUniform::new(Mat4::IDENTITY));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sun-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "Sun core renderer initialized: {} vertices",
            sphere.vertices.len()
        );

        Self {
            pipeline,
            mesh,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, system: &SolarSystem) {
        let uniform = SunUniform::new(system.body_matrix(BodyId::Sun));
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(pass, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_aligned() {
        assert_eq!(std::mem::size_of::<SunUniform>() % 16, 0);
    }

    #[test]
    fn test_heat_ramp_endpoints() {
        assert!((plasma_color(-1.0) - COLOR_DEEP).length() < 1e-6);
        assert!((plasma_color(0.0) - COLOR_MID).length() < 1e-6);
        assert!((plasma_color(1.0) - COLOR_HOT).length() < 1e-6);
    }

    #[test]
    fn test_heat_ramp_is_continuous_at_midpoint() {
        let below = plasma_color(-1e-4);
        let above = plasma_color(1e-4);
        assert!((below - above).length() < 1e-3);
    }

    #[test]
    fn test_hotter_noise_is_brighter() {
        let mut previous = 0.0;
        for step in 0..=10 {
            let noise = -1.0 + step as f32 * 0.2;
            let c = plasma_color(noise);
            let brightness = c.x + c.y + c.z;
            assert!(brightness >= previous, "noise {noise}");
            previous = brightness;
        }
    }

    #[test]
    fn test_rim_light_only_at_limb() {
        assert_eq!(rim_light(1.0), Vec3::ZERO);
        assert_eq!(rim_light(-1.0), Vec3::ZERO);
        assert!((rim_light(0.0) - RIM_COLOR * 0.5).length() < 1e-6);
    }

    #[test]
    fn test_uniform_carries_core_radius() {
        let uniform = SunUniform::new(Mat4::IDENTITY);
        assert_eq!(uniform.params[0], SUN_CORE_RADIUS);
        assert_eq!(uniform.params[1], SUN_DISPLACEMENT);
    }

    #[test]
    fn test_sun_pipeline_builds() {
        let Some((device, _queue)) = crate::test_support::test_device() else {
            return;
        };
        let camera = CameraBinding::new(&device);
        let _sun = SunRenderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, &camera);
    }
}
