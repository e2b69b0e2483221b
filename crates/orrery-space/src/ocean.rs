//! Earth's animated ocean: a solid sphere under the land points that keeps
//! only the sea texels of the color map, with small vertex waves, a
//! perturbed normal, Fresnel tint, a specular glint, and a shimmer.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use orrery_render::{
    CameraBinding, DepthMode, GpuTexture, ImageData, MeshBuffer, MeshVertex, PipelineDesc,
    create_pipeline, create_shader, create_uniform_buffer, sampler_entry, texture_entry,
    uniform_entry,
};
use orrery_sim::{BodyId, SolarSystem};

use crate::geometry::geodesic_sphere;
use crate::shader_source;

const OCEAN_DETAIL: u32 = 60;

const DEEP_OCEAN: Vec3 = Vec3::new(0.0, 0.1, 0.3);
const SHALLOW_OCEAN: Vec3 = Vec3::new(0.0, 0.4, 0.7);
const FRESNEL_COLOR: Vec3 = Vec3::new(0.3, 0.6, 1.0);

/// Sea texels for the ocean shell. Looser than the point cloud's cut so the
/// shell slightly overlaps the coastline.
pub fn is_sea(color: Vec3) -> bool {
    (color.z > color.x * 1.05 && color.z > color.y * 1.05) || color.x + color.y + color.z < 1.15
}

/// Radial wave offset for a local position at `time` seconds.
pub fn wave_offset(position: Vec3, time: f32) -> f32 {
    (position.x * 10.0 + time * 0.5).sin() * 0.002
        + (position.z * 8.0 + time * 0.7).cos() * 0.002
        + (position.y * 12.0 + time * 0.3).sin() * 0.001
}

/// Inputs for shading one ocean fragment, in view space.
#[derive(Clone, Copy, Debug)]
pub struct OceanFragment {
    pub uv: Vec2,
    pub color: Vec3,
    pub normal: Vec3,
    /// Unit vector from the surface toward the eye.
    pub view_dir: Vec3,
    pub time: f32,
}

/// Final ocean color, or `None` for land texels.
pub fn ocean_color(fragment: &OceanFragment) -> Option<Vec3> {
    let c = fragment.color;
    if !is_sea(c) {
        return None;
    }
    let blue = c.z;
    let base = DEEP_OCEAN.lerp(SHALLOW_OCEAN, blue);

    let ripple_uv = fragment.uv * 20.0;
    let wave_x = (ripple_uv.x * 3.0 + fragment.time * 0.8).sin() * 0.5 + 0.5;
    let wave_y = (ripple_uv.y * 2.5 + fragment.time * 0.6).cos() * 0.5 + 0.5;
    let normal =
        (fragment.normal + Vec3::new((wave_x - 0.5) * 0.1, (wave_y - 0.5) * 0.1, 0.0)).normalize();

    let fresnel = (1.0 - fragment.view_dir.dot(normal).abs()).powi(3);
    let light = Vec3::new(1.0, 1.0, 0.5).normalize();
    let reflected = -light + 2.0 * light.dot(normal) * normal;
    let specular = fragment.view_dir.dot(reflected).max(0.0).powi(32);
    let shimmer = (fragment.uv.x * 50.0 + fragment.time * 2.0).sin()
        * (fragment.uv.y * 50.0 + fragment.time * 1.5).cos()
        * 0.1
        + 0.9;

    let mut color = base + FRESNEL_COLOR * fresnel * 0.4 + Vec3::ONE * specular * 0.6;
    color *= shimmer;
    color *= 1.0 - blue * 0.3;
    Some(color)
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct OceanUniform {
    pub model: [[f32; 4]; 4],
}

pub const OCEAN_SHADER_SOURCE: &str = r#"
struct Ocean {
    model: mat4x4<f32>,
};

@group(1) @binding(0) var<uniform> ocean: Ocean;
@group(1) @binding(1) var ocean_map: texture_2d<f32>;
@group(1) @binding(2) var ocean_sampler: sampler;

struct OceanInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct OceanOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) view_normal: vec3<f32>,
    @location(2) view_position: vec3<f32>,
};

@vertex
fn vs_ocean(in: OceanInput) -> OceanOutput {
    let time = camera.camera_pos.w;
    let p = in.position;
    let wave = sin(p.x * 10.0 + time * 0.5) * 0.002
        + cos(p.z * 8.0 + time * 0.7) * 0.002
        + sin(p.y * 12.0 + time * 0.3) * 0.001;
    let displaced = p + in.normal * wave;

    let model_view = camera.view * ocean.model;
    let mv = model_view * vec4<f32>(displaced, 1.0);

    var out: OceanOutput;
    out.clip_position = camera.proj * mv;
    out.uv = in.uv;
    out.view_normal = (model_view * vec4<f32>(in.normal, 0.0)).xyz;
    out.view_position = -mv.xyz;
    return out;
}

@fragment
fn fs_ocean(in: OceanOutput) -> @location(0) vec4<f32> {
    let time = camera.camera_pos.w;
    let c = textureSample(ocean_map, ocean_sampler, in.uv).rgb;
    let blue = c.b;
    let is_sea = (blue > c.r * 1.05 && blue > c.g * 1.05) || (c.r + c.g + blue < 1.15);
    if (!is_sea) {
        discard;
    }

    let base = mix(vec3<f32>(0.0, 0.1, 0.3), vec3<f32>(0.0, 0.4, 0.7), blue);

    let ripple_uv = in.uv * 20.0;
    let wave_x = sin(ripple_uv.x * 3.0 + time * 0.8) * 0.5 + 0.5;
    let wave_y = cos(ripple_uv.y * 2.5 + time * 0.6) * 0.5 + 0.5;
    let normal = normalize(normalize(in.view_normal) + vec3<f32>((wave_x - 0.5) * 0.1, (wave_y - 0.5) * 0.1, 0.0));

    let view_dir = normalize(in.view_position);
    let fresnel = pow(1.0 - abs(dot(view_dir, normal)), 3.0);
    let light = normalize(vec3<f32>(1.0, 1.0, 0.5));
    let reflected = reflect(-light, normal);
    let specular = pow(max(dot(view_dir, reflected), 0.0), 32.0);
    let shimmer = sin(in.uv.x * 50.0 + time * 2.0) * cos(in.uv.y * 50.0 + time * 1.5) * 0.1 + 0.9;

    var color = base;
    color += vec3<f32>(0.3, 0.6, 1.0) * fresnel * 0.4;
    color += vec3<f32>(1.0) * specular * 0.6;
    color *= shimmer;
    color *= 1.0 - blue * 0.3;

    return vec4<f32>(srgb_to_linear(color), 1.0);
}
"#;

/// Draws the ocean shell of a single planet, Earth in the shipped catalog.
pub struct OceanRenderer {
    body: BodyId,
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl OceanRenderer {
    /// `color_map` is the same map the planet's point cloud samples.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        camera: &CameraBinding,
        body: BodyId,
        color_map: &ImageData,
    ) -> Self {
        let shader = create_shader(device, "ocean-shader", &shader_source(OCEAN_SHADER_SOURCE));
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ocean-bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<OceanUniform>() as u64,
                ),
                texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                sampler_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "ocean-pipeline",
                shader: &shader,
                vs_entry: "vs_ocean",
                fs_entry: "fs_ocean",
                buffers: &[MeshVertex::layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                cull_mode: Some(wgpu::Face::Back),
                depth: DepthMode::Opaque,
            },
        );

        let sphere = geodesic_sphere(OCEAN_DETAIL);
        let mesh = MeshBuffer::new(device, "ocean-sphere", &sphere.vertices, &sphere.indices);
        let texture = GpuTexture::upload(device, queue, "ocean-map", color_map, false);
        let sampler = GpuTexture::equirect_sampler(device);
        let uniform_buffer = create_uniform_buffer(
            device,
            "ocean-uniform",
            &OceanUniform {
                model: Mat4::IDENTITY.to_cols_array_2d(),
            },
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ocean-bg"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!("Ocean shell for {body} initialized");

        Self {
            body,
            pipeline,
            mesh,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, system: &SolarSystem) {
        let uniform = OceanUniform {
            model: system.body_matrix(self.body).to_cols_array_2d(),
        };
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

    fn fragment(color: Vec3) -> OceanFragment {
        OceanFragment {
            uv: Vec2::new(0.3, 0.6),
            color,
            normal: Vec3::Z,
            view_dir: Vec3::Z,
            time: 1.5,
        }
    }

    #[test]
    fn test_land_is_discarded() {
        assert!(ocean_color(&fragment(Vec3::new(0.5, 0.6, 0.3))).is_none());
        assert!(ocean_color(&fragment(Vec3::new(0.8, 0.7, 0.6))).is_none());
    }

    #[test]
    fn test_dark_texels_count_as_sea() {
        assert!(is_sea(Vec3::new(0.4, 0.4, 0.3)));
        assert!(is_sea(Vec3::new(0.2, 0.3, 0.9)));
        assert!(!is_sea(Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_sea_is_blue() {
        let color = ocean_color(&fragment(Vec3::new(0.05, 0.15, 0.5))).unwrap();
        assert!(color.z > color.x && color.z > color.y);
        assert!(color.min_element() >= 0.0);
    }

    #[test]
    fn test_waves_stay_small() {
        for i in 0..50 {
            let t = i as f32 * 0.37;
            let p = Vec3::new(t.sin(), t.cos(), (t * 0.5).sin()).normalize();
            assert!(wave_offset(p, t).abs() <= 0.005 + 1e-6);
        }
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<OceanUniform>(), 64);
    }

    #[test]
    fn test_ocean_pipeline_builds() {
        let Some((device, queue)) = crate::test_support::test_device() else {
            return;
        };
        let camera = CameraBinding::new(&device);
        let maps = crate::TextureSource::new(None, 32).surface_maps(BodyId::Earth);
        let _ocean = OceanRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &camera,
            BodyId::Earth,
            &maps.color,
        );
    }
}
