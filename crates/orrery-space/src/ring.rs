//! Flat planetary rings. The fragment's distance from the ring center is
//! mapped onto a 1-D strip texture, inner edge to outer edge, with a
//! smoothstep fade at both edges.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use orrery_render::{
    CameraBinding, DepthMode, GpuTexture, ImageData, MeshBuffer, MeshVertex, PipelineDesc,
    create_pipeline, create_shader, create_uniform_buffer, sampler_entry, texture_entry,
    uniform_entry,
};
use orrery_sim::{BodyId, CelestialBody, RingStyle, SolarSystem};

use crate::geometry::ring_annulus;
use crate::shader_source;

/// Texels with less alpha than this are discarded.
pub const RING_ALPHA_EPSILON: f32 = 1e-3;

const RING_SEGMENTS: u32 = 128;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Normalized radial coordinate: 0 at `inner`, 1 at `outer`.
pub fn ring_u(distance: f32, style: &RingStyle) -> f32 {
    (distance - style.inner) / (style.outer - style.inner)
}

/// Final alpha for a fragment at radial coordinate `u` whose texel has
/// alpha `sampled`. `None` means the fragment is discarded.
pub fn ring_alpha(u: f32, sampled: f32, opacity: f32, edge: f32) -> Option<f32> {
    if sampled < RING_ALPHA_EPSILON {
        return None;
    }
    let edge = edge.max(1e-6);
    let fade = smoothstep(0.0, edge, u) * (1.0 - smoothstep(1.0 - edge, 1.0, u));
    Some(sampled * opacity * fade)
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RingUniform {
    pub model: [[f32; 4]; 4],
    pub inner: f32,
    pub outer: f32,
    pub opacity: f32,
    pub edge: f32,
}

impl RingUniform {
    /// The annulus is built in the XY plane, so it is laid flat into the
    /// body's equator before the body transform.
    pub fn new(style: &RingStyle, body_matrix: Mat4) -> Self {
        let model = body_matrix * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        Self {
            model: model.to_cols_array_2d(),
            inner: style.inner,
            outer: style.outer,
            opacity: style.opacity,
            edge: style.edge,
        }
    }
}

pub const RING_SHADER_SOURCE: &str = r#"
struct Ring {
    model: mat4x4<f32>,
    inner: f32,
    outer: f32,
    opacity: f32,
    edge: f32,
};

@group(1) @binding(0) var<uniform> ring: Ring;
@group(1) @binding(1) var ring_map: texture_2d<f32>;
@group(1) @binding(2) var ring_sampler: sampler;

struct RingInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct RingOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
};

@vertex
fn vs_ring(in: RingInput) -> RingOutput {
    var out: RingOutput;
    out.clip_position = camera.view_proj * ring.model * vec4<f32>(in.position, 1.0);
    out.local = in.position.xy;
    return out;
}

@fragment
fn fs_ring(in: RingOutput) -> @location(0) vec4<f32> {
    let u = (length(in.local) - ring.inner) / (ring.outer - ring.inner);
    let texel = textureSample(ring_map, ring_sampler, vec2<f32>(u, 0.5));
    if (texel.a < 0.001) {
        discard;
    }
    let edge = max(ring.edge, 0.000001);
    let fade = smoothstep(0.0, edge, u) * (1.0 - smoothstep(1.0 - edge, 1.0, u));
    return vec4<f32>(srgb_to_linear(texel.rgb), texel.a * ring.opacity * fade);
}
"#;

struct RingInstance {
    id: BodyId,
    style: RingStyle,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every ringed planet's ring. Rings are double-sided and do not
/// write depth.
pub struct RingRenderer {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    rings: Vec<RingInstance>,
}

impl RingRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, camera: &CameraBinding) -> Self {
        let shader = create_shader(device, "ring-shader", &shader_source(RING_SHADER_SOURCE));
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ring-bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<RingUniform>() as u64,
                ),
                texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                sampler_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "ring-pipeline",
                shader: &shader,
                vs_entry: "vs_ring",
                fs_entry: "fs_ring",
                buffers: &[MeshVertex::layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                cull_mode: None,
                depth: DepthMode::ReadOnly,
            },
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ring-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            layout,
            sampler,
            rings: Vec::new(),
        }
    }

    /// Add the ring of `body`, if it has one.
    pub fn add_ring(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        body: &CelestialBody,
        strip: &ImageData,
    ) {
        let Some(style) = body.ring else {
            return;
        };
        let name = body.id.key().to_lowercase();
        let annulus = ring_annulus(style.inner, style.outer, RING_SEGMENTS);
        let mesh = MeshBuffer::new(
            device,
            &format!("{name}-ring"),
            &annulus.vertices,
            &annulus.indices,
        );
        let texture = GpuTexture::upload(device, queue, &format!("{name}-ring-map"), strip, false);
        let uniform_buffer = create_uniform_buffer(
            device,
            &format!("{name}-ring-uniform"),
            &RingUniform::new(&style, Mat4::IDENTITY),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-ring-bg")),
            layout: &self.layout,
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
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        log::info!(
            "Ring for {} ready: radius {}..{}",
            body.id,
            style.inner,
            style.outer
        );
        self.rings.push(RingInstance {
            id: body.id,
            style,
            mesh,
            uniform_buffer,
            bind_group,
        });
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn update(&self, queue: &wgpu::Queue, system: &SolarSystem) {
        for ring in &self.rings {
            let uniform = RingUniform::new(&ring.style, system.body_matrix(ring.id));
            queue.write_buffer(&ring.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        for ring in &self.rings {
            pass.set_bind_group(1, &ring.bind_group, &[]);
            ring.mesh.draw(pass, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_sim::catalog;

    fn saturn_ring() -> RingStyle {
        catalog()[BodyId::Saturn.index()].ring.unwrap()
    }

    #[test]
    fn test_uniform_is_aligned() {
        assert_eq!(std::mem::size_of::<RingUniform>() % 16, 0);
    }

    #[test]
    fn test_radial_coordinate() {
        let style = saturn_ring();
        assert_eq!(ring_u(style.inner, &style), 0.0);
        assert!((ring_u(style.outer, &style) - 1.0).abs() < 1e-6);
        assert!((ring_u(1.85, &style) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_transparent_texels_discarded() {
        assert_eq!(ring_alpha(0.5, 0.0, 0.8, 0.02), None);
        assert_eq!(ring_alpha(0.5, 0.0005, 0.8, 0.02), None);
    }

    #[test]
    fn test_interior_alpha_scaled_by_opacity() {
        let alpha = ring_alpha(0.5, 0.5, 0.8, 0.02).unwrap();
        assert!((alpha - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_outside_band_fades_to_zero() {
        for u in [-0.5, -0.01, 1.01, 2.0] {
            assert_eq!(ring_alpha(u, 1.0, 1.0, 0.05), Some(0.0), "u = {u}");
        }
    }

    #[test]
    fn test_edges_fade_in_and_out() {
        let near_inner = ring_alpha(0.01, 1.0, 1.0, 0.05).unwrap();
        let near_outer = ring_alpha(0.99, 1.0, 1.0, 0.05).unwrap();
        assert!(near_inner > 0.0 && near_inner < 1.0);
        assert!(near_outer > 0.0 && near_outer < 1.0);
        assert!((near_inner - near_outer).abs() < 1e-5);
    }

    #[test]
    fn test_ring_lies_in_equatorial_plane() {
        let uniform = RingUniform::new(&saturn_ring(), Mat4::IDENTITY);
        let model = Mat4::from_cols_array_2d(&uniform.model);
        let p = model.transform_point3(Vec3::new(0.0, 2.0, 0.0));
        assert!(p.y.abs() < 1e-6);
        assert!((p.length() - 2.0).abs() < 1e-6);
        let normal = model.transform_vector3(Vec3::Z);
        assert!((normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_ring_pipeline_builds() {
        let Some((device, queue)) = crate::test_support::test_device() else {
            return;
        };
        let camera = CameraBinding::new(&device);
        let textures = crate::TextureSource::new(None, 32);
        let mut rings = RingRenderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, &camera);
        for body in catalog() {
            rings.add_ring(&device, &queue, &body, &textures.ring_map(body.id));
        }
    }
}
