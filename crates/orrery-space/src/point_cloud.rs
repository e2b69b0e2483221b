//! Point-cloud planet surfaces.
//!
//! Every planet is drawn by one parameterized shader: each vertex of a
//! geodesic sphere becomes a camera-facing sprite, displaced by the
//! elevation map, pushed toward the viewer around the pointer, and tinted
//! with a highlight color. Per-body behavior comes entirely from
//! [`PointCloudUniform`].
//!
//! [`SurfaceSample`] mirrors the shader's displacement, interaction, and
//! color math on the CPU.

use std::collections::HashMap;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

use orrery_render::{
    CameraBinding, DepthMode, GpuTexture, MeshVertex, PipelineDesc, create_pipeline,
    create_shader, create_uniform_buffer, sampler_entry, texture_entry, uniform_entry,
};
use orrery_sim::{
    BodyId, CelestialBody, Highlight, InteractionState, PointSize, SolarSystem, SurfaceStyle,
};

use crate::geometry::geodesic_sphere;
use crate::shader_source;
use crate::surface_maps::SurfaceMaps;

/// Per-body shader parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointCloudUniform {
    pub model: [[f32; 4]; 4],
    pub mouse_uv: [f32; 2],
    pub interactive: f32,
    pub threshold: f32,
    pub displacement: f32,
    pub depth_gain: f32,
    pub color_gain: f32,
    pub point_size: f32,
    /// RGB highlight, `w = 1` to sample the highlight map instead.
    pub highlight: [f32; 4],
    pub shade_base: f32,
    pub shade_gain: f32,
    /// 0 = attenuated, 1 = constant pixel size.
    pub size_mode: f32,
    /// 1 enables ocean discard and specular alpha.
    pub ocean: f32,
}

impl PointCloudUniform {
    pub fn new(style: &SurfaceStyle, model: Mat4, pointer: &InteractionState) -> Self {
        let (point_size, size_mode) = match style.point_size {
            PointSize::Attenuated(size) => (size, 0.0),
            PointSize::Constant(size) => (size, 1.0),
        };
        let highlight = match style.highlight {
            Highlight::Texture => [0.0, 0.0, 0.0, 1.0],
            Highlight::Color([r, g, b]) => [r, g, b, 0.0],
        };
        let (shade_base, shade_gain) = style
            .shading
            .map_or((1.0, 0.0), |shading| (shading.base, shading.gain));
        Self {
            model: model.to_cols_array_2d(),
            mouse_uv: pointer.mouse_uv().to_array(),
            interactive: pointer.strength(),
            threshold: style.threshold,
            displacement: style.displacement,
            depth_gain: style.depth_gain,
            color_gain: style.color_gain,
            point_size,
            highlight,
            shade_base,
            shade_gain,
            size_mode,
            ocean: if style.ocean { 1.0 } else { 0.0 },
        }
    }
}

/// Ocean texels of a color map: blue-dominant and dark.
pub fn is_ocean_texel(color: Vec3) -> bool {
    color.z > color.x && color.z > color.y && color.x + color.y + color.z < 1.2
}

/// Whether a sphere point faces the camera. `model_view` takes the point
/// into view space; elevation displacement is not applied.
pub fn faces_camera(model_view: Mat4, position: Vec3, normal: Vec3) -> bool {
    let view_position = model_view.transform_point3(position);
    let view_normal = model_view.transform_vector3(normal).normalize_or_zero();
    (-view_position.normalize_or_zero()).dot(view_normal) >= 0.0
}

/// Whether a sprite fragment is inside the round point. `corner` spans
/// `[-1, 1]` on both axes across the quad.
pub fn sprite_covers(corner: Vec2) -> bool {
    corner.length_squared() <= 1.0
}

/// Inputs for one surface point.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceInput {
    pub uv: Vec2,
    pub elevation: f32,
    pub color: Vec3,
    /// Highlight map texel at `uv`.
    pub highlight: Vec3,
    pub specular: f32,
}

/// What the shader computes for a surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    /// View-space push toward the camera.
    pub depth_offset: f32,
    pub color: Vec3,
    pub alpha: f32,
}

impl SurfaceSample {
    /// `None` when the point is discarded as ocean.
    pub fn evaluate(
        style: &SurfaceStyle,
        pointer: &InteractionState,
        input: &SurfaceInput,
    ) -> Option<Self> {
        let strength = pointer.strength();
        let distance = pointer.mouse_uv().distance(input.uv);
        let near_pointer = strength > 0.0 && distance < style.threshold;
        let falloff = style.threshold - distance;

        let mut depth_offset = input.elevation * style.displacement;
        if near_pointer {
            depth_offset += falloff * style.depth_gain * strength;
        }

        let mut alpha = 1.0;
        if style.ocean {
            if is_ocean_texel(input.color) {
                return None;
            }
            alpha = (1.0 - input.specular) * 0.8;
        }

        let mut color = input.color;
        if near_pointer {
            let highlight = match style.highlight {
                Highlight::Texture => input.highlight,
                Highlight::Color(rgb) => Vec3::from_array(rgb),
            };
            color = color.lerp(highlight, falloff * style.color_gain * strength);
        }
        if let Some(shading) = style.shading {
            color *= shading.base + shading.gain * input.elevation;
        }

        Some(Self {
            depth_offset,
            color,
            alpha,
        })
    }
}

const POINT_CLOUD_WGSL: &str = r#"
struct Body {
    model: mat4x4<f32>,
    mouse_uv: vec2<f32>,
    interactive: f32,
    threshold: f32,
    displacement: f32,
    depth_gain: f32,
    color_gain: f32,
    point_size: f32,
    highlight: vec4<f32>,
    shade_base: f32,
    shade_gain: f32,
    size_mode: f32,
    ocean: f32,
};

@group(1) @binding(0) var<uniform> body: Body;
@group(1) @binding(1) var color_map: texture_2d<f32>;
@group(1) @binding(2) var elevation_map: texture_2d<f32>;
@group(1) @binding(3) var highlight_map: texture_2d<f32>;
@group(1) @binding(4) var specular_map: texture_2d<f32>;
@group(1) @binding(5) var map_sampler: sampler;

struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct PointOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) corner: vec2<f32>,
    @location(2) elevation: f32,
    @location(3) visible: f32,
    @location(4) pointer_distance: f32,
};

@vertex
fn vs_points(@builtin(vertex_index) vertex_index: u32, in: PointInput) -> PointOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let corner = corners[vertex_index % 6u];

    let elevation = textureSampleLevel(elevation_map, map_sampler, in.uv, 0.0).r;
    let model_view = camera.view * body.model;
    var mv = model_view * vec4<f32>(in.position, 1.0);

    // Limb test on the undisplaced sphere.
    let view_normal = normalize((model_view * vec4<f32>(in.normal, 0.0)).xyz);
    let visible = step(0.0, dot(-normalize(mv.xyz), view_normal));

    mv.z += elevation * body.displacement;

    let d = distance(body.mouse_uv, in.uv);
    if (body.interactive > 0.0 && d < body.threshold) {
        mv.z += (body.threshold - d) * body.depth_gain * body.interactive;
    }

    var size = body.point_size;
    if (body.size_mode < 0.5) {
        size = body.point_size * (8.0 / max(-mv.z, 0.001));
    }

    let clip = camera.proj * mv;
    let offset = corner * size / camera.viewport.xy * clip.w;

    var out: PointOutput;
    out.clip_position = vec4<f32>(clip.xy + offset, clip.z, clip.w);
    out.uv = in.uv;
    out.corner = corner;
    out.elevation = elevation;
    out.visible = visible;
    out.pointer_distance = d;
    return out;
}

@fragment
fn fs_points(in: PointOutput) -> @location(0) vec4<f32> {
    let base = textureSample(color_map, map_sampler, in.uv).rgb;
    let mapped_highlight = textureSample(highlight_map, map_sampler, in.uv).rgb;
    let spec = textureSample(specular_map, map_sampler, in.uv).r;

    if (dot(in.corner, in.corner) > 1.0) {
        discard;
    }
    if (floor(in.visible + 0.1) == 0.0) {
        discard;
    }

    var alpha = 1.0;
    if (body.ocean > 0.5) {
        if (base.b > base.r && base.b > base.g && base.r + base.g + base.b < 1.2) {
            discard;
        }
        alpha = (1.0 - spec) * 0.8;
    }

    var color = base;
    if (body.interactive > 0.0 && in.pointer_distance < body.threshold) {
        let highlight = select(body.highlight.rgb, mapped_highlight, body.highlight.w > 0.5);
        let amount = (body.threshold - in.pointer_distance) * body.color_gain * body.interactive;
        color = mix(color, highlight, amount);
    }
    color *= body.shade_base + body.shade_gain * in.elevation;

    return vec4<f32>(srgb_to_linear(color), alpha);
}
"#;

struct PointBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

struct PlanetPoints {
    id: BodyId,
    style: SurfaceStyle,
    points: Rc<PointBuffer>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws every planet's point cloud with one pipeline.
pub struct PointCloudRenderer {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    point_sets: HashMap<u32, Rc<PointBuffer>>,
    planets: Vec<PlanetPoints>,
    detail_scale: f32,
}

impl PointCloudRenderer {
    /// `detail_scale` multiplies each body's sphere detail.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera: &CameraBinding,
        detail_scale: f32,
    ) -> Self {
        let shader = create_shader(device, "point-cloud-shader", &shader_source(POINT_CLOUD_WGSL));
        let stages = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("point-cloud-bgl"),
            entries: &[
                uniform_entry(0, stages, std::mem::size_of::<PointCloudUniform>() as u64),
                texture_entry(1, stages),
                texture_entry(2, stages),
                texture_entry(3, stages),
                texture_entry(4, stages),
                sampler_entry(5, stages),
            ],
        });

        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "point-cloud-pipeline",
                shader: &shader,
                vs_entry: "vs_points",
                fs_entry: "fs_points",
                buffers: &[MeshVertex::instance_layout()],
                bind_group_layouts: &[&camera.layout, &layout],
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                cull_mode: None,
                depth: DepthMode::Opaque,
            },
        );

        Self {
            pipeline,
            layout,
            sampler: GpuTexture::equirect_sampler(device),
            point_sets: HashMap::new(),
            planets: Vec::new(),
            detail_scale: if detail_scale.is_finite() && detail_scale > 0.0 {
                detail_scale
            } else {
                1.0
            },
        }
    }

    /// Upload a planet's maps and share its sphere with same-detail bodies.
    /// Bodies without a point surface are ignored.
    pub fn add_planet(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        body: &CelestialBody,
        maps: &SurfaceMaps,
    ) {
        let Some(style) = body.surface else {
            return;
        };
        let detail = ((style.detail as f32 * self.detail_scale).round() as u32).max(1);
        let points = self
            .point_sets
            .entry(detail)
            .or_insert_with(|| {
                let mesh = geodesic_sphere(detail);
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("point-cloud-{detail}")),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                Rc::new(PointBuffer {
                    buffer,
                    count: mesh.vertices.len() as u32,
                })
            })
            .clone();

        let name = body.id.key().to_lowercase();
        let color = GpuTexture::upload(device, queue, &format!("{name}-color"), &maps.color, false);
        let elevation =
            GpuTexture::upload(device, queue, &format!("{name}-elevation"), &maps.elevation, false);
        let highlight =
            GpuTexture::upload(device, queue, &format!("{name}-highlight"), &maps.highlight, false);
        let specular =
            GpuTexture::upload(device, queue, &format!("{name}-specular"), &maps.specular, false);

        let uniform = PointCloudUniform::new(&style, Mat4::IDENTITY, &InteractionState::default());
        let uniform_buffer = create_uniform_buffer(device, &format!("{name}-points"), &uniform);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-points-bg")),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&elevation.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&highlight.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        log::info!(
            "Point cloud for {} ready: {} points (detail {detail})",
            body.id,
            points.count
        );
        self.planets.push(PlanetPoints {
            id: body.id,
            style,
            points,
            uniform_buffer,
            bind_group,
        });
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    /// Upload transforms and pointer state for the current tick.
    pub fn update(&self, queue: &wgpu::Queue, system: &SolarSystem) {
        for planet in &self.planets {
            let uniform = PointCloudUniform::new(
                &planet.style,
                system.body_matrix(planet.id),
                &system.state(planet.id).interaction,
            );
            queue.write_buffer(&planet.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Draw all planets. The camera must already be bound at group 0.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        for planet in &self.planets {
            pass.set_bind_group(1, &planet.bind_group, &[]);
            pass.set_vertex_buffer(0, planet.points.buffer.slice(..));
            pass.draw(0..6, 0..planet.points.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_sim::{InteractionPolicy, catalog};

    fn style(id: BodyId) -> SurfaceStyle {
        catalog()[id.index()].surface.unwrap()
    }

    fn settled_pointer(uv: Vec2) -> InteractionState {
        let mut pointer = InteractionState::default();
        for _ in 0..300 {
            pointer.queue_pointer(uv);
            pointer.step(InteractionPolicy::AlwaysActive, false, 0.1);
        }
        pointer
    }

    fn input(uv: Vec2, color: Vec3) -> SurfaceInput {
        SurfaceInput {
            uv,
            elevation: 0.0,
            color,
            highlight: Vec3::new(1.0, 0.0, 1.0),
            specular: 0.0,
        }
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<PointCloudUniform>(), 128);
    }

    #[test]
    fn test_bump_under_pointer_reaches_six_tenths() {
        let pointer = settled_pointer(Vec2::splat(0.5));
        let sample = SurfaceSample::evaluate(
            &style(BodyId::Jupiter),
            &pointer,
            &input(Vec2::splat(0.5), Vec3::splat(0.5)),
        )
        .unwrap();
        assert!((sample.depth_offset - 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_no_bump_outside_threshold() {
        let pointer = settled_pointer(Vec2::splat(0.5));
        let sample = SurfaceSample::evaluate(
            &style(BodyId::Jupiter),
            &pointer,
            &input(Vec2::new(0.6, 0.5), Vec3::splat(0.5)),
        )
        .unwrap();
        assert_eq!(sample.depth_offset, 0.0);
        // Shading with zero elevation is the base factor.
        assert!((sample.color - Vec3::splat(0.4)).length() < 1e-6);
    }

    #[test]
    fn test_displacement_scales_elevation() {
        let pointer = InteractionState::default();
        let mut sample_input = input(Vec2::ZERO, Vec3::ONE);
        sample_input.elevation = 1.0;
        let sample =
            SurfaceSample::evaluate(&style(BodyId::Mercury), &pointer, &sample_input).unwrap();
        assert!((sample.depth_offset - 0.25).abs() < 1e-6);
        assert!((sample.color - Vec3::splat(1.3)).length() < 1e-6);
    }

    #[test]
    fn test_constant_highlight_color() {
        let pointer = settled_pointer(Vec2::splat(0.5));
        let sample = SurfaceSample::evaluate(
            &style(BodyId::Mars),
            &pointer,
            &input(Vec2::new(0.5, 0.49), Vec3::ZERO),
        )
        .unwrap();
        // 0.05 falloff * 30 gain mixes past the highlight color.
        let expected = Vec3::new(1.0, 0.9, 0.6) * 1.5 * 0.6;
        assert!((sample.color - expected).length() < 1e-2);
    }

    #[test]
    fn test_ocean_texels_discarded_on_earth_only() {
        let pointer = InteractionState::default();
        let sea = input(Vec2::ZERO, Vec3::new(0.05, 0.1, 0.4));
        assert!(SurfaceSample::evaluate(&style(BodyId::Earth), &pointer, &sea).is_none());
        assert!(SurfaceSample::evaluate(&style(BodyId::Venus), &pointer, &sea).is_some());
    }

    #[test]
    fn test_earth_alpha_from_specular() {
        let pointer = InteractionState::default();
        let mut land = input(Vec2::ZERO, Vec3::new(0.4, 0.5, 0.2));
        land.specular = 0.25;
        let sample = SurfaceSample::evaluate(&style(BodyId::Earth), &pointer, &land).unwrap();
        assert!((sample.alpha - 0.6).abs() < 1e-6);
        assert_eq!(sample.color, land.color);
    }

    #[test]
    fn test_uniform_encodes_style() {
        let uniform = PointCloudUniform::new(
            &style(BodyId::Earth),
            Mat4::IDENTITY,
            &InteractionState::default(),
        );
        assert_eq!(uniform.size_mode, 1.0);
        assert_eq!(uniform.point_size, 4.0);
        assert_eq!(uniform.ocean, 1.0);
        assert_eq!((uniform.shade_base, uniform.shade_gain), (1.0, 0.0));
        assert_eq!(uniform.highlight[3], 1.0);

        let mars = PointCloudUniform::new(
            &style(BodyId::Mars),
            Mat4::IDENTITY,
            &InteractionState::default(),
        );
        assert_eq!(mars.highlight, [1.0, 0.9, 0.6, 0.0]);
        assert_eq!(mars.size_mode, 0.0);
    }

    #[test]
    fn test_ocean_predicate() {
        assert!(is_ocean_texel(Vec3::new(0.0, 0.1, 0.5)));
        assert!(!is_ocean_texel(Vec3::new(0.5, 0.5, 0.6)));
        assert!(!is_ocean_texel(Vec3::new(0.3, 0.5, 0.2)));
    }

    #[test]
    fn test_near_hemisphere_faces_camera() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert!(faces_camera(view, Vec3::Z, Vec3::Z));
        assert!(!faces_camera(view, Vec3::NEG_Z, Vec3::NEG_Z));
        // Just past the tangent point seen from z = 5.
        let limb = Vec3::new(1.0, 0.0, -0.05).normalize();
        assert!(!faces_camera(view, limb, limb));
        let front = Vec3::new(1.0, 0.0, 0.25).normalize();
        assert!(faces_camera(view, front, front));
    }

    #[test]
    fn test_limb_test_runs_before_displacement() {
        let visible = POINT_CLOUD_WGSL.find("let visible").unwrap();
        let displaced = POINT_CLOUD_WGSL
            .find("mv.z += elevation * body.displacement")
            .unwrap();
        assert!(visible < displaced);
    }

    #[test]
    fn test_sprite_is_round() {
        assert!(sprite_covers(Vec2::ZERO));
        assert!(sprite_covers(Vec2::new(1.0, 0.0)));
        assert!(sprite_covers(Vec2::splat(0.7)));
        assert!(!sprite_covers(Vec2::splat(0.75)));
        assert!(!sprite_covers(Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn test_point_cloud_pipeline_builds() {
        let Some((device, queue)) = crate::test_support::test_device() else {
            return;
        };
        let camera = CameraBinding::new(&device);
        let mut renderer = PointCloudRenderer::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &camera,
            0.25,
        );
        let textures = crate::TextureSource::new(None, 32);
        for body in catalog() {
            renderer.add_planet(&device, &queue, &body, &textures.surface_maps(body.id));
        }
    }
}
