//! Skybox renderer: draws the starfield cubemap behind all scene geometry.
//!
//! A fullscreen triangle reconstructs each pixel's view ray from the
//! camera's inverse view-projection and samples the cubemap along it.

use orrery_render::{CameraBinding, DepthMode, PipelineDesc, create_pipeline, create_shader};

use crate::StarfieldCubemap;
use crate::shader_source;

/// WGSL shader body for the skybox pass.
pub const SKYBOX_SHADER_SOURCE: &str = r#"
@group(1) @binding(0)
var skybox_texture: texture_cube<f32>;
@group(1) @binding(1)
var skybox_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) view_dir: vec3<f32>,
};

@vertex
fn vs_skybox(@builtin(vertex_index) idx: u32) -> VertexOutput {
    // Fullscreen triangle
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    let ndc = uv * 2.0 - 1.0;

    // Any point on the pixel's ray works; z = 1 is the near plane in reverse-Z.
    let world = camera.inv_view_proj * vec4<f32>(ndc.x, ndc.y, 1.0, 1.0);

    var out: VertexOutput;
    // z = 0 sits on the far plane, behind everything.
    out.position = vec4<f32>(ndc.x, ndc.y, 0.0, 1.0);
    out.view_dir = world.xyz / world.w - camera.camera_pos.xyz;
    return out;
}

@fragment
fn fs_skybox(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(skybox_texture, skybox_sampler, normalize(in.view_dir));
    return vec4<f32>(srgb_to_linear(color.rgb), 1.0);
}
"#;

/// GPU skybox renderer that draws a cubemap starfield.
pub struct SkyboxRenderer {
    pipeline: wgpu::RenderPipeline,
    cubemap_bind_group: wgpu::BindGroup,
}

impl SkyboxRenderer {
    /// Create a new skybox renderer, uploading the cubemap to the GPU.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        camera: &CameraBinding,
        cubemap: &StarfieldCubemap,
    ) -> Self {
        let shader = create_shader(device, "skybox-shader", &shader_source(SKYBOX_SHADER_SOURCE));

        let cubemap_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox-cubemap-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Drawn first with a read-only depth test against the cleared far plane.
        let pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "skybox-pipeline",
                shader: &shader,
                vs_entry: "vs_skybox",
                fs_entry: "fs_skybox",
                buffers: &[],
                bind_group_layouts: &[&camera.layout, &cubemap_bgl],
                format: surface_format,
                blend: None,
                cull_mode: None,
                depth: DepthMode::ReadOnly,
            },
        );

        let face_size = cubemap.face_size;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("starfield-cubemap"),
            size: wgpu::Extent3d {
                width: face_size,
                height: face_size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let rgba8_faces = cubemap.to_rgba8();
        for (i, face_data) in rgba8_faces.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: i as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face_data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(face_size * 4),
                    rows_per_image: Some(face_size),
                },
                wgpu::Extent3d {
                    width: face_size,
                    height: face_size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let cubemap_view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("skybox-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let cubemap_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox-cubemap-bg"),
            layout: &cubemap_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cubemap_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!(
            "Skybox renderer initialized: {}x{} cubemap, {} lit texels",
            face_size,
            face_size,
            cubemap.lit_texels()
        );

        Self {
            pipeline,
            cubemap_bind_group,
        }
    }

    /// Render the skybox. Draw first; the camera must be bound at group 0.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.cubemap_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
