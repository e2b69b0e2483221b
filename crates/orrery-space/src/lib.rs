//! Space rendering for the orrery: point-cloud planets, rings, the plasma
//! sun, glow and backing shells, Earth's ocean, orbit lines, the asteroid
//! belt, and the starfield skybox.
//!
//! Every pipeline binds the shared camera at group 0; see [`CAMERA_WGSL`].

pub mod asteroids;
pub mod geometry;
pub mod ocean;
pub mod orbit_line;
pub mod point_cloud;
pub mod ring;
pub mod shell;
pub mod skybox;
pub mod starfield;
pub mod sun;
pub mod surface_maps;

pub use asteroids::{AsteroidBelt, AsteroidField, AsteroidInstance};
pub use geometry::{Mesh, dodecahedron, geodesic_sphere, ring_annulus};
pub use ocean::{OceanRenderer, OceanUniform};
pub use orbit_line::OrbitLineRenderer;
pub use point_cloud::{
    PointCloudRenderer, PointCloudUniform, SurfaceInput, SurfaceSample, faces_camera,
    is_ocean_texel, sprite_covers,
};
pub use ring::{RING_ALPHA_EPSILON, RingRenderer, RingUniform, ring_alpha};
pub use shell::{ShellRenderer, ShellUniform, glow_intensity};
pub use skybox::SkyboxRenderer;
pub use starfield::{StarPoint, StarfieldCubemap, StarfieldGenerator};
pub use sun::{SunRenderer, SunUniform, plasma_color};
pub use surface_maps::{SurfaceMaps, TextureSource, uv_to_direction};

/// WGSL prelude shared by every scene shader: the group-0 camera uniform
/// (matching `orrery_render::CameraUniform`) and sRGB decoding.
///
/// Maps and palette constants are authored in sRGB and uploaded without
/// conversion, so shaders decode their final color before writing to the
/// sRGB surface.
pub const CAMERA_WGSL: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    // xyz = eye, w = elapsed seconds
    camera_pos: vec4<f32>,
    // width, height, pixel ratio, unused
    viewport: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    let x = max(c, vec3<f32>(0.0));
    let low = x / 12.92;
    let high = pow((x + 0.055) / 1.055, vec3<f32>(2.4));
    return select(high, low, x <= vec3<f32>(0.04045));
}
"#;

/// Prefix a shader body with [`CAMERA_WGSL`].
pub fn shader_source(body: &str) -> String {
    let mut source = String::with_capacity(CAMERA_WGSL.len() + body.len());
    source.push_str(CAMERA_WGSL);
    source.push_str(body);
    source
}

#[cfg(test)]
pub(crate) mod test_support {
    /// `None` on headless machines without an adapter.
    pub(crate) fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }
}
