//! Assembles every renderer of the solar system into one pass.
//!
//! Draw order matters because most layers blend: the skybox and the sun go
//! first, then the opaque occluder shells that let near planets hide far
//! ones, then the point clouds, oceans, and rings, and finally the orbit
//! lines and additive glows on top.

use glam::{Mat4, Vec2};
use orrery_config::{CameraConfig, Config, OrbitLineMode};
use orrery_render::{
    Camera, CameraBinding, DepthBuffer, FrameEncoder, RenderContext, RenderPassBuilder,
};
use orrery_sim::{BodyId, CameraPose, CelestialBody, Ray, SolarSystem};
use orrery_space::{
    AsteroidBelt, AsteroidField, OceanRenderer, OrbitLineRenderer, PointCloudRenderer,
    RingRenderer, ShellRenderer, SkyboxRenderer, StarfieldCubemap, StarfieldGenerator,
    SunRenderer, TextureSource,
};
use tracing::{debug, info};

/// Pixel size of each skybox cubemap face.
pub const SKYBOX_FACE_SIZE: u32 = 1024;

pub struct SceneRenderer {
    camera: Camera,
    camera_binding: CameraBinding,
    depth: DepthBuffer,
    pass: RenderPassBuilder,
    skybox: SkyboxRenderer,
    sun: SunRenderer,
    shells: ShellRenderer,
    belt: AsteroidBelt,
    planets: PointCloudRenderer,
    oceans: Vec<OceanRenderer>,
    rings: RingRenderer,
    orbit_lines: OrbitLineRenderer,
    orbit_line_mode: OrbitLineMode,
}

impl SceneRenderer {
    pub fn new(
        gpu: &RenderContext,
        config: &Config,
        system: &SolarSystem,
        textures: &TextureSource,
    ) -> Self {
        let device = &gpu.device;
        let queue = gpu.queue.as_ref();
        let format = gpu.surface_format;
        let (width, height) = gpu.size();

        let camera = camera_from_config(&config.camera, system.camera_pose(), width, height);
        let camera_binding = CameraBinding::new(device);
        let depth = DepthBuffer::new(device, width, height);

        let stars = StarfieldGenerator::new(config.render.star_seed, config.render.star_count)
            .generate();
        let cubemap = StarfieldCubemap::render(&stars, SKYBOX_FACE_SIZE);
        let skybox = SkyboxRenderer::new(device, queue, format, &camera_binding, &cubemap);
        debug!(stars = stars.len(), "Skybox baked");

        let sun = SunRenderer::new(device, format, &camera_binding);
        let mut shells = ShellRenderer::new(device, format, &camera_binding);
        let mut planets = PointCloudRenderer::new(
            device,
            format,
            &camera_binding,
            config.render.point_detail_scale,
        );
        let mut rings = RingRenderer::new(device, format, &camera_binding);
        let mut oceans = Vec::new();

        for body in system.bodies() {
            shells.add_body(device, body);
            let Some(surface) = body.surface else {
                continue;
            };
            let maps = textures.surface_maps(body.id);
            planets.add_planet(device, queue, body, &maps);
            if surface.ocean {
                oceans.push(OceanRenderer::new(
                    device,
                    queue,
                    format,
                    &camera_binding,
                    body.id,
                    &maps.color,
                ));
            }
            if body.ring.is_some() {
                rings.add_ring(device, queue, body, &textures.ring_map(body.id));
            }
        }

        let field = AsteroidField::new(config.render.asteroid_seed, config.render.asteroid_count);
        let belt = AsteroidBelt::new(device, format, &camera_binding, &field);
        let orbit_lines =
            OrbitLineRenderer::new(device, format, &camera_binding, &orbit_radii(system.bodies()));

        info!(
            width,
            height,
            oceans = oceans.len(),
            "Scene ready ({} bodies)",
            system.bodies().len()
        );

        Self {
            camera,
            camera_binding,
            depth,
            pass: RenderPassBuilder::new()
                .depth(DepthBuffer::CLEAR_VALUE)
                .label("scene-pass"),
            skybox,
            sun,
            shells,
            belt,
            planets,
            oceans,
            rings,
            orbit_lines,
            orbit_line_mode: config.render.orbit_lines,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        self.camera.set_aspect_ratio(width as f32, height as f32);
    }

    /// Move the camera to the rig's pose. Picking uses the synced camera.
    pub fn sync_camera(&mut self, pose: CameraPose) {
        self.camera.eye = pose.eye;
        self.camera.target = pose.target;
    }

    /// World ray under a cursor position in physical pixels.
    pub fn pointer_ray(&self, cursor: Vec2, viewport: Vec2) -> Option<Ray> {
        Ray::from_screen(cursor, viewport, self.inverse_view_projection())
    }

    fn inverse_view_projection(&self) -> Mat4 {
        self.camera.view_projection_matrix().inverse()
    }

    /// Upload this frame's camera and per-body uniforms.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        system: &SolarSystem,
        viewport: (u32, u32),
        pixel_ratio: f32,
    ) {
        self.sync_camera(system.camera_pose());
        let uniform = self
            .camera
            .to_uniform(viewport, pixel_ratio, system.elapsed_seconds());
        self.camera_binding.update(queue, &uniform);

        self.sun.update(queue, system);
        self.shells.update(queue, system);
        self.belt.update(queue, system.belt_rotation());
        self.planets.update(queue, system);
        for ocean in &self.oceans {
            ocean.update(queue, system);
        }
        self.rings.update(queue, system);
        self.orbit_lines
            .set_visible(self.orbit_line_mode.visible(system.is_running()));
    }

    pub fn render(&self, frame: &mut FrameEncoder) {
        let mut pass = frame.begin_render_pass(&self.pass, Some(&self.depth.view));
        pass.set_bind_group(0, &self.camera_binding.bind_group, &[]);

        self.skybox.render(&mut pass);
        self.sun.render(&mut pass);
        self.shells.render_occluders(&mut pass);
        self.belt.render(&mut pass);
        self.planets.render(&mut pass);
        for ocean in &self.oceans {
            ocean.render(&mut pass);
        }
        self.rings.render(&mut pass);
        self.orbit_lines.render(&mut pass);
        self.shells.render_glows(&mut pass);
    }
}

/// Scene camera for `pose` with the configured lens.
pub fn camera_from_config(
    config: &CameraConfig,
    pose: CameraPose,
    width: u32,
    height: u32,
) -> Camera {
    let mut camera = Camera {
        eye: pose.eye,
        target: pose.target,
        fov_y: config.fov_deg.to_radians(),
        near: config.near,
        far: config.far,
        ..Camera::default()
    };
    camera.set_aspect_ratio(width as f32, height as f32);
    camera
}

/// Radii of the orbit guides: one per body that orbits the sun.
pub fn orbit_radii(bodies: &[CelestialBody]) -> Vec<f32> {
    bodies
        .iter()
        .filter(|body| body.id != BodyId::Sun && body.orbit_radius > 0.0)
        .map(|body| body.orbit_radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_sim::{OVERVIEW_POSE, catalog};

    #[test]
    fn test_one_orbit_per_planet() {
        let radii = orbit_radii(&catalog());
        assert_eq!(radii.len(), 8);
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_camera_uses_configured_lens() {
        let config = CameraConfig {
            fov_deg: 60.0,
            ..CameraConfig::default()
        };
        let camera = camera_from_config(&config, OVERVIEW_POSE, 1920, 1080);
        assert!((camera.fov_y - 60f32.to_radians()).abs() < 1e-6);
        assert!((camera.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(camera.eye, OVERVIEW_POSE.eye);
        assert_eq!(camera.target, OVERVIEW_POSE.target);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = camera_from_config(&CameraConfig::default(), OVERVIEW_POSE, 800, 600);
        let inv = camera.view_projection_matrix().inverse();
        let ray = Ray::from_screen(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), inv)
            .expect("center ray");
        let to_target = (OVERVIEW_POSE.target - OVERVIEW_POSE.eye).normalize();
        assert!(ray.dir.dot(to_target) > 0.999);
    }
}
