//! User-controllable orbit camera.
//!
//! Drags orbit the eye around the target, scroll dollies toward it, and
//! focus changes play a [`CameraTransition`]. Input is accumulated between
//! ticks and applied in [`CameraRig::tick`]. Any user input cancels a
//! transition in progress and continues from the current pose.

use glam::Vec3;
use orrery_config::CameraConfig;

use crate::focus::{CameraPose, OVERVIEW_POSE};
use crate::transition::{CameraTransition, EasingFunction};

/// Keep the eye off the poles so the look-at basis stays well defined.
const MIN_POLAR: f32 = 0.01;

#[derive(Clone, Debug)]
pub struct CameraRig {
    pose: CameraPose,
    transition: Option<CameraTransition>,
    pending_orbit: (f32, f32),
    pending_zoom: f32,
    min_distance: f32,
    max_distance: f32,
    orbit_sensitivity: f32,
    zoom_speed: f32,
    transition_ticks: u32,
    easing: EasingFunction,
}

impl CameraRig {
    /// `tick_rate` converts the configured transition seconds to ticks.
    pub fn new(config: &CameraConfig, tick_rate: f32) -> Self {
        let min_distance = config.min_distance.max(0.01);
        Self {
            pose: OVERVIEW_POSE,
            transition: None,
            pending_orbit: (0.0, 0.0),
            pending_zoom: 0.0,
            min_distance,
            max_distance: config.max_distance.max(min_distance),
            orbit_sensitivity: config.orbit_sensitivity,
            zoom_speed: config.zoom_speed.clamp(0.0, 0.9),
            transition_ticks: (config.transition_seconds.max(0.0) * tick_rate).round() as u32,
            easing: EasingFunction::EaseInOut,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start a smoothed move from the current pose to `to`.
    pub fn move_to(&mut self, to: CameraPose) {
        self.transition = Some(CameraTransition::new(
            self.pose,
            to,
            self.transition_ticks,
            self.easing,
        ));
    }

    /// Queue a drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.pending_orbit.0 += dx;
        self.pending_orbit.1 += dy;
    }

    /// Queue scroll. Positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Apply queued input or advance the active transition.
    pub fn tick(&mut self) {
        let (dx, dy) = std::mem::take(&mut self.pending_orbit);
        let zoom = std::mem::take(&mut self.pending_zoom);
        let has_input = dx != 0.0 || dy != 0.0 || zoom != 0.0;

        if has_input {
            self.transition = None;
            self.apply_orbit(dx, dy);
            self.apply_zoom(zoom);
            return;
        }

        if let Some(transition) = self.transition.as_mut() {
            self.pose = transition.advance();
            if transition.is_finished() {
                self.transition = None;
            }
        }
    }

    fn apply_orbit(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let offset = self.pose.eye - self.pose.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let yaw = offset.x.atan2(offset.z) - dx * self.orbit_sensitivity;
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos() - dy * self.orbit_sensitivity;
        let polar = polar.clamp(MIN_POLAR, std::f32::consts::PI - MIN_POLAR);

        let offset = Vec3::new(
            radius * polar.sin() * yaw.sin(),
            radius * polar.cos(),
            radius * polar.sin() * yaw.cos(),
        );
        self.pose.eye = self.pose.target + offset;
    }

    fn apply_zoom(&mut self, lines: f32) {
        if lines == 0.0 {
            return;
        }
        let offset = self.pose.eye - self.pose.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        let scaled = distance * (1.0 - self.zoom_speed).powf(lines);
        let clamped = scaled.clamp(self.min_distance, self.max_distance);
        self.pose.eye = self.pose.target + offset / distance * clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::pose_for;
    use crate::body::BodyId;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraConfig::default(), 60.0)
    }

    #[test]
    fn test_starts_at_overview() {
        assert_eq!(rig().pose(), OVERVIEW_POSE);
    }

    #[test]
    fn test_move_completes_after_duration() {
        let mut rig = rig();
        let to = pose_for(BodyId::Jupiter);
        rig.move_to(to);
        for _ in 0..60 {
            rig.tick();
        }
        assert!(!rig.is_transitioning());
        assert_eq!(rig.pose(), to);
    }

    #[test]
    fn test_user_input_cancels_transition() {
        let mut rig = rig();
        rig.move_to(pose_for(BodyId::Earth));
        for _ in 0..10 {
            rig.tick();
        }
        let mid = rig.pose();
        rig.orbit(10.0, 0.0);
        rig.tick();
        assert!(!rig.is_transitioning());
        assert!((rig.pose().distance() - mid.distance()).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut rig = rig();
        let before = rig.pose().distance();
        rig.orbit(120.0, -40.0);
        rig.tick();
        assert!((rig.pose().distance() - before).abs() < 1e-3);
        assert_eq!(rig.pose().target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_does_not_flip_over_pole() {
        let mut rig = rig();
        rig.orbit(0.0, 10_000.0);
        rig.tick();
        let offset = rig.pose().eye - rig.pose().target;
        assert!(offset.y > 0.0);
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
    }

    #[test]
    fn test_zoom_clamps_to_limits() {
        let mut rig = rig();
        rig.zoom(1000.0);
        rig.tick();
        assert!((rig.pose().distance() - 2.0).abs() < 1e-3);
        rig.zoom(-1000.0);
        rig.tick();
        assert!((rig.pose().distance() - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_duration_config_snaps() {
        let config = CameraConfig {
            transition_seconds: 0.0,
            ..CameraConfig::default()
        };
        let mut rig = CameraRig::new(&config, 60.0);
        let to = pose_for(BodyId::Sun);
        rig.move_to(to);
        rig.tick();
        assert_eq!(rig.pose(), to);
    }
}
