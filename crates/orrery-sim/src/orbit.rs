//! Per-body orbital angle.
//!
//! While running, the angle accumulates without bound. While aligning, it
//! eases back toward zero so every planet lines up on the +X axis, which
//! is where the fixed focus poses expect to find them.

use orrery_config::SimConfig;

/// Below this magnitude an aligning orbit counts as converged.
pub const ALIGN_EPSILON: f32 = 1e-4;

/// Global run state shared by every orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitMode {
    Running,
    #[default]
    Aligning,
}

impl OrbitMode {
    pub fn is_running(self) -> bool {
        self == OrbitMode::Running
    }

    /// The opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            OrbitMode::Running => OrbitMode::Aligning,
            OrbitMode::Aligning => OrbitMode::Running,
        }
    }
}

/// Step constants shared by every orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    /// Radians per tick per unit of angular speed.
    pub step_factor: f32,
    /// Fraction of the remaining angle removed per aligning tick.
    pub align_factor: f32,
    /// Scales running advance only.
    pub speed_multiplier: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            step_factor: 0.005,
            align_factor: 0.05,
            speed_multiplier: 1.0,
        }
    }
}

impl From<&SimConfig> for OrbitParams {
    fn from(sim: &SimConfig) -> Self {
        Self {
            step_factor: sim.step_factor,
            align_factor: sim.align_factor.clamp(0.0, 1.0),
            speed_multiplier: sim.speed_multiplier,
        }
    }
}

/// Orbital angle of one body around the sun.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitController {
    angular_speed: f32,
    angle: f32,
}

impl OrbitController {
    pub fn new(angular_speed: f32) -> Self {
        Self {
            angular_speed,
            angle: 0.0,
        }
    }

    /// Current angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    /// Advance one tick and return the new angle.
    pub fn step(&mut self, mode: OrbitMode, params: &OrbitParams) -> f32 {
        let next = match mode {
            OrbitMode::Running => {
                self.angle + self.angular_speed * params.step_factor * params.speed_multiplier
            }
            OrbitMode::Aligning => self.angle + (0.0 - self.angle) * params.align_factor,
        };
        // Keep the last good value rather than poisoning the transform chain.
        if next.is_finite() {
            self.angle = next;
        }
        self.angle
    }

    /// True once an aligning orbit has settled at zero.
    pub fn is_aligned(&self) -> bool {
        self.angle.abs() < ALIGN_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_adds_speed_times_step() {
        let params = OrbitParams::default();
        let mut orbit = OrbitController::new(1.5);
        orbit.step(OrbitMode::Running, &params);
        assert!((orbit.angle() - 1.5 * 0.005).abs() < 1e-7);
        orbit.step(OrbitMode::Running, &params);
        assert!((orbit.angle() - 2.0 * 1.5 * 0.005).abs() < 1e-7);
    }

    #[test]
    fn test_earth_200_ticks_is_one_radian() {
        let params = OrbitParams::default();
        let mut orbit = OrbitController::new(1.0);
        for _ in 0..200 {
            orbit.step(OrbitMode::Running, &params);
        }
        assert!((orbit.angle() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_aligning_shrinks_by_fixed_ratio() {
        let params = OrbitParams::default();
        let mut orbit = OrbitController::new(1.0);
        for _ in 0..100 {
            orbit.step(OrbitMode::Running, &params);
        }
        let mut previous = orbit.angle();
        for _ in 0..20 {
            let next = orbit.step(OrbitMode::Aligning, &params);
            assert!((next / previous - 0.95).abs() < 1e-5);
            previous = next;
        }
    }

    #[test]
    fn test_aligning_converges() {
        let params = OrbitParams::default();
        let mut orbit = OrbitController::new(0.2);
        for _ in 0..1000 {
            orbit.step(OrbitMode::Running, &params);
        }
        assert!(!orbit.is_aligned());
        for _ in 0..400 {
            orbit.step(OrbitMode::Aligning, &params);
        }
        assert!(orbit.is_aligned());
    }

    #[test]
    fn test_speed_multiplier_scales_running_only() {
        let params = OrbitParams {
            speed_multiplier: 2.0,
            ..OrbitParams::default()
        };
        let mut orbit = OrbitController::new(1.0);
        orbit.step(OrbitMode::Running, &params);
        assert!((orbit.angle() - 0.01).abs() < 1e-7);
        orbit.step(OrbitMode::Aligning, &params);
        assert!((orbit.angle() - 0.0095).abs() < 1e-7);
    }

    #[test]
    fn test_non_finite_step_is_rejected() {
        let params = OrbitParams {
            speed_multiplier: f32::INFINITY,
            ..OrbitParams::default()
        };
        let mut orbit = OrbitController::new(1.0);
        orbit.step(OrbitMode::Running, &OrbitParams::default());
        let before = orbit.angle();
        orbit.step(OrbitMode::Running, &params);
        assert_eq!(orbit.angle(), before);
        assert!(orbit.angle().is_finite());
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(OrbitMode::default(), OrbitMode::Aligning);
        assert_eq!(OrbitMode::Aligning.toggled(), OrbitMode::Running);
        assert!(OrbitMode::Running.is_running());
    }
}
