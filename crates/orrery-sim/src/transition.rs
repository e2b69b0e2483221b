//! Smooth camera moves between two look-at poses over a fixed number of
//! ticks, with easing.

use crate::focus::CameraPose;

/// A camera move in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
    pub from: CameraPose,
    pub to: CameraPose,
    /// Total duration in ticks (at least 1).
    pub duration_ticks: u32,
    /// Ticks elapsed so far (0..=duration_ticks).
    pub elapsed_ticks: u32,
    pub easing: EasingFunction,
}

impl CameraTransition {
    /// A duration of 0 is clamped to one tick.
    pub fn new(from: CameraPose, to: CameraPose, duration_ticks: u32, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration_ticks: duration_ticks.max(1),
            elapsed_ticks: 0,
            easing,
        }
    }

    /// Snap to `to` on the next tick.
    pub fn instant(from: CameraPose, to: CameraPose) -> Self {
        Self::new(from, to, 1, EasingFunction::Linear)
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed_ticks as f32 / self.duration_ticks as f32).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }

    /// Pose at the current progress.
    pub fn current(&self) -> CameraPose {
        if self.is_finished() {
            return self.to;
        }
        let t = self.easing.apply(self.progress());
        CameraPose {
            eye: self.from.eye.lerp(self.to.eye, t),
            target: self.from.target.lerp(self.to.target, t),
        }
    }

    /// Advance one tick and return the new pose.
    pub fn advance(&mut self) -> CameraPose {
        self.elapsed_ticks = (self.elapsed_ticks + 1).min(self.duration_ticks);
        self.current()
    }
}

/// Easing curves for camera transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    #[default]
    EaseOut,
    /// Slow start, fast middle, slow end.
    EaseInOut,
}

impl EasingFunction {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}
