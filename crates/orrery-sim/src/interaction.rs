//! Pointer-driven surface interaction, smoothed once per tick.
//!
//! Pointer hits only queue a UV sample. The sample is consumed by the next
//! [`InteractionState::step`], so hit testing never races the uniforms the
//! renderer reads.

use glam::Vec2;

/// Per-tick easing factor used when a configured one is not a number.
pub const DEFAULT_SMOOTHING: f32 = 0.1;

/// Clamp an easing factor into `[0, 1]`. Non-finite values fall back to
/// [`DEFAULT_SMOOTHING`].
pub fn sanitize_smoothing(smoothing: f32) -> f32 {
    if smoothing.is_finite() {
        smoothing.clamp(0.0, 1.0)
    } else {
        DEFAULT_SMOOTHING
    }
}

/// What drives a body's interaction strength target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionPolicy {
    /// Target strength is always 1.0. Pointer samples are always accepted.
    #[default]
    AlwaysActive,
    /// Target strength is 1.0 only while the body has camera focus. Pointer
    /// samples and UV smoothing are ignored otherwise.
    FollowsFocus,
    /// Target strength is 1.0 only on ticks that received a pointer sample.
    Hover,
}

/// Smoothed pointer state for one body, matching the shader's
/// `mouse_uv` and `interactive` inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionState {
    mouse_uv: Vec2,
    target_uv: Vec2,
    strength: f32,
    pending: Option<Vec2>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mouse_uv: Vec2::ZERO,
            target_uv: Vec2::ZERO,
            strength: 0.0,
            pending: None,
        }
    }
}

impl InteractionState {
    /// Record a pointer hit at `uv`. Only the latest sample per tick is kept.
    pub fn queue_pointer(&mut self, uv: Vec2) {
        if uv.is_finite() {
            self.pending = Some(uv);
        }
    }

    /// Consume the pending sample and ease UV and strength toward their targets.
    pub fn step(&mut self, policy: InteractionPolicy, focused: bool, smoothing: f32) {
        let smoothing = sanitize_smoothing(smoothing);
        let sample = self.pending.take();

        let accepting = policy != InteractionPolicy::FollowsFocus || focused;
        if accepting && let Some(uv) = sample {
            self.target_uv = uv;
        }

        let target_strength = match policy {
            InteractionPolicy::AlwaysActive => 1.0,
            InteractionPolicy::FollowsFocus => {
                if focused {
                    1.0
                } else {
                    0.0
                }
            }
            InteractionPolicy::Hover => {
                if sample.is_some() {
                    1.0
                } else {
                    0.0
                }
            }
        };
        self.strength =
            (self.strength + (target_strength - self.strength) * smoothing).clamp(0.0, 1.0);

        if accepting {
            self.mouse_uv = self.mouse_uv.lerp(self.target_uv, smoothing);
        }
    }

    /// Smoothed UV fed to the shader.
    pub fn mouse_uv(&self) -> Vec2 {
        self.mouse_uv
    }

    pub fn target_uv(&self) -> Vec2 {
        self.target_uv
    }

    /// Smoothed strength in `[0, 1]`.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_active_converges_to_one() {
        let mut state = InteractionState::default();
        for _ in 0..200 {
            state.step(InteractionPolicy::AlwaysActive, false, 0.1);
        }
        assert!((state.strength() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_strength_moves_a_tenth_per_tick() {
        let mut state = InteractionState::default();
        state.step(InteractionPolicy::AlwaysActive, false, 0.1);
        assert!((state.strength() - 0.1).abs() < 1e-6);
        state.step(InteractionPolicy::AlwaysActive, false, 0.1);
        assert!((state.strength() - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_strength_stays_in_unit_range() {
        let mut state = InteractionState::default();
        let policies = [
            InteractionPolicy::AlwaysActive,
            InteractionPolicy::FollowsFocus,
            InteractionPolicy::Hover,
        ];
        let smoothings = [0.0, 0.1, 0.5, 1.0, 2.0, -1.0];
        for i in 0..600 {
            if i % 3 == 0 {
                state.queue_pointer(Vec2::new(i as f32 * 0.37, -(i as f32)));
            }
            state.step(policies[i % 3], i % 2 == 0, smoothings[i % smoothings.len()]);
            assert!((0.0..=1.0).contains(&state.strength()));
        }
    }

    #[test]
    fn test_nan_smoothing_uses_default_rate() {
        let mut state = InteractionState::default();
        state.queue_pointer(Vec2::new(0.5, 0.5));
        state.step(InteractionPolicy::AlwaysActive, false, f32::NAN);
        assert!((state.strength() - DEFAULT_SMOOTHING).abs() < 1e-6);
        assert!(state.mouse_uv().is_finite());
        for smoothing in [f32::INFINITY, f32::NEG_INFINITY] {
            state.step(InteractionPolicy::Hover, false, smoothing);
            assert!((0.0..=1.0).contains(&state.strength()));
            assert!(state.mouse_uv().is_finite());
        }
    }

    #[test]
    fn test_pending_sample_consumed_at_step() {
        let mut state = InteractionState::default();
        state.queue_pointer(Vec2::new(0.5, 0.5));
        assert!(state.has_pending());
        assert_eq!(state.target_uv(), Vec2::ZERO);
        state.step(InteractionPolicy::AlwaysActive, false, 0.1);
        assert!(!state.has_pending());
        assert_eq!(state.target_uv(), Vec2::new(0.5, 0.5));
        assert!((state.mouse_uv() - Vec2::splat(0.05)).length() < 1e-6);
    }

    #[test]
    fn test_follows_focus_ignores_pointer_when_unfocused() {
        let mut state = InteractionState::default();
        state.queue_pointer(Vec2::new(0.7, 0.2));
        state.step(InteractionPolicy::FollowsFocus, false, 0.1);
        assert_eq!(state.target_uv(), Vec2::ZERO);
        assert_eq!(state.mouse_uv(), Vec2::ZERO);
        assert_eq!(state.strength(), 0.0);
    }

    #[test]
    fn test_follows_focus_fades_out_after_focus_lost() {
        let mut state = InteractionState::default();
        for _ in 0..100 {
            state.queue_pointer(Vec2::new(0.3, 0.6));
            state.step(InteractionPolicy::FollowsFocus, true, 0.1);
        }
        assert!(state.strength() > 0.99);
        let uv = state.mouse_uv();
        for _ in 0..100 {
            state.step(InteractionPolicy::FollowsFocus, false, 0.1);
        }
        assert!(state.strength() < 0.01);
        assert_eq!(state.mouse_uv(), uv);
    }

    #[test]
    fn test_hover_drops_without_samples() {
        let mut state = InteractionState::default();
        for _ in 0..50 {
            state.queue_pointer(Vec2::new(0.5, 0.5));
            state.step(InteractionPolicy::Hover, false, 0.1);
        }
        let hovered = state.strength();
        assert!(hovered > 0.9);
        for _ in 0..50 {
            state.step(InteractionPolicy::Hover, false, 0.1);
        }
        assert!(state.strength() < 0.01);
    }

    #[test]
    fn test_non_finite_sample_dropped() {
        let mut state = InteractionState::default();
        state.queue_pointer(Vec2::new(f32::NAN, 0.5));
        assert!(!state.has_pending());
    }
}
