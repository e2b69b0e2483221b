//! Fixed-timestep frame pacing.
//!
//! The simulation advances in whole ticks of [`FIXED_DT`] regardless of the
//! display refresh rate. Wall time accumulates between frames and each frame
//! drains it into however many ticks fit, so the planets move at the same
//! speed on a 30 Hz laptop and a 144 Hz monitor.

use std::time::Instant;
use tracing::warn;

/// One simulation tick: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame the loop will catch up on. A stall longer than this (a
/// dragged window, a debugger break) is dropped instead of replayed as a burst
/// of ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure wall time since the previous frame and return the number of
    /// ticks to run now.
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` seconds and return the ticks now due.
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        self.update_count += u64::from(steps);
        self.frame_count += 1;
        steps
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds covered by the ticks run so far.
    pub fn total_sim_time(&self) -> f64 {
        self.update_count as f64 * FIXED_DT
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_dt_value() {
        assert!((FIXED_DT - 1.0 / 60.0).abs() < f64::EPSILON * 10.0);
    }

    #[test]
    fn test_one_tick_per_fixed_dt() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(FIXED_DT), 1);
        assert!(game_loop.alpha() < 1e-9);
    }

    #[test]
    fn test_several_ticks_in_a_long_frame() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(3.0 * FIXED_DT + 1e-9), 3);
        assert_eq!(game_loop.update_count(), 3);
    }

    #[test]
    fn test_partial_frame_carries_over() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(0.5 * FIXED_DT), 0);
        assert!((game_loop.alpha() - 0.5).abs() < 1e-9);
        assert_eq!(game_loop.advance(0.6 * FIXED_DT), 1);
        assert!((game_loop.alpha() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut game_loop = GameLoop::new();
        let steps = game_loop.advance(5.0);
        let max_steps = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(steps > 0);
        assert!(steps <= max_steps, "{steps} > {max_steps}");
    }

    #[test]
    fn test_negative_frame_time_runs_nothing() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(-1.0), 0);
        assert_eq!(game_loop.alpha(), 0.0);
    }

    #[test]
    fn test_high_refresh_rate_keeps_tick_rate() {
        let mut game_loop = GameLoop::new();
        let mut total = 0;
        for _ in 0..144 {
            total += game_loop.advance(1.0 / 144.0);
        }
        assert!((59..=60).contains(&total), "got {total} ticks in one second");
        assert_eq!(game_loop.frame_count(), 144);
    }

    #[test]
    fn test_sim_time_matches_ticks() {
        let mut game_loop = GameLoop::new();
        for _ in 0..10 {
            game_loop.advance(FIXED_DT * 2.0 + 1e-9);
        }
        let expected = game_loop.update_count() as f64 * FIXED_DT;
        assert!((game_loop.total_sim_time() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_default_starts_empty() {
        let game_loop = GameLoop::default();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
    }
}
