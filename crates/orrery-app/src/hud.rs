//! Window-title heads-up display.
//!
//! The viewer has no in-scene text, so the mission date, the play button
//! state, the speed, and the focused body's headline figure go in the title
//! bar. The full info record is written to the log when focus changes.

use std::time::{Duration, Instant};

use orrery_sim::{BodyId, PlanetInfo, SolarSystem};

const SEPARATOR: &str = " | ";

/// What the title shows for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub date: String,
    pub running: bool,
    pub speed: f32,
    pub focus: Option<&'static PlanetInfo>,
    pub hovered: Option<BodyId>,
    pub fps: Option<u32>,
}

impl HudSnapshot {
    pub fn capture(system: &SolarSystem, fps: Option<u32>) -> Self {
        Self {
            date: system.clock().formatted(),
            running: system.is_running(),
            speed: system.speed_multiplier(),
            focus: system.info(),
            hovered: system.hovered(),
            fps,
        }
    }
}

/// Label of the play/pause control: the action it would perform.
pub fn play_label(running: bool) -> &'static str {
    if running { "PAUSE" } else { "PLAY" }
}

pub fn format_title(base: &str, hud: &HudSnapshot) -> String {
    let mut parts = vec![
        base.to_string(),
        format!("Mission Time {}", hud.date),
        play_label(hud.running).to_string(),
        format!("{:.1}x", hud.speed),
    ];
    if let Some(info) = hud.focus {
        let headline = &info.stats[0];
        parts.push(format!("{}: {} {}", info.name, headline.label, headline.value));
    }
    if let Some(hovered) = hud.hovered
        && hud.focus.map(|info| info.id) != Some(hovered)
    {
        parts.push(format!("hover: {}", hovered.name()));
    }
    if let Some(fps) = hud.fps {
        parts.push(format!("{fps} fps"));
    }
    parts.join(SEPARATOR)
}

/// Frames per second over one-second windows.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: Option<u32>,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            fps: None,
        }
    }

    /// Count a frame presented at `now`. The reading only changes when a
    /// window closes.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= Self::WINDOW {
            let rate = f64::from(self.frames) / elapsed.as_secs_f64();
            self.fps = Some(rate.round() as u32);
            self.frames = 0;
            self.window_start = Some(now);
        }
        self.fps
    }

    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_config::Config;

    fn snapshot() -> HudSnapshot {
        HudSnapshot {
            date: "23 Jan 2026".to_string(),
            running: false,
            speed: 1.0,
            focus: None,
            hovered: None,
            fps: None,
        }
    }

    #[test]
    fn test_play_label_names_the_next_action() {
        assert_eq!(play_label(true), "PAUSE");
        assert_eq!(play_label(false), "PLAY");
    }

    #[test]
    fn test_minimal_title() {
        assert_eq!(
            format_title("Orrery", &snapshot()),
            "Orrery | Mission Time 23 Jan 2026 | PLAY | 1.0x"
        );
    }

    #[test]
    fn test_title_with_focus_hover_and_fps() {
        let mut config = Config::default();
        config.sim.start_running = true;
        let mut system = SolarSystem::new(&config);
        system.select_str("EARTH").unwrap();

        let hud = HudSnapshot {
            date: "23 Jan 2026".to_string(),
            hovered: Some(BodyId::Mars),
            fps: Some(60),
            ..HudSnapshot::capture(&system, None)
        };
        assert_eq!(
            format_title("Orrery", &hud),
            "Orrery | Mission Time 23 Jan 2026 | PLAY | 1.0x | \
             Earth: Distance from Sun 149.6 million km | hover: Mars | 60 fps"
        );
    }

    #[test]
    fn test_hovering_the_focused_body_is_not_repeated() {
        let mut system = SolarSystem::new(&Config::default());
        system.select_str("MARS").unwrap();
        let hud = HudSnapshot {
            hovered: Some(BodyId::Mars),
            ..HudSnapshot::capture(&system, None)
        };
        let title = format_title("Orrery", &hud);
        assert!(title.contains("Mars:"));
        assert!(!title.contains("hover:"));
    }

    #[test]
    fn test_capture_reads_speed_and_state() {
        let mut config = Config::default();
        config.sim.start_running = true;
        config.sim.speed_multiplier = 2.0;
        let system = SolarSystem::new(&config);
        let hud = HudSnapshot::capture(&system, Some(30));
        assert!(hud.running);
        assert!((hud.speed - 2.0).abs() < 1e-6);
        assert!(hud.focus.is_none());
        assert_eq!(hud.fps, Some(30));
        assert!(format_title("Orrery", &hud).contains("PAUSE | 2.0x"));
    }

    #[test]
    fn test_fps_counter_reports_after_one_second() {
        let mut counter = FpsCounter::new();
        let start = Instant::now();
        for i in 0..60 {
            assert_eq!(counter.frame(start + Duration::from_millis(i * 10)), None);
        }
        let reading = counter.frame(start + Duration::from_secs(1));
        assert_eq!(reading, Some(61));
        assert_eq!(counter.fps(), Some(61));
    }
}
