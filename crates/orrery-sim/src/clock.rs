//! Mission calendar driven by simulation ticks, not wall-clock time.

use chrono::{Local, NaiveDate};
use orrery_config::SimConfig;

/// Display format for the mission date, e.g. `23 Jan 2026`.
pub const DATE_FORMAT: &str = "%d %b %Y";

#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("invalid start date '{input}': {source}")]
    InvalidStartDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(input: &str) -> Result<NaiveDate, ClockError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|source| {
        ClockError::InvalidStartDate {
            input: input.to_string(),
            source,
        }
    })
}

/// Calendar date plus a frame counter that only advances while running.
///
/// The counter is never reset, so pausing mid-day keeps the partial day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedClock {
    date: NaiveDate,
    frame_counter: u64,
    frames_per_day: u32,
}

impl SimulatedClock {
    /// `frames_per_day` of zero is treated as one.
    pub fn new(start: NaiveDate, frames_per_day: u32) -> Self {
        Self {
            date: start,
            frame_counter: 0,
            frames_per_day: frames_per_day.max(1),
        }
    }

    /// Start from the configured date, or today. An unparseable date is
    /// logged and replaced by today.
    pub fn from_config(sim: &SimConfig) -> Self {
        let today = Local::now().date_naive();
        let start = match sim.start_date.as_deref() {
            Some(input) => parse_start_date(input).unwrap_or_else(|err| {
                tracing::warn!("{err}; starting from today");
                today
            }),
            None => today,
        };
        Self::new(start, sim.frames_per_day)
    }

    /// Advance one tick. Returns `true` when the date rolled over.
    pub fn tick(&mut self, running: bool) -> bool {
        if !running {
            return false;
        }
        self.frame_counter += 1;
        if self.frame_counter % u64::from(self.frames_per_day) != 0 {
            return false;
        }
        match self.date.succ_opt() {
            Some(next) => {
                self.date = next;
                tracing::debug!(date = %self.date, "Mission day advanced");
                true
            }
            None => false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Running ticks seen so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Date formatted for the HUD.
    pub fn formatted(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
