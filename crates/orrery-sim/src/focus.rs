//! Camera focus state machine.
//!
//! Focus is either nothing or exactly one body. Every focus command pins the
//! planets back into alignment, since the framing poses assume each planet
//! sits at its orbital radius on the +X axis.

use std::str::FromStr;

use glam::Vec3;

use crate::body::BodyId;
use crate::orbit::OrbitMode;

/// Camera eye and look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Eye-to-target distance.
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

/// Wide view of the whole system.
pub const OVERVIEW_POSE: CameraPose =
    CameraPose::new(Vec3::new(0.0, 15.0, 40.0), Vec3::new(0.0, 0.0, 0.0));

/// Framing pose for a body, assuming it sits aligned on the +X axis.
pub fn pose_for(body: BodyId) -> CameraPose {
    let (eye, target) = match body {
        BodyId::Sun => (Vec3::new(6.0, 2.0, 6.0), Vec3::ZERO),
        BodyId::Mercury => (Vec3::new(8.0, 1.0, 2.0), Vec3::new(6.0, 0.0, 0.0)),
        BodyId::Venus => (Vec3::new(10.5, 1.5, 2.5), Vec3::new(8.0, 0.0, 0.0)),
        BodyId::Earth => (Vec3::new(12.5, 1.5, 2.5), Vec3::new(10.0, 0.0, 0.0)),
        BodyId::Mars => (Vec3::new(18.0, 1.5, 2.5), Vec3::new(16.0, 0.0, 0.0)),
        BodyId::Jupiter => (Vec3::new(30.0, 4.0, 8.0), Vec3::new(24.0, 0.0, 0.0)),
        BodyId::Saturn => (Vec3::new(40.0, 5.0, 10.0), Vec3::new(32.0, 0.0, 0.0)),
        BodyId::Uranus => (Vec3::new(50.0, 6.0, 12.0), Vec3::new(40.0, 0.0, 0.0)),
        BodyId::Neptune => (Vec3::new(56.0, 5.0, 10.0), Vec3::new(48.0, 0.0, 0.0)),
    };
    CameraPose::new(eye, target)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("unknown focus target '{0}'")]
    UnknownTarget(String),
}

/// A request to change camera focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusCommand {
    Select(BodyId),
    Reset,
}

impl FromStr for FocusCommand {
    type Err = FocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("RESET") {
            return Ok(FocusCommand::Reset);
        }
        s.parse::<BodyId>().map(FocusCommand::Select)
    }
}

/// What the caller must do after a focus change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTransition {
    /// Pose to move the camera to.
    pub pose: CameraPose,
    /// Run state to switch to.
    pub mode: OrbitMode,
}

/// Tracks the focused body, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraFocusController {
    focus: Option<BodyId>,
}

impl CameraFocusController {
    pub fn focus(&self) -> Option<BodyId> {
        self.focus
    }

    /// Apply a focus command. Re-selecting the current body still returns
    /// a move so the camera re-frames after user drags.
    pub fn apply(&mut self, command: FocusCommand) -> FocusTransition {
        let pose = match command {
            FocusCommand::Select(body) => {
                self.focus = Some(body);
                pose_for(body)
            }
            FocusCommand::Reset => {
                self.focus = None;
                OVERVIEW_POSE
            }
        };
        FocusTransition {
            pose,
            mode: OrbitMode::Aligning,
        }
    }

    /// Parse and apply a textual target. Unknown targets leave state untouched.
    pub fn apply_str(&mut self, target: &str) -> Result<FocusTransition, FocusError> {
        let command = target.parse::<FocusCommand>()?;
        Ok(self.apply(command))
    }

    /// Play/pause. From aligned: run, clear focus, and return to the overview.
    /// From running: align in place without moving the camera.
    pub fn toggle_play(&mut self, mode: OrbitMode) -> (OrbitMode, Option<CameraPose>) {
        match mode {
            OrbitMode::Aligning => {
                self.focus = None;
                (OrbitMode::Running, Some(OVERVIEW_POSE))
            }
            OrbitMode::Running => (OrbitMode::Aligning, None),
        }
    }

    /// Drop focus without moving the camera, e.g. when the info panel closes.
    pub fn clear(&mut self) {
        self.focus = None;
    }
}
