//! Frame-driven simulation state for the orrery.
//!
//! Everything here is plain data advanced one fixed tick at a time: orbital
//! angles, the mission calendar, pointer interaction smoothing, camera focus
//! and camera motion. Renderers read from [`SolarSystem`] after each tick.

pub mod body;
pub mod camera_rig;
pub mod clock;
pub mod focus;
pub mod info;
pub mod interaction;
pub mod orbit;
pub mod picking;
pub mod system;
pub mod transition;

pub use body::{
    BASE_SCALE, BodyId, CelestialBody, GlowStyle, Highlight, PointSize, RingStyle, Shading,
    SurfaceStyle, catalog,
};
pub use camera_rig::CameraRig;
pub use clock::{ClockError, SimulatedClock};
pub use focus::{CameraFocusController, CameraPose, FocusCommand, FocusError, OVERVIEW_POSE};
pub use info::{PlanetInfo, Stat, INFO_FOOTER};
pub use interaction::{InteractionPolicy, InteractionState, sanitize_smoothing};
pub use orbit::{OrbitController, OrbitMode, OrbitParams};
pub use picking::{PickHit, Ray};
pub use system::{BodyState, SolarSystem, TickInput};
pub use transition::{CameraTransition, EasingFunction};
