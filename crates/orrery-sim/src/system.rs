//! The whole simulated system: bodies, run state, calendar, focus, camera.
//!
//! One call to [`SolarSystem::tick`] is one simulation frame. Inside a tick
//! the order is fixed: orbits, pointer picking and interaction smoothing,
//! camera, calendar, then body spin.

use glam::{Mat4, Vec2, Vec3};
use orrery_config::{Config, MAX_SPEED_MULTIPLIER, MIN_SPEED_MULTIPLIER};

use crate::body::{BodyId, CelestialBody, SUN_CORE_RADIUS, catalog};
use crate::camera_rig::CameraRig;
use crate::clock::SimulatedClock;
use crate::focus::{CameraFocusController, CameraPose, FocusCommand, FocusError};
use crate::info::{self, PlanetInfo};
use crate::interaction::{InteractionPolicy, InteractionState, sanitize_smoothing};
use crate::orbit::{OrbitController, OrbitMode, OrbitParams};
use crate::picking::{self, PickHit, Ray};

/// Radians the asteroid belt turns per tick.
pub const BELT_SPIN_PER_TICK: f32 = 0.0005;

/// Mutable per-body state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub orbit: OrbitController,
    /// Accumulated spin about the local Y axis.
    pub spin: f32,
    pub interaction: InteractionState,
}

/// Input sampled by the app just before a tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    /// Ray under the cursor, or `None` when the cursor left the window.
    pub pointer: Option<Ray>,
}

pub struct SolarSystem {
    bodies: [CelestialBody; 9],
    states: [BodyState; 9],
    mode: OrbitMode,
    params: OrbitParams,
    clock: SimulatedClock,
    focus: CameraFocusController,
    rig: CameraRig,
    smoothing: f32,
    respect_hover: bool,
    belt_spin: f32,
    hovered: Option<BodyId>,
    ticks: u64,
}

impl SolarSystem {
    /// Simulation ticks per second.
    pub const TICK_RATE: f32 = 60.0;

    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SimulatedClock::from_config(&config.sim))
    }

    /// Build with an explicit clock, for deterministic dates.
    pub fn with_clock(config: &Config, clock: SimulatedClock) -> Self {
        let bodies = catalog();
        let states = bodies.map(|body| BodyState {
            orbit: OrbitController::new(body.angular_speed),
            spin: 0.0,
            interaction: InteractionState::default(),
        });
        let mode = if config.sim.start_running {
            OrbitMode::Running
        } else {
            OrbitMode::Aligning
        };
        let mut params = OrbitParams::from(&config.sim);
        params.speed_multiplier = clamp_speed(params.speed_multiplier);

        Self {
            bodies,
            states,
            mode,
            params,
            clock,
            focus: CameraFocusController::default(),
            rig: CameraRig::new(&config.camera, Self::TICK_RATE),
            smoothing: sanitize_smoothing(config.sim.interaction_smoothing),
            respect_hover: config.interaction.respect_hover,
            belt_spin: 0.0,
            hovered: None,
            ticks: 0,
        }
    }

    /// Advance one simulation frame.
    pub fn tick(&mut self, input: TickInput) {
        for state in &mut self.states {
            state.orbit.step(self.mode, &self.params);
        }

        self.hovered = None;
        if let Some(ray) = input.pointer
            && let Some(hit) = self.pick(&ray)
        {
            self.hovered = Some(hit.body);
            self.queue_pointer(hit.body, hit.uv);
        }

        let focus = self.focus.focus();
        for (body, state) in self.bodies.iter().zip(self.states.iter_mut()) {
            let policy = effective_policy(body.interaction, self.respect_hover);
            state
                .interaction
                .step(policy, focus == Some(body.id), self.smoothing);
        }

        self.rig.tick();
        self.clock.tick(self.mode.is_running());

        for (body, state) in self.bodies.iter().zip(self.states.iter_mut()) {
            state.spin += body.spin_per_tick;
        }
        self.belt_spin += BELT_SPIN_PER_TICK;
        self.ticks += 1;
    }

    /// Queue a pointer sample for `body`, consumed at the next tick.
    /// Bodies without a point-cloud surface ignore samples.
    pub fn queue_pointer(&mut self, body: BodyId, uv: Vec2) {
        if self.bodies[body.index()].surface.is_some() {
            self.states[body.index()].interaction.queue_pointer(uv);
        }
    }

    /// Nearest body under `ray`, using current transforms.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        picking::pick_nearest(
            ray,
            BodyId::ALL
                .into_iter()
                .map(|id| (id, self.body_matrix(id), self.local_pick_radius(id))),
        )
    }

    /// Select whatever body is under `ray`. Returns the selected body.
    pub fn click(&mut self, ray: &Ray) -> Option<BodyId> {
        let hit = self.pick(ray)?;
        self.select(FocusCommand::Select(hit.body));
        Some(hit.body)
    }

    /// Apply a focus command: move the camera and pin the planets into
    /// alignment.
    pub fn select(&mut self, command: FocusCommand) {
        let transition = self.focus.apply(command);
        if self.mode != transition.mode {
            tracing::info!("Orbits aligning for focus change");
        }
        self.mode = transition.mode;
        self.rig.move_to(transition.pose);
        match info::resolve(self.focus.focus()) {
            Some(info) => tracing::info!(body = info.name, "{}", info.summary()),
            None => tracing::info!("Focus reset to overview"),
        }
    }

    /// Parse and apply a textual focus target. Unknown targets are
    /// rejected without touching any state.
    pub fn select_str(&mut self, target: &str) -> Result<(), FocusError> {
        let command = target.parse::<FocusCommand>()?;
        self.select(command);
        Ok(())
    }

    /// Play/pause.
    pub fn toggle_play(&mut self) {
        let (mode, pose) = self.focus.toggle_play(self.mode);
        self.mode = mode;
        if let Some(pose) = pose {
            self.rig.move_to(pose);
        }
        tracing::info!(running = mode.is_running(), "Play state toggled");
    }

    /// Close the info panel: focus clears, the camera stays put.
    pub fn close_info(&mut self) {
        if let Some(info) = self.info() {
            tracing::info!(body = info.name, "Info closed");
        }
        self.focus.clear();
    }

    /// Multiply the speed multiplier by `factor`, clamped to the allowed range.
    pub fn scale_speed(&mut self, factor: f32) {
        self.params.speed_multiplier = clamp_speed(self.params.speed_multiplier * factor);
        tracing::info!(speed = self.params.speed_multiplier, "Speed multiplier changed");
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.params.speed_multiplier
    }

    /// Queue a camera drag in pixels.
    pub fn orbit_camera(&mut self, dx: f32, dy: f32) {
        self.rig.orbit(dx, dy);
    }

    /// Queue a camera dolly in scroll lines. Positive moves closer.
    pub fn zoom_camera(&mut self, lines: f32) {
        self.rig.zoom(lines);
    }

    pub fn mode(&self) -> OrbitMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode.is_running()
    }

    pub fn focus(&self) -> Option<BodyId> {
        self.focus.focus()
    }

    /// Info record for the focused body.
    pub fn info(&self) -> Option<&'static PlanetInfo> {
        info::resolve(self.focus.focus())
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.rig.pose()
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub fn state(&self, id: BodyId) -> &BodyState {
        &self.states[id.index()]
    }

    pub fn bodies(&self) -> &[CelestialBody; 9] {
        &self.bodies
    }

    /// Body under the pointer at the last tick.
    pub fn hovered(&self) -> Option<BodyId> {
        self.hovered
    }

    pub fn belt_rotation(&self) -> f32 {
        self.belt_spin
    }

    /// Ticks simulated since start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seconds of simulated time since start, for shader animation.
    pub fn elapsed_seconds(&self) -> f32 {
        self.ticks as f32 / Self::TICK_RATE
    }

    /// Orbit frame: rotation about the sun followed by the orbital offset.
    pub fn orbit_matrix(&self, id: BodyId) -> Mat4 {
        let body = &self.bodies[id.index()];
        let angle = self.states[id.index()].orbit.angle();
        Mat4::from_rotation_y(angle) * Mat4::from_translation(Vec3::new(body.orbit_radius, 0.0, 0.0))
    }

    /// World position of a body's center.
    pub fn body_position(&self, id: BodyId) -> Vec3 {
        self.orbit_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Full model matrix: orbit, scale, axial tilt, then spin.
    pub fn body_matrix(&self, id: BodyId) -> Mat4 {
        let body = &self.bodies[id.index()];
        let spin = self.states[id.index()].spin;
        self.orbit_matrix(id)
            * Mat4::from_scale(Vec3::splat(body.world_scale()))
            * Mat4::from_rotation_z(body.axial_tilt())
            * Mat4::from_rotation_y(spin)
    }

    fn local_pick_radius(&self, id: BodyId) -> f32 {
        if id.is_planet() { 1.0 } else { SUN_CORE_RADIUS }
    }
}

fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER)
    } else {
        1.0
    }
}

fn effective_policy(policy: InteractionPolicy, respect_hover: bool) -> InteractionPolicy {
    match policy {
        InteractionPolicy::AlwaysActive if respect_hover => InteractionPolicy::Hover,
        other => other,
    }
}
