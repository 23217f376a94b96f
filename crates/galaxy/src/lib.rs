#![deny(unsafe_code)]
//! Galaxy particle field engine.
//!
//! A fixed cloud of test particles orbits a central attractor under an
//! inverse-square pull. An optional acoustic field adds a two-armed
//! logarithmic spiral standing wave,
//!
//! ```text
//! wave(r, θ) = sin(f · ln(r + 1) − 2θ)
//! ```
//!
//! which pushes particles tangentially into the wave's troughs and nudges
//! them radially so the arms hold their spacing. Particles never interact
//! with each other, so each tick is a single pass over the population with
//! explicit Euler integration and multiplicative velocity damping.
//!
//! The resonance output is `(wave + 1) / 2` per particle, evaluated at the
//! positions the last tick started from.

mod force;

pub use force::{sample_force, softened_radius, standing_wave, ForceSample, SOFTENING};

use resonance_core::error::EngineError;
use resonance_core::params::{param_f64, param_f64_opt};
use resonance_core::prng::Xorshift64;
use resonance_core::{DVec2, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Default population size.
pub const DEFAULT_PARTICLES: usize = 4000;
/// Default inner radius of the initial cloud.
const DEFAULT_R_MIN: f64 = 0.5;
/// Default outer radius of the initial cloud.
const DEFAULT_R_MAX: f64 = 5.0;
/// Default strength of the central attractor (G·M).
const DEFAULT_GRAVITY: f64 = 0.5;
/// Default integration step.
const DEFAULT_DT: f64 = 0.1;
/// Default per-tick velocity retention factor.
const DEFAULT_DAMPING: f64 = 0.96;
/// Acoustic field starts switched off: pure central-force motion.
const DEFAULT_ACOUSTIC_STRENGTH: f64 = 0.0;
/// Default wave frequency.
const DEFAULT_FREQUENCY: f64 = 4.0;
/// Angular velocity of the initial rigid rotation.
const INITIAL_SPIN: f64 = 0.5;
/// Strength above which the field counts as structure-forming.
const RESONANCE_MODE_THRESHOLD: f64 = 0.1;

/// The two knobs of the acoustic field.
///
/// Documented ranges are `acoustic_strength` in [0, 1] and `frequency` in
/// [1, 8]. Values outside them are accepted and simply change the shape of
/// the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    pub acoustic_strength: f64,
    pub frequency: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            acoustic_strength: DEFAULT_ACOUSTIC_STRENGTH,
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl FieldParams {
    /// Whether the acoustic terms contribute at all.
    pub fn is_active(&self) -> bool {
        self.acoustic_strength > 0.0
    }
}

/// Construction and integration parameters for [`Galaxy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    /// Inner radius of the initial cloud.
    pub r_min: f64,
    /// Outer radius of the initial cloud.
    pub r_max: f64,
    /// Strength of the central attractor.
    pub gravity: f64,
    /// Integration step used by [`Galaxy::tick`].
    pub dt: f64,
    /// Velocity retention factor used by [`Galaxy::tick`].
    pub damping: f64,
    /// Initial acoustic field.
    pub field: FieldParams,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            r_min: DEFAULT_R_MIN,
            r_max: DEFAULT_R_MAX,
            gravity: DEFAULT_GRAVITY,
            dt: DEFAULT_DT,
            damping: DEFAULT_DAMPING,
            field: FieldParams::default(),
        }
    }
}

impl GalaxyParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            r_min: param_f64(params, "r_min", DEFAULT_R_MIN),
            r_max: param_f64(params, "r_max", DEFAULT_R_MAX),
            gravity: param_f64(params, "gravity", DEFAULT_GRAVITY),
            dt: param_f64(params, "dt", DEFAULT_DT),
            damping: param_f64(params, "damping", DEFAULT_DAMPING),
            field: FieldParams {
                acoustic_strength: param_f64(
                    params,
                    "acoustic_strength",
                    DEFAULT_ACOUSTIC_STRENGTH,
                ),
                frequency: param_f64(params, "frequency", DEFAULT_FREQUENCY),
            },
        }
    }

    fn validate_radii(&self) -> Result<(), EngineError> {
        let ok = self.r_min.is_finite()
            && self.r_max.is_finite()
            && self.r_min > 0.0
            && self.r_min <= self.r_max;
        if ok {
            Ok(())
        } else {
            Err(EngineError::InvalidRadiusRange {
                min: self.r_min,
                max: self.r_max,
            })
        }
    }
}

/// Which regime the field is in, as shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldMode {
    /// Central attraction dominates; no visible structure.
    Newtonian,
    /// The acoustic field is strong enough to form spiral arms.
    Resonance,
}

impl FieldMode {
    pub fn from_field(field: &FieldParams) -> Self {
        if field.acoustic_strength > RESONANCE_MODE_THRESHOLD {
            FieldMode::Resonance
        } else {
            FieldMode::Newtonian
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldMode::Newtonian => "Newtonian gravity",
            FieldMode::Resonance => "Acoustic resonance (structure forming)",
        }
    }
}

/// Particle field simulator.
///
/// Positions and velocities live in two parallel arrays allocated once.
/// Field parameter updates are double-buffered: [`set_parameters`] writes a
/// pending slot which the next tick commits before touching any particle, so
/// a tick always runs with one consistent parameter set.
///
/// [`set_parameters`]: Galaxy::set_parameters
#[derive(Debug, Clone)]
pub struct Galaxy {
    positions: Vec<DVec2>,
    velocities: Vec<DVec2>,
    params: GalaxyParams,
    pending: Option<FieldParams>,
    resonance: Vec<f64>,
    resonance_live: bool,
    steps: usize,
}

impl Galaxy {
    /// Creates a cloud of `particles` particles.
    ///
    /// Radii are uniform in `[r_min, r_max]`, angles uniform in `[0, 2π)`,
    /// and every particle starts on the rigid rotation `v = 0.5 · (−y, x)`
    /// so the cloud orbits instead of collapsing straight in.
    ///
    /// Returns `EngineError::InvalidParticleCount` for an empty population
    /// and `EngineError::InvalidRadiusRange` unless `0 < r_min <= r_max`.
    pub fn new(particles: usize, seed: u64, params: GalaxyParams) -> Result<Self, EngineError> {
        if particles == 0 {
            return Err(EngineError::InvalidParticleCount);
        }
        params.validate_radii()?;

        let mut rng = Xorshift64::new(seed);
        let radii: Vec<f64> = (0..particles)
            .map(|_| rng.next_range(params.r_min, params.r_max))
            .collect();
        let positions: Vec<DVec2> = radii
            .iter()
            .map(|&r| {
                let theta = rng.next_angle();
                DVec2::new(r * theta.cos(), r * theta.sin())
            })
            .collect();
        let velocities = positions
            .iter()
            .map(|p| DVec2::new(-p.y, p.x) * INITIAL_SPIN)
            .collect();

        debug!(particles, seed, "initialized galaxy cloud");
        Self::assemble(positions, velocities, params)
    }

    /// Creates a galaxy engine from a JSON params object.
    pub fn from_json(particles: usize, seed: u64, json_params: &Value) -> Result<Self, EngineError> {
        Self::new(particles, seed, GalaxyParams::from_json(json_params))
    }

    /// Builds a simulator from explicit particle state.
    ///
    /// `r_min`/`r_max` are not consulted. Returns
    /// `EngineError::ParticleArrayMismatch` if the arrays differ in length
    /// and `EngineError::InvalidParticleCount` if they are empty.
    pub fn from_particles(
        positions: Vec<DVec2>,
        velocities: Vec<DVec2>,
        params: GalaxyParams,
    ) -> Result<Self, EngineError> {
        if positions.len() != velocities.len() {
            return Err(EngineError::ParticleArrayMismatch {
                positions: positions.len(),
                velocities: velocities.len(),
            });
        }
        if positions.is_empty() {
            return Err(EngineError::InvalidParticleCount);
        }
        Self::assemble(positions, velocities, params)
    }

    fn assemble(
        positions: Vec<DVec2>,
        velocities: Vec<DVec2>,
        params: GalaxyParams,
    ) -> Result<Self, EngineError> {
        let resonance = Vec::with_capacity(positions.len());
        Ok(Self {
            positions,
            velocities,
            params,
            pending: None,
            resonance,
            resonance_live: false,
            steps: 0,
        })
    }

    /// Sets the acoustic field for all following ticks.
    ///
    /// Values are not clamped to their documented ranges. The change is
    /// committed at the start of the next tick and has no effect on state
    /// already computed.
    pub fn set_parameters(&mut self, acoustic_strength: f64, frequency: f64) {
        let field = FieldParams {
            acoustic_strength,
            frequency,
        };
        debug!(acoustic_strength, frequency, step = self.steps, "field parameters queued");
        self.pending = Some(field);
    }

    /// The field parameters the next tick will run with.
    pub fn field_params(&self) -> FieldParams {
        self.pending.unwrap_or(self.params.field)
    }

    /// Display mode for the field parameters the next tick will run with.
    pub fn mode(&self) -> FieldMode {
        FieldMode::from_field(&self.field_params())
    }

    pub fn galaxy_params(&self) -> GalaxyParams {
        GalaxyParams {
            field: self.field_params(),
            ..self.params
        }
    }

    /// Advances one tick with the configured `dt` and `damping`.
    pub fn tick(&mut self) -> &[DVec2] {
        self.tick_with(self.params.dt, self.params.damping)
    }

    /// Advances one tick with an explicit step and damping factor.
    ///
    /// For every particle: sample the force at its current position, then
    /// `v += a · dt`, `v *= damping`, `p += v`. There is no stability check;
    /// large forces or weak damping may diverge.
    pub fn tick_with(&mut self, dt: f64, damping: f64) -> &[DVec2] {
        if let Some(field) = self.pending.take() {
            self.params.field = field;
        }
        let field = self.params.field;
        let gravity = self.params.gravity;

        self.resonance.clear();
        self.resonance_live = field.is_active();

        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            let sample = sample_force(*p, gravity, field);
            if let Some(wave) = sample.wave {
                self.resonance.push((wave + 1.0) / 2.0);
            }
            *v += sample.total() * dt;
            *v *= damping;
            *p += *v;
        }

        self.steps += 1;
        &self.positions
    }

    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[DVec2] {
        &self.velocities
    }

    /// Per-particle `(wave + 1) / 2` from the last tick, if the field was active.
    pub fn resonance(&self) -> Option<&[f64]> {
        self.resonance_live.then_some(self.resonance.as_slice())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Engine for Galaxy {
    fn step(&mut self) {
        self.tick();
    }

    fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    fn params(&self) -> Value {
        let p = self.galaxy_params();
        json!({
            "acoustic_strength": p.field.acoustic_strength,
            "frequency": p.field.frequency,
            "gravity": p.gravity,
            "dt": p.dt,
            "damping": p.damping,
            "r_min": p.r_min,
            "r_max": p.r_max,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "acoustic_strength": {
                "type": "number",
                "default": DEFAULT_ACOUSTIC_STRENGTH,
                "min": 0.0,
                "max": 1.0,
                "live": true,
                "description": "Strength of the spiral standing-wave field (0 = pure gravity)"
            },
            "frequency": {
                "type": "number",
                "default": DEFAULT_FREQUENCY,
                "min": 1.0,
                "max": 8.0,
                "live": true,
                "description": "Radial wave number of the standing wave"
            },
            "gravity": {
                "type": "number",
                "default": DEFAULT_GRAVITY,
                "min": 0.0,
                "description": "Strength of the central attractor"
            },
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "min": 0.0,
                "description": "Integration step per tick"
            },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": 0.0,
                "max": 1.0,
                "description": "Velocity retained after each tick"
            },
            "r_min": {
                "type": "number",
                "default": DEFAULT_R_MIN,
                "min": 0.0,
                "description": "Inner radius of the initial cloud"
            },
            "r_max": {
                "type": "number",
                "default": DEFAULT_R_MAX,
                "min": 0.0,
                "description": "Outer radius of the initial cloud"
            }
        })
    }

    /// Only `acoustic_strength` and `frequency` are live; the other
    /// parameters are fixed at construction.
    fn set_params(&mut self, params: &Value) {
        let current = self.field_params();
        let strength = param_f64_opt(params, "acoustic_strength");
        let frequency = param_f64_opt(params, "frequency");
        if strength.is_some() || frequency.is_some() {
            self.set_parameters(
                strength.unwrap_or(current.acoustic_strength),
                frequency.unwrap_or(current.frequency),
            );
        }
    }

    fn resonance(&self) -> Option<&[f64]> {
        Galaxy::resonance(self)
    }

    fn step_count(&self) -> usize {
        self.steps
    }
}
