//! Force law of the galaxy field, evaluated at a single position.

use crate::FieldParams;
use resonance_core::DVec2;

/// Softening added to every radius so the origin never divides by zero.
pub const SOFTENING: f64 = 0.01;
/// Weight of the radial term relative to the tangential one.
const RADIAL_COUPLING: f64 = 0.1;

/// Distance from the attractor plus [`SOFTENING`]; always `>= SOFTENING`
/// for finite positions.
pub fn softened_radius(p: DVec2) -> f64 {
    p.length() + SOFTENING
}

/// Two-armed logarithmic spiral: `sin(frequency · ln(r + 1) − 2θ)`.
pub fn standing_wave(r: f64, theta: f64, frequency: f64) -> f64 {
    (frequency * (r + 1.0).ln() - 2.0 * theta).sin()
}

/// Acceleration at one position, split by origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSample {
    /// Softened radius the sample was taken at.
    pub r: f64,
    /// Polar angle of the position.
    pub theta: f64,
    /// Inverse-square pull toward the origin.
    pub central: DVec2,
    /// Acoustic push perpendicular to the radius.
    pub tangential: DVec2,
    /// Acoustic push along the radius.
    pub radial: DVec2,
    /// Standing-wave value, present only while the field is active.
    pub wave: Option<f64>,
}

impl ForceSample {
    pub fn total(&self) -> DVec2 {
        self.central + self.tangential + self.radial
    }
}

/// Samples the acceleration at `p`.
///
/// The central term is `−(G / r²) · p / r`. When the field is active the
/// tangential force `−wave · strength` acts along `(−sin θ, cos θ)` and a
/// radial term `0.1 · strength · wave · p / r` is added; otherwise both
/// acoustic terms are exactly zero.
pub fn sample_force(p: DVec2, gravity: f64, field: FieldParams) -> ForceSample {
    let r = softened_radius(p);
    let theta = p.y.atan2(p.x);
    let unit = p / r;
    let force = gravity / (r * r);

    let mut sample = ForceSample {
        r,
        theta,
        central: -force * unit,
        tangential: DVec2::ZERO,
        radial: DVec2::ZERO,
        wave: None,
    };

    if field.is_active() {
        let wave = standing_wave(r, theta, field.frequency);
        let tangential_force = -wave * field.acoustic_strength;
        let (sin, cos) = theta.sin_cos();
        sample.tangential = DVec2::new(-tangential_force * sin, tangential_force * cos);
        sample.radial = unit * (wave * RADIAL_COUPLING * field.acoustic_strength);
        sample.wave = Some(wave);
    }

    sample
}
