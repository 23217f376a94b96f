//! Error types for the resonance core.

use thiserror::Error;

/// Errors produced by engine construction, rendering and I/O.
///
/// Stepping a simulation never fails; every variant here comes from
/// validating inputs or from writing output.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A particle population must contain at least one particle.
    #[error("invalid particle count: at least one particle is required")]
    InvalidParticleCount,

    /// Initial radii must satisfy `0 < min <= max` and be finite.
    #[error("invalid radius range [{min}, {max}]: expected 0 < min <= max")]
    InvalidRadiusRange { min: f64, max: f64 },

    /// Explicit position and velocity arrays had different lengths.
    #[error("particle array mismatch: {positions} positions vs {velocities} velocities")]
    ParticleArrayMismatch { positions: usize, velocities: usize },

    /// Width or height was zero when creating a raster.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The requested engine name is not registered.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed or looked up.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A seed file was not valid seed JSON.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// A parameter schedule could not be parsed.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Writing a snapshot or image failed.
    #[error("i/o error: {0}")]
    Io(String),
}
