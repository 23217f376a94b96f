#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides CPU-side
//! rasterization and snapshot output.
//!
//! This crate sits between `resonance-core` (which defines the `Engine` trait)
//! and the individual engine crates (`resonance-galaxy`). The CLI depends only
//! on this crate for dispatch, drawing and file output.

pub mod export;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use resonance_core::error::EngineError;
use resonance_core::{DVec2, Engine};
use resonance_galaxy::Galaxy;
use serde_json::Value;
use tracing::debug;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["galaxy"];

/// Enumeration of all available particle engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
#[derive(Debug, Clone)]
pub enum EngineKind {
    /// Central attractor with a spiral standing-wave field.
    Galaxy(Galaxy),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        particles: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        debug!(engine = name, particles, seed, "constructing engine");
        match name {
            "galaxy" => Ok(EngineKind::Galaxy(Galaxy::from_json(particles, seed, params)?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Galaxy(_) => "galaxy",
        }
    }

    /// Human-readable regime of the engine's field, if it has one.
    pub fn mode_label(&self) -> Option<&'static str> {
        match self {
            EngineKind::Galaxy(g) => Some(g.mode().label()),
        }
    }
}

impl Engine for EngineKind {
    fn step(&mut self) {
        match self {
            EngineKind::Galaxy(e) => e.step(),
        }
    }

    fn positions(&self) -> &[DVec2] {
        match self {
            EngineKind::Galaxy(e) => Engine::positions(e),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Galaxy(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Galaxy(e) => e.param_schema(),
        }
    }

    fn set_params(&mut self, params: &Value) {
        match self {
            EngineKind::Galaxy(e) => e.set_params(params),
        }
    }

    fn resonance(&self) -> Option<&[f64]> {
        match self {
            EngineKind::Galaxy(e) => Engine::resonance(e),
        }
    }

    fn step_count(&self) -> usize {
        match self {
            EngineKind::Galaxy(e) => e.step_count(),
        }
    }
}
