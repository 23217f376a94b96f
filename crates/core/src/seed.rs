//! Reproducible description of a simulation run.
//!
//! A [`Seed`] captures everything needed to recreate a rendered frame:
//! engine name, particle count, parameters, PRNG seed, step count and the
//! parameter schedule that was replayed along the way.

use crate::error::EngineError;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reproducible description of a simulation run.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// particle trajectories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub particles: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    pub steps: usize,
    #[serde(default, skip_serializing_if = "Schedule::is_empty")]
    pub schedule: Schedule,
}

impl Seed {
    /// Creates a new Seed with default params (`{}`), zero steps and no schedule.
    pub fn new(engine: &str, particles: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            particles,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            steps: 0,
            schedule: Schedule::default(),
        }
    }

    /// Validates that the seed describes a non-empty population.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.particles == 0 {
            return Err(EngineError::InvalidParticleCount);
        }
        Ok(())
    }

    /// Parses and validates a seed from JSON text.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let seed: Seed =
            serde_json::from_str(text).map_err(|e| EngineError::InvalidSeed(e.to_string()))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reads and validates a seed from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&text).map_err(|e| match e {
            EngineError::InvalidSeed(msg) => {
                EngineError::InvalidSeed(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Writes the seed as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| EngineError::Io(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
    }
}
