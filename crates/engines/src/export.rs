//! JSON snapshot of an engine's published state.

use resonance_core::error::EngineError;
use resonance_core::{DVec2, Engine};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::EngineKind;

/// Everything a downstream plotter needs to redraw one completed step.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub engine: &'static str,
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub params: Value,
    /// Positions as `[x, y]` pairs.
    pub positions: Vec<DVec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resonance: Option<Vec<f64>>,
}

impl Snapshot {
    pub fn capture(engine: &EngineKind) -> Self {
        Self {
            engine: engine.name(),
            step: engine.step_count(),
            mode: engine.mode_label(),
            params: engine.params(),
            positions: engine.positions().to_vec(),
            resonance: engine.resonance().map(<[f64]>::to_vec),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::Io(e.to_string()))
    }

    pub fn write(&self, path: &Path) -> Result<(), EngineError> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
    }
}
