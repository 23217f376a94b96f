//! Keyframed parameter changes applied between steps.
//!
//! A schedule replays the slider movements of an interactive session: each
//! [`Keyframe`] names the step before which new field parameters take
//! effect. Keyframes are applied through [`Engine::set_params`], so they
//! can never land in the middle of a step.

use crate::engine::Engine;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parameter change applied right before step `at` runs.
///
/// `at = 0` applies before the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub at: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acoustic_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl Keyframe {
    /// The keyframe as a JSON params object, containing only the keys it sets.
    pub fn to_params(&self) -> Value {
        let mut map = Map::new();
        if let Some(s) = self.acoustic_strength {
            map.insert("acoustic_strength".into(), s.into());
        }
        if let Some(f) = self.frequency {
            map.insert("frequency".into(), f.into());
        }
        Value::Object(map)
    }
}

/// Keyframes sorted by step. Keyframes sharing a step apply in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    keyframes: Vec<Keyframe>,
}

impl Schedule {
    /// Builds a schedule, stable-sorting keyframes by step.
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by_key(|k| k.at);
        Self { keyframes }
    }

    /// Parses a JSON array of keyframes.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let keyframes: Vec<Keyframe> =
            serde_json::from_str(text).map_err(|e| EngineError::InvalidSchedule(e.to_string()))?;
        Ok(Self::new(keyframes))
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Keyframes that apply right before step `step`.
    pub fn due(&self, step: usize) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter().filter(move |k| k.at == step)
    }

    /// Runs `engine` for `steps` steps, applying due keyframes before each one.
    ///
    /// `on_step` is called after every completed step with the engine in its
    /// published state.
    pub fn run<E, F>(&self, engine: &mut E, steps: usize, mut on_step: F) -> Result<(), EngineError>
    where
        E: Engine + ?Sized,
        F: FnMut(&E) -> Result<(), EngineError>,
    {
        for _ in 0..steps {
            let step = engine.step_count();
            for keyframe in self.due(step) {
                engine.set_params(&keyframe.to_params());
            }
            engine.step();
            on_step(engine)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::param_f64;
    use glam::DVec2;
    use serde_json::json;

    /// Records the strength in effect for each step it runs.
    struct Recorder {
        strength: f64,
        seen: Vec<f64>,
        positions: Vec<DVec2>,
    }

    impl Engine for Recorder {
        fn step(&mut self) {
            self.seen.push(self.strength);
        }
        fn positions(&self) -> &[DVec2] {
            &self.positions
        }
        fn params(&self) -> Value {
            json!({"acoustic_strength": self.strength})
        }
        fn param_schema(&self) -> Value {
            json!({})
        }
        fn set_params(&mut self, params: &Value) {
            self.strength = param_f64(params, "acoustic_strength", self.strength);
        }
        fn step_count(&self) -> usize {
            self.seen.len()
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            strength: 0.0,
            seen: Vec::new(),
            positions: vec![DVec2::ONE],
        }
    }

    #[test]
    fn from_json_sorts_by_step() {
        let s = Schedule::from_json(
            r#"[{"at": 10, "frequency": 2.0}, {"at": 3, "acoustic_strength": 0.5}]"#,
        )
        .unwrap();
        let steps: Vec<usize> = s.keyframes().iter().map(|k| k.at).collect();
        assert_eq!(steps, vec![3, 10]);
    }

    #[test]
    fn from_json_rejects_non_array() {
        let err = Schedule::from_json(r#"{"at": 1}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchedule(_)));
    }

    #[test]
    fn keyframe_params_only_contain_set_keys() {
        let k = Keyframe {
            at: 0,
            acoustic_strength: None,
            frequency: Some(7.0),
        };
        assert_eq!(k.to_params(), json!({"frequency": 7.0}));
    }

    #[test]
    fn run_applies_keyframes_before_their_step() {
        let schedule = Schedule::new(vec![
            Keyframe {
                at: 2,
                acoustic_strength: Some(0.5),
                frequency: None,
            },
            Keyframe {
                at: 4,
                acoustic_strength: Some(1.0),
                frequency: None,
            },
        ]);
        let mut engine = recorder();
        schedule.run(&mut engine, 6, |_| Ok(())).unwrap();
        assert_eq!(engine.seen, vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn run_calls_back_after_every_step() {
        let mut engine = recorder();
        let mut calls = Vec::new();
        Schedule::default()
            .run(&mut engine, 3, |e| {
                calls.push(e.step_count());
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, vec![1, 2, 3]);
    }

    #[test]
    fn run_stops_on_callback_error() {
        let mut engine = recorder();
        let result = Schedule::default().run(&mut engine, 5, |e| {
            if e.step_count() == 2 {
                Err(EngineError::Io("disk full".into()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(engine.step_count(), 2);
    }
}
