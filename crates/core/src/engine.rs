//! The core `Engine` trait that every particle simulation implements.
//!
//! The trait is object-safe so engines can be used as `dyn Engine` for runtime
//! switching between different simulations.

use glam::DVec2;
use serde_json::Value;

/// Core trait for particle field engines.
///
/// Each engine owns a fixed particle population and advances it one tick
/// per [`step`](Engine::step) call. Renderers only ever see the state of a
/// completed step: everything returned by the accessors is borrowed from
/// the engine, so no step can run while a frame is being drawn.
///
/// This trait is **object-safe**: you can use `Box<dyn Engine>` or `&dyn Engine`
/// for runtime polymorphism.
pub trait Engine {
    /// Advance the simulation by one tick.
    fn step(&mut self);

    /// Particle positions after the last completed tick.
    fn positions(&self) -> &[DVec2];

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Applies a JSON object of parameter overrides.
    ///
    /// Keys that are missing or have the wrong type leave the current value
    /// untouched. Changes take effect at the start of the next step.
    fn set_params(&mut self, params: &Value);

    /// Optional per-particle color value in [0, 1] from the last tick.
    ///
    /// Returns `None` by default. Engines whose field can color particles
    /// override this; `None` means "draw with the flat particle color".
    fn resonance(&self) -> Option<&[f64]> {
        None
    }

    /// Number of completed ticks.
    fn step_count(&self) -> usize;
}
