#![deny(unsafe_code)]
//! Core types and traits for the resonance particle simulator.
//!
//! Provides the `Engine` trait, color types (`Srgb`, `OkLab`), `Palette`
//! (OKLab interpolation), `Xorshift64` PRNG, `Seed`, parameter helpers and
//! the keyframed parameter `Schedule`.

pub mod color;
pub mod engine;
pub mod error;
pub mod palette;
pub mod params;
pub mod prng;
pub mod schedule;
pub mod seed;

pub use color::{OkLab, Srgb};
pub use engine::Engine;
pub use error::EngineError;
pub use glam::DVec2;
pub use palette::Palette;
pub use prng::Xorshift64;
pub use schedule::{Keyframe, Schedule};
pub use seed::Seed;
