//! Named color ramps for mapping resonance values to particle colors.
//!
//! Stops are stored in OKLab and sampled by linear interpolation. `winter`
//! shares its endpoints with matplotlib's `winter` colormap, but matplotlib
//! blends in RGB, so midpoints differ slightly.

use crate::color::{oklab_to_srgb, srgb_to_oklab, OkLab, Srgb};
use crate::error::EngineError;

/// Built-in palettes, in the order `list_names` reports them.
const PALETTE_NAMES: &[&str] = &["winter", "ocean", "fire", "neon", "monochrome"];

/// A color ramp stored as evenly spaced OKLab stops.
///
/// `sample(0.0)` returns the first stop, `sample(1.0)` the last.
#[derive(Debug, Clone)]
pub struct Palette {
    stops: Vec<OkLab>,
}

impl Palette {
    /// Creates a palette by parsing hex color strings.
    ///
    /// Requires at least one color.
    pub fn from_hex(hexes: &[&str]) -> Result<Self, EngineError> {
        if hexes.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        let stops = hexes
            .iter()
            .map(|h| Srgb::from_hex(h).map(srgb_to_oklab))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stops })
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        let hexes: &[&str] = match name {
            "winter" => &["#0000ff", "#00ff80"],
            "ocean" => &["#001f3f", "#003366", "#005f73", "#0a9396", "#94d2bd"],
            "fire" => &["#800000", "#cc0000", "#ff4500", "#ff8c00", "#ffd700"],
            "neon" => &["#ff00ff", "#00ff41", "#ffff00", "#ff0080", "#00ffff"],
            "monochrome" => &["#000000", "#808080", "#ffffff"],
            other => {
                return Err(EngineError::InvalidPalette(format!(
                    "unknown palette '{other}' (expected one of: {})",
                    PALETTE_NAMES.join(", ")
                )))
            }
        };
        Self::from_hex(hexes)
    }

    /// Names accepted by [`Palette::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    /// The blue-to-green ramp resonance colors are drawn with by default.
    pub fn winter() -> Self {
        Self::from_name("winter").expect("winter palette hex values are valid")
    }

    /// Samples the palette at `t`, clamped to [0, 1]. NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len();
        if n == 1 {
            return oklab_to_srgb(self.stops[0]);
        }

        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        let (c0, c1) = (self.stops[idx], self.stops[idx + 1]);

        oklab_to_srgb(OkLab {
            l: c0.l + frac * (c1.l - c0.l),
            a: c0.a + frac * (c1.a - c0.a),
            b: c0.b + frac * (c1.b - c0.b),
        })
    }
}
