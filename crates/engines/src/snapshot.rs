//! CPU-side PNG output of a rendered frame.
//!
//! Feature-gated behind `png` (default on) so consumers that only need the
//! raw RGBA buffer from [`crate::raster`] don't pull in the `image` crate.

use resonance_core::error::EngineError;
use resonance_core::Engine;
use std::path::Path;

use crate::raster::{render_engine, RenderStyle};

/// Renders the engine's current state and writes it as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if the size is zero or overflows
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(
    engine: &dyn Engine,
    style: &RenderStyle,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), EngineError> {
    let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
    let rgba = render_engine(engine, style, width, height)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
}

/// File name for frame `index` of a numbered sequence, e.g. `frame_00042.png`.
pub fn frame_path(dir: &Path, prefix: &str, index: usize) -> std::path::PathBuf {
    dir.join(format!("{prefix}_{index:05}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineKind;
    use serde_json::json;

    #[test]
    fn write_png_round_trip() {
        let mut engine = EngineKind::from_name("galaxy", 200, 42, &json!({})).unwrap();
        engine.step();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("galaxy.png");

        write_png(&engine, &RenderStyle::default(), 64, 48, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 48);
    }

    #[test]
    fn write_png_into_missing_directory_is_io_error() {
        let engine = EngineKind::from_name("galaxy", 10, 42, &json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let err = write_png(&engine, &RenderStyle::default(), 8, 8, &path).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn frame_path_is_zero_padded() {
        let p = frame_path(Path::new("out"), "frame", 42);
        assert_eq!(p, Path::new("out").join("frame_00042.png"));
    }
}
