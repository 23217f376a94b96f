//! Pure-computation rasterization of a particle cloud into an RGBA8 buffer.
//!
//! Always available (no feature gate); the `png` snapshot path only encodes
//! what this module draws.

use resonance_core::error::EngineError;
use resonance_core::{DVec2, Engine, Palette, Srgb};

/// World-space rectangle mapped onto the image, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::square(6.0)
    }
}

impl Viewport {
    /// The square `[-half_extent, half_extent]²`.
    pub fn square(half_extent: f64) -> Self {
        Self {
            min: DVec2::splat(-half_extent),
            max: DVec2::splat(half_extent),
        }
    }

    /// Maps a world point to continuous pixel coordinates (origin top-left).
    pub fn to_pixel(&self, p: DVec2, width: usize, height: usize) -> DVec2 {
        let span = self.max - self.min;
        DVec2::new(
            (p.x - self.min.x) / span.x * width as f64,
            (self.max.y - p.y) / span.y * height as f64,
        )
    }

    /// Maps the center of pixel `(px, py)` back to world space.
    pub fn to_world(&self, px: usize, py: usize, width: usize, height: usize) -> DVec2 {
        let span = self.max - self.min;
        DVec2::new(
            self.min.x + (px as f64 + 0.5) / width as f64 * span.x,
            self.max.y - (py as f64 + 0.5) / height as f64 * span.y,
        )
    }
}

/// Colors and sizes used to draw a frame.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub viewport: Viewport,
    pub background: Srgb,
    /// Flat particle color used when the engine has no resonance output.
    pub particle: Srgb,
    /// Ramp sampled at each particle's resonance value.
    pub palette: Palette,
    pub alpha: f64,
    /// Half-size of each particle splat in pixels; 0 draws single pixels.
    pub point_radius: usize,
    /// Radius of the central attractor in world units; 0 hides it.
    pub core_radius: f64,
    pub core_fill: Srgb,
    pub core_outline: Srgb,
    /// Outline thickness in pixels.
    pub core_outline_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            background: Srgb::from_hex("#080808").expect("background hex is valid"),
            particle: Srgb::from_hex("#00ccff").expect("particle hex is valid"),
            palette: Palette::winter(),
            alpha: 0.6,
            point_radius: 0,
            core_radius: 0.2,
            core_fill: Srgb::BLACK,
            core_outline: Srgb::WHITE,
            core_outline_px: 2.0,
        }
    }
}

/// Draws the engine's published particles, then the central attractor on top.
pub fn render_engine(
    engine: &dyn Engine,
    style: &RenderStyle,
    width: usize,
    height: usize,
) -> Result<Vec<u8>, EngineError> {
    rasterize(engine.positions(), engine.resonance(), style, width, height)
}

/// Rasterizes particle positions into an RGBA8 buffer of `width * height * 4` bytes.
///
/// Particles are alpha-blended in array order. With `resonance` present each
/// particle is colored by sampling the palette at its value; otherwise all
/// particles use the flat particle color. Non-finite positions are skipped.
///
/// Returns `EngineError::InvalidDimensions` for a zero or overflowing size.
pub fn rasterize(
    positions: &[DVec2],
    resonance: Option<&[f64]>,
    style: &RenderStyle,
    width: usize,
    height: usize,
) -> Result<Vec<u8>, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let len = width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)?;
    let mut pixels = vec![style.background; len];

    let r = style.point_radius as isize;
    for (i, &p) in positions.iter().enumerate() {
        if !p.is_finite() {
            continue;
        }
        let color = match resonance.and_then(|values| values.get(i)) {
            Some(&t) => style.palette.sample(t),
            None => style.particle,
        };
        let px = style.viewport.to_pixel(p, width, height).floor();
        // Far-off particles saturate here and then fall out of the bounds check.
        let (cx, cy) = (px.x as isize, px.y as isize);
        for y in cy.saturating_sub(r)..=cy.saturating_add(r) {
            for x in cx.saturating_sub(r)..=cx.saturating_add(r) {
                if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
                    continue;
                }
                let idx = y as usize * width + x as usize;
                pixels[idx] = color.over(pixels[idx], style.alpha);
            }
        }
    }

    draw_core(&mut pixels, style, width, height);

    Ok(pixels
        .iter()
        .flat_map(|c| {
            let [r, g, b] = c.to_rgb8();
            [r, g, b, 255u8]
        })
        .collect())
}

/// Filled disk with an outline centered on its rim.
fn draw_core(pixels: &mut [Srgb], style: &RenderStyle, width: usize, height: usize) {
    if style.core_radius <= 0.0 {
        return;
    }
    let world_per_px = (style.viewport.max.x - style.viewport.min.x) / width as f64;
    let half_outline = style.core_outline_px * 0.5 * world_per_px;
    let reach = style.core_radius + half_outline;

    let lo = style
        .viewport
        .to_pixel(DVec2::new(-reach, reach), width, height)
        .floor();
    let hi = style
        .viewport
        .to_pixel(DVec2::new(reach, -reach), width, height)
        .ceil();
    let x0 = (lo.x.max(0.0) as usize).min(width);
    let y0 = (lo.y.max(0.0) as usize).min(height);
    let x1 = (hi.x.max(0.0) as usize).min(width);
    let y1 = (hi.y.max(0.0) as usize).min(height);

    for py in y0..y1 {
        for px in x0..x1 {
            let d = style.viewport.to_world(px, py, width, height).length();
            let idx = py * width + px;
            if (d - style.core_radius).abs() <= half_outline {
                pixels[idx] = style.core_outline;
            } else if d < style.core_radius {
                pixels[idx] = style.core_fill;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    fn no_core() -> RenderStyle {
        RenderStyle {
            core_radius: 0.0,
            ..RenderStyle::default()
        }
    }

    #[test]
    fn rasterize_correct_length_and_opaque() {
        let buf = rasterize(&[], None, &RenderStyle::default(), 8, 4).unwrap();
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn rasterize_rejects_zero_dimensions() {
        let style = RenderStyle::default();
        assert!(matches!(
            rasterize(&[], None, &style, 0, 4),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(rasterize(&[], None, &style, 4, 0).is_err());
    }

    #[test]
    fn empty_frame_is_background() {
        let buf = rasterize(&[], None, &no_core(), 4, 4).unwrap();
        assert_eq!(pixel(&buf, 4, 0, 0), [8, 8, 8, 255]);
        assert_eq!(pixel(&buf, 4, 3, 3), [8, 8, 8, 255]);
    }

    #[test]
    fn viewport_maps_corners_with_y_up() {
        let vp = Viewport::default();
        assert_eq!(vp.to_pixel(DVec2::new(-6.0, 6.0), 100, 50), DVec2::new(0.0, 0.0));
        assert_eq!(vp.to_pixel(DVec2::new(6.0, -6.0), 100, 50), DVec2::new(100.0, 50.0));
        let center = vp.to_world(50, 25, 100, 50);
        assert!(center.x > 0.0 && center.y < 0.0 && center.length() < 0.2);
    }

    #[test]
    fn particle_is_blended_over_background() {
        let style = no_core();
        // (3, 3) in a 12x12 view of [-6, 6]² lands in pixel (9, 2).
        let buf = rasterize(&[DVec2::new(3.5, 3.5)], None, &style, 12, 12).unwrap();
        let expected = style.particle.over(style.background, 0.6).to_rgb8();
        let got = pixel(&buf, 12, 9, 2);
        assert_eq!([got[0], got[1], got[2]], expected);
        assert_eq!(pixel(&buf, 12, 0, 0), [8, 8, 8, 255]);
    }

    #[test]
    fn resonance_colors_come_from_palette() {
        let style = RenderStyle {
            alpha: 1.0,
            ..no_core()
        };
        let buf = rasterize(&[DVec2::new(3.5, 3.5)], Some(&[1.0]), &style, 12, 12).unwrap();
        let expected = style.palette.sample(1.0).to_rgb8();
        let got = pixel(&buf, 12, 9, 2);
        assert_eq!([got[0], got[1], got[2]], expected);
    }

    #[test]
    fn out_of_view_and_non_finite_particles_are_skipped() {
        let positions = [
            DVec2::new(100.0, 0.0),
            DVec2::new(f64::NAN, 1.0),
            DVec2::new(f64::INFINITY, f64::NEG_INFINITY),
            DVec2::new(-1e300, 1e300),
        ];
        let buf = rasterize(&positions, None, &no_core(), 16, 16).unwrap();
        assert!(buf.chunks(4).all(|px| px == [8, 8, 8, 255]));
    }

    #[test]
    fn core_is_drawn_over_particles() {
        let style = RenderStyle::default();
        let buf = rasterize(&[DVec2::new(0.001, 0.001)], None, &style, 240, 240).unwrap();
        // 240 px over 12 world units: the core spans ~4 px around the center.
        assert_eq!(pixel(&buf, 240, 120, 120), [0, 0, 0, 255]);
        let rim = (0..240).any(|x| pixel(&buf, 240, x, 120) == [255, 255, 255, 255]);
        assert!(rim, "no outline pixels on the center row");
    }

    #[test]
    fn point_radius_grows_splats() {
        let style = RenderStyle {
            point_radius: 1,
            ..no_core()
        };
        let buf = rasterize(&[DVec2::new(0.5, 0.5)], None, &style, 12, 12).unwrap();
        let lit = buf.chunks(4).filter(|px| px[..3] != [8, 8, 8]).count();
        assert_eq!(lit, 9);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rasterize_is_total_over_any_cloud(
                coords in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..64),
                t in proptest::collection::vec(-2.0f64..2.0, 0..64),
                w in 1usize..48,
                h in 1usize..48,
                radius in 0usize..3,
            ) {
                let positions: Vec<DVec2> = coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
                let style = RenderStyle { point_radius: radius, ..RenderStyle::default() };
                let buf = rasterize(&positions, Some(&t), &style, w, h).unwrap();
                prop_assert_eq!(buf.len(), w * h * 4);
                prop_assert!(buf.chunks(4).all(|px| px[3] == 255));
            }
        }
    }
}
