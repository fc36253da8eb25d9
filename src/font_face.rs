use std::sync::Arc;

use crate::{
    error::{CardError, Result},
    font_storage::FontStyle,
    text::{LineMetrics, Measure},
};

/// Coverage bitmap of one glyph, positioned relative to the pen origin.
///
/// **Y-axis goes down**; `y` is the offset of the bitmap's top row from the
/// baseline, so it is negative for glyphs that sit above the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, `0` is empty and `255` fully covered.
    pub coverage: Vec<u8>,
}

/// A sized face that can both measure and rasterize text.
pub trait Face: Measure + Send + Sync {
    /// Rasterizes `run` as a single line starting at pen x = 0.
    fn rasterize(&self, run: &str) -> Result<Vec<RasterGlyph>>;
}

/// `fontdue` backed [`Face`] for one style at one pixel size.
#[derive(Clone)]
pub struct FontFace {
    font: Arc<fontdue::Font>,
    style: FontStyle,
    size: f32,
    line_metrics: LineMetrics,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("style", &self.style)
            .field("size", &self.size)
            .field("line_metrics", &self.line_metrics)
            .finish_non_exhaustive()
    }
}

impl FontFace {
    pub fn new(font: Arc<fontdue::Font>, style: FontStyle, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CardError::Config(format!("invalid font size {size}")));
        }

        let metrics = font.horizontal_line_metrics(size).ok_or_else(|| {
            CardError::Config(format!("{style} style font has no horizontal metrics"))
        })?;

        Ok(Self {
            font,
            style,
            size,
            line_metrics: LineMetrics {
                ascent: metrics.ascent,
                // fontdue reports descent as a negative offset
                descent: -metrics.descent,
                line_gap: metrics.line_gap,
            },
        })
    }

    /// Walks the pen over `run`, calling `f` with each glyph index and its
    /// origin. Kerning is applied between neighbouring glyphs. Control
    /// characters take no space, so measuring and drawing agree.
    ///
    /// Returns the final pen position.
    fn walk(&self, run: &str, mut f: impl FnMut(u16, f32)) -> f32 {
        let mut pen_x = 0.0;
        let mut prev_glyph: Option<u16> = None;

        for ch in run.chars() {
            if ch.is_control() {
                continue;
            }

            let glyph_idx = self.font.lookup_glyph_index(ch);
            if let Some(prev) = prev_glyph {
                pen_x += self
                    .font
                    .horizontal_kern_indexed(prev, glyph_idx, self.size)
                    .unwrap_or(0.0);
            }

            f(glyph_idx, pen_x);

            pen_x += self.font.metrics_indexed(glyph_idx, self.size).advance_width;
            prev_glyph = Some(glyph_idx);
        }

        pen_x
    }
}

impl Measure for FontFace {
    fn advance(&self, run: &str) -> Result<f32> {
        let advance = self.walk(run, |_, _| {});
        if !advance.is_finite() {
            return Err(CardError::Measurement {
                run: run.to_string(),
                reason: format!("{} style font returned a non-finite advance", self.style),
            });
        }
        Ok(advance)
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line_metrics
    }
}

impl Face for FontFace {
    fn rasterize(&self, run: &str) -> Result<Vec<RasterGlyph>> {
        let mut glyphs = Vec::new();

        self.walk(run, |glyph_idx, origin_x| {
            let (metrics, coverage) = self.font.rasterize_indexed(glyph_idx, self.size);
            if metrics.width == 0 || metrics.height == 0 {
                return;
            }

            glyphs.push(RasterGlyph {
                x: origin_x + metrics.xmin as f32,
                y: -(metrics.ymin as f32 + metrics.height as f32),
                width: metrics.width,
                height: metrics.height,
                coverage,
            });
        });

        Ok(glyphs)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use fontdb::{Family, Query};

    /// Loads a system font covering basic Latin, preferring sans-serif.
    fn system_face(size: f32) -> Option<FontFace> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let preferred = db.query(&Query {
            families: &[Family::SansSerif],
            ..Query::default()
        });
        let candidates = preferred
            .into_iter()
            .chain(db.faces().map(|face| face.id))
            .collect::<Vec<_>>();

        let font = candidates.into_iter().find_map(|id| {
            db.with_face_data(id, |data, index| {
                fontdue::Font::from_bytes(
                    data,
                    fontdue::FontSettings {
                        collection_index: index,
                        ..fontdue::FontSettings::default()
                    },
                )
            })?
            .ok()
            .filter(|font| "AVH".chars().all(|ch| font.lookup_glyph_index(ch) != 0))
        })?;

        FontFace::new(Arc::new(font), FontStyle::Regular, size).ok()
    }

    #[test]
    fn test_kerning_never_widens_a_pair() {
        let Some(face) = system_face(48.0) else {
            eprintln!("no system font available, skipping");
            return;
        };

        let pair = face.advance("AV").unwrap();
        let separate = face.advance("A").unwrap() + face.advance("V").unwrap();
        assert!(pair <= separate + f32::EPSILON, "{pair} > {separate}");
        assert!(pair > 0.0);
    }

    #[test]
    fn test_line_metrics_descent_is_positive() {
        let Some(face) = system_face(32.0) else {
            eprintln!("no system font available, skipping");
            return;
        };

        let metrics = face.line_metrics();
        assert!(metrics.ascent > 0.0);
        assert!(metrics.descent >= 0.0);
        assert!(metrics.height() >= metrics.ascent + metrics.descent);
    }

    #[test]
    fn test_control_characters_take_no_space() {
        let Some(face) = system_face(32.0) else {
            eprintln!("no system font available, skipping");
            return;
        };

        assert_eq!(face.advance("A\nB").unwrap(), face.advance("AB").unwrap());
        assert_eq!(face.advance("\t").unwrap(), 0.0);

        let with_control = face.rasterize("A\tB").unwrap();
        let plain = face.rasterize("AB").unwrap();
        assert_eq!(with_control, plain);
    }

    #[test]
    fn test_glyphs_sit_on_the_baseline() {
        let Some(face) = system_face(32.0) else {
            eprintln!("no system font available, skipping");
            return;
        };

        let glyphs = face.rasterize("H").unwrap();
        assert_eq!(glyphs.len(), 1);
        let h = &glyphs[0];
        // `y` is the top row relative to the baseline, so the bottom lands near 0.
        assert!(h.y < 0.0);
        assert!((h.y + h.height as f32).abs() <= 1.0);
        assert_eq!(h.coverage.len(), h.width * h.height);
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let Some(face) = system_face(32.0) else {
            eprintln!("no system font available, skipping");
            return;
        };

        for size in [0.0, -4.0, f32::NAN] {
            assert!(matches!(
                FontFace::new(Arc::clone(&face.font), FontStyle::Regular, size),
                Err(CardError::Config(_))
            ));
        }
    }
}
