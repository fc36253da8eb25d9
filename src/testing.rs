//! Deterministic faces for tests that must not depend on installed fonts.

use crate::{
    error::{CardError, Result},
    font_face::{Face, RasterGlyph},
    text::{LineMetrics, Measure},
};

/// Half-width characters advance 10px, everything else 20px.
///
/// Glyphs rasterize as solid blocks from 12px above the baseline down to the
/// baseline, inset by one pixel on both sides. Whitespace draws nothing.
pub struct BlockFace {
    /// Runs containing this character fail to measure.
    pub poison: Option<char>,
}

impl BlockFace {
    pub const ASCENT: f32 = 16.0;
    pub const DESCENT: f32 = 4.0;
    pub const GLYPH_HEIGHT: usize = 12;

    pub fn new() -> Self {
        Self { poison: None }
    }

    fn char_advance(ch: char) -> f32 {
        if ch.len_utf8() == 1 { 10.0 } else { 20.0 }
    }
}

impl Measure for BlockFace {
    fn advance(&self, run: &str) -> Result<f32> {
        if let Some(poison) = self.poison
            && run.contains(poison)
        {
            return Err(CardError::Measurement {
                run: run.to_string(),
                reason: "poisoned".into(),
            });
        }
        Ok(run.chars().map(Self::char_advance).sum())
    }

    fn line_metrics(&self) -> LineMetrics {
        LineMetrics {
            ascent: Self::ASCENT,
            descent: Self::DESCENT,
            line_gap: 0.0,
        }
    }
}

impl Face for BlockFace {
    fn rasterize(&self, run: &str) -> Result<Vec<RasterGlyph>> {
        self.advance(run)?;

        let mut glyphs = Vec::new();
        let mut pen_x = 0.0;
        for ch in run.chars() {
            let advance = Self::char_advance(ch);
            if !ch.is_whitespace() {
                let width = advance as usize - 2;
                glyphs.push(RasterGlyph {
                    x: pen_x + 1.0,
                    y: -(Self::GLYPH_HEIGHT as f32),
                    width,
                    height: Self::GLYPH_HEIGHT,
                    coverage: vec![255; width * Self::GLYPH_HEIGHT],
                });
            }
            pen_x += advance;
        }
        Ok(glyphs)
    }
}
