use crate::error::Result;

/// Vertical metrics of a sized face, in pixels.
///
/// `descent` is stored as a positive distance below the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    /// Distance between the baselines of two consecutive lines.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// Measures runs of text for a single sized face.
///
/// Implementations must be pure: measuring the same run twice returns the
/// same advance.
pub trait Measure {
    /// Horizontal pen advance of `run` in pixels.
    fn advance(&self, run: &str) -> Result<f32>;

    fn line_metrics(&self) -> LineMetrics;
}
