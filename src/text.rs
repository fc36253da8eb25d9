/// Character classification for kinsoku line breaking.
pub mod classify;
/// Glyph metrics interface consumed by the layout code.
pub mod metrics;
/// Packs tag labels into a single row of chips.
pub mod pack;
/// Greedy line wrapping that honors kinsoku rules.
pub mod wrap;

pub use classify::{CharClass, classify};
pub use metrics::{LineMetrics, Measure};
pub use pack::{Alignment, BoxLayout, Chip, Padding, Point, pack};
pub use wrap::{Line, wrap};
