use euclid::default::{Box2D, Point2D, SideOffsets2D};

use crate::error::Result;

use super::metrics::Measure;

/// Integer anchor in canvas pixel space. `y` is the top of the block.
pub type Point = Point2D<i32>;

/// Insets around a chip label, in `top, right, bottom, left` order.
pub type Padding = SideOffsets2D<i32>;

/// Which side of a chip row the anchor sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Chips grow to the right of the anchor.
    #[default]
    #[serde(alias = "Left")]
    Left,
    /// The row ends exactly at the anchor.
    #[serde(alias = "Right")]
    Right,
}

/// Geometry knobs for a row of chips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxLayout {
    pub padding: Padding,
    /// Gap between two neighbouring chips.
    pub spacing: i32,
    pub align: Alignment,
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self {
            padding: Padding::zero(),
            spacing: 0,
            align: Alignment::Left,
        }
    }
}

/// A label and the rectangle it is drawn in.
#[derive(Clone, Debug, PartialEq)]
pub struct Chip {
    pub label: String,
    /// Background rectangle, `max` exclusive.
    pub rect: Box2D<i32>,
    /// Top-left corner of the padded interior.
    pub label_origin: Point,
}

/// Lays out `labels` as a single row of chips.
///
/// Chips keep the input order and never wrap. Each chip is as wide as its
/// measured label plus the horizontal padding, and as tall as the line height
/// plus the vertical padding and the descent.
pub fn pack<S, M>(labels: &[S], anchor: Point, layout: &BoxLayout, measure: &M) -> Result<Vec<Chip>>
where
    S: AsRef<str>,
    M: Measure + ?Sized,
{
    let padding = layout.padding;
    let metrics = measure.line_metrics();
    let height =
        metrics.height().round() as i32 + metrics.descent.round() as i32 + padding.vertical();

    let widths = labels
        .iter()
        .map(|label| {
            let advance = measure.advance(label.as_ref())?;
            Ok(advance.round() as i32 + padding.horizontal())
        })
        .collect::<Result<Vec<i32>>>()?;

    let mut x = match layout.align {
        Alignment::Left => anchor.x,
        Alignment::Right => {
            let gaps = widths.len().saturating_sub(1) as i32;
            anchor.x - (widths.iter().sum::<i32>() + layout.spacing * gaps)
        }
    };

    let mut chips = Vec::with_capacity(labels.len());
    for (label, width) in labels.iter().zip(widths) {
        let rect = Box2D::new(
            Point::new(x, anchor.y),
            Point::new(x + width, anchor.y + height),
        );
        chips.push(Chip {
            label: label.as_ref().to_string(),
            rect,
            label_origin: Point::new(x + padding.left, anchor.y + padding.top),
        });
        x += width + layout.spacing;
    }

    Ok(chips)
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockFace;

    #[test]
    fn test_right_alignment_ends_at_anchor() {
        let face = BlockFace::new();
        let layout = BoxLayout {
            padding: Padding::zero(),
            spacing: 5,
            align: Alignment::Right,
        };
        let chips = pack(&["A", "BB"], Point::new(1000, 50), &layout, &face).unwrap();

        assert_eq!(chips.len(), 2);
        assert_eq!(chips[1].rect.max.x, 1000);
        assert_eq!(chips[0].rect.min.x, 965);
        assert_eq!(chips[1].rect.min.x, chips[0].rect.max.x + 5);
    }

    #[test]
    fn test_left_alignment_chains_from_anchor() {
        let face = BlockFace::new();
        let layout = BoxLayout {
            spacing: 5,
            ..BoxLayout::default()
        };
        let chips = pack(&["A", "BB"], Point::new(100, 50), &layout, &face).unwrap();

        assert_eq!(chips[0].rect.min.x, 100);
        assert_eq!(chips[0].rect.max.x, 110);
        assert_eq!(chips[1].rect.min.x, chips[0].rect.max.x + 5);
        assert_eq!(chips[1].rect.max.x, 135);
    }

    #[test]
    fn test_padding_grows_boxes() {
        let face = BlockFace::new();
        let layout = BoxLayout {
            padding: Padding::new(6, 10, 6, 12),
            spacing: 6,
            align: Alignment::Left,
        };
        let chips = pack(&["go", "OGP"], Point::new(0, 100), &layout, &face).unwrap();

        // 20px text + 22px horizontal padding
        assert_eq!(chips[0].rect.width(), 42);
        assert_eq!(chips[1].rect.width(), 52);
        // 20px line height + 4px descent + 12px vertical padding
        assert_eq!(chips[0].rect.height(), 36);
        assert_eq!(chips[0].rect.min.y, 100);
        assert_eq!(chips[0].label_origin, Point::new(12, 106));
        assert_eq!(chips[1].label_origin, Point::new(60, 106));
    }

    #[test]
    fn test_right_alignment_with_padding_is_exact() {
        let face = BlockFace::new();
        let layout = BoxLayout {
            padding: Padding::new(6, 10, 6, 10),
            spacing: 6,
            align: Alignment::Right,
        };
        let labels = ["Hugo", "Go", "OGP", "タグ"];
        let chips = pack(&labels, Point::new(1025, 451), &layout, &face).unwrap();

        assert_eq!(chips.last().unwrap().rect.max.x, 1025);
        let labels_out: Vec<&str> = chips.iter().map(|chip| chip.label.as_str()).collect();
        assert_eq!(labels_out, labels);
        for pair in chips.windows(2) {
            assert_eq!(pair[1].rect.min.x, pair[0].rect.max.x + 6);
        }
    }

    #[test]
    fn test_empty_row() {
        let face = BlockFace::new();
        let layout = BoxLayout {
            align: Alignment::Right,
            ..BoxLayout::default()
        };
        let labels: [&str; 0] = [];
        assert!(pack(&labels, Point::new(10, 10), &layout, &face).unwrap().is_empty());
    }
}
