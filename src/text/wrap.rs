use crate::error::Result;

use super::{
    classify::{CharClass, classify, is_forbidden_leading, is_space},
    metrics::Measure,
};

/// One visual row produced by [`wrap`].
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    /// Measured pen advance of `text` in pixels.
    pub width: f32,
}

/// Splits `text` into lines no wider than `max_width`.
///
/// The wrapper walks the characters once, collecting them into atomic units
/// that are never split across lines:
/// - a run of half-width characters up to a space, a full-width character or
///   the end of the text,
/// - an opening bracket together with whatever follows it,
/// - any character together with the line-start-forbidden characters that
///   follow it (`、`, `。`, small kana, closing brackets, ...).
///
/// Each closed unit is appended to the current line and the line is measured.
/// When the line overflows, everything before the unit becomes a finished
/// line and the unit starts the next one. A unit that is wider than
/// `max_width` on its own is still emitted as a line of its own; characters
/// are never dropped. A space that would overflow stays at the end of the
/// finished line and is left out of its width.
///
/// A `max_width` of zero or less disables wrapping.
pub fn wrap<M: Measure + ?Sized>(text: &str, max_width: f32, measure: &M) -> Result<Vec<Line>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    if max_width <= 0.0 {
        return Ok(vec![Line {
            text: text.to_string(),
            width: measure.advance(text)?,
        }]);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;
    let mut unit = String::new();

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        unit.push(ch);

        let has_next = i + 1 < chars.len();
        if has_next && matches!(classify(ch), CharClass::HalfWidth | CharClass::OpeningBracket) {
            i += 1;
            continue;
        }

        while i + 1 < chars.len() && is_forbidden_leading(chars[i + 1]) {
            unit.push(chars[i + 1]);
            i += 1;
        }
        i += 1;

        line.push_str(&unit);
        let width = measure.advance(&line)?;

        if width <= max_width || line.len() == unit.len() {
            line_width = width;
            unit.clear();
            continue;
        }

        // Spaces never open a line; they hang off the end of this one
        // without counting toward its width.
        if unit.chars().all(is_space) {
            while i < chars.len() && is_space(chars[i]) {
                line.push(chars[i]);
                i += 1;
            }
            lines.push(Line {
                text: std::mem::take(&mut line),
                width: line_width,
            });
            line_width = 0.0;
            unit.clear();
            continue;
        }

        line.truncate(line.len() - unit.len());
        lines.push(Line {
            text: std::mem::take(&mut line),
            width: line_width,
        });

        line_width = measure.advance(&unit)?;
        line = std::mem::take(&mut unit);
    }

    if !line.is_empty() {
        lines.push(Line {
            text: line,
            width: line_width,
        });
    }

    Ok(lines)
}
