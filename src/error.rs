use std::path::PathBuf;

use crate::font_storage::FontStyle;

/// Errors raised while configuring, measuring, or drawing a card.
///
/// Configuration problems are reported before any pixel is touched, so the
/// caller can fix the input and retry. Measurement errors abort the current
/// draw call and leave the canvas in whatever state preceded it.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Malformed configuration value (hex color, font style, config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested style was never loaded into the font storage.
    #[error("font family does not contain {0:?} style font")]
    MissingStyle(FontStyle),

    /// A draw call was issued without a font face.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    /// The metrics provider could not size a run of text.
    #[error("failed to measure {run:?}: {reason}")]
    Measurement { run: String, reason: String },

    /// A front-matter key is missing or empty.
    #[error("{0:?} is not defined or empty")]
    FrontMatterMissing(&'static str),

    /// A front-matter key has an unexpected type or cannot be parsed.
    #[error("{key:?} can not be read as {want}: {detail}")]
    FrontMatterInvalid {
        key: &'static str,
        want: &'static str,
        detail: String,
    },

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl CardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CardError> = std::result::Result<T, E>;
