use std::{path::Path, sync::Arc};

use parking_lot::Mutex;

use crate::{
    error::Result,
    font_face::FontFace,
    font_storage::{FontStorage, FontStyle},
};

/// Shared entry point for font loading and face creation.
///
/// The storage sits behind a `Mutex` so one font set can serve several
/// worker threads, each rendering its own canvas. Faces handed out by
/// [`FontSystem::face`] hold their own reference to the parsed font and do
/// not keep the lock.
///
/// The field is public to allow direct access to the underlying storage when
/// necessary.
pub struct FontSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a font system with empty storage.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
        }
    }

    /// Creates a font system holding every style found in `dir`.
    pub fn from_family_dir(dir: &Path) -> Result<Self> {
        let system = Self::new();
        let loaded = system.load_family_dir(dir)?;
        log::info!("Loaded {loaded} font style(s) from {}", dir.display());
        Ok(system)
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads all `<family>-<Style>.ttf` files from a directory.
    pub fn load_family_dir(&self, dir: &Path) -> Result<usize> {
        self.font_storage.lock().load_family_dir(dir)
    }

    /// Checks if no style has been loaded.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Returns the number of loaded styles.
    pub fn len(&self) -> usize {
        self.font_storage.lock().len()
    }

    pub fn has_style(&self, style: FontStyle) -> bool {
        self.font_storage.lock().has_style(style)
    }
}

/// face creation
impl FontSystem {
    /// Creates a face for `style` at `size` pixels.
    ///
    /// Fails with [`crate::CardError::MissingStyle`] when the style was never
    /// loaded.
    pub fn face(&self, style: FontStyle, size: f32) -> Result<Arc<FontFace>> {
        let font = self.font_storage.lock().style_font(style)?;
        Ok(Arc::new(FontFace::new(font, style, size)?))
    }
}
