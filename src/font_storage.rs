use std::{collections::HashMap, fmt, path::Path, str::FromStr, sync::Arc};

use crate::error::{CardError, Result};

/// File extensions accepted by [`FontStorage::load_family_dir`].
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Weight variant of a font family.
///
/// Styles are taken from the font file name (`<family>-<Style>.ttf`) and
/// selected by name in the drawing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum FontStyle {
    Thin,
    Light,
    Regular,
    Medium,
    Bold,
    Black,
}

impl FontStyle {
    pub const ALL: [FontStyle; 6] = [
        FontStyle::Thin,
        FontStyle::Light,
        FontStyle::Regular,
        FontStyle::Medium,
        FontStyle::Bold,
        FontStyle::Black,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Thin => "Thin",
            FontStyle::Light => "Light",
            FontStyle::Regular => "Regular",
            FontStyle::Medium => "Medium",
            FontStyle::Bold => "Bold",
            FontStyle::Black => "Black",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontStyle {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        FontStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| CardError::Config(format!("unknown font style {s:?}")))
    }
}

/// Manages font loading and retrieval using `fontdb` and `fontdue`.
///
/// Faces are registered in a `fontdb` database under a [`FontStyle`]. The
/// actual `fontdue` font is parsed lazily the first time a style is used and
/// kept for the lifetime of the storage.
pub struct FontStorage {
    /// This is the font set that has been loaded by fontdb.
    font_db: fontdb::Database,
    /// This is the font that has been loaded by fontdue.
    /// Not all fonts in fontdb are necessarily loaded here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
    styles: HashMap<FontStyle, fontdb::ID, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            styles: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb.
impl FontStorage {
    /// Loads every font file of a family directory.
    ///
    /// Each file must follow the `<family>-<Style>.ttf` naming rule. Files
    /// with other extensions are skipped. Returns the number of registered
    /// styles.
    pub fn load_family_dir(&mut self, dir: &Path) -> Result<usize> {
        let entries = std::fs::read_dir(dir).map_err(|e| CardError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CardError::io(dir, e))?;
            paths.push(entry.path());
        }
        // read_dir order is platform dependent.
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            if !has_font_extension(&path) {
                log::debug!("Skipping non font file: {}", path.display());
                continue;
            }

            let style = style_from_file_name(&path)?;
            self.load_font_file(&path, style)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Loads a single font file and registers it under `style`.
    pub fn load_font_file(&mut self, path: &Path, style: FontStyle) -> Result<()> {
        if !has_font_extension(path) {
            return Err(CardError::Config(format!(
                "{:?} is not a TrueType/OpenType font file",
                path.file_name().unwrap_or_default()
            )));
        }
        std::fs::metadata(path).map_err(|e| CardError::io(path, e))?;

        let ids = self
            .font_db
            .load_font_source(fontdb::Source::File(path.to_path_buf()));
        self.register(ids.first().copied(), style, &path.display().to_string())
    }

    /// Loads a font from binary data and registers it under `style`.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>, style: FontStyle) -> Result<()> {
        let data: Vec<u8> = data.into();
        let ids = self
            .font_db
            .load_font_source(fontdb::Source::Binary(Arc::new(data)));
        self.register(ids.first().copied(), style, "<binary>")
    }

    fn register(&mut self, id: Option<fontdb::ID>, style: FontStyle, origin: &str) -> Result<()> {
        let Some(id) = id else {
            return Err(CardError::Config(format!("no font face found in {origin}")));
        };

        if let Some(previous) = self.styles.insert(style, id) {
            log::warn!("{style} style registered twice, replacing the face from an earlier file");
            self.font_db.remove_face(previous);
            self.loaded_font.remove(&previous);
        }
        log::debug!("Registered {style} style from {origin}");
        Ok(())
    }

    /// Checks if no style has been registered.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Returns the number of registered styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn has_style(&self, style: FontStyle) -> bool {
        self.styles.contains_key(&style)
    }
}

/// Get `Font`
impl FontStorage {
    /// Retrieves the font registered for `style`, parsing it if necessary.
    pub fn style_font(&mut self, style: FontStyle) -> Result<Arc<fontdue::Font>> {
        let id = *self
            .styles
            .get(&style)
            .ok_or(CardError::MissingStyle(style))?;

        self.font(id)
            .ok_or_else(|| CardError::Config(format!("failed to parse {style} style font")))
    }

    /// Retrieves a loaded font by ID, loading it if necessary.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Extracts the style from a `<family>-<Style>.ttf` file name.
fn style_from_file_name(path: &Path) -> Result<FontStyle> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let parts: Vec<&str> = stem.split('-').collect();
    let [_, style] = parts.as_slice() else {
        return Err(CardError::Config(format!(
            "failed to parse {:?} name, expected <family>-<Style>",
            path.file_name().unwrap_or_default()
        )));
    };
    style.parse()
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_round_trips_through_name() {
        for style in FontStyle::ALL {
            assert_eq!(style.as_str().parse::<FontStyle>().unwrap(), style);
        }
        assert!(matches!(
            "SemiBold".parse::<FontStyle>(),
            Err(CardError::Config(_))
        ));
    }

    #[test]
    fn test_style_from_file_name() {
        let style = style_from_file_name(Path::new("font/kinto-Bold.ttf")).unwrap();
        assert_eq!(style, FontStyle::Bold);

        assert!(style_from_file_name(Path::new("font/kinto.ttf")).is_err());
        assert!(style_from_file_name(Path::new("font/kinto-sans-Bold.ttf")).is_err());
        assert!(style_from_file_name(Path::new("font/kinto-Heavy.ttf")).is_err());
    }

    #[test]
    fn test_missing_style() {
        let mut storage = FontStorage::new();
        assert!(storage.is_empty());
        assert!(matches!(
            storage.style_font(FontStyle::Medium),
            Err(CardError::MissingStyle(FontStyle::Medium))
        ));
    }

    #[test]
    fn test_family_dir_skips_non_font_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE.txt"), "license").unwrap();
        std::fs::write(dir.path().join("README"), "readme").unwrap();

        let mut storage = FontStorage::new();
        assert_eq!(storage.load_family_dir(dir.path()).unwrap(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_family_dir_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nostyle.ttf"), [0u8; 4]).unwrap();

        let mut storage = FontStorage::new();
        assert!(matches!(
            storage.load_family_dir(dir.path()),
            Err(CardError::Config(_))
        ));
    }

    #[test]
    fn test_unparsable_font_binary() {
        let mut storage = FontStorage::new();
        let result = storage.load_font_binary(vec![0u8; 16], FontStyle::Regular);
        assert!(matches!(result, Err(CardError::Config(_))));
        assert!(!storage.has_style(FontStyle::Regular));
    }

    #[test]
    fn test_missing_family_dir() {
        let mut storage = FontStorage::new();
        let result = storage.load_family_dir(Path::new("/nonexistent/ogcard/font"));
        assert!(matches!(result, Err(CardError::Io { .. })));
    }
}
