use std::path::{Path, PathBuf};

use image::Rgba;

use crate::{
    color::parse_hex_color,
    error::{CardError, Result},
    font_storage::FontStyle,
    text::{Alignment, Padding, Point},
};

pub const DEFAULT_TEMPLATE: &str = "template.png";

/// Drawing configuration as written in the YAML file.
///
/// Every key is optional. [`DrawingConfig::resolve`] fills the gaps from the
/// built-in defaults and validates colors.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingConfig {
    pub template: Option<PathBuf>,
    pub title: Option<MultiLineTextOption>,
    pub category: Option<TextOption>,
    pub info: Option<TextOption>,
    pub tags: Option<BoxTextsOption>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOption {
    pub start: Option<StartPoint>,
    pub fg_hex_color: Option<String>,
    pub font_size: Option<f32>,
    pub font_style: Option<FontStyle>,
    pub separator: Option<String>,
    pub time_format: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiLineTextOption {
    #[serde(flatten)]
    pub text: TextOption,
    pub max_width: Option<u32>,
    pub line_spacing: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxTextsOption {
    #[serde(flatten)]
    pub text: TextOption,
    pub bg_hex_color: Option<String>,
    pub box_padding: Option<BoxPadding>,
    pub box_spacing: Option<i32>,
    pub box_align: Option<Alignment>,
    /// Maximum number of tags to draw, `0` draws all of them.
    pub limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StartPoint {
    pub px: i32,
    pub py: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BoxPadding {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl From<BoxPadding> for Padding {
    fn from(p: BoxPadding) -> Self {
        Padding::new(p.top, p.right, p.bottom, p.left)
    }
}

/// Loads a YAML drawing configuration.
pub fn load_config(path: &Path) -> Result<DrawingConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
    parse_config(&raw)
        .map_err(|e| CardError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Parses a YAML drawing configuration from a string.
pub fn parse_config(raw: &str) -> Result<DrawingConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(DrawingConfig::default());
    }
    serde_yaml::from_str(raw)
}

/// Fully resolved configuration of one text element.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSection {
    pub enabled: bool,
    pub start: Point,
    pub foreground: Rgba<u8>,
    pub font_size: f32,
    pub font_style: FontStyle,
    pub separator: String,
    /// `chrono` strftime pattern.
    pub time_format: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TitleSection {
    pub text: TextSection,
    pub max_width: u32,
    pub line_spacing: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagsSection {
    pub text: TextSection,
    pub background: Rgba<u8>,
    pub padding: Padding,
    pub spacing: i32,
    pub align: Alignment,
    pub limit: usize,
}

/// Configuration with every default applied and every color parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct CardConfig {
    pub template: PathBuf,
    pub title: TitleSection,
    pub category: TextSection,
    pub info: TextSection,
    pub tags: TagsSection,
}

impl Default for CardConfig {
    fn default() -> Self {
        let gray = Rgba([0x8D, 0x8D, 0x8D, u8::MAX]);
        let text = |start: Point, foreground, font_size, font_style| TextSection {
            enabled: true,
            start,
            foreground,
            font_size,
            font_style,
            separator: String::new(),
            time_format: String::new(),
        };

        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            title: TitleSection {
                text: text(
                    Point::new(123, 165),
                    Rgba([0, 0, 0, u8::MAX]),
                    72.0,
                    FontStyle::Bold,
                ),
                max_width: 946,
                line_spacing: 10,
            },
            category: text(Point::new(126, 119), gray, 42.0, FontStyle::Regular),
            info: TextSection {
                separator: "・".into(),
                time_format: "%b %-d".into(),
                ..text(Point::new(227, 441), gray, 38.0, FontStyle::Regular)
            },
            tags: TagsSection {
                text: text(
                    Point::new(1025, 451),
                    Rgba([0xFF, 0xFF, 0xFF, u8::MAX]),
                    22.0,
                    FontStyle::Medium,
                ),
                background: Rgba([0x60, 0xBC, 0xE0, u8::MAX]),
                padding: Padding::new(6, 10, 6, 10),
                spacing: 6,
                align: Alignment::Right,
                limit: 0,
            },
        }
    }
}

impl DrawingConfig {
    /// Applies the defaults and validates every color.
    ///
    /// `template` overrides the template named in the file.
    pub fn resolve(&self, template: Option<&Path>) -> Result<CardConfig> {
        let defaults = CardConfig::default();

        let title = self.title.clone().unwrap_or_default();
        let category = self.category.clone().unwrap_or_default();
        let info = self.info.clone().unwrap_or_default();
        let tags = self.tags.clone().unwrap_or_default();

        Ok(CardConfig {
            template: template
                .map(Path::to_path_buf)
                .or_else(|| self.template.clone())
                .unwrap_or(defaults.template),
            title: TitleSection {
                text: title.text.resolve(&defaults.title.text)?,
                max_width: title.max_width.unwrap_or(defaults.title.max_width),
                line_spacing: title.line_spacing.unwrap_or(defaults.title.line_spacing),
            },
            category: category.resolve(&defaults.category)?,
            info: info.resolve(&defaults.info)?,
            tags: TagsSection {
                text: tags.text.resolve(&defaults.tags.text)?,
                background: match &tags.bg_hex_color {
                    Some(hex) => parse_hex_color(hex)?,
                    None => defaults.tags.background,
                },
                padding: tags.box_padding.map(Padding::from).unwrap_or(defaults.tags.padding),
                spacing: tags.box_spacing.unwrap_or(defaults.tags.spacing),
                align: tags.box_align.unwrap_or(defaults.tags.align),
                limit: tags.limit.unwrap_or(defaults.tags.limit),
            },
        })
    }
}

impl TextOption {
    fn resolve(&self, defaults: &TextSection) -> Result<TextSection> {
        Ok(TextSection {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            start: self
                .start
                .map(|p| Point::new(p.px, p.py))
                .unwrap_or(defaults.start),
            foreground: match &self.fg_hex_color {
                Some(hex) => parse_hex_color(hex)?,
                None => defaults.foreground,
            },
            font_size: self.font_size.unwrap_or(defaults.font_size),
            font_style: self.font_style.unwrap_or(defaults.font_style),
            separator: self
                .separator
                .clone()
                .unwrap_or_else(|| defaults.separator.clone()),
            time_format: self
                .time_format
                .clone()
                .unwrap_or_else(|| defaults.time_format.clone()),
        })
    }
}
