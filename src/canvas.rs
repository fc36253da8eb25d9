mod raster;

use std::{path::Path, sync::Arc};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::{
    error::{CardError, Result},
    font_face::{Face, RasterGlyph},
    text::{Alignment, BoxLayout, Chip, Line, Padding, Point, pack, wrap},
};

/// Per-call drawing options.
///
/// Every field is optional; an unset field keeps whatever the canvas used for
/// the previous draw call (or its default).
#[derive(Clone, Default)]
pub struct DrawOptions {
    pub face: Option<Arc<dyn Face>>,
    pub foreground: Option<Rgba<u8>>,
    pub background: Option<Rgba<u8>>,
    /// Maximum line width in pixels, `0` disables wrapping.
    pub max_width: Option<u32>,
    /// Extra pixels between two wrapped lines.
    pub line_spacing: Option<i32>,
    pub box_padding: Option<Padding>,
    pub box_spacing: Option<i32>,
    pub box_align: Option<Alignment>,
}

/// Resolved drawing state carried between calls.
#[derive(Clone)]
struct DrawState {
    face: Option<Arc<dyn Face>>,
    foreground: Rgba<u8>,
    background: Option<Rgba<u8>>,
    max_width: u32,
    line_spacing: i32,
    box_layout: BoxLayout,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            face: None,
            foreground: Rgba([0, 0, 0, u8::MAX]),
            background: None,
            max_width: 0,
            line_spacing: 0,
            box_layout: BoxLayout::default(),
        }
    }
}

impl DrawState {
    fn apply(&mut self, options: &DrawOptions) {
        if let Some(face) = &options.face {
            self.face = Some(Arc::clone(face));
        }
        if let Some(foreground) = options.foreground {
            self.foreground = foreground;
        }
        if let Some(background) = options.background {
            self.background = Some(background);
        }
        if let Some(max_width) = options.max_width {
            self.max_width = max_width;
        }
        if let Some(line_spacing) = options.line_spacing {
            self.line_spacing = line_spacing;
        }
        if let Some(padding) = options.box_padding {
            self.box_layout.padding = padding;
        }
        if let Some(spacing) = options.box_spacing {
            self.box_layout.spacing = spacing;
        }
        if let Some(align) = options.box_align {
            self.box_layout.align = align;
        }
    }

    fn face(&self) -> Result<Arc<dyn Face>> {
        self.face
            .clone()
            .ok_or(CardError::Precondition("no font face set before drawing"))
    }
}

/// A glyph run that has been laid out but not composited yet.
struct PlacedRun {
    glyphs: Vec<RasterGlyph>,
    origin_x: f32,
    baseline: f32,
}

/// Mutable RGBA surface that text and chips are drawn onto.
///
/// The canvas owns a private copy of the template image; the template itself
/// is never modified. Each draw call lays out and rasterizes everything it
/// needs before the first pixel is written, so a failing call leaves the
/// buffer untouched.
pub struct Canvas {
    image: RgbaImage,
    state: DrawState,
}

impl Canvas {
    /// Creates a canvas from a copy of `template`.
    pub fn from_image(template: &DynamicImage) -> Self {
        Self {
            image: template.to_rgba8(),
            state: DrawState::default(),
        }
    }

    /// Decodes a PNG or JPEG template from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let template = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => CardError::io(path, source),
            other => CardError::Image(other),
        })?;
        Ok(Self::from_image(&template))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encodes the canvas as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(source) => CardError::io(path, source),
                other => CardError::Image(other),
            })
    }
}

/// Drawing operations.
impl Canvas {
    /// Draws `text` with the top of its first line at `point`.
    ///
    /// When a maximum width is set the text is wrapped with kinsoku rules and
    /// every following line starts at `point.x`, one line height plus the
    /// line spacing below the previous one. Returns the pen position after
    /// the last glyph, with `y` at the top of the last line.
    pub fn draw_text_at_point(
        &mut self,
        text: &str,
        point: Point,
        options: &DrawOptions,
    ) -> Result<Point> {
        self.state.apply(options);
        let face = self.state.face()?;

        let metrics = face.line_metrics();
        let line_step = metrics.height().round() as i32 + self.state.line_spacing;
        let lines = wrap(text, self.state.max_width as f32, &*face)?;

        let mut runs = Vec::with_capacity(lines.len());
        let mut cursor = point;
        for (index, Line { text, width }) in lines.iter().enumerate() {
            let top = point.y + line_step * index as i32;
            runs.push(PlacedRun {
                glyphs: face.rasterize(text)?,
                origin_x: point.x as f32,
                baseline: top as f32 + metrics.ascent,
            });
            cursor = Point::new(point.x + width.round() as i32, top);
        }

        self.composite(&runs, self.state.foreground);
        log::debug!("Drew {} line(s) at ({}, {})", lines.len(), point.x, point.y);

        Ok(cursor)
    }

    /// Draws `labels` as a row of chips anchored at `point`.
    ///
    /// Each chip's rectangle is filled with the background color (when one is
    /// set) and its label is centered vertically inside the padded interior.
    pub fn draw_box_texts<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        point: Point,
        options: &DrawOptions,
    ) -> Result<Vec<Chip>> {
        self.state.apply(options);
        let face = self.state.face()?;

        let layout = self.state.box_layout;
        let chips = pack(labels, point, &layout, &*face)?;

        let metrics = face.line_metrics();
        let mut runs = Vec::with_capacity(chips.len());
        for chip in &chips {
            let interior = chip.rect.height() - layout.padding.vertical();
            let offset = (interior as f32 - (metrics.ascent + metrics.descent)) / 2.0;
            runs.push(PlacedRun {
                glyphs: face.rasterize(&chip.label)?,
                origin_x: chip.label_origin.x as f32,
                baseline: chip.label_origin.y as f32 + offset + metrics.ascent,
            });
        }

        if let Some(background) = self.state.background {
            for chip in &chips {
                raster::fill_rect(&mut self.image, chip.rect, background);
            }
        }
        self.composite(&runs, self.state.foreground);
        log::debug!("Drew {} chip(s) at ({}, {})", chips.len(), point.x, point.y);

        Ok(chips)
    }

    fn composite(&mut self, runs: &[PlacedRun], color: Rgba<u8>) {
        for run in runs {
            for glyph in &run.glyphs {
                raster::draw_glyph(&mut self.image, glyph, run.origin_x, run.baseline, color);
            }
        }
    }
}
