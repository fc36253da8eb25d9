use std::{fmt::Write, sync::Arc};

use chrono::{DateTime, FixedOffset};

use crate::{
    canvas::{Canvas, DrawOptions},
    config::{CardConfig, TextSection},
    error::{CardError, Result},
    font_face::Face,
    font_storage::FontStyle,
    font_system::FontSystem,
    front_matter::FrontMatter,
};

/// Anything that can hand out a face for a style and pixel size.
pub trait FaceSource {
    fn face(&self, style: FontStyle, size: f32) -> Result<Arc<dyn Face>>;
}

impl FaceSource for FontSystem {
    fn face(&self, style: FontStyle, size: f32) -> Result<Arc<dyn Face>> {
        let face: Arc<dyn Face> = FontSystem::face(self, style, size)?;
        Ok(face)
    }
}

/// Draws the title, category, info line and tags of `front_matter` onto
/// `canvas`, skipping disabled sections.
pub fn render_card<F: FaceSource + ?Sized>(
    canvas: &mut Canvas,
    front_matter: &FrontMatter,
    config: &CardConfig,
    faces: &F,
) -> Result<()> {
    let title = &config.title;
    if title.text.enabled {
        let options = DrawOptions {
            max_width: Some(title.max_width),
            line_spacing: Some(title.line_spacing),
            ..text_options(&title.text, faces)?
        };
        canvas.draw_text_at_point(&front_matter.title, title.text.start, &options)?;
    }

    let category = &config.category;
    if category.enabled {
        canvas.draw_text_at_point(
            &front_matter.category.to_uppercase(),
            category.start,
            &text_options(category, faces)?,
        )?;
    }

    let info = &config.info;
    if info.enabled {
        let line = info_line(&front_matter.author, &info.separator, &front_matter.date, &info.time_format)?;
        canvas.draw_text_at_point(&line, info.start, &text_options(info, faces)?)?;
    }

    let tags = &config.tags;
    if tags.text.enabled {
        let shown = match tags.limit {
            0 => &front_matter.tags[..],
            limit => &front_matter.tags[..limit.min(front_matter.tags.len())],
        };
        let options = DrawOptions {
            background: Some(tags.background),
            box_padding: Some(tags.padding),
            box_spacing: Some(tags.spacing),
            box_align: Some(tags.align),
            ..text_options(&tags.text, faces)?
        };
        canvas.draw_box_texts(shown, tags.text.start, &options)?;
    }

    log::debug!("Rendered card {:?}", front_matter.title);
    Ok(())
}

/// Options shared by every section. Wrapping stays off unless the caller
/// turns it on.
fn text_options<F: FaceSource + ?Sized>(section: &TextSection, faces: &F) -> Result<DrawOptions> {
    Ok(DrawOptions {
        face: Some(faces.face(section.font_style, section.font_size)?),
        foreground: Some(section.foreground),
        max_width: Some(0),
        line_spacing: Some(0),
        ..DrawOptions::default()
    })
}

/// `author`, the separator and the formatted date.
fn info_line(
    author: &str,
    separator: &str,
    date: &DateTime<FixedOffset>,
    time_format: &str,
) -> Result<String> {
    let mut line = format!("{author}{separator}");
    write!(line, "{}", date.format(time_format))
        .map_err(|_| CardError::Config(format!("invalid time format {time_format:?}")))?;
    Ok(line)
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockFace;
    use image::{DynamicImage, Rgba, RgbaImage};

    const BG: Rgba<u8> = Rgba([255, 255, 255, 255]);

    struct BlockFaces;

    impl FaceSource for BlockFaces {
        fn face(&self, _style: FontStyle, _size: f32) -> Result<Arc<dyn Face>> {
            Ok(Arc::new(BlockFace::new()))
        }
    }

    fn front_matter() -> FrontMatter {
        FrontMatter {
            title: "Hello".into(),
            author: "@me".into(),
            category: "program".into(),
            tags: vec!["Go".into(), "Hugo".into(), "OGP".into()],
            date: DateTime::parse_from_rfc3339("2020-06-21T03:56:24+09:00").unwrap(),
        }
    }

    fn canvas() -> Canvas {
        Canvas::from_image(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(1200, 630, BG)))
    }

    fn count_pixels(canvas: &Canvas, color: Rgba<u8>) -> usize {
        canvas.image().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_info_line() {
        let date = front_matter().date;
        assert_eq!(info_line("@me", "・", &date, "%b %-d").unwrap(), "@me・Jun 21");
        assert_eq!(info_line("a", " | ", &date, "%Y-%m-%d").unwrap(), "a | 2020-06-21");
        assert!(info_line("a", "", &date, "%Q").is_err());
    }

    #[test]
    fn test_render_default_card() {
        let mut canvas = canvas();
        let config = CardConfig::default();
        render_card(&mut canvas, &front_matter(), &config, &BlockFaces).unwrap();

        // Title glyphs are black, tag chips keep their background color.
        assert!(count_pixels(&canvas, Rgba([0, 0, 0, 255])) > 0);
        assert!(count_pixels(&canvas, config.tags.background) > 0);
        assert!(count_pixels(&canvas, config.category.foreground) > 0);

        let title_top = config.title.text.start;
        let baseline = title_top.y + BlockFace::ASCENT as i32;
        assert_eq!(
            *canvas.image().get_pixel(title_top.x as u32 + 5, baseline as u32 - 1),
            Rgba([0, 0, 0, 255])
        );
    }

    #[test]
    fn test_disabled_sections_are_skipped() {
        let mut config = CardConfig::default();
        config.title.text.enabled = false;
        config.category.enabled = false;
        config.info.enabled = false;
        config.tags.text.enabled = false;

        let mut canvas = canvas();
        render_card(&mut canvas, &front_matter(), &config, &BlockFaces).unwrap();
        assert_eq!(count_pixels(&canvas, BG), 1200 * 630);
    }

    #[test]
    fn test_tag_limit() {
        let mut config = CardConfig::default();
        config.title.text.enabled = false;
        config.category.enabled = false;
        config.info.enabled = false;
        config.tags.limit = 2;

        let mut canvas = canvas();
        render_card(&mut canvas, &front_matter(), &config, &BlockFaces).unwrap();

        // Two right-aligned chips of 20px ("Go") and 40px ("Hugo") labels.
        let padding = config.tags.padding;
        let widths = (20 + padding.horizontal()) + (40 + padding.horizontal());
        let expected_left = config.tags.text.start.x - (widths + config.tags.spacing);
        let chip_row = config.tags.text.start.y as u32 + 1;

        assert_eq!(
            *canvas.image().get_pixel(expected_left as u32, chip_row),
            config.tags.background
        );
        assert_eq!(*canvas.image().get_pixel(expected_left as u32 - 1, chip_row), BG);
    }

    #[test]
    fn test_missing_style_fails() {
        let mut canvas = canvas();
        let fonts = FontSystem::new();
        assert!(matches!(
            render_card(&mut canvas, &front_matter(), &CardConfig::default(), &fonts),
            Err(CardError::MissingStyle(FontStyle::Bold))
        ));
    }
}
