use euclid::default::Box2D;
use image::{Rgba, RgbaImage};

use crate::font_face::RasterGlyph;

/// Composites a glyph's coverage over the image in `color`.
///
/// `origin_x` is the pen origin of the run and `baseline` the baseline y of
/// the line. Pixels outside the image are clipped.
pub(crate) fn draw_glyph(
    image: &mut RgbaImage,
    glyph: &RasterGlyph,
    origin_x: f32,
    baseline: f32,
    color: Rgba<u8>,
) {
    if glyph.width == 0 || glyph.height == 0 {
        return;
    }

    let left = (origin_x + glyph.x).round() as i64;
    let top = (baseline + glyph.y).round() as i64;
    let (image_width, image_height) = (i64::from(image.width()), i64::from(image.height()));

    for row in 0..glyph.height {
        let y = top + row as i64;
        if y < 0 || y >= image_height {
            continue;
        }

        for col in 0..glyph.width {
            let coverage = glyph.coverage[row * glyph.width + col];
            if coverage == 0 {
                continue;
            }

            let x = left + col as i64;
            if x < 0 || x >= image_width {
                continue;
            }

            blend(image.get_pixel_mut(x as u32, y as u32), color, coverage);
        }
    }
}

/// Overwrites every pixel of `rect` (max exclusive) with `color`.
pub(crate) fn fill_rect(image: &mut RgbaImage, rect: Box2D<i32>, color: Rgba<u8>) {
    let x_min = rect.min.x.max(0) as u32;
    let y_min = rect.min.y.max(0) as u32;
    let x_max = rect.max.x.clamp(0, image.width() as i32) as u32;
    let y_max = rect.max.y.clamp(0, image.height() as i32) as u32;

    for y in y_min..y_max {
        for x in x_min..x_max {
            image.put_pixel(x, y, color);
        }
    }
}

/// Source-over blending of `color` scaled by `coverage`.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: u8) {
    let a = (color[3] as f32 / 255.0) * (coverage as f32 / 255.0);
    let bg_a = dst[3] as f32 / 255.0;

    let out_a = a + bg_a * (1.0 - a);
    // Avoid division by zero
    if out_a <= 0.0 {
        return;
    }

    for channel in 0..3 {
        let src = color[channel] as f32;
        let bg = dst[channel] as f32;
        let out = (src * a + bg * bg_a * (1.0 - a)) / out_a;
        dst[channel] = out.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::default::Point2D;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_full_coverage_replaces_pixel() {
        let mut px = Rgba([10, 20, 30, 255]);
        blend(&mut px, RED, 255);
        assert_eq!(px, RED);
    }

    #[test]
    fn test_partial_coverage_mixes() {
        let mut px = Rgba([0, 0, 0, 255]);
        blend(&mut px, WHITE, 128);
        assert_eq!(px, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_blend_over_transparent() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend(&mut px, RED, 255);
        assert_eq!(px, RED);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut image = RgbaImage::from_pixel(8, 8, WHITE);
        fill_rect(
            &mut image,
            Box2D::new(Point2D::new(-4, 6), Point2D::new(3, 20)),
            RED,
        );

        assert_eq!(*image.get_pixel(0, 6), RED);
        assert_eq!(*image.get_pixel(2, 7), RED);
        assert_eq!(*image.get_pixel(3, 7), WHITE);
        assert_eq!(*image.get_pixel(0, 5), WHITE);
    }

    #[test]
    fn test_draw_glyph_clips_outside_image() {
        let mut image = RgbaImage::from_pixel(4, 4, WHITE);
        let glyph = RasterGlyph {
            x: -1.0,
            y: -2.0,
            width: 3,
            height: 3,
            coverage: vec![255; 9],
        };
        draw_glyph(&mut image, &glyph, 0.0, 1.0, RED);

        assert_eq!(*image.get_pixel(0, 0), RED);
        assert_eq!(*image.get_pixel(1, 1), RED);
        assert_eq!(*image.get_pixel(2, 0), WHITE);
        assert_eq!(*image.get_pixel(0, 2), WHITE);
    }
}
