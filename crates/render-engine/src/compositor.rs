//! Raster operations used to compose a card.
//!
//! All images are RGBA; areas outside of placed content stay transparent
//! so only the content itself lands on the card.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use ttcardgen_card_model::area::Gravity;
use ttcardgen_card_model::colour::Colour;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Convert a config colour to a pixel.
pub fn to_pixel(colour: Colour) -> Rgba<u8> {
    Rgba(colour.to_array())
}

/// Rotate clockwise by `degrees`, growing the canvas so no content is lost.
///
/// Quarter turns are exact; other angles are resampled bilinearly with a
/// transparent fill.
pub fn rotate_expand(img: &RgbaImage, degrees: f64) -> RgbaImage {
    let normalized = degrees.rem_euclid(360.0);
    let quarter = (normalized / 90.0).round();
    if (normalized - quarter * 90.0).abs() < 1e-9 {
        return match quarter as u32 % 4 {
            0 => img.clone(),
            1 => imageops::rotate90(img),
            2 => imageops::rotate180(img),
            _ => imageops::rotate270(img),
        };
    }

    let theta = normalized.to_radians();
    let (w, h) = (img.width() as f64, img.height() as f64);
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let out_w = (w * cos + h * sin - 1e-6).ceil().max(1.0);
    let out_h = (w * sin + h * cos - 1e-6).ceil().max(1.0);

    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(theta as f32)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let mut out = RgbaImage::from_pixel(out_w as u32, out_h as u32, TRANSPARENT);
    warp_into(img, &projection, Interpolation::Bilinear, TRANSPARENT, &mut out);
    out
}

/// Crop away the border that has the same colour as the top-left pixel.
///
/// An image of a single colour is returned unchanged.
pub fn trim(img: &RgbaImage) -> RgbaImage {
    if img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    let corner = *img.get_pixel(0, 0);

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if *pixel == corner {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => {
            imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => img.clone(),
    }
}

/// Dimensions of `(width, height)` scaled to fit inside `(max_w, max_h)`
/// keeping the aspect ratio. Scales up as well as down.
pub fn fit_dimensions(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let ratio = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * ratio).round() as u32).clamp(1, max_w.max(1));
    let h = ((height as f64 * ratio).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Scale to fit inside `(max_w, max_h)` keeping the aspect ratio.
pub fn fit_within(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = fit_dimensions(img.width(), img.height(), max_w, max_h);
    if (w, h) == img.dimensions() {
        return img.clone();
    }
    imageops::resize(img, w, h, FilterType::Lanczos3)
}

/// Scale to exactly `(width, height)`, ignoring the aspect ratio.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Place `content` on a transparent `(width, height)` canvas by gravity.
/// Content larger than the canvas is clipped.
pub fn place_with_gravity(
    content: &RgbaImage,
    width: u32,
    height: u32,
    gravity: Gravity,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
    let (x, y) = gravity.offset((width, height), content.dimensions());
    imageops::overlay(&mut canvas, content, x, y);
    canvas
}

/// Alpha-blend `colour` with the given coverage over the pixel at `(x, y)`.
/// Coordinates outside the image are ignored.
pub fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, colour: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let src_a = coverage.clamp(0.0, 1.0) * colour[3] as f32 / 255.0;
    if src_a <= 0.0 {
        return;
    }

    let dst = img.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for c in 0..3 {
        let blended = (colour[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_quarter_turn_rotation_is_exact() {
        let mut img = RgbaImage::from_pixel(4, 2, WHITE);
        img.put_pixel(0, 0, RED);

        let rotated = rotate_expand(&img, 90.0);
        assert_eq!(rotated.dimensions(), (2, 4));
        // Top-left goes to top-right on a clockwise turn.
        assert_eq!(*rotated.get_pixel(1, 0), RED);

        let flipped = rotate_expand(&img, 180.0);
        assert_eq!(flipped.dimensions(), (4, 2));
        assert_eq!(*flipped.get_pixel(3, 1), RED);

        assert_eq!(rotate_expand(&img, -270.0), rotated);
        assert_eq!(rotate_expand(&img, 360.0), img);
    }

    #[test]
    fn test_arbitrary_rotation_expands_canvas() {
        let img = RgbaImage::from_pixel(100, 50, RED);
        let rotated = rotate_expand(&img, 45.0);
        let expected = (150.0 * std::f64::consts::FRAC_1_SQRT_2).ceil() as u32;
        assert_eq!(rotated.dimensions(), (expected, expected));

        // Center stays opaque content, corners become transparent.
        let (cw, ch) = (rotated.width() / 2, rotated.height() / 2);
        assert_eq!(rotated.get_pixel(cw, ch)[3], 255);
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_trim_crops_corner_colour() {
        let mut img = RgbaImage::from_pixel(10, 8, WHITE);
        for x in 3..6 {
            for y in 2..7 {
                img.put_pixel(x, y, RED);
            }
        }
        let trimmed = trim(&img);
        assert_eq!(trimmed.dimensions(), (3, 5));
        assert!(trimmed.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_trim_uniform_image_is_unchanged() {
        let img = RgbaImage::from_pixel(5, 5, WHITE);
        assert_eq!(trim(&img), img);
    }

    #[test]
    fn test_fit_dimensions_keeps_aspect() {
        assert_eq!(fit_dimensions(200, 100, 50, 50), (50, 25));
        assert_eq!(fit_dimensions(20, 40, 100, 100), (50, 100));
        assert_eq!(fit_dimensions(30, 30, 30, 30), (30, 30));
        assert_eq!(fit_dimensions(1000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn test_place_with_gravity_clips_oversized_content() {
        let content = RgbaImage::from_pixel(6, 2, RED);
        let placed = place_with_gravity(&content, 4, 4, Gravity::Center);
        assert_eq!(placed.dimensions(), (4, 4));
        assert_eq!(*placed.get_pixel(0, 1), RED);
        assert_eq!(*placed.get_pixel(3, 2), RED);
        assert_eq!(placed.get_pixel(0, 0)[3], 0);
        assert_eq!(placed.get_pixel(0, 3)[3], 0);
    }

    #[test]
    fn test_blend_pixel() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        blend_pixel(&mut img, 0, 0, RED, 1.0);
        assert_eq!(*img.get_pixel(0, 0), RED);

        blend_pixel(&mut img, 1, 0, WHITE, 0.5);
        assert_eq!(*img.get_pixel(1, 0), Rgba([255, 255, 255, 128]));

        blend_pixel(&mut img, 0, 0, Rgba([0, 0, 255, 255]), 0.5);
        assert_eq!(*img.get_pixel(0, 0), Rgba([128, 0, 128, 255]));

        // Out of bounds is a no-op.
        blend_pixel(&mut img, -1, 0, RED, 1.0);
        blend_pixel(&mut img, 2, 0, RED, 1.0);
    }
}
