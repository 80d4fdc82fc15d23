//! The card canvas: background, border, cut marks, and placed fields.

use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use ttcardgen_card_model::example::{
    DEFAULT_BORDER, DEFAULT_BORDER_COLOUR, DEFAULT_FONT_SIZE, DEFAULT_RESIZE, DEFAULT_TEXT_COLOUR,
    DEFAULT_TRIM,
};
use ttcardgen_card_model::layout::LayoutSection;
use ttcardgen_common::error::{CardgenError, CardgenResult};

use crate::compositor::{
    fit_within, place_with_gravity, resize_exact, rotate_expand, to_pixel, trim,
};
use crate::fonts::FontLibrary;
use crate::text::{fit_text, TextFace, TextStyle};

/// Thickness of cut mark lines in pixels.
const CUT_MARK_WIDTH: u32 = 3;

/// A card being composed.
///
/// The canvas holds the front (background plus a border on every side)
/// and, when a backside is configured, the back rotated by 180° below it:
///
/// ```text
/// ┌──────────────┐
/// │   border     │
/// │ ┌──────────┐ │
/// │ │  front   │ │  H + 2·border
/// │ └──────────┘ │
/// ├──────────────┤
/// │ ┌──────────┐ │
/// │ │ back 180°│ │  H + 2·border
/// │ └──────────┘ │
/// └──────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct Card {
    image: RgbaImage,
    width: u32,
    height: u32,
    border: u32,
}

/// Canvas size for a card of `width` × `height`, or `None` when it does
/// not fit the pixel coordinates used for drawing.
fn canvas_size(width: u32, height: u32, border: u32, backside: bool) -> Option<(u32, u32)> {
    let frame = border.checked_mul(2)?;
    let canvas_width = width.checked_add(frame)?;
    let face_height = height.checked_add(frame)?;
    let canvas_height = if backside {
        face_height.checked_mul(2)?
    } else {
        face_height
    };

    let max = i32::MAX as u32;
    if canvas_width > max || canvas_height > max {
        return None;
    }
    (canvas_width as usize)
        .checked_mul(canvas_height as usize)?
        .checked_mul(4)?;
    Some((canvas_width, canvas_height))
}

/// Offset that centers `inner` on `outer`, rounded toward zero.
fn centering_offset(outer: u32, inner: u32) -> i64 {
    (outer as i64 - inner as i64) / 2
}

fn open_image(path: &str) -> CardgenResult<RgbaImage> {
    tracing::trace!(path, "open image");
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| CardgenError::render(format!("failed to create image: {e}")))
}

impl Card {
    /// Create the canvas from the `Card` section.
    pub fn new(card: &LayoutSection<'_>) -> CardgenResult<Self> {
        let background_path = card.get_or_empty("background")?;
        if background_path.is_empty() {
            return Err(CardgenError::config("background image not configured"));
        }
        let background = open_image(&background_path)?;

        let backside_path = card.get_or_empty("backside")?;
        let backside = if backside_path.is_empty() {
            None
        } else {
            Some(imageops::rotate180(&open_image(&backside_path)?))
        };

        let (width, height) = background.dimensions();
        tracing::trace!("background: {}x{}", width, height);

        let border_colour = card.get_colour("border_colour", DEFAULT_BORDER_COLOUR)?;
        let border = card.get_u32("border", DEFAULT_BORDER)?;

        let (canvas_width, canvas_height) = canvas_size(width, height, border, backside.is_some())
            .ok_or_else(|| CardgenError::config("'border' is too large"))?;
        let face_height = height + 2 * border;

        let mut card = Self {
            image: RgbaImage::from_pixel(canvas_width, canvas_height, to_pixel(border_colour)),
            width,
            height,
            border,
        };

        imageops::overlay(&mut card.image, &background, border as i64, border as i64);
        let mark_colour = to_pixel(border_colour.negated());
        card.draw_cut_marks(0, mark_colour);

        if let Some(back) = backside {
            let back = resize_exact(&back, width, height);
            imageops::overlay(
                &mut card.image,
                &back,
                border as i64,
                (height + 3 * border) as i64,
            );
            card.draw_cut_marks(face_height as i64, mark_colour);
        }

        Ok(card)
    }

    /// Draw the cut marks of one card face whose top edge is at `offset_y`.
    fn draw_cut_marks(&mut self, offset_y: i64, colour: image::Rgba<u8>) {
        let (b, w, h) = (self.border as i64, self.width as i64, self.height as i64);
        let mark_len = b - 1;
        if mark_len <= 0 {
            return;
        }
        let half = (CUT_MARK_WIDTH / 2) as i64;

        for x in [0, b + w + 1] {
            for y in [b - 1, b + h - 1] {
                let rect = Rect::at(x as i32, (offset_y + y - half) as i32)
                    .of_size(mark_len as u32, CUT_MARK_WIDTH);
                draw_filled_rect_mut(&mut self.image, rect, colour);
            }
        }

        for x in [b - 1, b + w - 1] {
            for y in [0, b + h + 1] {
                let rect = Rect::at((x - half) as i32, (offset_y + y) as i32)
                    .of_size(CUT_MARK_WIDTH, mark_len as u32);
                draw_filled_rect_mut(&mut self.image, rect, colour);
            }
        }
    }

    /// Load an image file and place it by the layout section.
    /// An empty path draws nothing.
    pub fn load_image(&mut self, path: &str, section: &LayoutSection<'_>) -> CardgenResult<()> {
        if path.is_empty() {
            return Ok(());
        }
        let img = open_image(path)?;
        self.merge_image(&img, section)
    }

    /// Place an image in the section's area: rotate, trim, fit, then
    /// align by gravity.
    pub fn merge_image(
        &mut self,
        img: &RgbaImage,
        section: &LayoutSection<'_>,
    ) -> CardgenResult<()> {
        let area = section.area()?;
        let resize = section.get_bool("resize", DEFAULT_RESIZE)?;
        let trim_border = section.get_bool("trim", DEFAULT_TRIM)?;
        let rotate = section.get_f64("rotate")?;
        let gravity = section.gravity()?;

        let mut img = img.clone();
        if let Some(degrees) = rotate {
            img = rotate_expand(&img, degrees);
        }
        if trim_border {
            img = trim(&img);
        }
        if resize {
            img = fit_within(&img, area.width, area.height);
        }

        let placed = place_with_gravity(&img, area.width, area.height, gravity);
        self.composite(&placed, area.x as i64, area.y as i64);
        Ok(())
    }

    /// Draw text in the section's area, wrapped and shrunk to fit.
    /// Blank text draws nothing.
    pub fn text(
        &mut self,
        text: &str,
        section: &LayoutSection<'_>,
        fonts: &FontLibrary,
    ) -> CardgenResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let area = section.area()?;
        let font = section.get("font")?;
        let size = section.get_u32("font_size", DEFAULT_FONT_SIZE as u32)? as f32;
        let fill = section.get_colour("font_colour", DEFAULT_TEXT_COLOUR)?;
        let stroke = section.get_colour("font_border_colour", DEFAULT_TEXT_COLOUR)?;
        let rotate = section.get_f64("rotate")?;
        let gravity = section.gravity()?;

        let face = TextFace::new(fonts.resolve(font.as_deref())?);
        let fitted = fit_text(&face, text, area.width as f32, area.height as f32, size)?;
        tracing::trace!("font_size: {}", fitted.size);

        let style = TextStyle {
            size: fitted.size,
            gravity,
            fill: to_pixel(fill),
            stroke: to_pixel(stroke),
        };
        let mut img = face.render(&fitted.text, area.width, area.height, &style);

        let mut x = area.x as i64;
        let mut y = area.y as i64;
        if let Some(degrees) = rotate {
            img = rotate_expand(&img, degrees);
            x += centering_offset(area.width, img.width());
            y += centering_offset(area.height, img.height());
            tracing::trace!("rotate {} {}x{}", degrees, x, y);
        }

        self.composite(&img, x, y);
        Ok(())
    }

    /// Overlay an image at card coordinates (relative to the background).
    fn composite(&mut self, img: &RgbaImage, x: i64, y: i64) {
        let border = self.border as i64;
        imageops::overlay(&mut self.image, img, border + x, border + y);
    }

    /// Write the canvas as PNG, whatever the file extension says.
    pub fn save(&self, path: impl AsRef<Path>) -> CardgenResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// The composed canvas.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Size of the card background in pixels.
    pub fn card_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn border(&self) -> u32 {
        self.border
    }
}
