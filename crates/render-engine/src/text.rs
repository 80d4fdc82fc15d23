//! Text layout: fitting text into an area and drawing it.
//!
//! Fitting works like a typesetter squeezing copy into a box: wrap lines
//! at ever narrower column widths until the text is narrow enough, and
//! shrink the font when no wrap fits or the text is too tall.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use ttcardgen_card_model::area::{Gravity, HAlign, VAlign};
use ttcardgen_common::error::{CardgenError, CardgenResult};

use crate::compositor::blend_pixel;

/// Font size reduction per fitting step, in points.
pub const FONT_SIZE_STEP: f32 = 0.75;

/// Upper bound on fitting iterations before giving up.
pub const MAX_FIT_ITERATIONS: usize = 100;

/// Measures the extent of (possibly multi-line) text at a font size.
pub trait TextMeasure {
    /// Width and height in pixels.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Text fitted into an area.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub size: f32,
}

/// Greedy word wrap at `width` characters.
///
/// Words longer than `width` are split. A blank line yields no lines.
pub fn wrap_columns(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() <= width {
            current.push(' ');
            current.extend(word.iter());
            current_len += 1 + word.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        current_len = word.len();
        current = word.into_iter().collect();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Re-wrap every line of `text` at `columns` characters.
fn wrap_text(lines: &[&str], columns: usize) -> String {
    lines
        .iter()
        .map(|line| wrap_columns(line, columns).join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap and shrink `text` until it fits a `max_w` × `max_h` box.
pub fn fit_text<M: TextMeasure>(
    measure: &M,
    text: &str,
    max_w: f32,
    max_h: f32,
    start_size: f32,
) -> CardgenResult<FittedText> {
    let lines: Vec<&str> = text.lines().collect();
    let max_columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut message = text.to_string();
    let mut size = start_size;

    for _ in 0..MAX_FIT_ITERATIONS {
        if size <= 0.0 {
            break;
        }

        let (width, height) = measure.measure(&message, size);
        if height > max_h {
            size -= FONT_SIZE_STEP;
            message = text.to_string();
        } else if width > max_w {
            let wrapped = (1..max_columns)
                .rev()
                .map(|columns| wrap_text(&lines, columns))
                .find(|candidate| measure.measure(candidate, size).0 <= max_w);
            match wrapped {
                Some(candidate) => message = candidate,
                None => {
                    size -= FONT_SIZE_STEP;
                    message = text.to_string();
                }
            }
        } else {
            return Ok(FittedText {
                text: message,
                size,
            });
        }
    }

    Err(CardgenError::render(format!(
        "unable to calculate word_wrap for {text}"
    )))
}

/// How fitted text is drawn.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub gravity: Gravity,
    pub fill: Rgba<u8>,
    /// One pixel outline colour.
    pub stroke: Rgba<u8>,
}

/// A font at point sizes, where one point is one pixel per em.
pub struct TextFace {
    font: Font<'static>,
}

impl TextFace {
    pub fn new(font: Font<'static>) -> Self {
        Self { font }
    }

    fn scale(&self, size: f32) -> Scale {
        let metrics = self.font.v_metrics_unscaled();
        let units_per_em = self.font.units_per_em().max(1) as f32;
        Scale::uniform(size * (metrics.ascent - metrics.descent) / units_per_em)
    }

    fn line_width(&self, line: &str, scale: Scale) -> f32 {
        self.font
            .layout(line, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draw text into a transparent `width` × `height` image, each line
    /// aligned by the style's gravity.
    pub fn render(&self, text: &str, width: u32, height: u32, style: &TextStyle) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        let scale = self.scale(style.size);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

        let (_, block_h) = self.measure(text, style.size);
        let top = match style.gravity.vertical() {
            VAlign::Top => 0.0,
            VAlign::Middle => (height as f32 - block_h) / 2.0,
            VAlign::Bottom => height as f32 - block_h,
        };

        for (i, line) in text.split('\n').enumerate() {
            let line_w = self.line_width(line, scale);
            let left = match style.gravity.horizontal() {
                HAlign::Left => 0.0,
                HAlign::Center => (width as f32 - line_w) / 2.0,
                HAlign::Right => width as f32 - line_w,
            };
            let baseline = top + v_metrics.ascent + i as f32 * line_height;

            for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
                let (x, y) = (left + dx as f32, baseline + dy as f32);
                self.draw_line(&mut img, line, scale, x, y, style.stroke);
            }
            self.draw_line(&mut img, line, scale, left, baseline, style.fill);
        }

        img
    }

    fn draw_line(
        &self,
        img: &mut RgbaImage,
        line: &str,
        scale: Scale,
        x: f32,
        y: f32,
        colour: Rgba<u8>,
    ) {
        for glyph in self.font.layout(line, scale, point(x, y)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                blend_pixel(
                    img,
                    bb.min.x as i64 + gx as i64,
                    bb.min.y as i64 + gy as i64,
                    colour,
                    coverage,
                );
            });
        }
    }
}

impl TextMeasure for TextFace {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let scale = self.scale(size);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| self.line_width(line, scale))
            .fold(0.0f32, f32::max);
        let height =
            (lines.len() as f32 - 1.0) * line_height + (v_metrics.ascent - v_metrics.descent);
        (width, height)
    }
}
