//! Colour values used for borders and text.

use std::str::FromStr;

use ttcardgen_common::error::CardgenError;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);
    pub const TRANSPARENT: Colour = Colour::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// RGB inverse with alpha kept.
    pub fn negated(self) -> Self {
        Self {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
            a: self.a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn named(name: &str) -> Option<Self> {
        let colour = match name {
            "black" => Colour::BLACK,
            "white" => Colour::WHITE,
            "red" => Colour::rgb(255, 0, 0),
            "green" => Colour::rgb(0, 128, 0),
            "lime" => Colour::rgb(0, 255, 0),
            "blue" => Colour::rgb(0, 0, 255),
            "yellow" => Colour::rgb(255, 255, 0),
            "cyan" | "aqua" => Colour::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Colour::rgb(255, 0, 255),
            "gray" | "grey" => Colour::rgb(190, 190, 190),
            "orange" => Colour::rgb(255, 165, 0),
            "purple" => Colour::rgb(160, 32, 240),
            "brown" => Colour::rgb(165, 42, 42),
            "pink" => Colour::rgb(255, 192, 203),
            "gold" => Colour::rgb(255, 215, 0),
            "silver" => Colour::rgb(192, 192, 192),
            "navy" => Colour::rgb(0, 0, 128),
            "maroon" => Colour::rgb(176, 48, 96),
            "olive" => Colour::rgb(128, 128, 0),
            "teal" => Colour::rgb(0, 128, 128),
            "transparent" | "none" => Colour::TRANSPARENT,
            _ => return None,
        };
        Some(colour)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Colour::rgb(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
            )),
            4 => Some(Colour::rgba(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
                nibble(3)? * 17,
            )),
            6 => Some(Colour::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Colour::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    fn from_function(text: &str) -> Option<Self> {
        let (args, has_alpha) = if let Some(rest) = text.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = text.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return None;
        }

        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = if has_alpha {
            let alpha = parts[3].parse::<f64>().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };
        Some(Colour::rgba(r, g, b, a))
    }
}

impl FromStr for Colour {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        let parsed = match text.strip_prefix('#') {
            Some(hex) => Colour::from_hex(hex),
            None => Colour::named(&text).or_else(|| Colour::from_function(&text)),
        };
        parsed.ok_or_else(|| CardgenError::config(format!("invalid colour: {s}")))
    }
}
