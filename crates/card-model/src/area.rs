//! Area and gravity types for placing content on a card.
//!
//! Coordinates are card pixels with `(0, 0)` at the top-left corner of
//! the card background.

use std::fmt;
use std::str::FromStr;

use ttcardgen_common::error::{CardgenError, CardgenResult};

/// A rectangular region of the card, as written in a layout section
/// (`area: x y width height`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Area {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `"x y width height"`.
    pub fn parse(text: &str) -> CardgenResult<Self> {
        let err = || CardgenError::config(format!("error parsing area: {text}"));

        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(err());
        }

        let x = parts[0].parse::<i32>().map_err(|_| err())?;
        let y = parts[1].parse::<i32>().map_err(|_| err())?;
        let width = parts[2].parse::<u32>().map_err(|_| err())?;
        let height = parts[3].parse::<u32>().map_err(|_| err())?;

        if width == 0 || height == 0 {
            return Err(err());
        }

        Ok(Self::new(x, y, width, height))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Anchor used to place content inside an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    #[default]
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

/// Horizontal alignment component of a gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment component of a gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl Gravity {
    pub fn horizontal(self) -> HAlign {
        match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => HAlign::Left,
            Gravity::North | Gravity::Center | Gravity::South => HAlign::Center,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => HAlign::Right,
        }
    }

    pub fn vertical(self) -> VAlign {
        match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => VAlign::Top,
            Gravity::West | Gravity::Center | Gravity::East => VAlign::Middle,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => VAlign::Bottom,
        }
    }

    /// Offset of an `inner` box placed inside an `outer` box.
    ///
    /// Negative when the inner box is larger than the outer one on that axis.
    pub fn offset(self, outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
        let free_x = outer.0 as i64 - inner.0 as i64;
        let free_y = outer.1 as i64 - inner.1 as i64;

        let x = match self.horizontal() {
            HAlign::Left => 0,
            HAlign::Center => free_x / 2,
            HAlign::Right => free_x,
        };
        let y = match self.vertical() {
            VAlign::Top => 0,
            VAlign::Middle => free_y / 2,
            VAlign::Bottom => free_y,
        };
        (x, y)
    }
}

impl FromStr for Gravity {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "northwest" => Ok(Gravity::NorthWest),
            "north" => Ok(Gravity::North),
            "northeast" => Ok(Gravity::NorthEast),
            "west" => Ok(Gravity::West),
            "center" | "centre" => Ok(Gravity::Center),
            "east" => Ok(Gravity::East),
            "southwest" => Ok(Gravity::SouthWest),
            "south" => Ok(Gravity::South),
            "southeast" => Ok(Gravity::SouthEast),
            _ => Err(CardgenError::config(format!("invalid gravity: {s}"))),
        }
    }
}
