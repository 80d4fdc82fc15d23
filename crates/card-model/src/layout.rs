//! Typed access to layout sections (`[Image]`, `[Title]`, `[Text2]`, ...).

use ttcardgen_common::error::{CardgenError, CardgenResult};
use ttcardgen_common::ini::SectionView;

use crate::area::{Area, Gravity};
use crate::colour::Colour;

/// A section of the merged card config, with values parsed on demand.
///
/// Every accessor reports failures as configuration errors naming the key.
#[derive(Debug, Clone, Copy)]
pub struct LayoutSection<'a> {
    view: SectionView<'a>,
}

impl<'a> LayoutSection<'a> {
    pub fn new(view: SectionView<'a>) -> Self {
        Self { view }
    }

    pub fn name(&self) -> &'a str {
        self.view.name()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.view.contains(key)
    }

    /// Keys of the section, followed by inherited DEFAULT keys.
    pub fn keys(&self) -> Vec<&'a str> {
        self.view.keys()
    }

    pub fn get(&self, key: &str) -> CardgenResult<Option<String>> {
        self.view
            .get(key)
            .map_err(|e| CardgenError::config(e.to_string()))
    }

    /// Value of `key`, or an empty string when unset.
    pub fn get_or_empty(&self, key: &str) -> CardgenResult<String> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// The mandatory `area` of a field section.
    pub fn area(&self) -> CardgenResult<Area> {
        match self.get("area")? {
            Some(text) => Area::parse(&text),
            None => Err(CardgenError::config("'area' undefined")),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> CardgenResult<bool> {
        let Some(value) = self.get(key)? else {
            return Ok(default);
        };
        match value.trim().to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(CardgenError::config(format!("'{key}' must be a boolean"))),
        }
    }

    pub fn get_u32(&self, key: &str, default: u32) -> CardgenResult<u32> {
        match self.get(key)? {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| CardgenError::config(format!("'{key}' must be a number"))),
            None => Ok(default),
        }
    }

    pub fn get_f64(&self, key: &str) -> CardgenResult<Option<f64>> {
        match self.get(key)? {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| CardgenError::config(format!("'{key}' must be a real number"))),
            None => Ok(None),
        }
    }

    pub fn get_colour(&self, key: &str, default: &str) -> CardgenResult<Colour> {
        let value = self.get(key)?.unwrap_or_else(|| default.to_string());
        value
            .parse::<Colour>()
            .map_err(|_| CardgenError::config(format!("invalid '{key}'")))
    }

    pub fn gravity(&self) -> CardgenResult<Gravity> {
        match self.get("gravity")? {
            Some(value) => value.parse(),
            None => Ok(Gravity::default()),
        }
    }
}
