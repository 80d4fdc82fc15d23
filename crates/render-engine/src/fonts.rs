//! Font lookup: font files, family names, and the system default.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use rusttype::Font;

use ttcardgen_common::error::{CardgenError, CardgenResult};

/// Resolves the `font` key of text sections to a loaded font.
///
/// The system font database is only scanned the first time a family
/// name (or the default font) is asked for.
pub struct FontLibrary {
    font_dirs: Vec<PathBuf>,
    db: OnceCell<fontdb::Database>,
}

impl FontLibrary {
    /// A library backed by the system fonts plus `font_dirs`.
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        Self {
            font_dirs: font_dirs.to_vec(),
            db: OnceCell::new(),
        }
    }

    fn database(&self) -> &fontdb::Database {
        self.db.get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            for dir in &self.font_dirs {
                db.load_fonts_dir(dir);
            }
            tracing::trace!(faces = db.len(), "loaded font database");
            db
        })
    }

    /// Load a font by file path or family name; `None` selects the
    /// default sans-serif face.
    pub fn resolve(&self, font: Option<&str>) -> CardgenResult<Font<'static>> {
        match font.map(str::trim).filter(|s| !s.is_empty()) {
            Some(font) if Path::new(font).is_file() => load_font_file(Path::new(font)),
            Some(family) => {
                let spaced = family.replace('-', " ");
                self.query(&[fontdb::Family::Name(family)])
                    .or_else(|| self.query(&[fontdb::Family::Name(&spaced)]))
                    .ok_or_else(|| CardgenError::font(format!("font not found: {family}")))
            }
            None => self
                .query(&[fontdb::Family::SansSerif])
                .ok_or_else(|| CardgenError::font("no default font available")),
        }
    }

    fn query(&self, families: &[fontdb::Family<'_>]) -> Option<Font<'static>> {
        let db = self.database();
        let id = db.query(&fontdb::Query {
            families,
            ..fontdb::Query::default()
        })?;
        db.with_face_data(id, |data, index| {
            Font::try_from_vec_and_index(data.to_vec(), index)
        })
        .flatten()
    }
}

fn load_font_file(path: &Path) -> CardgenResult<Font<'static>> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data)
        .ok_or_else(|| CardgenError::font(format!("unable to read font '{}'", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_family_is_font_error() {
        let fonts = FontLibrary::new(&[]);
        let err = fonts
            .resolve(Some("No Such Family Anywhere 42"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "font error: font not found: No Such Family Anywhere 42");
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = std::env::temp_dir().join("ttcardgen_test_bad_font");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let fonts = FontLibrary::new(&[]);
        let err = fonts.resolve(path.to_str()).err().unwrap();
        assert!(err.to_string().contains("unable to read font"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
