//! Card config loading and template resolution.
//!
//! A card config names a template; the template supplies the layout
//! sections and the card supplies the content. Both are merged onto the
//! example config so the base sections always exist:
//!
//! ```text
//! DEFAULT_CONFIG ◄── template.cfg ◄── card.cfg   (later wins per key)
//! ```
//!
//! Relative file names are resolved while loading, against the directory
//! of the file that mentions them and then the user's search paths.

use std::fmt;
use std::path::{Path, PathBuf};

use ttcardgen_common::config::Settings;
use ttcardgen_common::error::{CardgenError, CardgenResult};
use ttcardgen_common::ini::{IniDocument, SectionView};

use crate::example::DEFAULT_CONFIG;
use crate::layout::LayoutSection;

/// Section holding the card content and global card options.
pub const CARD_SECTION: &str = "Card";

/// Kind of a card field, decided by its key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `title*` and `text*` keys.
    Text,
    /// `image*` keys.
    Image,
}

impl FieldKind {
    pub fn for_key(key: &str) -> Option<Self> {
        if key.starts_with("title") || key.starts_with("text") {
            Some(FieldKind::Text)
        } else if key.starts_with("image") {
            Some(FieldKind::Image)
        } else {
            None
        }
    }
}

/// One drawable entry of the `Card` section bound to its layout section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    /// Key in the `Card` section (`title`, `image2`, ...).
    pub key: String,
    pub kind: FieldKind,
    /// Text to draw, or the resolved image path.
    pub value: String,
    /// Name of the layout section (`Title`, `Image2`, ...).
    pub section: String,
}

/// Layout section name for a card key: first letter upper-cased, the rest
/// lower-cased.
pub fn layout_section_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The merged configuration of one card.
#[derive(Debug, Clone)]
pub struct CardConfig {
    doc: IniDocument,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CardConfig {
    /// A config holding only the example defaults.
    pub fn new() -> Self {
        let doc = IniDocument::parse(DEFAULT_CONFIG).expect("example config is valid");
        Self { doc }
    }

    /// Load a card config and the template it references.
    pub fn load(path: impl AsRef<Path>, settings: &Settings) -> CardgenResult<Self> {
        let path = path.as_ref();
        tracing::debug!("load config '{}'", path.display());

        let card_path = std::fs::canonicalize(path)
            .ok()
            .filter(|p| p.is_file())
            .ok_or_else(|| CardgenError::file_not_found(path))?;

        let mut card_doc = read_document(&card_path)?;
        expand_paths(&mut card_doc, parent_dir(&card_path), settings)?;

        let template = card_doc
            .section(CARD_SECTION)
            .map(|card| card.get("template"))
            .transpose()
            .map_err(|e| CardgenError::config(e.to_string()))?
            .flatten()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CardgenError::config("template undefined"))?;
        let template_path = PathBuf::from(template);

        tracing::debug!("using template '{}'", template_path.display());

        let mut template_doc = read_document(&template_path)?;
        expand_paths(&mut template_doc, parent_dir(&template_path), settings)?;

        let mut config = Self::new();
        config.merge(&template_doc);
        config.merge(&card_doc);
        Ok(config)
    }

    /// Overlay a document on this config.
    pub fn merge(&mut self, other: &IniDocument) {
        self.doc.merge(other);
    }

    /// A section of the merged config.
    pub fn section(&self, name: &str) -> CardgenResult<LayoutSection<'_>> {
        self.doc
            .section(name)
            .map(LayoutSection::new)
            .ok_or_else(|| CardgenError::config(format!("missing config section '{name}'")))
    }

    /// The `Card` section.
    pub fn card(&self) -> CardgenResult<LayoutSection<'_>> {
        self.section(CARD_SECTION)
    }

    /// Drawable fields of the card in config order.
    pub fn fields(&self) -> CardgenResult<Vec<CardField>> {
        let card = self.card()?;
        let mut fields = Vec::new();
        for key in card.keys() {
            let Some(kind) = FieldKind::for_key(key) else {
                continue;
            };
            let value = card
                .get_or_empty(key)
                .map_err(|e| CardgenError::field(key, e))?;
            fields.push(CardField {
                key: key.to_string(),
                kind,
                value,
                section: layout_section_name(key),
            });
        }
        Ok(fields)
    }
}

impl fmt::Display for CardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}

fn read_document(path: &Path) -> CardgenResult<IniDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CardgenError::file_not_found(path),
        _ => CardgenError::Io(e),
    })?;
    IniDocument::parse(&content)
        .map_err(|e| CardgenError::config(format!("{}: {e}", path.display())))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("/"))
}

/// Find `name` in the first of `dirs` that holds it.
///
/// Absolute names are returned unchanged. Directories that are not
/// absolute or do not exist are skipped.
pub fn find_file(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Some(candidate.to_path_buf());
    }

    dirs.iter()
        .filter(|dir| dir.is_absolute() && dir.is_dir())
        .map(|dir| dir.join(candidate))
        .find(|path| path.is_file())
}

/// Replace the relative file names of a config document with absolute
/// paths.
///
/// `background` and `backside` are searched next to the document only;
/// `image*`, `template` and `.ttf` fonts of `Title*`/`Text*` sections also
/// search the matching [`Settings`] paths.
pub fn expand_paths(
    doc: &mut IniDocument,
    base_dir: &Path,
    settings: &Settings,
) -> CardgenResult<()> {
    let card = doc
        .section(CARD_SECTION)
        .ok_or_else(|| CardgenError::config(format!("missing config section: '{CARD_SECTION}'")))?;

    let search = |extra: &[PathBuf]| -> Vec<PathBuf> {
        std::iter::once(base_dir.to_path_buf())
            .chain(extra.iter().cloned())
            .collect()
    };

    let mut updates: Vec<(String, String, PathBuf)> = Vec::new();

    let local = search(&[]);
    for key in ["background", "backside"] {
        if let Some(found) = resolve(card, key, &local)? {
            updates.push((CARD_SECTION.to_string(), key.to_string(), found));
        }
    }

    let image_dirs = search(&settings.image_paths);
    for key in card.keys().into_iter().filter(|k| k.starts_with("image")) {
        if let Some(found) = resolve(card, key, &image_dirs)? {
            updates.push((CARD_SECTION.to_string(), key.to_string(), found));
        }
    }

    if card.contains("template") {
        if let Some(found) = resolve(card, "template", &search(&settings.template_paths))? {
            updates.push((CARD_SECTION.to_string(), "template".to_string(), found));
        }
    }

    let font_dirs = search(&settings.font_paths);
    for name in doc.section_names() {
        if !(name.starts_with("Title") || name.starts_with("Text")) {
            continue;
        }
        let Some(section) = doc.section(name) else {
            continue;
        };
        let font = section
            .get("font")
            .map_err(|e| CardgenError::config(e.to_string()))?;
        if font.is_some_and(|f| f.ends_with(".ttf")) {
            if let Some(found) = resolve(section, "font", &font_dirs)? {
                updates.push((name.to_string(), "font".to_string(), found));
            }
        }
    }

    for (section, key, path) in updates {
        tracing::trace!(section = %section, key = %key, path = %path.display(), "resolved path");
        doc.ensure_section(&section)
            .set(&key, path.to_string_lossy().into_owned());
    }

    Ok(())
}

fn resolve(view: SectionView<'_>, key: &str, dirs: &[PathBuf]) -> CardgenResult<Option<PathBuf>> {
    let value = view
        .get(key)
        .map_err(|e| CardgenError::config(e.to_string()))?
        .unwrap_or_default();

    if value.is_empty() || Path::new(&value).is_absolute() {
        return Ok(None);
    }

    find_file(&value, dirs)
        .map(Some)
        .ok_or_else(|| CardgenError::missing_file(key, value))
}
