//! Key/value config documents in the classic INI dialect.
//!
//! ```text
//! [DEFAULT]
//! font_size: 60
//!
//! [Card]
//! template = templates/item.cfg
//! text: first line
//!     continued line
//! ```
//!
//! Section names are case-sensitive, keys are lowercased. `[DEFAULT]`
//! entries act as fallbacks for every other section. Values may reference
//! other keys of the same section with `%(name)s`.

use std::fmt;

/// Name of the fallback section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Errors raised while parsing or reading an INI document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IniError {
    #[error("line {line}: entry outside of any section")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: malformed section header")]
    BadSectionHeader { line: usize },

    #[error("line {line}: expected 'key: value' or 'key = value'")]
    BadEntry { line: usize },

    #[error("line {line}: section '{section}' already defined")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: key '{key}' already defined in section '{section}'")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("'{key}' references undefined key '{reference}'")]
    MissingReference { key: String, reference: String },

    #[error("'{key}': unterminated '%(' reference")]
    BadReference { key: String },

    #[error("'{key}': references nested too deeply")]
    ReferenceDepth { key: String },
}

/// One named section with its entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw (uninterpolated) value of a key in this section only.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, keeping the position of an existing key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn last_mut(&mut self) -> Option<&mut (String, String)> {
        self.entries.last_mut()
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    defaults: Section,
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        }
    }

    /// Parse a document from text.
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut doc = Self::new();
        // Index into `sections`, or `None` for DEFAULT.
        let mut current: Option<Option<usize>> = None;
        // Indentation of the last entry line, for continuation detection.
        let mut entry_indent: Option<usize> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                entry_indent = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = raw_line.len() - raw_line.trim_start().len();

            if let (Some(section_idx), Some(key_indent)) = (current, entry_indent) {
                if indent > key_indent {
                    let section = doc.slot_mut(section_idx);
                    if let Some((_, value)) = section.last_mut() {
                        if !value.is_empty() {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if trimmed.starts_with('[') {
                if !trimmed.ends_with(']') || trimmed.len() < 3 {
                    return Err(IniError::BadSectionHeader { line: line_no });
                }
                let name = trimmed[1..trimmed.len() - 1].trim();
                if name.is_empty() {
                    return Err(IniError::BadSectionHeader { line: line_no });
                }
                if name == DEFAULT_SECTION {
                    current = Some(None);
                } else {
                    if doc.sections.iter().any(|s| s.name == name) {
                        return Err(IniError::DuplicateSection {
                            line: line_no,
                            section: name.to_string(),
                        });
                    }
                    doc.sections.push(Section::new(name));
                    current = Some(Some(doc.sections.len() - 1));
                }
                entry_indent = None;
                continue;
            }

            let Some(section_idx) = current else {
                return Err(IniError::MissingSectionHeader { line: line_no });
            };

            let delim = trimmed
                .find([':', '='])
                .ok_or(IniError::BadEntry { line: line_no })?;
            let key = trimmed[..delim].trim().to_lowercase();
            if key.is_empty() {
                return Err(IniError::BadEntry { line: line_no });
            }
            let value = trimmed[delim + 1..].trim();

            let section = doc.slot_mut(section_idx);
            if section.get(&key).is_some() {
                return Err(IniError::DuplicateKey {
                    line: line_no,
                    section: section.name.clone(),
                    key,
                });
            }
            section.set(&key, value);
            entry_indent = Some(indent);
        }

        Ok(doc)
    }

    fn slot_mut(&mut self, slot: Option<usize>) -> &mut Section {
        match slot {
            Some(idx) => &mut self.sections[idx],
            None => &mut self.defaults,
        }
    }

    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    /// Names of all sections except DEFAULT, in order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// A view of a section with DEFAULT fallbacks applied.
    pub fn section(&self, name: &str) -> Option<SectionView<'_>> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|section| SectionView {
                section,
                defaults: &self.defaults,
            })
    }

    /// Get a section for writing, creating it at the end if absent.
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => &mut self.sections[idx],
            None => {
                self.sections.push(Section::new(name));
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        }
    }

    /// Overlay another document on this one. Values from `other` win.
    pub fn merge(&mut self, other: &IniDocument) {
        for (key, value) in &other.defaults.entries {
            self.defaults.set(key, value.clone());
        }
        for section in &other.sections {
            let target = self.ensure_section(&section.name);
            for (key, value) in &section.entries {
                target.set(key, value.clone());
            }
        }
    }
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut write_section = |f: &mut fmt::Formatter<'_>, section: &Section| -> fmt::Result {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, value.replace('\n', "\n\t"))?;
            }
            writeln!(f)
        };

        if !self.defaults.is_empty() {
            write_section(f, &self.defaults)?;
        }
        for section in &self.sections {
            write_section(f, section)?;
        }
        Ok(())
    }
}

/// Read access to a section with DEFAULT fallbacks and `%(name)s`
/// references resolved.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    section: &'a Section,
    defaults: &'a Section,
}

impl<'a> SectionView<'a> {
    pub fn name(&self) -> &'a str {
        &self.section.name
    }

    /// Raw value, falling back to DEFAULT.
    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.section.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Interpolated value, falling back to DEFAULT.
    pub fn get(&self, key: &str) -> Result<Option<String>, IniError> {
        match self.raw(key) {
            Some(value) => self.interpolate(key, value, 1).map(Some),
            None => Ok(None),
        }
    }

    /// Keys of the section followed by DEFAULT keys it does not override.
    pub fn keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self.section.keys().collect();
        for key in self.defaults.keys() {
            if self.section.get(key).is_none() {
                keys.push(key);
            }
        }
        keys
    }

    fn interpolate(&self, key: &str, value: &str, depth: usize) -> Result<String, IniError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(IniError::ReferenceDepth {
                key: key.to_string(),
            });
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if let Some(tail) = rest.strip_prefix("%%") {
                out.push('%');
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("%(") {
                let end = tail.find(")s").ok_or_else(|| IniError::BadReference {
                    key: key.to_string(),
                })?;
                let reference = tail[..end].to_lowercase();
                let target = self
                    .raw(&reference)
                    .ok_or_else(|| IniError::MissingReference {
                        key: key.to_string(),
                        reference: reference.clone(),
                    })?;
                out.push_str(&self.interpolate(&reference, target, depth + 1)?);
                rest = &tail[end + 2..];
            } else {
                // A lone '%' is kept as-is; card texts often contain "50%".
                out.push('%');
                rest = &rest[1..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
