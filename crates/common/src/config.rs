//! User settings and logging configuration.

use std::path::{Path, PathBuf};

use crate::error::{CardgenError, CardgenResult};
use crate::ini::IniDocument;

/// Section of the settings file holding the search paths.
pub const SETTINGS_SECTION: &str = "Settings";

/// File name of the per-user settings file in the home directory.
pub const SETTINGS_FILE_NAME: &str = ".rpgcardgen.cfg";

/// Per-user settings: extra directories searched for relative file names
/// that are not found next to the config file referencing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Directories searched for `template` files.
    pub template_paths: Vec<PathBuf>,

    /// Directories searched for `image*` files.
    pub image_paths: Vec<PathBuf>,

    /// Directories searched for `.ttf` fonts.
    pub font_paths: Vec<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ttcardgen_render_engine=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Parse settings from the text of a settings file.
    ///
    /// A missing `[Settings]` section yields empty search paths.
    pub fn parse(text: &str) -> CardgenResult<Self> {
        let doc = IniDocument::parse(text)
            .map_err(|e| CardgenError::config(format!("settings: {e}")))?;

        let Some(section) = doc.section(SETTINGS_SECTION) else {
            return Ok(Self::default());
        };

        let paths = |key: &str| -> CardgenResult<Vec<PathBuf>> {
            let value = section
                .get(key)
                .map_err(|e| CardgenError::config(format!("settings: {e}")))?
                .unwrap_or_default();
            Ok(value.split_whitespace().map(PathBuf::from).collect())
        };

        Ok(Self {
            template_paths: paths("template_paths")?,
            image_paths: paths("image_paths")?,
            font_paths: paths("font_paths")?,
        })
    }

    /// Load settings from a file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> CardgenResult<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load settings from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = settings_file_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Standard settings file location (`~/.rpgcardgen.cfg`).
pub fn settings_file_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_paths() {
        let settings = Settings::parse(
            "[Settings]\ntemplate_paths: /opt/cards/templates /srv/templates\nimage_paths:\nfont_paths: /usr/share/fonts/truetype\n",
        )
        .unwrap();

        assert_eq!(
            settings.template_paths,
            vec![
                PathBuf::from("/opt/cards/templates"),
                PathBuf::from("/srv/templates")
            ]
        );
        assert!(settings.image_paths.is_empty());
        assert_eq!(
            settings.font_paths,
            vec![PathBuf::from("/usr/share/fonts/truetype")]
        );
    }

    #[test]
    fn test_missing_section_gives_defaults() {
        let settings = Settings::parse("[Other]\nkey: value\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = Settings::parse("template_paths: /x").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().starts_with("settings: line 1"));
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("ttcardgen_no_such_settings.cfg");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("ttcardgen_test_settings");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.cfg");
        std::fs::write(&path, "[Settings]\nimage_paths: /a /b\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.image_paths.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
