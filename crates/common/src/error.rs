//! Error types shared across ttcardgen crates.

use std::path::PathBuf;

/// Top-level error type for card generation.
#[derive(Debug, thiserror::Error)]
pub enum CardgenError {
    /// The card or template config is missing a key, a section, or holds
    /// a value that cannot be parsed.
    #[error("{message}")]
    Config { message: String },

    #[error("{message}")]
    Render { message: String },

    #[error("font error: {message}")]
    Font { message: String },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A file named by a config key that is in none of the search paths.
    #[error("{key}: file not found {path}")]
    MissingFile { key: String, path: PathBuf },

    /// An error raised while processing one card field, prefixed with the
    /// field's key.
    #[error("{key}: {source}")]
    Field {
        key: String,
        #[source]
        source: Box<CardgenError>,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CardgenError.
pub type CardgenResult<T> = Result<T, CardgenError>;

impl CardgenError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font {
            message: msg.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn missing_file(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingFile {
            key: key.into(),
            path: path.into(),
        }
    }

    /// Wrap an error with the card key it was raised for.
    pub fn field(key: impl Into<String>, source: CardgenError) -> Self {
        Self::Field {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is a configuration error, looking through field wrappers.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config { .. } => true,
            Self::Field { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_prefixes_key() {
        let err = CardgenError::field("title", CardgenError::config("'area' undefined"));
        assert_eq!(err.to_string(), "title: 'area' undefined");
    }

    #[test]
    fn test_is_config_sees_through_field_wrapper() {
        let wrapped = CardgenError::field("image", CardgenError::config("bad"));
        assert!(wrapped.is_config());

        let render = CardgenError::field("text", CardgenError::render("boom"));
        assert!(!render.is_config());
        assert!(!CardgenError::file_not_found("/nope").is_config());
    }

    #[test]
    fn test_file_not_found_message() {
        let err = CardgenError::file_not_found("cards/missing.cfg");
        assert_eq!(err.to_string(), "file not found: cards/missing.cfg");
    }

    #[test]
    fn test_missing_file_names_key() {
        let err = CardgenError::missing_file("image", "icons/fork.png");
        assert_eq!(err.to_string(), "image: file not found icons/fork.png");
        assert!(!err.is_config());
    }
}
