//! Error types for design generation.

use std::path::PathBuf;

use thiserror::Error;

/// A letter the stroke font has no strokes for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The font does not define this letter.
    #[error("letter '{letter}' is not defined in the {font} stroke font")]
    Unsupported {
        /// The requested letter (uppercased).
        letter: char,
        /// Font name.
        font: &'static str,
    },
}

/// Errors loading design parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The parameter file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The parameter file is not valid TOML for the expected schema.
    #[error("invalid parameters: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors writing output files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing a file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A requested layer was not produced by the build.
    #[error("no solid named '{0}' in build output")]
    MissingSolid(String),
}
