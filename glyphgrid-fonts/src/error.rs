//! Error types for font loading and classification.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the font list.
///
/// Missing glyph coverage is not an error: the picker degrades to the
/// primary font instead.
#[derive(Debug, Error)]
pub enum FontError {
    /// Neither the configured primary family nor any monospace family was found.
    #[error("primary font '{0}' not found and no monospace fallback is available")]
    PrimaryNotFound(String),

    /// Font bytes could not be parsed.
    #[error("invalid font data: {0}")]
    InvalidFontData(String),

    /// Reading a font file failed.
    #[error("failed to read font file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A classification or scale-override pattern failed to compile.
    #[error("invalid font rule pattern {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
