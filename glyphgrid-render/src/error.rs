//! Error types for the render crate.

use glyphgrid_fonts::FontError;
use thiserror::Error;

/// Errors raised while setting up or feeding the render context.
///
/// Missing glyph coverage, packer overflow and empty rasterizations are not
/// errors; the compositor logs them and draws nothing for the glyph.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("snapshot shape mismatch: {field} has {actual} entries, expected {expected}")]
    SnapshotShape {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid atlas bounds: {0}")]
    InvalidAtlasBounds(String),
}
