//! Glyph atlas builder, cell compositor and overlay layer for glyphgrid.
//!
//! This crate provides:
//!
//! - Shelf-packed glyph atlases per font, with constrained width variants
//!   for symbol and icon glyphs
//! - The per-frame cell walk producing layered instance buffers
//! - Direct rect drawing for block elements, box drawing, braille and
//!   Powerline separators
//! - Cursor shapes and transient overlays (IME preedit, resize indicator,
//!   scrollbar, synchronized-output gate)
//!
//! Everything lives in an owned [`RenderContext`]; there is no global state.

pub mod atlas;
pub mod compositor;
pub mod context;
pub mod error;
pub mod instances;
pub mod metrics;
pub mod overlay;
pub mod shortcut;
pub mod snapshot;

// Re-export main public types
pub use atlas::{AtlasFormat, FontAtlasState, GlyphAtlas, GlyphMetrics};
pub use compositor::{CellVisual, Frame, ResolvedColors, VisualKind};
pub use context::RenderContext;
pub use error::RenderError;
pub use instances::{FrameInstances, FrameSummary, GlyphInstance, Layer, RectInstance};
pub use metrics::CellMetrics;
pub use overlay::{ImeAnchor, Preedit};
pub use snapshot::{
    CellFlags, CursorDescriptor, GridSnapshot, ScrollState, Selection, TerminalSnapshot,
    UnderlineStyle,
};
