//! Font fallback management and text shaping for the glyphgrid rendering core.
//!
//! This crate provides:
//! - A `FontFace` capability trait with a swash-backed implementation
//! - Font loading through fontdb (family queries and explicit files)
//! - Label-based font classification driven by configurable regex tables
//! - The `FontManager` fallback chain with a memoized per-cluster font picker
//! - HarfBuzz-based text shaping via rustybuzz with an LRU result cache
//! - Scale and baseline harmonization of fallback fonts against the primary
//!
//! # Architecture
//!
//! The `FontManager` owns an ordered list of fonts:
//! 1. Primary font (index 0)
//! 2. Fallback fonts in configured priority order
//! 3. Bold/italic/bold-italic variants of the primary font
//!
//! Styled variants never take part in coverage search; they only replace the
//! primary font when a style hint asks for them.

pub mod classify;
pub mod error;
pub mod face;
pub mod font_manager;
pub mod harmonize;
mod loader;
pub mod text_shaper;
pub mod unicode;

// Re-export main types for convenience
pub use classify::{FontClass, FontClassifier};
pub use error::FontError;
pub use face::{FaceMetrics, FontData, FontFace, GlyphBitmap, GlyphBounds, GlyphTransform, SwashFace};
pub use font_manager::{FontEntry, FontManager, FontRole, FontStyle, PickStats};
pub use harmonize::{FallbackScale, FitBox, harmonize_fallback};
pub use text_shaper::{ShapedGlyph, ShapedRun, ShapingOptions, TextShaper};
