//! Text shaping using HarfBuzz via rustybuzz.
//!
//! Shaping turns a cluster's text into positioned glyphs for one font. Results
//! are cached per `(font index, text, options)` in an LRU cache since the same
//! clusters recur on every frame.
//!
//! Faces that expose no raw font bytes (bitmap backends, test doubles) are
//! shaped by mapping each codepoint through the face's charmap.

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use lru::LruCache;
use rustybuzz::{Face, Feature, GlyphBuffer, UnicodeBuffer};

use crate::face::FontFace;

const DEFAULT_CACHE_SIZE: usize = 1000;

/// A single shaped glyph with positioning information, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph ID from the font
    pub glyph_id: u16,

    /// Byte offset of the input character(s) this glyph represents
    pub cluster: u32,

    /// Horizontal advance width
    pub x_advance: f32,

    /// Horizontal offset from the current position
    pub x_offset: f32,

    /// Vertical offset from the baseline
    pub y_offset: f32,
}

/// Options for text shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapingOptions {
    /// Enable standard ligatures (fi, fl, etc.)
    pub enable_ligatures: bool,

    /// Enable kerning adjustments
    pub enable_kerning: bool,

    /// Enable contextual alternates
    pub enable_contextual_alternates: bool,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        Self {
            enable_ligatures: true,
            enable_kerning: true,
            enable_contextual_alternates: true,
        }
    }
}

/// Result of shaping a text run
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    /// The input text that was shaped
    pub text: String,

    /// The shaped glyphs
    pub glyphs: Vec<ShapedGlyph>,

    /// Total advance width in font units
    pub total_advance: f32,
}

impl ShapedRun {
    /// Whether shaping produced at least one real glyph.
    pub fn has_glyphs(&self) -> bool {
        self.glyphs.iter().any(|g| g.glyph_id != 0)
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ShapeCacheKey {
    text: String,
    font_index: usize,
    options: ShapingOptions,
}

/// Text shaper using HarfBuzz via rustybuzz
pub struct TextShaper {
    shape_cache: LruCache<ShapeCacheKey, Arc<ShapedRun>>,
}

impl TextShaper {
    /// Create a new text shaper with default settings
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE)
    }

    /// Create a new text shaper with a specific cache size
    pub fn with_cache_size(max_cache_size: usize) -> Self {
        let cap = NonZeroUsize::new(max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            shape_cache: LruCache::new(cap),
        }
    }

    /// Shape `text` with `face`, caching the result under `font_index`.
    pub fn shape_text(
        &mut self,
        text: &str,
        face: &dyn FontFace,
        font_index: usize,
        options: ShapingOptions,
    ) -> Arc<ShapedRun> {
        let cache_key = ShapeCacheKey {
            text: text.to_string(),
            font_index,
            options,
        };

        if let Some(cached) = self.shape_cache.get(&cache_key) {
            return Arc::clone(cached);
        }

        let glyphs = match face
            .font_data()
            .and_then(|(data, index)| Face::from_slice(data, index))
        {
            Some(hb_face) => shape_with_harfbuzz(&hb_face, text, options),
            None => shape_with_charmap(face, text),
        };

        let total_advance = glyphs.iter().map(|g| g.x_advance).sum();
        let shaped_run = Arc::new(ShapedRun {
            text: text.to_string(),
            glyphs,
            total_advance,
        });

        self.shape_cache.put(cache_key, Arc::clone(&shaped_run));
        shaped_run
    }

    /// Clear the shape cache
    pub fn clear_cache(&mut self) {
        self.shape_cache.clear();
    }

    /// Get the current cache size
    pub fn cache_size(&self) -> usize {
        self.shape_cache.len()
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

fn features_for(options: ShapingOptions) -> Vec<Feature> {
    let mut tags = Vec::with_capacity(7);
    if options.enable_ligatures {
        // Contextual and discretionary ligatures carry programming ligatures in many fonts
        tags.extend(["liga", "clig", "dlig"]);
    }
    if options.enable_kerning {
        tags.push("kern");
    }
    if options.enable_contextual_alternates {
        tags.push("calt");
    }
    // Glyph composition is required for emoji sequences
    tags.extend(["ccmp", "locl"]);
    tags.into_iter()
        .filter_map(|t| Feature::from_str(t).ok())
        .collect()
}

fn shape_with_harfbuzz(face: &Face<'_>, text: &str, options: ShapingOptions) -> Vec<ShapedGlyph> {
    let mut unicode_buffer = UnicodeBuffer::new();
    unicode_buffer.push_str(text);
    unicode_buffer.set_direction(rustybuzz::Direction::LeftToRight);

    let glyph_buffer = rustybuzz::shape(face, &features_for(options), unicode_buffer);
    extract_shaped_glyphs(&glyph_buffer)
}

/// Extract shaped glyphs from HarfBuzz glyph buffer
fn extract_shaped_glyphs(buffer: &GlyphBuffer) -> Vec<ShapedGlyph> {
    buffer
        .glyph_infos()
        .iter()
        .zip(buffer.glyph_positions().iter())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id as u16,
            cluster: info.cluster,
            x_advance: pos.x_advance as f32,
            x_offset: pos.x_offset as f32,
            y_offset: pos.y_offset as f32,
        })
        .collect()
}

/// One glyph per codepoint, skipping codepoints the face does not need to cover.
fn shape_with_charmap(face: &dyn FontFace, text: &str) -> Vec<ShapedGlyph> {
    text.char_indices()
        .filter(|(_, ch)| !crate::unicode::is_coverage_ignorable(*ch as u32))
        .map(|(offset, ch)| {
            let glyph_id = face.glyph_id_for_char(ch);
            ShapedGlyph {
                glyph_id,
                cluster: offset as u32,
                x_advance: face.advance_width(glyph_id),
                x_offset: 0.0,
                y_offset: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{FaceMetrics, GlyphBitmap, GlyphBounds, GlyphTransform};

    struct AsciiFace;

    impl FontFace for AsciiFace {
        fn glyph_id_for_char(&self, ch: char) -> u16 {
            if ch.is_ascii_graphic() { ch as u16 } else { 0 }
        }
        fn advance_width(&self, _glyph_id: u16) -> f32 {
            600.0
        }
        fn glyph_bounds(&self, _glyph_id: u16) -> Option<GlyphBounds> {
            None
        }
        fn metrics(&self) -> FaceMetrics {
            FaceMetrics {
                units_per_em: 1000.0,
                ascender: 800.0,
                descender: 200.0,
                line_gap: 0.0,
                x_height: None,
                cap_height: None,
                ideographic_advance: None,
            }
        }
        fn rasterize(&self, _: u16, _: f32, _: Option<GlyphTransform>) -> Option<GlyphBitmap> {
            None
        }
    }

    #[test]
    fn charmap_shaping_skips_ignorable() {
        let mut shaper = TextShaper::new();
        let run = shaper.shape_text("e\u{0301}x", &AsciiFace, 0, ShapingOptions::default());
        assert_eq!(run.glyphs.len(), 2);
        assert_eq!(run.glyphs[0].glyph_id, 'e' as u16);
        assert_eq!(run.glyphs[1].cluster, 3);
        assert_eq!(run.total_advance, 1200.0);
    }

    #[test]
    fn results_are_cached_per_font() {
        let mut shaper = TextShaper::with_cache_size(2);
        let a = shaper.shape_text("ab", &AsciiFace, 0, ShapingOptions::default());
        let b = shaper.shape_text("ab", &AsciiFace, 0, ShapingOptions::default());
        assert!(Arc::ptr_eq(&a, &b));
        shaper.shape_text("ab", &AsciiFace, 1, ShapingOptions::default());
        shaper.shape_text("cd", &AsciiFace, 1, ShapingOptions::default());
        assert_eq!(shaper.cache_size(), 2, "LRU must evict beyond capacity");
    }
}
