//! Glyph atlases: packed glyph bitmaps plus per-glyph UV metrics.
//!
//! Each font in the fallback list gets its own atlas. Atlases are rebuilt
//! from the full set of glyphs the font has been asked for, never patched,
//! so every rebuild bumps the generation and invalidates earlier UVs.

mod builder;
pub mod constraint;
pub mod packer;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glyphgrid_fonts::FontFace;

pub use builder::{AtlasParams, ConstraintCell, build_atlas};
pub use constraint::{Align, ConstraintSize, IconConstraint, VAlign, constraint_for};
pub use packer::{PackResult, pack_glyphs};

/// Pixel format of an atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasFormat {
    /// One coverage byte per pixel
    Gray,
    /// Straight RGBA; mask glyphs are stored as white with coverage alpha
    Rgba,
}

impl AtlasFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            AtlasFormat::Gray => 1,
            AtlasFormat::Rgba => 4,
        }
    }
}

/// Placement and metrics of one glyph inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Atlas pixel offset
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the bitmap's left edge
    pub left: i32,
    /// Offset from the baseline up to the bitmap's top edge
    pub top: i32,
    /// Advance in atlas pixels
    pub advance: f32,
    pub colored: bool,
    /// Normalised `(u0, v0, u1, v1)`
    pub uv: [f32; 4],
}

impl GlyphMetrics {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Constraint widths requested for one glyph id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphConstraintMeta {
    /// Codepoint the glyph was shaped from; selects the icon constraint rule
    pub codepoint: u32,
    pub min_width: u8,
    pub widths: BTreeSet<u8>,
}

/// A built atlas texture.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    pub width: u32,
    pub height: u32,
    pub format: AtlasFormat,
    pub pixels: Vec<u8>,
    /// Bumped on every rebuild of this font's atlas
    pub generation: u64,
    /// Pixels per font unit the glyphs were rasterized at
    pub px_per_unit: f32,
    /// Glyphs the packer could not place
    pub dropped: usize,
    glyphs: HashMap<u16, GlyphMetrics>,
    constrained: HashMap<(u8, u16), GlyphMetrics>,
}

impl GlyphAtlas {
    pub fn glyph(&self, glyph_id: u16) -> Option<&GlyphMetrics> {
        self.glyphs.get(&glyph_id)
    }

    pub fn constrained_glyph(&self, width: u8, glyph_id: u16) -> Option<&GlyphMetrics> {
        self.constrained.get(&(width, glyph_id))
    }

    /// Metrics for `glyph_id`, honouring a constraint width when given.
    pub fn lookup(&self, glyph_id: u16, constraint: Option<u8>) -> Option<&GlyphMetrics> {
        match constraint {
            Some(width) => self.constrained_glyph(width, glyph_id),
            None => self.glyph(glyph_id),
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len() + self.constrained.len()
    }
}

/// Per-font atlas bookkeeping owned by the render context.
#[derive(Debug, Default)]
pub struct FontAtlasState {
    atlas: Option<GlyphAtlas>,
    plain: BTreeSet<u16>,
    constrained: BTreeMap<u16, GlyphConstraintMeta>,
    dirty: bool,
    generation: u64,
}

impl FontAtlasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atlas(&self) -> Option<&GlyphAtlas> {
        self.atlas.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask for an unconstrained rendering of `glyph_id`.
    pub fn request_glyph(&mut self, glyph_id: u16) {
        if self.plain.insert(glyph_id) {
            self.dirty = true;
        }
    }

    /// Ask for a rendering of `glyph_id` fitted into `width` cells.
    pub fn request_constrained(&mut self, glyph_id: u16, codepoint: u32, width: u8) {
        let meta = self
            .constrained
            .entry(glyph_id)
            .or_insert_with(|| GlyphConstraintMeta {
                codepoint,
                min_width: width,
                widths: BTreeSet::new(),
            });
        meta.min_width = meta.min_width.min(width);
        if meta.widths.insert(width) {
            self.dirty = true;
        }
    }

    pub fn constraint_meta(&self, glyph_id: u16) -> Option<&GlyphConstraintMeta> {
        self.constrained.get(&glyph_id)
    }

    /// Force a rebuild on next use, e.g. after the cell size changed.
    pub fn invalidate(&mut self) {
        if !self.plain.is_empty() || !self.constrained.is_empty() {
            self.dirty = true;
        }
    }

    /// Rebuild the atlas if glyphs were requested since the last build.
    pub fn rebuild_if_dirty(
        &mut self,
        face: &dyn FontFace,
        font_index: usize,
        params: &AtlasParams,
    ) -> bool {
        if !self.dirty {
            return false;
        }
        self.generation += 1;
        self.atlas = Some(build_atlas(
            face,
            font_index,
            &self.plain,
            &self.constrained,
            params,
            self.generation,
        ));
        self.dirty = false;
        true
    }
}
