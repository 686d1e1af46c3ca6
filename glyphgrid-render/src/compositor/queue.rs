//! Deferred glyph emission.
//!
//! Clusters are queued per font during the cell walk and turned into glyph
//! instances only after every atlas touched by the frame has been rebuilt,
//! so UVs always come from the atlas generation the frame is drawn with.

use std::sync::Arc;

use glyphgrid_fonts::ShapedRun;

use crate::atlas::{FontAtlasState, GlyphAtlas};
use crate::instances::{FrameInstances, GlyphInstance};

/// One shaped cluster waiting for its atlas.
#[derive(Debug, Clone)]
pub struct GlyphQueueEntry {
    /// Grid row and column range the cluster covers; `None` for overlay text
    pub cells: Option<(usize, usize, usize)>,
    /// Pen start in device pixels
    pub x: f32,
    pub baseline_y: f32,
    pub color: [f32; 4],
    pub run: Arc<ShapedRun>,
    /// Font units to device pixels
    pub scale: f32,
    /// Constraint width when the constrained atlas variant is used
    pub constraint: Option<u8>,
}

impl GlyphQueueEntry {
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.cells
            .is_some_and(|(r, first, last)| r == row && (first..=last).contains(&col))
    }

    /// Push one instance per glyph that has a non-empty atlas bitmap.
    pub fn emit(&self, atlas: &GlyphAtlas, out: &mut Vec<GlyphInstance>) {
        // Atlas pixels to device pixels for unconstrained glyphs
        let k = if atlas.px_per_unit > 0.0 {
            self.scale / atlas.px_per_unit
        } else {
            1.0
        };
        let mut pen = self.x;
        for glyph in &self.run.glyphs {
            let advance = glyph.x_advance * self.scale;
            if glyph.glyph_id == 0 {
                pen += advance;
                continue;
            }
            let Some(m) = atlas
                .lookup(glyph.glyph_id, self.constraint)
                .filter(|m| !m.is_empty())
            else {
                pen += advance;
                continue;
            };
            let (x, y, w, h) = if self.constraint.is_some() {
                // Constrained bitmaps are rasterized in cell pixels
                (
                    pen + m.left as f32,
                    self.baseline_y - m.top as f32,
                    m.width as f32,
                    m.height as f32,
                )
            } else {
                (
                    pen + glyph.x_offset * self.scale + m.left as f32 * k,
                    self.baseline_y - glyph.y_offset * self.scale - m.top as f32 * k,
                    m.width as f32 * k,
                    m.height as f32 * k,
                )
            };
            out.push(GlyphInstance {
                position: [x, y],
                size: [w, h],
                tex_offset: [m.uv[0], m.uv[1]],
                tex_size: [m.uv[2] - m.uv[0], m.uv[3] - m.uv[1]],
                color: self.color,
                is_colored: m.colored as u32,
            });
            pen += advance;
        }
    }
}

/// Per-font queues for one frame.
#[derive(Debug, Default)]
pub struct GlyphQueue {
    per_font: Vec<Vec<GlyphQueueEntry>>,
}

impl GlyphQueue {
    pub fn new(font_count: usize) -> Self {
        Self {
            per_font: vec![Vec::new(); font_count],
        }
    }

    pub fn push(&mut self, font_index: usize, entry: GlyphQueueEntry) {
        if font_index >= self.per_font.len() {
            self.per_font.resize_with(font_index + 1, Vec::new);
        }
        self.per_font[font_index].push(entry);
    }

    pub fn len(&self) -> usize {
        self.per_font.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recolor every grid cluster covering `(row, col)`.
    pub fn recolor(&mut self, row: usize, col: usize, color: [f32; 4]) -> usize {
        let mut count = 0;
        for entry in self.per_font.iter_mut().flatten() {
            if entry.covers(row, col) {
                entry.color = color;
                count += 1;
            }
        }
        count
    }

    /// Turn the queue into glyph instances using the current atlases.
    ///
    /// Fonts without a built atlas contribute nothing.
    pub fn emit(&self, atlases: &[FontAtlasState], out: &mut FrameInstances) {
        if out.glyphs.len() < self.per_font.len() {
            out.glyphs.resize_with(self.per_font.len(), Vec::new);
        }
        for (font_index, entries) in self.per_font.iter().enumerate() {
            let Some(atlas) = atlases.get(font_index).and_then(FontAtlasState::atlas) else {
                continue;
            };
            let target = &mut out.glyphs[font_index];
            for entry in entries {
                entry.emit(atlas, target);
            }
        }
    }
}
