//! Cell geometry derived from the primary font.

use glyphgrid_config::FontConfig;
use glyphgrid_fonts::FontFace;

use crate::atlas::ConstraintCell;

/// Pixel geometry of one grid cell.
///
/// Vertical positions are measured from the top of the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f32,
    pub cell_height: f32,
    /// Baseline offset from the top of the cell
    pub baseline: f32,
    /// Primary font size in pixels
    pub font_size_px: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Unspaced line height of the primary font
    pub line_height: f32,
    /// Thickness of underlines, strikethrough and thin cursor strokes
    pub stroke: f32,
    pub underline_y: f32,
    pub strike_y: f32,
}

impl CellMetrics {
    /// Measure the primary face at `font.size * scale_factor` pixels.
    pub fn from_face(face: &dyn FontFace, font: &FontConfig, scale_factor: f32) -> Self {
        let size_px = font.size * scale_factor;
        let m = face.metrics();
        let scale = size_px / m.units_per_em.max(1.0);

        let advance = ['0', 'M']
            .into_iter()
            .map(|ch| face.glyph_id_for_char(ch))
            .find(|&gid| gid != 0)
            .map(|gid| face.advance_width(gid) * scale)
            .filter(|&a| a > 0.0)
            .unwrap_or(size_px * 0.6);

        let ascent = m.ascender * scale;
        let descent = m.descender * scale;
        let line_height = m.line_height() * scale;
        let cell_width = (advance * font.char_spacing).round().max(1.0);
        let cell_height = (line_height * font.line_spacing).round().max(1.0);
        let baseline = ((cell_height - (ascent + descent)) / 2.0 + ascent).round();
        let stroke = (size_px / 14.0).round().max(1.0);
        let underline_y = (baseline + (descent * 0.5).round().max(stroke)).min(cell_height - stroke);
        let x_height = m.x_height.map(|x| x * scale).unwrap_or(ascent * 0.5);
        let strike_y = (baseline - x_height / 2.0).round();

        Self {
            cell_width,
            cell_height,
            baseline,
            font_size_px: size_px,
            ascent,
            descent,
            line_height,
            stroke,
            underline_y,
            strike_y,
        }
    }

    /// Top-left corner of a cell in device pixels.
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        (col as f32 * self.cell_width, row as f32 * self.cell_height)
    }

    pub fn constraint_cell(&self) -> ConstraintCell {
        ConstraintCell {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            baseline: self.baseline,
        }
    }
}
