//! Constraint-width heuristic for symbol and icon glyphs.

use glyphgrid_fonts::unicode::is_non_graphics_symbol;

use crate::snapshot::TerminalSnapshot;

fn is_blank(cp: u32) -> bool {
    cp == 0 || char::from_u32(cp).is_some_and(char::is_whitespace)
}

/// Cells a single-cell symbol at `(row, col)` may draw into.
///
/// The symbol may claim a second cell only when that cell exists and is
/// blank, and the symbol does not directly follow another symbol.
pub fn symbol_constraint_width(snapshot: &dyn TerminalSnapshot, row: usize, col: usize) -> u8 {
    if col > 0 && is_non_graphics_symbol(snapshot.codepoint(row, col - 1)) {
        return 1;
    }
    if col + 1 < snapshot.cols() && is_blank(snapshot.codepoint(row, col + 1)) {
        2
    } else {
        1
    }
}

/// Whether a glyph `natural_width` pixels wide overflows `width` cells by
/// more than `tolerance`.
pub fn needs_force_fit(natural_width: f32, width: u8, cell_width: f32, tolerance: f32) -> bool {
    natural_width > f32::from(width) * cell_width * (1.0 + tolerance)
}
