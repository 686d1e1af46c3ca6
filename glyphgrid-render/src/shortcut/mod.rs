//! Direct drawing of block elements, box drawing, braille and Powerline
//! separators as rectangles.
//!
//! These glyphs must tile seamlessly across cells, which font glyphs rarely
//! do, so they bypass shaping and the atlas. A drawer returns `false` for
//! sub-variants it does not handle and the cell falls through to the font.

mod block_elements;
mod box_drawing;
mod braille;
mod powerline;
mod types;

pub use types::{CellRect, GeometricBlock, PixelRect};

use crate::instances::RectInstance;

/// Whether `cp` belongs to a range the shortcut drawer looks at.
pub fn is_shortcut_candidate(cp: u32) -> bool {
    matches!(cp,
        0x2500..=0x257F     // Box Drawing
        | 0x2580..=0x259F   // Block Elements
        | 0x2800..=0x28FF   // Braille Patterns
        | 0xE0B0..=0xE0BF   // Powerline separators
    )
}

/// Draw `cp` into `cell`, appending rects to `out`.
///
/// Returns `false` without touching `out` when the glyph must be rendered
/// from a font instead.
pub fn draw_shortcut(cp: u32, cell: CellRect, color: [f32; 4], out: &mut Vec<RectInstance>) -> bool {
    match cp {
        0x2500..=0x257F => box_drawing::draw_box(cp, cell, color, out),
        0x2580..=0x259F => match block_elements::block_element_rects(cp) {
            Some(blocks) => {
                let alpha = block_elements::shade_alpha(cp);
                let color = [color[0], color[1], color[2], color[3] * alpha];
                out.extend(
                    blocks
                        .into_iter()
                        .map(|b| b.to_pixel_rect(cell).snap_to_pixels().instance(color)),
                );
                true
            }
            None => false,
        },
        0x2800..=0x28FF => braille::draw_braille(cp, cell, color, out),
        0xE0B0..=0xE0BF => powerline::draw_powerline(cp, cell, color, out),
        _ => false,
    }
}
