//! Braille patterns (U+2800–U+28FF).

use super::types::{CellRect, PixelRect};
use crate::instances::RectInstance;

/// Dot bit -> (column, row) in the 2x4 braille grid.
const DOTS: [(u32, u32); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 3),
    (1, 3),
];

pub fn draw_braille(cp: u32, cell: CellRect, color: [f32; 4], out: &mut Vec<RectInstance>) -> bool {
    if !(0x2800..=0x28FF).contains(&cp) {
        return false;
    }
    let bits = cp - 0x2800;
    let dot = (cell.width / 4.0).min(cell.height / 8.0).round().max(1.0);
    for (bit, &(col, row)) in DOTS.iter().enumerate() {
        if bits & (1 << bit) == 0 {
            continue;
        }
        let cx = cell.x + cell.width * (0.25 + 0.5 * col as f32);
        let cy = cell.y + cell.height * (0.125 + 0.25 * row as f32);
        let rect = PixelRect {
            x: cx - dot / 2.0,
            y: cy - dot / 2.0,
            width: dot,
            height: dot,
        }
        .snap_to_pixels();
        out.push(rect.instance(color));
    }
    true
}
