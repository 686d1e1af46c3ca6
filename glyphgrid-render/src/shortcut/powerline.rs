//! Solid Powerline separators drawn as scanline rectangles.

use super::types::CellRect;
use crate::instances::RectInstance;

/// Filled span of a separator at normalized height `t` (0 = top, 1 = bottom),
/// as `(start, end)` fractions of the cell width.
fn span(cp: u32, t: f32) -> Option<(f32, f32)> {
    let tip = 1.0 - (2.0 * t - 1.0).abs();
    let disc = (1.0 - (2.0 * t - 1.0).powi(2)).max(0.0).sqrt();
    match cp {
        // Right-pointing and left-pointing triangles
        0xE0B0 => Some((0.0, tip)),
        0xE0B2 => Some((1.0 - tip, 1.0)),
        // Right and left half discs
        0xE0B4 => Some((0.0, disc)),
        0xE0B6 => Some((1.0 - disc, 1.0)),
        // Lower-left, lower-right, upper-left, upper-right triangles
        0xE0B8 => Some((0.0, t)),
        0xE0BA => Some((1.0 - t, 1.0)),
        0xE0BC => Some((0.0, 1.0 - t)),
        0xE0BE => Some((t, 1.0)),
        _ => None,
    }
}

/// Draw a solid separator; outline variants are left to the font.
pub fn draw_powerline(cp: u32, cell: CellRect, color: [f32; 4], out: &mut Vec<RectInstance>) -> bool {
    if span(cp, 0.5).is_none() {
        return false;
    }
    let rows = cell.height.round().max(1.0) as u32;
    let mut run: Option<(u32, f32, f32)> = None;
    let flush = |run: Option<(u32, f32, f32)>, end_row: u32, out: &mut Vec<RectInstance>| {
        if let Some((start_row, x0, x1)) = run {
            if x1 > x0 {
                out.push(RectInstance::new(
                    cell.x + x0,
                    cell.y + start_row as f32,
                    x1 - x0,
                    (end_row - start_row) as f32,
                    color,
                ));
            }
        }
    };

    for row in 0..rows {
        let t = (row as f32 + 0.5) / rows as f32;
        let (a, b) = span(cp, t).unwrap_or((0.0, 0.0));
        let x0 = (a * cell.width).round();
        let x1 = (b * cell.width).round();
        match run {
            Some((_, rx0, rx1)) if rx0 == x0 && rx1 == x1 => {}
            _ => {
                flush(run, row, out);
                run = Some((row, x0, x1));
            }
        }
    }
    flush(run, rows, out);
    true
}
