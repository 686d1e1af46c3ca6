//! Box drawing characters (U+2500–U+257F).
//!
//! Each character is described by the weight of its four arms (up, right,
//! down, left). Arms run from the cell edge to the centre and are extended
//! across the perpendicular stroke so joints render solid. Rounded corners
//! and diagonals are left to the font.

use super::types::CellRect;
use crate::instances::RectInstance;

/// Stroke thickness as a fraction of the cell width.
const LIGHT_THICKNESS: f32 = 0.12;
const HEAVY_THICKNESS: f32 = 0.20;

const N: u8 = 0;
const L: u8 = 1;
const H: u8 = 2;
const D: u8 = 3;

/// Arms for U+2500..=U+254B as `[up, right, down, left]`.
/// Dashed lines (U+2504..=U+250B) are handled separately.
#[rustfmt::skip]
const ARMS_2500: [[u8; 4]; 0x4C] = [
    [N, L, N, L], [N, H, N, H], [L, N, L, N], [H, N, H, N], // ─ ━ │ ┃
    [N; 4], [N; 4], [N; 4], [N; 4],                         // ┄ ┅ ┆ ┇
    [N; 4], [N; 4], [N; 4], [N; 4],                         // ┈ ┉ ┊ ┋
    [N, L, L, N], [N, H, L, N], [N, L, H, N], [N, H, H, N], // ┌ ┍ ┎ ┏
    [N, N, L, L], [N, N, L, H], [N, N, H, L], [N, N, H, H], // ┐ ┑ ┒ ┓
    [L, L, N, N], [L, H, N, N], [H, L, N, N], [H, H, N, N], // └ ┕ ┖ ┗
    [L, N, N, L], [L, N, N, H], [H, N, N, L], [H, N, N, H], // ┘ ┙ ┚ ┛
    [L, L, L, N], [L, H, L, N], [H, L, L, N], [L, L, H, N], // ├ ┝ ┞ ┟
    [H, L, H, N], [H, H, L, N], [L, H, H, N], [H, H, H, N], // ┠ ┡ ┢ ┣
    [L, N, L, L], [L, N, L, H], [H, N, L, L], [L, N, H, L], // ┤ ┥ ┦ ┧
    [H, N, H, L], [H, N, L, H], [L, N, H, H], [H, N, H, H], // ┨ ┩ ┪ ┫
    [N, L, L, L], [N, L, L, H], [N, H, L, L], [N, H, L, H], // ┬ ┭ ┮ ┯
    [N, L, H, L], [N, L, H, H], [N, H, H, L], [N, H, H, H], // ┰ ┱ ┲ ┳
    [L, L, N, L], [L, L, N, H], [L, H, N, L], [L, H, N, H], // ┴ ┵ ┶ ┷
    [H, L, N, L], [H, L, N, H], [H, H, N, L], [H, H, N, H], // ┸ ┹ ┺ ┻
    [L, L, L, L], [L, L, L, H], [L, H, L, L], [L, H, L, H], // ┼ ┽ ┾ ┿
    [H, L, L, L], [L, L, H, L], [H, L, H, L], [H, L, L, H], // ╀ ╁ ╂ ╃
    [H, H, L, L], [L, L, H, H], [L, H, H, L], [H, H, L, H], // ╄ ╅ ╆ ╇
    [L, H, H, H], [H, L, H, H], [H, H, H, L], [H, H, H, H], // ╈ ╉ ╊ ╋
];

/// Arms for U+2550..=U+256C (double lines).
#[rustfmt::skip]
const ARMS_2550: [[u8; 4]; 0x1D] = [
    [N, D, N, D], [D, N, D, N],                             // ═ ║
    [N, D, L, N], [N, L, D, N], [N, D, D, N],               // ╒ ╓ ╔
    [N, N, L, D], [N, N, D, L], [N, N, D, D],               // ╕ ╖ ╗
    [L, D, N, N], [D, L, N, N], [D, D, N, N],               // ╘ ╙ ╚
    [L, N, N, D], [D, N, N, L], [D, N, N, D],               // ╛ ╜ ╝
    [L, D, L, N], [D, L, D, N], [D, D, D, N],               // ╞ ╟ ╠
    [L, N, L, D], [D, N, D, L], [D, N, D, D],               // ╡ ╢ ╣
    [N, D, L, D], [N, L, D, L], [N, D, D, D],               // ╤ ╥ ╦
    [L, D, N, D], [D, L, N, L], [D, D, N, D],               // ╧ ╨ ╩
    [L, D, L, D], [D, L, D, L], [D, D, D, D],               // ╪ ╫ ╬
];

/// Arms for U+2574..=U+257F (half lines).
#[rustfmt::skip]
const ARMS_2574: [[u8; 4]; 12] = [
    [N, N, N, L], [L, N, N, N], [N, L, N, N], [N, N, L, N], // ╴ ╵ ╶ ╷
    [N, N, N, H], [H, N, N, N], [N, H, N, N], [N, N, H, N], // ╸ ╹ ╺ ╻
    [N, H, N, L], [L, N, H, N], [N, L, N, H], [H, N, L, N], // ╼ ╽ ╾ ╿
];

fn arms_for(cp: u32) -> Option<[u8; 4]> {
    let arms = match cp {
        0x2500..=0x254B => ARMS_2500[(cp - 0x2500) as usize],
        0x2550..=0x256C => ARMS_2550[(cp - 0x2550) as usize],
        0x2574..=0x257F => ARMS_2574[(cp - 0x2574) as usize],
        _ => return None,
    };
    (arms != [N; 4]).then_some(arms)
}

/// `(horizontal, weight, segments)` for dashed lines.
fn dash_for(cp: u32) -> Option<(bool, u8, u32)> {
    Some(match cp {
        0x2504 => (true, L, 3),
        0x2505 => (true, H, 3),
        0x2506 => (false, L, 3),
        0x2507 => (false, H, 3),
        0x2508 => (true, L, 4),
        0x2509 => (true, H, 4),
        0x250A => (false, L, 4),
        0x250B => (false, H, 4),
        0x254C => (true, L, 2),
        0x254D => (true, H, 2),
        0x254E => (false, L, 2),
        0x254F => (false, H, 2),
        _ => return None,
    })
}

struct Strokes {
    light: f32,
    heavy: f32,
}

impl Strokes {
    fn new(cell: CellRect) -> Self {
        let light = (cell.width * LIGHT_THICKNESS).round().max(1.0);
        let heavy = (cell.width * HEAVY_THICKNESS).round().max(light + 1.0);
        Self { light, heavy }
    }

    /// Total width a stroke of `weight` covers across its axis.
    fn extent(&self, weight: u8) -> f32 {
        match weight {
            L => self.light,
            H => self.heavy,
            D => self.light * 3.0,
            _ => 0.0,
        }
    }

    /// Offsets and thicknesses of the parallel lines making up a stroke,
    /// relative to the stroke's leading edge.
    fn lines(&self, weight: u8) -> Vec<(f32, f32)> {
        match weight {
            L => vec![(0.0, self.light)],
            H => vec![(0.0, self.heavy)],
            D => vec![(0.0, self.light), (self.light * 2.0, self.light)],
            _ => Vec::new(),
        }
    }
}

pub fn draw_box(cp: u32, cell: CellRect, color: [f32; 4], out: &mut Vec<RectInstance>) -> bool {
    let strokes = Strokes::new(cell);
    let mid_x = cell.x + (cell.width / 2.0).floor();
    let mid_y = cell.y + (cell.height / 2.0).floor();

    if let Some((horizontal, weight, segments)) = dash_for(cp) {
        let extent = strokes.extent(weight);
        let (len, origin) = if horizontal {
            (cell.width, cell.x)
        } else {
            (cell.height, cell.y)
        };
        let seg = len / segments as f32;
        let gap = (seg * 0.3).round().max(1.0);
        for i in 0..segments {
            let start = (origin + i as f32 * seg + gap / 2.0).round();
            let end = (origin + (i + 1) as f32 * seg - gap / 2.0).round();
            if end <= start {
                continue;
            }
            out.push(if horizontal {
                let y = mid_y - (extent / 2.0).floor();
                RectInstance::new(start, y, end - start, extent, color)
            } else {
                let x = mid_x - (extent / 2.0).floor();
                RectInstance::new(x, start, extent, end - start, color)
            });
        }
        return true;
    }

    let Some([up, right, down, left]) = arms_for(cp) else {
        return false;
    };

    // Widest perpendicular strokes at the centre joint
    let h_extent = strokes.extent(left).max(strokes.extent(right));
    let v_extent = strokes.extent(up).max(strokes.extent(down));
    let h_top = mid_y - (h_extent / 2.0).floor();
    let v_left = mid_x - (v_extent / 2.0).floor();

    let vertical_arm = |weight: u8, y0: f32, y1: f32, out: &mut Vec<RectInstance>| {
        let x0 = mid_x - (strokes.extent(weight) / 2.0).floor();
        for (offset, thickness) in strokes.lines(weight) {
            out.push(RectInstance::new(x0 + offset, y0, thickness, y1 - y0, color));
        }
    };
    if up != N {
        vertical_arm(up, cell.y, h_top + h_extent, out);
    }
    if down != N {
        vertical_arm(down, h_top, cell.y + cell.height, out);
    }

    let horizontal_arm = |weight: u8, x0: f32, x1: f32, out: &mut Vec<RectInstance>| {
        let y0 = mid_y - (strokes.extent(weight) / 2.0).floor();
        for (offset, thickness) in strokes.lines(weight) {
            out.push(RectInstance::new(x0, y0 + offset, x1 - x0, thickness, color));
        }
    };
    if left != N {
        horizontal_arm(left, cell.x, v_left + v_extent, out);
    }
    if right != N {
        horizontal_arm(right, v_left, cell.x + cell.width, out);
    }
    true
}
