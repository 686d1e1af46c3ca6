//! Underline, strikethrough and overline geometry.

use crate::instances::RectInstance;
use crate::metrics::CellMetrics;
use crate::snapshot::UnderlineStyle;

/// Emit the rects for one underline of `width` pixels starting at `x`.
///
/// `y` is the top of the underline stroke.
pub fn push_underline(
    out: &mut Vec<RectInstance>,
    style: UnderlineStyle,
    x: f32,
    y: f32,
    width: f32,
    metrics: &CellMetrics,
    color: [f32; 4],
) {
    let t = metrics.stroke;
    match style {
        UnderlineStyle::Single => out.push(RectInstance::new(x, y, width, t, color)),
        UnderlineStyle::Double => {
            let upper = (y - t).max(0.0);
            out.push(RectInstance::new(x, upper, width, t, color));
            out.push(RectInstance::new(x, upper + 2.0 * t, width, t, color));
        }
        UnderlineStyle::Curly => {
            // One sine period per cell, sampled in stroke-wide steps
            let amplitude = t.max(1.0);
            let period = metrics.cell_width.max(1.0);
            let mut offset = 0.0;
            while offset < width {
                let step = t.min(width - offset);
                let phase = (offset + step / 2.0) / period * std::f32::consts::TAU;
                let dy = (phase.sin() * amplitude).round();
                out.push(RectInstance::new(x + offset, y + dy, step, t, color));
                offset += t;
            }
        }
        UnderlineStyle::Dotted => {
            let mut offset = 0.0;
            while offset < width {
                out.push(RectInstance::new(x + offset, y, t.min(width - offset), t, color));
                offset += 2.0 * t;
            }
        }
        UnderlineStyle::Dashed => {
            // Two dashes per cell with a gap after each
            let cell = metrics.cell_width.max(1.0);
            let dash = (cell * 0.4).round().max(1.0);
            let mut start = 0.0;
            while start < width {
                for dash_start in [start, start + cell / 2.0] {
                    if dash_start < width {
                        let w = dash.min(width - dash_start);
                        out.push(RectInstance::new(x + dash_start, y, w, t, color));
                    }
                }
                start += cell;
            }
        }
    }
}

pub fn push_strikethrough(
    out: &mut Vec<RectInstance>,
    x: f32,
    cell_y: f32,
    width: f32,
    metrics: &CellMetrics,
    color: [f32; 4],
) {
    let y = cell_y + metrics.strike_y - (metrics.stroke / 2.0).floor();
    out.push(RectInstance::new(x, y, width, metrics.stroke, color));
}

pub fn push_overline(
    out: &mut Vec<RectInstance>,
    x: f32,
    cell_y: f32,
    width: f32,
    metrics: &CellMetrics,
    color: [f32; 4],
) {
    out.push(RectInstance::new(x, cell_y, width, metrics.stroke, color));
}
