//! Cursor geometry and the cursor pass.

use glyphgrid_config::{CursorConfig, CursorStyle, color_u8_to_f32_a};

use super::queue::GlyphQueue;
use super::{CellVisual, VisualKind};
use crate::context::RenderContext;
use crate::instances::{FrameInstances, RectInstance};
use crate::metrics::CellMetrics;
use crate::snapshot::{CellFlags, TerminalSnapshot};

/// Rects for a cursor of `style` over a cell starting at `(x, y)`.
pub fn cursor_rects(
    style: CursorStyle,
    x: f32,
    y: f32,
    width: f32,
    metrics: &CellMetrics,
    config: &CursorConfig,
    color: [f32; 4],
) -> Vec<RectInstance> {
    let height = metrics.cell_height;
    match style {
        CursorStyle::Default | CursorStyle::Block => {
            vec![RectInstance::new(x, y, width, height, color)]
        }
        CursorStyle::Bar => {
            let bar = config.bar_width.max(1.0).min(width);
            vec![RectInstance::new(x, y, bar, height, color)]
        }
        CursorStyle::Underline => {
            let h = config.underline_height.max(1.0).min(height);
            vec![RectInstance::new(x, y + height - h, width, h, color)]
        }
        CursorStyle::Hollow => {
            let t = metrics.stroke;
            vec![
                RectInstance::new(x, y, width, t, color),
                RectInstance::new(x, y + height - t, width, t, color),
                RectInstance::new(x, y + t, t, height - 2.0 * t, color),
                RectInstance::new(x + width - t, y + t, t, height - 2.0 * t, color),
            ]
        }
    }
}

impl RenderContext {
    /// Draw the cursor and, for block cursors, recolor the glyph under it.
    pub(crate) fn cursor_pass(
        &mut self,
        snapshot: &dyn TerminalSnapshot,
        instances: &mut FrameInstances,
        queue: &mut GlyphQueue,
        visuals: &[CellVisual],
    ) {
        let cursor = snapshot.cursor();
        if !cursor.visible || cursor.row >= snapshot.rows() || cursor.col >= snapshot.cols() {
            return;
        }
        if cursor.blink && !self.blink_visible {
            return;
        }

        let style = match cursor.style {
            CursorStyle::Default => self.config.cursor.style,
            style => style,
        };
        let style = match style {
            CursorStyle::Default => CursorStyle::Block,
            style => style,
        };

        let m = self.metrics;
        let row = cursor.row;
        let mut col = cursor.col;
        let mut flags = snapshot.flags(row, col);
        // A cursor on the tail half of a wide glyph covers the whole glyph
        let on_tail = flags.contains(CellFlags::WIDE_CONTINUATION)
            || (cursor.wide && !flags.contains(CellFlags::WIDE));
        if on_tail && col > 0 {
            col -= 1;
            flags = snapshot.flags(row, col);
        }
        let wide = on_tail || flags.contains(CellFlags::WIDE);
        let width = if wide { 2.0 } else { 1.0 } * m.cell_width;
        let (x, y) = m.cell_origin(row, col);
        let color = if cursor.color & 0xFF != 0 {
            self.colors.decode(cursor.color)
        } else {
            color_u8_to_f32_a(self.config.cursor.color, 1.0)
        };

        instances.cursor.extend(cursor_rects(
            style,
            x,
            y,
            width,
            &m,
            &self.config.cursor,
            color,
        ));

        if !style.is_filled_block() {
            return;
        }
        let text_color = match self.config.cursor.text_color {
            Some(rgb) => color_u8_to_f32_a(rgb, 1.0),
            None => {
                let selected = snapshot
                    .selection()
                    .and_then(|s| s.columns_for_row(row, snapshot.cols()))
                    .is_some_and(|cols| cols.contains(&col));
                self.colors
                    .resolve(
                        snapshot.fg(row, col),
                        snapshot.bg(row, col),
                        snapshot.underline_color(row, col),
                        flags,
                        selected,
                    )
                    .bg
            }
        };

        queue.recolor(row, col, text_color);
        for visual in visuals.iter().filter(|v| v.covers(row, col)) {
            if let VisualKind::Shortcut { rects } = &visual.kind {
                for rect in &mut instances.shortcuts[rects.clone()] {
                    rect.color = [text_color[0], text_color[1], text_color[2], rect.color[3]];
                }
            }
        }
    }
}
