//! Transient layers drawn over the grid: IME preedit, resize indicator and
//! scrollbar, plus the synchronized-output frame gate.

pub mod ime;
pub mod resize;
pub mod scrollbar;
pub mod sync_output;

use std::sync::Arc;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use glyphgrid_config::OverlayConfig;
use glyphgrid_fonts::FontStyle;

pub use ime::{ImeAnchor, Preedit, preedit_rects};
pub use resize::{ResizeIndicator, fade_alpha};
pub use scrollbar::thumb_rect;
pub use sync_output::SyncOutputGate;

use crate::compositor::{GlyphQueue, GlyphQueueEntry};
use crate::context::RenderContext;
use crate::instances::{FrameInstances, RectInstance};
use crate::snapshot::TerminalSnapshot;

/// Overlay timers and IME state owned by the render context.
#[derive(Debug, Clone)]
pub struct OverlayState {
    pub preedit: Option<Preedit>,
    pub resize: ResizeIndicator,
    pub sync: SyncOutputGate,
}

impl OverlayState {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            preedit: None,
            resize: ResizeIndicator::new(Duration::from_millis(config.resize_indicator_ms)),
            sync: SyncOutputGate::new(Duration::from_millis(config.sync_output_timeout_ms)),
        }
    }
}

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

impl RenderContext {
    /// Preedit, resize indicator and scrollbar, in that order.
    pub(crate) fn overlay_pass(
        &mut self,
        snapshot: &dyn TerminalSnapshot,
        now: Instant,
        instances: &mut FrameInstances,
        queue: &mut GlyphQueue,
    ) {
        let m = self.metrics;
        let cols = snapshot.cols();
        let grid_width = cols as f32 * m.cell_width;
        let grid_height = snapshot.rows() as f32 * m.cell_height;
        let text_color = self.colors.default_fg();

        if let Some(preedit) = self.overlays.preedit.clone() {
            instances.overlay.extend(preedit_rects(&preedit, &m, cols, &self.config.overlay));
            let (x0, y) = m.cell_origin(preedit.row, preedit.col);
            for (offset, text, width) in preedit.layout() {
                if preedit.col + offset + width > cols {
                    break;
                }
                let x = x0 + offset as f32 * m.cell_width;
                self.queue_overlay_text(&text, width, x, y + m.baseline, text_color, queue);
            }
        }

        if let Some((label, alpha)) = self.overlays.resize.state(now) {
            let label_cols = label.width() + 2;
            let width = label_cols as f32 * m.cell_width;
            let height = (m.cell_height * 1.5).round();
            let x = ((grid_width - width) / 2.0).max(0.0).round();
            let y = ((grid_height - height) / 2.0).max(0.0).round();
            instances.overlay.push(RectInstance::new(
                x,
                y,
                width,
                height,
                with_alpha(self.config.overlay.preedit_bg, alpha),
            ));
            let baseline_y = y + ((height - m.cell_height) / 2.0).round() + m.baseline;
            let color = with_alpha(text_color, alpha);
            for (i, ch) in label.chars().enumerate() {
                let cx = x + (i + 1) as f32 * m.cell_width;
                self.queue_overlay_text(ch.encode_utf8(&mut [0; 4]), 1, cx, baseline_y, color, queue);
            }
        }

        if let Some(state) = snapshot.scroll_state() {
            if let Some(thumb) = thumb_rect(state, grid_width, grid_height, &self.config.overlay) {
                instances.overlay.push(thumb);
            }
        }
    }

    /// Queue overlay text through the regular font pick and atlas path.
    fn queue_overlay_text(
        &mut self,
        text: &str,
        span: usize,
        x: f32,
        baseline_y: f32,
        color: [f32; 4],
        queue: &mut GlyphQueue,
    ) {
        let span = span.clamp(1, 2) as u8;
        let Some(placed) = self.place_cluster(text, span, span == 2, FontStyle::Regular) else {
            return;
        };
        if let Some(state) = self.atlases.get_mut(placed.font_index) {
            for glyph in placed.run.glyphs.iter().filter(|g| g.glyph_id != 0) {
                state.request_glyph(glyph.glyph_id);
            }
        }
        queue.push(
            placed.font_index,
            GlyphQueueEntry {
                cells: None,
                x,
                baseline_y: baseline_y + placed.harmonized.baseline_offset,
                color,
                run: Arc::clone(&placed.run),
                scale: placed.harmonized.scale,
                constraint: None,
            },
        );
    }

    /// Anchor for the platform candidate window: the preedit start when
    /// composing, else the visible cursor.
    pub(crate) fn current_ime_anchor(&self, snapshot: &dyn TerminalSnapshot) -> Option<ImeAnchor> {
        if let Some(preedit) = &self.overlays.preedit {
            return Some(self.ime_anchor_at(preedit.row, preedit.col));
        }
        let cursor = snapshot.cursor();
        (cursor.visible && cursor.row < snapshot.rows() && cursor.col < snapshot.cols())
            .then(|| self.ime_anchor_at(cursor.row, cursor.col))
    }
}
