//! The per-frame cell walk.
//!
//! `RenderContext::compose` visits the snapshot row-major, resolving colors,
//! decorations and clusters per cell. Glyphs are queued per font and emitted
//! after the frame's atlas rebuilds; cursor and overlays are post-passes.

pub mod cluster;
pub mod colors;
pub mod cursor;
pub mod decorations;
pub mod queue;
pub mod width;

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use glyphgrid_fonts::unicode::{is_non_graphics_symbol, is_powerline};
use glyphgrid_fonts::{FallbackScale, FitBox, FontRole, FontStyle, ShapedRun, harmonize_fallback};

pub use cluster::{MergedCluster, merge_cluster};
pub use colors::{ColorResolver, ResolvedColors, ensure_minimum_contrast};
pub use cursor::cursor_rects;
pub use queue::{GlyphQueue, GlyphQueueEntry};
pub use width::{needs_force_fit, symbol_constraint_width};

use crate::atlas::constraint_for;
use crate::context::RenderContext;
use crate::instances::{FrameInstances, FrameSummary, RectInstance};
use crate::overlay::ImeAnchor;
use crate::shortcut::{CellRect, draw_shortcut, is_shortcut_candidate};
use crate::snapshot::{CellFlags, TerminalSnapshot, UnderlineStyle};

/// How a visible cluster was drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualKind {
    /// Drawn as rects; `rects` indexes the shortcut layer
    Shortcut { rects: Range<usize> },
    /// Queued for glyph emission with exactly one queue entry
    Glyph {
        font_index: usize,
        /// Font units to device pixels
        scale: f32,
        /// Vertical shift applied to the baseline, positive is down
        baseline_offset: f32,
        /// Cells the glyph may occupy (1 or 2)
        constraint_width: u8,
        force_fit: bool,
        /// Drawn from the constrained atlas variant
        constrained: bool,
    },
}

/// Resolved content of one drawn cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct CellVisual {
    pub row: usize,
    pub col: usize,
    /// Last grid column the cluster covers, wide tail included
    pub last_col: usize,
    pub text: String,
    /// Cell span, 1 or 2
    pub span: u8,
    pub colors: ResolvedColors,
    pub flags: CellFlags,
    pub kind: VisualKind,
}

impl CellVisual {
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && (self.col..=self.last_col).contains(&col)
    }

    pub fn font_index(&self) -> Option<usize> {
        match self.kind {
            VisualKind::Glyph { font_index, .. } => Some(font_index),
            VisualKind::Shortcut { .. } => None,
        }
    }
}

/// Everything the GPU backend needs for one frame.
#[derive(Debug)]
pub struct Frame {
    pub instances: FrameInstances,
    pub visuals: Vec<CellVisual>,
    pub summary: FrameSummary,
    /// Candidate window anchor at the preedit or the cursor
    pub ime_anchor: Option<ImeAnchor>,
}

/// Font choice, shaping result and harmonized scale for one cluster.
pub(crate) struct PlacedCluster {
    pub font_index: usize,
    pub run: Arc<ShapedRun>,
    pub harmonized: FallbackScale,
    pub fallback: bool,
    /// Cells the cluster is sized against
    pub fit_span: u8,
}

fn is_blank(cp: u32) -> bool {
    cp == 0 || char::from_u32(cp).is_some_and(char::is_whitespace)
}

impl RenderContext {
    /// Compose one frame from `snapshot`.
    pub fn compose(&mut self, snapshot: &dyn TerminalSnapshot, now: Instant) -> Frame {
        let rows = snapshot.rows();
        let cols = snapshot.cols();
        let font_count = self.fonts.font_count();
        let m = self.metrics;
        let merge_limit = self.config.compositor.cluster_merge_limit;
        let selection = snapshot.selection();

        let mut instances = FrameInstances::new(font_count);
        let mut queue = GlyphQueue::new(font_count);
        let mut visuals = Vec::new();
        let mut row_colors = Vec::with_capacity(cols);
        let mut consumed = vec![false; cols];

        for row in 0..rows {
            let selected = selection.and_then(|s| s.columns_for_row(row, cols));
            if let Some(range) = &selected {
                let (x, y) = m.cell_origin(row, range.start);
                instances.selection.push(RectInstance::new(
                    x,
                    y,
                    range.len() as f32 * m.cell_width,
                    m.cell_height,
                    self.colors.selection_bg(),
                ));
            }

            row_colors.clear();
            for col in 0..cols {
                let is_selected = selected.as_ref().is_some_and(|r| r.contains(&col));
                row_colors.push(self.colors.resolve(
                    snapshot.fg(row, col),
                    snapshot.bg(row, col),
                    snapshot.underline_color(row, col),
                    snapshot.flags(row, col),
                    is_selected,
                ));
            }
            self.push_background_runs(snapshot, row, &row_colors, &mut instances.background);

            consumed.fill(false);
            for col in 0..cols {
                let flags = snapshot.flags(row, col);
                if flags.is_skipped() {
                    continue;
                }
                let colors = row_colors[col];
                let wide = flags.contains(CellFlags::WIDE) && col + 1 < cols;
                let (x, y) = m.cell_origin(row, col);
                let cell_width = if wide { 2.0 } else { 1.0 } * m.cell_width;

                // Decorations draw even when the glyph is hidden or merged away
                self.push_decorations(
                    snapshot,
                    row,
                    col,
                    flags,
                    &colors,
                    (x, y, cell_width),
                    &mut instances.underline,
                );
                if consumed[col] {
                    continue;
                }

                let cp = snapshot.codepoint(row, col);
                if (is_blank(cp) && snapshot.extra_codepoints(row, col).is_empty())
                    || flags.contains(CellFlags::INVISIBLE)
                    || (flags.contains(CellFlags::BLINK) && !self.blink_visible)
                {
                    continue;
                }

                let cluster = merge_cluster(snapshot, row, col, merge_limit);
                for slot in consumed.iter_mut().take(cluster.last_col + 1).skip(col + 1) {
                    *slot = true;
                }
                let tail = usize::from(
                    cluster.last_col + 1 < cols
                        && snapshot.flags(row, cluster.last_col).contains(CellFlags::WIDE),
                );
                let last_col = cluster.last_col + tail;
                let span = (last_col - col + 1).clamp(1, 2) as u8;

                if cluster.codepoints.len() == 1 && is_shortcut_candidate(cp) {
                    let start = instances.shortcuts.len();
                    let cell = CellRect {
                        x,
                        y,
                        width: cell_width,
                        height: m.cell_height,
                    };
                    if draw_shortcut(cp, cell, colors.fg, &mut instances.shortcuts) {
                        visuals.push(CellVisual {
                            row,
                            col,
                            last_col,
                            text: cluster.text(),
                            span,
                            colors,
                            flags,
                            kind: VisualKind::Shortcut {
                                rects: start..instances.shortcuts.len(),
                            },
                        });
                        continue;
                    }
                }

                if let Some(visual) = self.queue_cluster(
                    snapshot, row, col, last_col, &cluster, span, wide, flags, colors, &mut queue,
                ) {
                    visuals.push(visual);
                }
            }
        }

        self.cursor_pass(snapshot, &mut instances, &mut queue, &visuals);
        self.overlay_pass(snapshot, now, &mut instances, &mut queue);

        let rebuilds = self.rebuild_dirty_atlases();
        queue.emit(&self.atlases, &mut instances);

        let summary = FrameSummary::from_instances(&instances, visuals.len(), rebuilds);
        log::debug!(
            "Frame {}x{}: {} clusters, {} bg, {} sel, {} underline, {} cursor, {} shortcut, {} overlay rects, {} glyphs over {} fonts, {} atlas rebuilds",
            cols,
            rows,
            summary.clusters,
            summary.background,
            summary.selection,
            summary.underline,
            summary.cursor,
            summary.shortcuts,
            summary.overlay,
            summary.glyphs,
            summary.active_fonts,
            summary.atlas_rebuilds
        );

        Frame {
            instances,
            visuals,
            summary,
            ime_anchor: self.current_ime_anchor(snapshot),
        }
    }

    /// Merge consecutive painted cells of one background color into rects.
    fn push_background_runs(
        &self,
        snapshot: &dyn TerminalSnapshot,
        row: usize,
        colors: &[ResolvedColors],
        out: &mut Vec<RectInstance>,
    ) {
        let m = self.metrics;
        let (_, y) = m.cell_origin(row, 0);
        let mut run: Option<(usize, [f32; 4])> = None;
        for (col, c) in colors.iter().enumerate() {
            // Continuation cells inherit the wide cell's background
            let paint = if snapshot.flags(row, col).contains(CellFlags::WIDE_CONTINUATION) && col > 0 {
                colors[col - 1].paint_bg.then_some(colors[col - 1].bg)
            } else {
                c.paint_bg.then_some(c.bg)
            };
            match (run, paint) {
                (Some((_, color)), Some(bg)) if color == bg => {}
                (Some((start, color)), _) => {
                    out.push(RectInstance::new(
                        start as f32 * m.cell_width,
                        y,
                        (col - start) as f32 * m.cell_width,
                        m.cell_height,
                        color,
                    ));
                    run = paint.map(|bg| (col, bg));
                }
                (None, _) => run = paint.map(|bg| (col, bg)),
            }
        }
        if let Some((start, color)) = run {
            out.push(RectInstance::new(
                start as f32 * m.cell_width,
                y,
                (colors.len() - start) as f32 * m.cell_width,
                m.cell_height,
                color,
            ));
        }
    }

    /// Underline, strikethrough and overline for the cell at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    fn push_decorations(
        &self,
        snapshot: &dyn TerminalSnapshot,
        row: usize,
        col: usize,
        flags: CellFlags,
        colors: &ResolvedColors,
        (x, y, width): (f32, f32, f32),
        out: &mut Vec<RectInstance>,
    ) {
        let m = &self.metrics;
        let hovered = self.hovered_link != 0 && snapshot.link_id(row, col) == self.hovered_link;
        let underline = flags
            .underline_style()
            .or(hovered.then_some(UnderlineStyle::Single));
        if let Some(style) = underline {
            decorations::push_underline(out, style, x, y + m.underline_y, width, m, colors.underline);
        }
        if flags.contains(CellFlags::STRIKE) {
            decorations::push_strikethrough(out, x, y, width, m, colors.fg);
        }
        if flags.contains(CellFlags::OVERLINE) {
            decorations::push_overline(out, x, y, width, m, colors.fg);
        }
    }

    /// Pick, shape and harmonize `text` drawn across `span` cells.
    ///
    /// Returns `None` when no font has real glyphs for the text.
    pub(crate) fn place_cluster(
        &mut self,
        text: &str,
        span: u8,
        wide: bool,
        style: FontStyle,
    ) -> Option<PlacedCluster> {
        let font_index = self.fonts.pick_font_index_for_style(text, span, style);
        let run = self.fonts.shape_text_with_font_index(text, font_index)?;
        if !run.has_glyphs() {
            return None;
        }
        let entry = self.fonts.entry(font_index)?;
        let m = self.metrics;
        let fit_span = span.min(entry.class.max_cell_span.max(if wide { 2 } else { 1 }));
        let fallback = entry.role == FontRole::Fallback;
        let harmonized = if fallback {
            harmonize_fallback(
                &self.fonts.primary().face.metrics(),
                m.font_size_px,
                &entry.face.metrics(),
                &entry.class,
                &FitBox {
                    cell_span: fit_span,
                    cell_width: m.cell_width,
                    line_height: m.cell_height,
                    natural_advance: run.total_advance,
                    glyph_height: None,
                },
            )
        } else {
            FallbackScale::primary(&entry.face.metrics(), m.font_size_px)
        };
        Some(PlacedCluster {
            font_index,
            run,
            harmonized,
            fallback,
            fit_span,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn queue_cluster(
        &mut self,
        snapshot: &dyn TerminalSnapshot,
        row: usize,
        col: usize,
        last_col: usize,
        cluster: &MergedCluster,
        span: u8,
        wide: bool,
        flags: CellFlags,
        colors: ResolvedColors,
        queue: &mut GlyphQueue,
    ) -> Option<CellVisual> {
        let text = cluster.text();
        let style = FontStyle::from_flags(
            flags.contains(CellFlags::BOLD),
            flags.contains(CellFlags::ITALIC),
        );
        let placed = self.place_cluster(&text, span, wide, style)?;
        let m = self.metrics;
        let scale = placed.harmonized.scale;
        let base = cluster.codepoints[0];

        let single = cluster.base_len() == 1;
        let symbolic = single && is_non_graphics_symbol(base);
        // Separators the shortcut drawer left to the font
        let separator = single && is_powerline(base);
        let constraint_width = if !(symbolic || separator) {
            placed.fit_span
        } else if wide {
            2
        } else if separator {
            1
        } else {
            symbol_constraint_width(snapshot, row, col)
        };

        let face = self.fonts.face(placed.font_index)?;
        let first_glyph = placed.run.glyphs.iter().find(|g| g.glyph_id != 0)?;
        let natural_width = face
            .glyph_bounds(first_glyph.glyph_id)
            .map(|b| b.width())
            .filter(|w| *w > 0.0)
            .unwrap_or(placed.run.total_advance)
            * scale;
        let force_fit = symbolic
            && needs_force_fit(
                natural_width,
                constraint_width,
                m.cell_width,
                self.config.compositor.force_fit_tolerance,
            );
        let constrained = (symbolic || separator) && (constraint_for(base).is_some() || force_fit);

        if let Some(state) = self.atlases.get_mut(placed.font_index) {
            for glyph in placed.run.glyphs.iter().filter(|g| g.glyph_id != 0) {
                if constrained {
                    state.request_constrained(glyph.glyph_id, base, constraint_width);
                } else {
                    state.request_glyph(glyph.glyph_id);
                }
            }
        }

        let (x, y) = m.cell_origin(row, col);
        let box_width = f32::from(placed.fit_span) * m.cell_width;
        let advance_px = placed.run.total_advance * scale;
        let x_offset = if placed.fallback && !constrained && advance_px < box_width {
            ((box_width - advance_px) / 2.0).round()
        } else {
            0.0
        };
        let baseline_offset = if constrained {
            0.0
        } else {
            placed.harmonized.baseline_offset
        };

        queue.push(
            placed.font_index,
            GlyphQueueEntry {
                cells: Some((row, col, last_col)),
                x: x + x_offset,
                baseline_y: y + m.baseline + baseline_offset,
                color: colors.fg,
                run: Arc::clone(&placed.run),
                scale,
                constraint: constrained.then_some(constraint_width),
            },
        );

        Some(CellVisual {
            row,
            col,
            last_col,
            text,
            span,
            colors,
            flags,
            kind: VisualKind::Glyph {
                font_index: placed.font_index,
                scale,
                baseline_offset,
                constraint_width,
                force_fit,
                constrained,
            },
        })
    }
}
