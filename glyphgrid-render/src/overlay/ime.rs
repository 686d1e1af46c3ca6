//! IME preedit (composition) text and candidate-window anchoring.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use glyphgrid_config::OverlayConfig;

use crate::instances::RectInstance;
use crate::metrics::CellMetrics;

/// Uncommitted composition text shown at a grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preedit {
    pub text: String,
    /// Caret position as a char index into `text`
    pub caret: usize,
    pub row: usize,
    pub col: usize,
}

impl Preedit {
    pub fn new(text: impl Into<String>, caret: usize, row: usize, col: usize) -> Self {
        Self {
            text: text.into(),
            caret,
            row,
            col,
        }
    }

    /// Grapheme clusters with their column offset and width in cells.
    ///
    /// Every cluster takes at least one cell.
    pub fn layout(&self) -> Vec<(usize, String, usize)> {
        let mut offset = 0;
        self.text
            .graphemes(true)
            .map(|g| {
                let width = g.width().max(1);
                let cell = (offset, g.to_string(), width);
                offset += width;
                cell
            })
            .collect()
    }

    /// Total width in cells.
    pub fn columns(&self) -> usize {
        self.layout().iter().map(|(_, _, w)| w).sum()
    }

    /// Column offset of the caret from the start of the preedit.
    ///
    /// A caret inside a cluster sits before it.
    pub fn caret_column(&self) -> usize {
        let mut chars = 0;
        let mut column = 0;
        for g in self.text.graphemes(true) {
            chars += g.chars().count();
            if chars > self.caret {
                break;
            }
            column += g.width().max(1);
        }
        column
    }
}

/// Where the platform IME should place its candidate window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImeAnchor {
    /// Top-left of the anchored cell in device pixels
    pub x: f32,
    pub y: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub baseline: f32,
    pub line_height: f32,
}

impl ImeAnchor {
    pub fn at(metrics: &CellMetrics, row: usize, col: usize) -> Self {
        let (x, y) = metrics.cell_origin(row, col);
        Self {
            x,
            y,
            cell_width: metrics.cell_width,
            cell_height: metrics.cell_height,
            baseline: metrics.baseline,
            line_height: metrics.line_height,
        }
    }
}

/// Backdrop, underline and caret rects for a preedit, clipped to `cols`.
pub fn preedit_rects(
    preedit: &Preedit,
    metrics: &CellMetrics,
    cols: usize,
    config: &OverlayConfig,
) -> Vec<RectInstance> {
    let available = cols.saturating_sub(preedit.col);
    let columns = preedit.columns().min(available);
    if columns == 0 {
        return Vec::new();
    }
    let (x, y) = metrics.cell_origin(preedit.row, preedit.col);
    let width = columns as f32 * metrics.cell_width;
    let stroke = metrics.stroke;

    let mut rects = vec![
        RectInstance::new(x, y, width, metrics.cell_height, config.preedit_bg),
        RectInstance::new(
            x,
            y + metrics.underline_y,
            width,
            stroke,
            config.preedit_underline,
        ),
    ];
    let caret = preedit.caret_column().min(columns);
    let caret_x = (x + caret as f32 * metrics.cell_width).min(x + width - stroke);
    rects.push(RectInstance::new(
        caret_x,
        y,
        stroke,
        metrics.cell_height,
        config.preedit_underline,
    ));
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CellMetrics {
        CellMetrics {
            cell_width: 10.0,
            cell_height: 20.0,
            baseline: 15.0,
            font_size_px: 16.0,
            ascent: 13.0,
            descent: 4.0,
            line_height: 17.0,
            stroke: 1.0,
            underline_y: 17.0,
            strike_y: 11.0,
        }
    }

    #[test]
    fn layout_uses_display_width() {
        let preedit = Preedit::new("a日b", 0, 0, 0);
        let layout = preedit.layout();
        assert_eq!(
            layout,
            vec![
                (0, "a".to_string(), 1),
                (1, "日".to_string(), 2),
                (3, "b".to_string(), 1)
            ]
        );
        assert_eq!(preedit.columns(), 4);
    }

    #[test]
    fn combining_marks_join_the_previous_char() {
        let preedit = Preedit::new("e\u{301}x", 0, 0, 0);
        let layout = preedit.layout();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].1, "e\u{301}");
        assert_eq!(layout[1].0, 1);
    }

    #[test]
    fn emoji_sequences_stay_one_cluster() {
        // Flag, then a ZWJ family, then a plain letter
        let preedit = Preedit::new("🇯🇵👨\u{200D}👩\u{200D}👧x", 5, 0, 0);
        let layout = preedit.layout();
        assert_eq!(layout.len(), 3, "layout was {layout:?}");
        assert_eq!(layout[0], (0, "🇯🇵".to_string(), 2));
        assert_eq!(layout[1].0, 2);
        assert_eq!(layout[1].2, 2);
        assert_eq!(layout[2], (4, "x".to_string(), 1));
        // Caret after the flag and inside the family sits before the family
        assert_eq!(preedit.caret_column(), 2);
    }

    #[test]
    fn caret_column_counts_wide_chars() {
        let preedit = Preedit::new("日本語", 2, 0, 0);
        assert_eq!(preedit.caret_column(), 4);
    }

    #[test]
    fn rects_cover_the_preedit() {
        let config = OverlayConfig::default();
        let preedit = Preedit::new("かな", 1, 2, 3);
        let rects = preedit_rects(&preedit, &metrics(), 80, &config);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].position, [30.0, 40.0]);
        assert_eq!(rects[0].size, [40.0, 20.0]);
        assert_eq!(rects[1].position[1], 57.0);
        assert_eq!(rects[2].position[0], 50.0);
    }

    #[test]
    fn rects_clip_at_the_right_edge() {
        let config = OverlayConfig::default();
        let preedit = Preedit::new("abcdef", 6, 0, 8);
        let rects = preedit_rects(&preedit, &metrics(), 10, &config);
        assert_eq!(rects[0].size[0], 20.0);
        // Caret stays inside the backdrop
        assert_eq!(rects[2].position[0], 99.0);
        assert!(preedit_rects(&preedit, &metrics(), 8, &config).is_empty());
    }

    #[test]
    fn anchor_matches_cell_origin() {
        let anchor = ImeAnchor::at(&metrics(), 3, 4);
        assert_eq!((anchor.x, anchor.y), (40.0, 60.0));
        assert_eq!(anchor.baseline, 15.0);
    }
}
