//! Terminal snapshot interface consumed by the compositor.
//!
//! The terminal state machine is an external collaborator; the compositor
//! only reads the grid through [`TerminalSnapshot`]. [`GridSnapshot`] is an
//! owned struct-of-arrays implementation used by the CLI and the tests.

use std::collections::HashMap;
use std::ops::Range;

use bitflags::bitflags;
use glyphgrid_config::CursorStyle;
use unicode_width::UnicodeWidthChar;

use crate::error::RenderError;

bitflags! {
    /// Per-cell style and layout attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u32 {
        const BOLD              = 1 << 0;
        const ITALIC            = 1 << 1;
        const FAINT             = 1 << 2;
        const BLINK             = 1 << 3;
        const INVERSE           = 1 << 4;
        const INVISIBLE         = 1 << 5;
        const STRIKE            = 1 << 6;
        const OVERLINE          = 1 << 7;
        const UNDERLINE         = 1 << 8;
        const UNDERLINE_DOUBLE  = 1 << 9;
        const UNDERLINE_CURLY   = 1 << 10;
        const UNDERLINE_DOTTED  = 1 << 11;
        const UNDERLINE_DASHED  = 1 << 12;
        /// First half of a double-width glyph
        const WIDE              = 1 << 13;
        /// Second half of a double-width glyph
        const WIDE_CONTINUATION = 1 << 14;
        /// Cell that only carries a background
        const FILLER            = 1 << 15;
    }
}

/// Underline decoration styles (SGR 4:1 through 4:5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

impl CellFlags {
    /// The underline style carried by these flags; the most specific wins.
    pub fn underline_style(self) -> Option<UnderlineStyle> {
        if self.contains(CellFlags::UNDERLINE_CURLY) {
            Some(UnderlineStyle::Curly)
        } else if self.contains(CellFlags::UNDERLINE_DOUBLE) {
            Some(UnderlineStyle::Double)
        } else if self.contains(CellFlags::UNDERLINE_DOTTED) {
            Some(UnderlineStyle::Dotted)
        } else if self.contains(CellFlags::UNDERLINE_DASHED) {
            Some(UnderlineStyle::Dashed)
        } else if self.contains(CellFlags::UNDERLINE) {
            Some(UnderlineStyle::Single)
        } else {
            None
        }
    }

    /// Whether the compositor visits this cell at all.
    pub fn is_skipped(self) -> bool {
        self.intersects(CellFlags::WIDE_CONTINUATION | CellFlags::FILLER)
    }
}

/// Cursor state reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorDescriptor {
    pub row: usize,
    pub col: usize,
    pub visible: bool,
    /// `Default` defers to the configured cursor style
    pub style: CursorStyle,
    pub blink: bool,
    /// Cursor sits on the tail half of a double-width glyph
    pub wide: bool,
    /// Packed `0xRRGGBBAA`; zero alpha selects the configured color
    pub color: u32,
}

impl Default for CursorDescriptor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            visible: true,
            style: CursorStyle::Default,
            blink: false,
            wide: false,
            color: 0,
        }
    }
}

/// Text selection between two cell positions (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: (usize, usize),
    pub end: (usize, usize),
    /// Block selection: the same column range on every row
    pub rectangular: bool,
}

impl Selection {
    pub fn new(start: (usize, usize), end: (usize, usize), rectangular: bool) -> Self {
        Self {
            start,
            end,
            rectangular,
        }
    }

    /// Start and end ordered top-to-bottom, left-to-right.
    pub fn normalized(&self) -> ((usize, usize), (usize, usize)) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Selected columns on `row`, clipped to `cols`.
    pub fn columns_for_row(&self, row: usize, cols: usize) -> Option<Range<usize>> {
        let (start, end) = self.normalized();
        if row < start.0 || row > end.0 || cols == 0 {
            return None;
        }
        let (first, last) = if self.rectangular {
            let lo = self.start.1.min(self.end.1);
            let hi = self.start.1.max(self.end.1);
            (lo, hi)
        } else {
            let first = if row == start.0 { start.1 } else { 0 };
            let last = if row == end.0 { end.1 } else { cols - 1 };
            (first, last)
        };
        let last = last.min(cols - 1);
        (first <= last).then_some(first..last + 1)
    }
}

/// Scrollback position used by the scrollbar overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Lines scrolled back from the live bottom
    pub offset: usize,
    pub visible_lines: usize,
    pub total_lines: usize,
}

/// Read-only view of one terminal frame.
///
/// Colors are packed `0xRRGGBBAA`; a zero alpha channel means "default".
pub trait TerminalSnapshot {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    /// Primary codepoint of a cell, 0 for an empty cell.
    fn codepoint(&self, row: usize, col: usize) -> u32;
    fn flags(&self, row: usize, col: usize) -> CellFlags;
    fn fg(&self, row: usize, col: usize) -> u32;
    fn bg(&self, row: usize, col: usize) -> u32;
    fn underline_color(&self, row: usize, col: usize) -> u32;

    /// Codepoints stored beyond the primary one (grapheme overflow).
    fn extra_codepoints(&self, row: usize, col: usize) -> &[u32];

    /// Hyperlink id, 0 when the cell is not part of a link.
    fn link_id(&self, row: usize, col: usize) -> u32;

    fn cursor(&self) -> CursorDescriptor;

    fn selection(&self) -> Option<Selection> {
        None
    }

    fn scroll_state(&self) -> Option<ScrollState> {
        None
    }

    /// Whether the terminal is inside a synchronized-output block.
    fn synchronized_output(&self) -> bool {
        false
    }
}

/// Owned grid snapshot stored as parallel arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    rows: usize,
    cols: usize,
    codepoints: Vec<u32>,
    flags: Vec<CellFlags>,
    fg: Vec<u32>,
    bg: Vec<u32>,
    underline_color: Vec<u32>,
    links: Vec<u32>,
    extras: HashMap<usize, Vec<u32>>,
    cursor: CursorDescriptor,
    selection: Option<Selection>,
    scroll: Option<ScrollState>,
    synchronized: bool,
}

impl GridSnapshot {
    /// Blank grid with default colors.
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows * cols;
        Self {
            rows,
            cols,
            codepoints: vec![0; len],
            flags: vec![CellFlags::empty(); len],
            fg: vec![0; len],
            bg: vec![0; len],
            underline_color: vec![0; len],
            links: vec![0; len],
            extras: HashMap::new(),
            cursor: CursorDescriptor::default(),
            selection: None,
            scroll: None,
            synchronized: false,
        }
    }

    /// Build a snapshot from arrays produced by a terminal, checking their lengths.
    pub fn from_parts(
        rows: usize,
        cols: usize,
        codepoints: Vec<u32>,
        flags: Vec<CellFlags>,
        fg: Vec<u32>,
        bg: Vec<u32>,
    ) -> Result<Self, RenderError> {
        let expected = rows * cols;
        for (field, actual) in [
            ("codepoints", codepoints.len()),
            ("flags", flags.len()),
            ("fg", fg.len()),
            ("bg", bg.len()),
        ] {
            if actual != expected {
                return Err(RenderError::SnapshotShape {
                    field,
                    expected,
                    actual,
                });
            }
        }
        let mut snapshot = Self::new(rows, cols);
        snapshot.codepoints = codepoints;
        snapshot.flags = flags;
        snapshot.fg = fg;
        snapshot.bg = bg;
        Ok(snapshot)
    }

    /// Lay out each line on its own row, truncating at `cols`.
    pub fn from_lines(lines: &[&str], cols: usize) -> Self {
        let mut snapshot = Self::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            snapshot.write_str(row, 0, line, CellFlags::empty());
        }
        snapshot
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Write text starting at `(row, col)` the way a terminal would place it:
    /// wide characters take two cells, zero-width characters join the
    /// previous cell's overflow. Returns the column after the last write.
    pub fn write_str(&mut self, row: usize, col: usize, text: &str, flags: CellFlags) -> usize {
        if row >= self.rows {
            return col;
        }
        let mut col = col;
        let mut last_written: Option<usize> = None;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                if let Some(prev) = last_written {
                    self.push_extra(row, prev, ch as u32);
                    continue;
                }
            }
            let width = width.max(1);
            if col + width > self.cols {
                break;
            }
            let idx = self.index(row, col);
            self.codepoints[idx] = ch as u32;
            self.flags[idx] = flags;
            self.extras.remove(&idx);
            if width == 2 {
                self.flags[idx] |= CellFlags::WIDE;
                let tail = idx + 1;
                self.codepoints[tail] = 0;
                self.flags[tail] = flags | CellFlags::WIDE_CONTINUATION;
            }
            last_written = Some(col);
            col += width;
        }
        col
    }

    pub fn set_cell(&mut self, row: usize, col: usize, codepoint: u32, flags: CellFlags) {
        let idx = self.index(row, col);
        self.codepoints[idx] = codepoint;
        self.flags[idx] = flags;
    }

    pub fn set_flags(&mut self, row: usize, col: usize, flags: CellFlags) {
        let idx = self.index(row, col);
        self.flags[idx] = flags;
    }

    pub fn insert_flags(&mut self, row: usize, cols: Range<usize>, flags: CellFlags) {
        for col in cols {
            let idx = self.index(row, col);
            self.flags[idx] |= flags;
        }
    }

    pub fn set_colors(&mut self, row: usize, col: usize, fg: u32, bg: u32) {
        let idx = self.index(row, col);
        self.fg[idx] = fg;
        self.bg[idx] = bg;
    }

    pub fn set_underline_color(&mut self, row: usize, col: usize, color: u32) {
        let idx = self.index(row, col);
        self.underline_color[idx] = color;
    }

    pub fn set_link(&mut self, row: usize, col: usize, link_id: u32) {
        let idx = self.index(row, col);
        self.links[idx] = link_id;
    }

    pub fn push_extra(&mut self, row: usize, col: usize, codepoint: u32) {
        let idx = self.index(row, col);
        self.extras.entry(idx).or_default().push(codepoint);
    }

    pub fn set_cursor(&mut self, cursor: CursorDescriptor) {
        self.cursor = cursor;
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn set_scroll_state(&mut self, scroll: Option<ScrollState>) {
        self.scroll = scroll;
    }

    pub fn set_synchronized_output(&mut self, active: bool) {
        self.synchronized = active;
    }
}

impl TerminalSnapshot for GridSnapshot {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn codepoint(&self, row: usize, col: usize) -> u32 {
        self.codepoints[self.index(row, col)]
    }

    fn flags(&self, row: usize, col: usize) -> CellFlags {
        self.flags[self.index(row, col)]
    }

    fn fg(&self, row: usize, col: usize) -> u32 {
        self.fg[self.index(row, col)]
    }

    fn bg(&self, row: usize, col: usize) -> u32 {
        self.bg[self.index(row, col)]
    }

    fn underline_color(&self, row: usize, col: usize) -> u32 {
        self.underline_color[self.index(row, col)]
    }

    fn extra_codepoints(&self, row: usize, col: usize) -> &[u32] {
        self.extras
            .get(&self.index(row, col))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn link_id(&self, row: usize, col: usize) -> u32 {
        self.links[self.index(row, col)]
    }

    fn cursor(&self) -> CursorDescriptor {
        self.cursor
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn scroll_state(&self) -> Option<ScrollState> {
        self.scroll
    }

    fn synchronized_output(&self) -> bool {
        self.synchronized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters_take_two_cells() {
        let grid = GridSnapshot::from_lines(&["a蟹b"], 6);
        assert_eq!(grid.codepoint(0, 1), '蟹' as u32);
        assert!(grid.flags(0, 1).contains(CellFlags::WIDE));
        assert!(grid.flags(0, 2).contains(CellFlags::WIDE_CONTINUATION));
        assert_eq!(grid.codepoint(0, 3), 'b' as u32);
    }

    #[test]
    fn zero_width_codepoints_join_previous_cell() {
        let grid = GridSnapshot::from_lines(&["e\u{301}x"], 4);
        assert_eq!(grid.extra_codepoints(0, 0), &[0x301]);
        assert_eq!(grid.codepoint(0, 1), 'x' as u32);
    }

    #[test]
    fn wide_glyph_does_not_split_at_row_end() {
        let grid = GridSnapshot::from_lines(&["ab蟹"], 3);
        assert_eq!(grid.codepoint(0, 2), 0);
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let err = GridSnapshot::from_parts(
            2,
            2,
            vec![0; 4],
            vec![CellFlags::empty(); 3],
            vec![0; 4],
            vec![0; 4],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RenderError::SnapshotShape {
                field: "flags",
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn linear_selection_spans_rows() {
        let sel = Selection::new((2, 5), (0, 3), false);
        assert_eq!(sel.columns_for_row(0, 10), Some(3..10));
        assert_eq!(sel.columns_for_row(1, 10), Some(0..10));
        assert_eq!(sel.columns_for_row(2, 10), Some(0..6));
        assert_eq!(sel.columns_for_row(3, 10), None);
    }

    #[test]
    fn rectangular_selection_keeps_columns() {
        let sel = Selection::new((0, 7), (2, 2), true);
        assert_eq!(sel.columns_for_row(1, 10), Some(2..8));
    }

    #[test]
    fn underline_style_precedence() {
        let flags = CellFlags::UNDERLINE | CellFlags::UNDERLINE_CURLY;
        assert_eq!(flags.underline_style(), Some(UnderlineStyle::Curly));
        assert_eq!(CellFlags::BOLD.underline_style(), None);
    }
}
