//! Merging of grid cells into rendering clusters.

use glyphgrid_fonts::unicode::{ZWJ, is_cluster_extender, is_regional_indicator};

use crate::snapshot::{CellFlags, TerminalSnapshot};

/// Codepoints drawn as one unit, starting at some cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCluster {
    pub codepoints: Vec<u32>,
    /// Last grid column whose content was merged in
    pub last_col: usize,
}

impl MergedCluster {
    pub fn text(&self) -> String {
        self.codepoints
            .iter()
            .filter_map(|&cp| char::from_u32(cp))
            .collect()
    }

    /// Codepoints other than variation selectors, for single-symbol checks.
    pub fn base_len(&self) -> usize {
        self.codepoints
            .iter()
            .filter(|&&cp| !glyphgrid_fonts::unicode::is_variation_selector(cp))
            .count()
    }
}

/// Next column after `col` that is not the tail of a wide glyph.
fn next_cell(snapshot: &dyn TerminalSnapshot, row: usize, col: usize) -> Option<usize> {
    let cols = snapshot.cols();
    let mut next = col + 1;
    while next < cols
        && snapshot
            .flags(row, next)
            .contains(CellFlags::WIDE_CONTINUATION)
    {
        next += 1;
    }
    (next < cols).then_some(next)
}

/// Collect the cluster that starts at `(row, col)`.
///
/// A regional indicator pairs with a directly following one. The cluster then
/// grows while it ends in a zero-width joiner or the next cell holds a joiner,
/// variation selector, combining mark or skin-tone modifier, taking at most
/// `merge_limit` further codepoints.
pub fn merge_cluster(
    snapshot: &dyn TerminalSnapshot,
    row: usize,
    col: usize,
    merge_limit: usize,
) -> MergedCluster {
    let first = snapshot.codepoint(row, col);
    let mut codepoints = vec![first];
    codepoints.extend_from_slice(snapshot.extra_codepoints(row, col));
    let mut last_col = col;

    if is_regional_indicator(first) && codepoints.len() == 1 {
        if let Some(next) = next_cell(snapshot, row, col) {
            let cp = snapshot.codepoint(row, next);
            if is_regional_indicator(cp) {
                codepoints.push(cp);
                codepoints.extend_from_slice(snapshot.extra_codepoints(row, next));
                last_col = next;
            }
        }
    }

    let mut merged = 0;
    while merged < merge_limit {
        let Some(next) = next_cell(snapshot, row, last_col) else {
            break;
        };
        let cp = snapshot.codepoint(row, next);
        if cp == 0 {
            break;
        }
        let ends_in_joiner = codepoints.last() == Some(&ZWJ);
        if !ends_in_joiner && !is_cluster_extender(cp) {
            break;
        }
        codepoints.push(cp);
        let extras = snapshot.extra_codepoints(row, next);
        codepoints.extend_from_slice(extras);
        merged += 1 + extras.len();
        last_col = next;
    }

    MergedCluster {
        codepoints,
        last_col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::GridSnapshot;

    #[test]
    fn flag_pairs_consume_one_cell() {
        let mut grid = GridSnapshot::new(1, 6);
        for (col, cp) in [0x1F1FA, 0x1F1F8, 0x1F1EC].into_iter().enumerate() {
            grid.set_cell(0, col, cp, CellFlags::empty());
        }
        let cluster = merge_cluster(&grid, 0, 0, 12);
        assert_eq!(cluster.codepoints, vec![0x1F1FA, 0x1F1F8]);
        assert_eq!(cluster.last_col, 1);
    }

    #[test]
    fn joiner_sequences_span_wide_cells() {
        // man, ZWJ (overflow of the first cell), woman
        let grid = GridSnapshot::from_lines(&["\u{1F468}\u{200D}\u{1F469}x"], 8);
        let cluster = merge_cluster(&grid, 0, 0, 12);
        assert_eq!(cluster.codepoints, vec![0x1F468, 0x200D, 0x1F469]);
        assert_eq!(cluster.last_col, 2);
    }

    #[test]
    fn skin_tone_in_its_own_cell_is_merged() {
        let mut grid = GridSnapshot::new(1, 6);
        grid.write_str(0, 0, "\u{1F44B}", CellFlags::empty());
        grid.write_str(0, 2, "\u{1F3FD}", CellFlags::empty());
        let cluster = merge_cluster(&grid, 0, 0, 12);
        assert_eq!(cluster.codepoints, vec![0x1F44B, 0x1F3FD]);
        assert_eq!(cluster.last_col, 2);
    }

    #[test]
    fn extension_is_bounded() {
        let mut grid = GridSnapshot::new(1, 20);
        grid.set_cell(0, 0, 'a' as u32, CellFlags::empty());
        for col in 1..20 {
            grid.set_cell(0, col, 0x301, CellFlags::empty());
        }
        let cluster = merge_cluster(&grid, 0, 0, 12);
        assert_eq!(cluster.codepoints.len(), 13);
        assert_eq!(cluster.last_col, 12);
    }

    #[test]
    fn plain_text_is_not_merged() {
        let grid = GridSnapshot::from_lines(&["ab"], 4);
        let cluster = merge_cluster(&grid, 0, 0, 12);
        assert_eq!(cluster.codepoints, vec!['a' as u32]);
        assert_eq!(cluster.last_col, 0);
        assert_eq!(cluster.text(), "a");
    }
}
