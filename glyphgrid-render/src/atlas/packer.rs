//! Shelf packing of glyph bitmaps into one atlas texture.

/// Placement result for a set of glyph sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackResult {
    /// Top-left corner per input size, `None` when the glyph did not fit
    pub positions: Vec<Option<(u32, u32)>>,
    /// Power-of-two atlas width
    pub width: u32,
    /// Power-of-two atlas height
    pub height: u32,
    pub shelves: usize,
}

impl PackResult {
    pub fn dropped(&self) -> usize {
        self.positions.iter().filter(|p| p.is_none()).count()
    }
}

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    used_width: u32,
}

/// Pack `(width, height)` rectangles into shelves no larger than `max_size`.
///
/// Rectangles are placed tallest first. Each goes on the lowest shelf with
/// room for it; otherwise a new shelf opens at the current bottom. `padding`
/// pixels separate neighbours on a shelf and consecutive shelves.
pub fn pack_glyphs(sizes: &[(u32, u32)], max_size: u32, padding: u32) -> PackResult {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| sizes[b].1.cmp(&sizes[a].1));

    let mut positions = vec![None; sizes.len()];
    let mut shelves: Vec<Shelf> = Vec::new();
    let mut extent_w = 0u32;
    let mut extent_h = 0u32;

    for idx in order {
        let (w, h) = sizes[idx];
        if w == 0 || h == 0 {
            positions[idx] = Some((0, 0));
            continue;
        }

        let fits_on = |shelf: &Shelf| {
            let gap = if shelf.used_width > 0 { padding } else { 0 };
            h <= shelf.height && shelf.used_width + gap + w <= max_size
        };

        let placed = match shelves.iter_mut().find(|s| fits_on(s)) {
            Some(shelf) => {
                let gap = if shelf.used_width > 0 { padding } else { 0 };
                let x = shelf.used_width + gap;
                shelf.used_width = x + w;
                Some((x, shelf.y, shelf.used_width))
            }
            None => {
                let y = shelves
                    .last()
                    .map(|s| s.y + s.height + padding)
                    .unwrap_or(0);
                if w <= max_size && y + h <= max_size {
                    shelves.push(Shelf {
                        y,
                        height: h,
                        used_width: w,
                    });
                    Some((0, y, w))
                } else {
                    None
                }
            }
        };

        if let Some((x, y, right)) = placed {
            positions[idx] = Some((x, y));
            extent_w = extent_w.max(right);
            extent_h = extent_h.max(y + h);
        }
    }

    PackResult {
        positions,
        width: atlas_dimension(extent_w, max_size),
        height: atlas_dimension(extent_h, max_size),
        shelves: shelves.len(),
    }
}

fn atlas_dimension(extent: u32, max_size: u32) -> u32 {
    extent.max(1).next_power_of_two().min(max_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small deterministic generator so the property test needs no extra crates.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u32) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) % bound as u64) as u32
        }
    }

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn four_glyphs_per_shelf_at_32px() {
        let sizes = vec![(8, 10); 5];
        let result = pack_glyphs(&sizes, 32, 0);
        assert_eq!(result.shelves, 2);
        let first_shelf = result
            .positions
            .iter()
            .filter(|p| matches!(p, Some((_, 0))))
            .count();
        assert_eq!(first_shelf, 4, "a 32px shelf holds four 8px glyphs");
        assert_eq!(result.positions[4], Some((0, 10)));
        assert_eq!((result.width, result.height), (32, 32));
    }

    #[test]
    fn tallest_glyphs_are_placed_first() {
        let sizes = [(4, 4), (4, 12), (4, 8)];
        let result = pack_glyphs(&sizes, 64, 0);
        assert_eq!(result.positions[1], Some((0, 0)));
        assert_eq!(result.positions[2], Some((4, 0)));
        assert_eq!(result.positions[0], Some((8, 0)));
        assert_eq!(result.shelves, 1);
    }

    #[test]
    fn lower_shelf_is_reused_when_it_has_room() {
        // Shelf 0 fills with the tall glyph, shelf 1 opens for the medium ones,
        // and the small glyph goes back to shelf 0.
        let sizes = [(28, 10), (20, 6), (20, 6), (4, 3)];
        let result = pack_glyphs(&sizes, 32, 0);
        assert_eq!(result.positions[0], Some((0, 0)));
        assert_eq!(result.positions[1], Some((0, 10)));
        assert_eq!(result.positions[2], Some((0, 16)));
        assert_eq!(result.positions[3], Some((28, 0)));
    }

    #[test]
    fn oversized_glyph_is_dropped() {
        let sizes = [(40, 4), (8, 8)];
        let result = pack_glyphs(&sizes, 32, 0);
        assert_eq!(result.positions[0], None);
        assert_eq!(result.positions[1], Some((0, 0)));
        assert_eq!(result.dropped(), 1);
    }

    #[test]
    fn full_atlas_drops_remaining_glyphs() {
        let sizes = vec![(16, 16); 6];
        let result = pack_glyphs(&sizes, 32, 0);
        assert_eq!(result.dropped(), 2);
        assert_eq!((result.width, result.height), (32, 32));
    }

    #[test]
    fn padding_separates_neighbours() {
        let sizes = vec![(8, 10); 4];
        let result = pack_glyphs(&sizes, 32, 1);
        // 8 + 1 + 8 + 1 + 8 = 26; a fourth glyph would need 35px
        assert_eq!(result.shelves, 2);
        assert_eq!(result.positions[1], Some((9, 0)));
        assert_eq!(result.positions[3], Some((0, 11)));
    }

    #[test]
    fn empty_input_yields_minimal_atlas() {
        let result = pack_glyphs(&[], 4096, 1);
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.shelves, 0);
    }

    #[test]
    fn placements_never_overlap_and_stay_in_bounds() {
        let mut rng = Lcg(0x5eed);
        for round in 0..200 {
            let max_size = [32, 64, 128, 256][round % 4];
            let padding = (round % 3) as u32;
            let count = 1 + rng.next(60) as usize;
            let sizes: Vec<(u32, u32)> = (0..count)
                .map(|_| (1 + rng.next(40), 1 + rng.next(40)))
                .collect();

            let result = pack_glyphs(&sizes, max_size, padding);
            assert!(result.width.is_power_of_two() && result.width <= max_size);
            assert!(result.height.is_power_of_two() && result.height <= max_size);

            let placed: Vec<(u32, u32, u32, u32)> = result
                .positions
                .iter()
                .zip(&sizes)
                .filter_map(|(pos, &(w, h))| pos.map(|(x, y)| (x, y, w, h)))
                .collect();
            for (i, a) in placed.iter().enumerate() {
                assert!(a.0 + a.2 <= result.width, "round {round}: x overflow");
                assert!(a.1 + a.3 <= result.height, "round {round}: y overflow");
                for b in &placed[i + 1..] {
                    assert!(!overlaps(*a, *b), "round {round}: {a:?} overlaps {b:?}");
                }
            }
        }
    }
}
