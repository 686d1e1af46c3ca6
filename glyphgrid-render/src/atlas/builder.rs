//! Rasterize a font's requested glyph set and pack it into a fresh atlas.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glyphgrid_fonts::{FontFace, GlyphBitmap, GlyphTransform};

use super::constraint::{IconConstraint, constraint_for};
use super::packer::pack_glyphs;
use super::{AtlasFormat, GlyphAtlas, GlyphConstraintMeta, GlyphMetrics};

/// Cell geometry constrained glyphs are fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintCell {
    pub cell_width: f32,
    pub cell_height: f32,
    /// Baseline distance from the top of the cell
    pub baseline: f32,
}

impl ConstraintCell {
    /// Box covering `width` cells, in y-up pixels relative to the pen.
    pub fn cell_box(&self, width: u8) -> [f32; 4] {
        [
            0.0,
            self.baseline - self.cell_height,
            f32::from(width.max(1)) * self.cell_width,
            self.baseline,
        ]
    }
}

/// Inputs for one atlas build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasParams {
    /// Pixel size glyphs are rasterized at
    pub size_px: f32,
    pub cell: ConstraintCell,
    pub max_size: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, Copy)]
enum GlyphKey {
    Plain(u16),
    Constrained(u8, u16),
}

struct Rasterized {
    key: GlyphKey,
    bitmap: GlyphBitmap,
    advance: f32,
}

/// Build an atlas holding every plain glyph and every requested constraint
/// width of every constrained glyph.
///
/// Bitmaps are owned copies, so the rasterizer may reuse its buffers between
/// calls. Glyphs the rasterizer returns nothing for, and glyphs the packer
/// cannot place, are left out; lookups for them return `None`.
pub fn build_atlas(
    face: &dyn FontFace,
    font_index: usize,
    plain: &BTreeSet<u16>,
    constrained: &BTreeMap<u16, GlyphConstraintMeta>,
    params: &AtlasParams,
    generation: u64,
) -> GlyphAtlas {
    let px_per_unit = face.scale_for_size(params.size_px);
    let mut rasterized = Vec::with_capacity(plain.len() + constrained.len());

    for &glyph_id in plain {
        match face.rasterize(glyph_id, params.size_px, None) {
            Some(bitmap) => rasterized.push(Rasterized {
                key: GlyphKey::Plain(glyph_id),
                bitmap,
                advance: face.advance_width(glyph_id) * px_per_unit,
            }),
            None => log::debug!("Font {} has no bitmap for glyph {}", font_index, glyph_id),
        }
    }

    for (&glyph_id, meta) in constrained {
        for &width in &meta.widths {
            match rasterize_constrained(face, glyph_id, meta.codepoint, width, params) {
                Some(bitmap) => rasterized.push(Rasterized {
                    key: GlyphKey::Constrained(width, glyph_id),
                    bitmap,
                    advance: params.cell.cell_width * f32::from(width),
                }),
                None => log::debug!(
                    "Font {} has no bitmap for glyph {} at width {}",
                    font_index,
                    glyph_id,
                    width
                ),
            }
        }
    }

    rasterized.retain(|r| {
        let bitmap = &r.bitmap;
        let expected = bitmap.width as usize * bitmap.height as usize * bitmap.bytes_per_pixel();
        let whole = bitmap.data.len() >= expected;
        if !whole {
            log::warn!(
                "Font {} returned {} bytes for {:?}, expected {}; skipping",
                font_index,
                bitmap.data.len(),
                r.key,
                expected
            );
        }
        whole
    });

    let sizes: Vec<(u32, u32)> = rasterized
        .iter()
        .map(|r| (r.bitmap.width, r.bitmap.height))
        .collect();
    let packed = pack_glyphs(&sizes, params.max_size, params.padding);
    if packed.dropped() > 0 {
        log::warn!(
            "Atlas for font {} is full: dropped {} of {} glyphs (max {}px)",
            font_index,
            packed.dropped(),
            sizes.len(),
            params.max_size
        );
    }

    let colored = rasterized
        .iter()
        .zip(&packed.positions)
        .any(|(r, pos)| pos.is_some() && r.bitmap.colored);
    let format = if colored {
        AtlasFormat::Rgba
    } else {
        AtlasFormat::Gray
    };

    let (width, height) = (packed.width, packed.height);
    let mut pixels = vec![0u8; width as usize * height as usize * format.bytes_per_pixel()];
    let mut glyphs = HashMap::new();
    let mut constrained_glyphs = HashMap::new();

    for (r, pos) in rasterized.iter().zip(&packed.positions) {
        let Some((x, y)) = *pos else { continue };
        blit(&mut pixels, width, format, &r.bitmap, x, y);
        let metrics = GlyphMetrics {
            x,
            y,
            width: r.bitmap.width,
            height: r.bitmap.height,
            left: r.bitmap.left,
            top: r.bitmap.top,
            advance: r.advance,
            colored: r.bitmap.colored,
            uv: [
                x as f32 / width as f32,
                y as f32 / height as f32,
                (x + r.bitmap.width) as f32 / width as f32,
                (y + r.bitmap.height) as f32 / height as f32,
            ],
        };
        match r.key {
            GlyphKey::Plain(id) => {
                glyphs.insert(id, metrics);
            }
            GlyphKey::Constrained(w, id) => {
                constrained_glyphs.insert((w, id), metrics);
            }
        }
    }

    log::debug!(
        "Rebuilt atlas for font {} (generation {}): {} glyphs, {} constrained, {}x{} {:?}",
        font_index,
        generation,
        glyphs.len(),
        constrained_glyphs.len(),
        width,
        height,
        format
    );

    GlyphAtlas {
        width,
        height,
        format,
        pixels,
        generation,
        px_per_unit,
        dropped: packed.dropped(),
        glyphs,
        constrained: constrained_glyphs,
    }
}

/// Rasterize a glyph with its outline mapped into `width` cells.
fn rasterize_constrained(
    face: &dyn FontFace,
    glyph_id: u16,
    codepoint: u32,
    width: u8,
    params: &AtlasParams,
) -> Option<GlyphBitmap> {
    let rule = constraint_for(codepoint).unwrap_or(IconConstraint::FORCE_FIT);
    let cell = params.cell.cell_box(width);
    let scale = face.scale_for_size(params.size_px);

    match face.glyph_bounds(glyph_id) {
        Some(bounds) if bounds.width() > 0.0 && bounds.height() > 0.0 => {
            let natural = [
                bounds.x_min * scale,
                bounds.y_min * scale,
                bounds.x_max * scale,
                bounds.y_max * scale,
            ];
            let target = rule.target_box(natural, cell);
            let transform = GlyphTransform::map_box(natural, target);
            face.rasterize(glyph_id, params.size_px, Some(transform))
        }
        _ => {
            // Bitmap-only glyph: shrink the raster size until the advance fits.
            let advance = face.advance_width(glyph_id) * scale;
            let box_width = cell[2] - cell[0];
            let shrink = if advance > box_width && advance > 0.0 {
                box_width / advance
            } else {
                1.0
            };
            face.rasterize(glyph_id, params.size_px * shrink, None)
        }
    }
}

fn blit(pixels: &mut [u8], atlas_width: u32, format: AtlasFormat, bitmap: &GlyphBitmap, x: u32, y: u32) {
    let bpp = format.bytes_per_pixel();
    let src_bpp = bitmap.bytes_per_pixel();
    let w = bitmap.width as usize;
    for row in 0..bitmap.height as usize {
        let src_row = &bitmap.data[row * w * src_bpp..(row + 1) * w * src_bpp];
        let dst_start = ((y as usize + row) * atlas_width as usize + x as usize) * bpp;
        let dst_row = &mut pixels[dst_start..dst_start + w * bpp];
        match (format, bitmap.colored) {
            (AtlasFormat::Gray, _) | (AtlasFormat::Rgba, true) => {
                dst_row.copy_from_slice(src_row)
            }
            (AtlasFormat::Rgba, false) => {
                for (dst, &coverage) in dst_row.chunks_exact_mut(4).zip(src_row) {
                    dst.copy_from_slice(&[255, 255, 255, coverage]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_fonts::{FaceMetrics, GlyphBounds};

    /// Every glyph is a solid 8x10 box; colored glyphs are ids >= 100 and glyph
    /// 50 comes back with a truncated buffer.
    struct BoxFace;

    impl FontFace for BoxFace {
        fn glyph_id_for_char(&self, ch: char) -> u16 {
            ch as u16
        }

        fn advance_width(&self, _glyph_id: u16) -> f32 {
            600.0
        }

        fn glyph_bounds(&self, _glyph_id: u16) -> Option<GlyphBounds> {
            Some(GlyphBounds {
                x_min: 0.0,
                y_min: 0.0,
                x_max: 800.0,
                y_max: 1000.0,
            })
        }

        fn metrics(&self) -> FaceMetrics {
            FaceMetrics {
                units_per_em: 1000.0,
                ascender: 800.0,
                descender: 200.0,
                line_gap: 0.0,
                x_height: None,
                cap_height: None,
                ideographic_advance: None,
            }
        }

        fn rasterize(
            &self,
            glyph_id: u16,
            _size_px: f32,
            transform: Option<GlyphTransform>,
        ) -> Option<GlyphBitmap> {
            if glyph_id == 0 {
                return None;
            }
            let (w, h) = match transform {
                Some(t) => ((8.0 * t.scale_x).round() as u32, (10.0 * t.scale_y).round() as u32),
                None => (8, 10),
            };
            let colored = glyph_id >= 100;
            let bpp = if colored { 4 } else { 1 };
            let len = if glyph_id == 50 { 7 } else { (w * h) as usize * bpp };
            Some(GlyphBitmap {
                width: w,
                height: h,
                left: 0,
                top: h as i32,
                colored,
                data: vec![200; len],
            })
        }
    }

    fn params(max_size: u32) -> AtlasParams {
        AtlasParams {
            size_px: 10.0,
            cell: ConstraintCell {
                cell_width: 6.0,
                cell_height: 12.0,
                baseline: 9.0,
            },
            max_size,
            padding: 0,
        }
    }

    #[test]
    fn plain_glyphs_get_uvs_inside_the_texture() {
        let plain: BTreeSet<u16> = [1, 2, 3].into();
        let atlas = build_atlas(&BoxFace, 0, &plain, &BTreeMap::new(), &params(64), 1);
        assert_eq!(atlas.format, AtlasFormat::Gray);
        assert_eq!(atlas.glyph_count(), 3);
        for id in 1..=3 {
            let m = atlas.glyph(id).expect("glyph packed");
            assert!(m.uv[2] <= 1.0 && m.uv[3] <= 1.0);
            assert_eq!((m.width, m.height), (8, 10));
        }
        assert_eq!(atlas.pixels.len(), (atlas.width * atlas.height) as usize);
    }

    #[test]
    fn missing_bitmaps_are_skipped() {
        let plain: BTreeSet<u16> = [0, 5].into();
        let atlas = build_atlas(&BoxFace, 0, &plain, &BTreeMap::new(), &params(64), 1);
        assert!(atlas.glyph(0).is_none());
        assert!(atlas.glyph(5).is_some());
    }

    #[test]
    fn short_bitmap_buffers_are_skipped() {
        let plain: BTreeSet<u16> = [5, 50].into();
        let atlas = build_atlas(&BoxFace, 0, &plain, &BTreeMap::new(), &params(64), 1);
        assert!(atlas.glyph(50).is_none(), "truncated bitmap must not be packed");
        assert!(atlas.glyph(5).is_some());
        assert_eq!(atlas.glyph_count(), 1);
        assert_eq!(atlas.dropped, 0);
    }

    #[test]
    fn colored_glyph_switches_to_rgba_and_expands_masks() {
        let plain: BTreeSet<u16> = [1, 100].into();
        let atlas = build_atlas(&BoxFace, 0, &plain, &BTreeMap::new(), &params(64), 1);
        assert_eq!(atlas.format, AtlasFormat::Rgba);
        let m = atlas.glyph(1).expect("mask glyph packed");
        let offset = ((m.y * atlas.width + m.x) * 4) as usize;
        assert_eq!(&atlas.pixels[offset..offset + 4], &[255, 255, 255, 200]);
    }

    #[test]
    fn constrained_widths_coexist() {
        let mut constrained = BTreeMap::new();
        constrained.insert(
            7,
            GlyphConstraintMeta {
                codepoint: 0x2605,
                min_width: 1,
                widths: [1, 2].into(),
            },
        );
        let atlas = build_atlas(&BoxFace, 0, &BTreeSet::new(), &constrained, &params(64), 1);
        let one = atlas.constrained_glyph(1, 7).expect("width 1 variant");
        let two = atlas.constrained_glyph(2, 7).expect("width 2 variant");
        // Glyph box is 8x10 at 10px; one cell is 6x12 so it shrinks to fit
        assert_eq!((one.width, one.height), (6, 8));
        assert_eq!((two.width, two.height), (8, 10));
        assert!(atlas.glyph(7).is_none());
    }

    #[test]
    fn overflowing_glyphs_are_dropped() {
        let plain: BTreeSet<u16> = (1..=20).collect();
        let atlas = build_atlas(&BoxFace, 0, &plain, &BTreeMap::new(), &params(16), 1);
        assert_eq!(atlas.glyph_count(), 2);
        assert_eq!(atlas.dropped, 18);
    }
}
