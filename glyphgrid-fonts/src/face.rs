//! Font face capability interface and the swash-backed implementation.
//!
//! Every font in the fallback list is held as a `Box<dyn FontFace>`. The
//! compositor and atlas builder only talk to fonts through this trait, so
//! outline fonts, color bitmap fonts and test doubles are interchangeable.

use std::sync::Arc;

use parking_lot::Mutex;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Format, Transform};
use swash::FontRef;

/// Vertical metrics of a face, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub units_per_em: f32,
    /// Distance from the baseline to the top of the alignment box
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the alignment box (positive)
    pub descender: f32,
    pub line_gap: f32,
    pub x_height: Option<f32>,
    pub cap_height: Option<f32>,
    /// Advance of a representative CJK ideograph, when the face has one
    pub ideographic_advance: Option<f32>,
}

impl FaceMetrics {
    /// Natural line height (ascender + descender + line gap).
    pub fn line_height(&self) -> f32 {
        self.ascender + self.descender + self.line_gap
    }
}

/// Outline bounding box of a glyph in font units (y grows upwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl GlyphBounds {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Axis-aligned affine transform applied to a glyph outline before
/// rasterization.
///
/// Coordinates are device pixels at the requested size with y growing
/// upwards from the baseline: `x' = x * scale_x + translate_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl GlyphTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Transform mapping the pixel box `from` onto the pixel box `to`.
    ///
    /// Boxes are `(x_min, y_min, x_max, y_max)` in y-up pixel space.
    pub fn map_box(from: [f32; 4], to: [f32; 4]) -> Self {
        let from_w = (from[2] - from[0]).max(f32::EPSILON);
        let from_h = (from[3] - from[1]).max(f32::EPSILON);
        let scale_x = (to[2] - to[0]) / from_w;
        let scale_y = (to[3] - to[1]) / from_h;
        Self {
            scale_x,
            scale_y,
            translate_x: to[0] - from[0] * scale_x,
            translate_y: to[1] - from[1] * scale_y,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale_x + self.translate_x,
            y * self.scale_y + self.translate_y,
        )
    }
}

/// A rasterized glyph.
///
/// Mask glyphs carry one coverage byte per pixel; colored glyphs carry
/// straight RGBA. The buffer is owned, so callers may keep it after the
/// rasterizer is reused.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the left edge
    pub left: i32,
    /// Vertical offset from the baseline up to the top edge
    pub top: i32,
    pub colored: bool,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    pub fn bytes_per_pixel(&self) -> usize {
        if self.colored { 4 } else { 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Capability interface every font backend implements.
pub trait FontFace {
    /// Glyph id for a character, 0 when the face has no glyph for it.
    fn glyph_id_for_char(&self, ch: char) -> u16;

    /// Horizontal advance of a glyph in font units.
    fn advance_width(&self, glyph_id: u16) -> f32;

    /// Outline bounds of a glyph in font units, `None` for empty glyphs.
    fn glyph_bounds(&self, glyph_id: u16) -> Option<GlyphBounds>;

    fn metrics(&self) -> FaceMetrics;

    /// Pixels per font unit at the given pixel size.
    fn scale_for_size(&self, size_px: f32) -> f32 {
        size_px / self.metrics().units_per_em.max(1.0)
    }

    /// Rasterize a glyph at `size_px`, optionally transforming the outline
    /// first. Returns `None` when the backend has nothing to draw.
    fn rasterize(
        &self,
        glyph_id: u16,
        size_px: f32,
        transform: Option<GlyphTransform>,
    ) -> Option<GlyphBitmap>;

    /// Raw font file bytes and face index, used for shaping.
    fn font_data(&self) -> Option<(&[u8], u32)> {
        None
    }

    fn has_color_glyphs(&self) -> bool {
        false
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.glyph_id_for_char(ch) != 0
    }
}

/// Stores font data with lifetime management.
///
/// This struct owns the font data bytes and provides a `FontRef` that can be used
/// for glyph lookups and rasterization. The `FontRef` is guaranteed to be valid
/// for the lifetime of this struct.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    /// Face index within a collection
    pub index: u32,
    /// Swash font reference for glyph operations
    pub font_ref: FontRef<'static>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData from bytes with a specific face index.
    ///
    /// This is needed for TrueType Collection (.ttc) files where multiple
    /// font faces share the same data but have different face indices.
    pub fn new_with_index(data: Vec<u8>, face_index: u32) -> Option<Self> {
        let data_arc = Arc::new(data);

        // SAFETY: We ensure the data outlives the FontRef by storing it in an Arc.
        // The FontRef will never outlive the FontData struct because they are stored
        // together and dropped together.
        let font_ref = unsafe {
            let bytes = data_arc.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            FontRef::from_index(static_bytes, face_index as usize)?
        };

        Some(FontData {
            data: data_arc,
            index: face_index,
            font_ref,
        })
    }

    /// Family name from the font's name table.
    pub fn family_name(&self) -> Option<String> {
        self.font_ref
            .localized_strings()
            .find_by_id(swash::StringId::Family, None)
            .map(|s| s.chars().collect())
    }
}

/// Color sources tried first so emoji fonts render as colored bitmaps.
/// Regular text fonts have no color data so fall through to `Outline`.
const COLOR_FIRST: [Source; 3] = [
    Source::ColorBitmap(StrikeWith::BestFit),
    Source::ColorOutline(0),
    Source::Outline,
];

/// Outline sources first: bitmap strikes ignore outline transforms.
const OUTLINE_FIRST: [Source; 3] = [
    Source::ColorOutline(0),
    Source::Outline,
    Source::ColorBitmap(StrikeWith::BestFit),
];

/// `FontFace` backed by swash (outline, color outline and color bitmap glyphs).
pub struct SwashFace {
    data: FontData,
    hinting: bool,
    antialias: bool,
    color: bool,
    metrics: FaceMetrics,
    context: Mutex<ScaleContext>,
}

impl SwashFace {
    pub fn new(data: FontData, hinting: bool, antialias: bool) -> Self {
        let font = data.font_ref;
        let color = [b"COLR", b"CBDT", b"sbix", b"SVG "]
            .into_iter()
            .any(|tag| font.table(swash::tag_from_bytes(tag)).is_some());

        let m = font.metrics(&[]);
        let glyph_metrics = font.glyph_metrics(&[]);
        let ideograph = font.charmap().map('\u{6C34}');
        let metrics = FaceMetrics {
            units_per_em: m.units_per_em as f32,
            ascender: m.ascent,
            descender: m.descent.abs(),
            line_gap: m.leading,
            x_height: (m.x_height > 0.0).then_some(m.x_height),
            cap_height: (m.cap_height > 0.0).then_some(m.cap_height),
            ideographic_advance: (ideograph != 0)
                .then(|| glyph_metrics.advance_width(ideograph)),
        };

        Self {
            data,
            hinting,
            antialias,
            color,
            metrics,
            context: Mutex::new(ScaleContext::new()),
        }
    }

    pub fn data(&self) -> &FontData {
        &self.data
    }
}

impl FontFace for SwashFace {
    fn glyph_id_for_char(&self, ch: char) -> u16 {
        self.data.font_ref.charmap().map(ch)
    }

    fn advance_width(&self, glyph_id: u16) -> f32 {
        self.data.font_ref.glyph_metrics(&[]).advance_width(glyph_id)
    }

    fn glyph_bounds(&self, glyph_id: u16) -> Option<GlyphBounds> {
        let face = rustybuzz::ttf_parser::Face::parse(&self.data.data, self.data.index).ok()?;
        let rect = face.glyph_bounding_box(rustybuzz::ttf_parser::GlyphId(glyph_id))?;
        Some(GlyphBounds {
            x_min: rect.x_min as f32,
            y_min: rect.y_min as f32,
            x_max: rect.x_max as f32,
            y_max: rect.y_max as f32,
        })
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn rasterize(
        &self,
        glyph_id: u16,
        size_px: f32,
        transform: Option<GlyphTransform>,
    ) -> Option<GlyphBitmap> {
        let mut context = self.context.lock();
        // Hinting would snap the outline before the transform moves it
        let mut scaler = context
            .builder(self.data.font_ref)
            .size(size_px)
            .hint(self.hinting && transform.is_none())
            .build();

        let sources: &[Source] = if transform.is_some() {
            &OUTLINE_FIRST
        } else {
            &COLOR_FIRST
        };
        let image = Render::new(sources)
            .format(Format::Alpha)
            .transform(transform.map(|t| {
                Transform::new(t.scale_x, 0.0, 0.0, t.scale_y, t.translate_x, t.translate_y)
            }))
            .render(&mut scaler, glyph_id)?;

        let (data, colored) = match image.content {
            Content::Color => (image.data, true),
            Content::Mask => {
                let data = if self.antialias {
                    image.data
                } else {
                    // Threshold the alpha to create crisp edges
                    image
                        .data
                        .iter()
                        .map(|&a| if a > 127 { 255 } else { 0 })
                        .collect()
                };
                (data, false)
            }
            Content::SubpixelMask => (subpixel_to_gray(&image.data), false),
        };

        Some(GlyphBitmap {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            colored,
            data,
        })
    }

    fn font_data(&self) -> Option<(&[u8], u32)> {
        Some((self.data.data.as_slice(), self.data.index))
    }

    fn has_color_glyphs(&self) -> bool {
        self.color
    }
}

/// Collapse a 4-byte subpixel mask to one coverage byte via luminance.
fn subpixel_to_gray(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .map(|c| ((c[0] as u32 * 299 + c[1] as u32 * 587 + c[2] as u32 * 114) / 1000) as u8)
        .collect()
}
