//! Shared integration test helpers for glyphgrid.
//!
//! Include with `mod common;` at the top of a test file. The `dead_code`
//! allowance covers files that only use some of the helpers.

#![allow(dead_code)]

use std::collections::HashSet;

use glyphgrid::config::Config;
use glyphgrid::fonts::{
    FaceMetrics, FontClassifier, FontFace, FontManager, GlyphBitmap, GlyphBounds, GlyphTransform,
};
use glyphgrid::render::{CursorDescriptor, GridSnapshot, RenderContext};

pub const ASCII: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

/// In-memory face that covers a fixed set of characters with solid boxes.
pub struct MockFace {
    chars: HashSet<char>,
    advance: f32,
    colored: bool,
}

impl MockFace {
    pub fn narrow(chars: &str) -> Box<dyn FontFace> {
        Box::new(Self {
            chars: chars.chars().collect(),
            advance: 600.0,
            colored: false,
        })
    }

    pub fn wide(chars: &str) -> Box<dyn FontFace> {
        Box::new(Self {
            chars: chars.chars().collect(),
            advance: 1000.0,
            colored: false,
        })
    }

    pub fn color(chars: &str) -> Box<dyn FontFace> {
        Box::new(Self {
            chars: chars.chars().collect(),
            advance: 1000.0,
            colored: true,
        })
    }
}

impl FontFace for MockFace {
    fn glyph_id_for_char(&self, ch: char) -> u16 {
        if self.chars.contains(&ch) {
            (ch as u32 % 60_000) as u16 + 1
        } else {
            0
        }
    }

    fn advance_width(&self, _glyph_id: u16) -> f32 {
        self.advance
    }

    fn glyph_bounds(&self, glyph_id: u16) -> Option<GlyphBounds> {
        (glyph_id != 0).then_some(GlyphBounds {
            x_min: 0.0,
            y_min: 0.0,
            x_max: self.advance,
            y_max: 700.0,
        })
    }

    fn metrics(&self) -> FaceMetrics {
        FaceMetrics {
            units_per_em: 1000.0,
            ascender: 800.0,
            descender: 200.0,
            line_gap: 0.0,
            x_height: Some(500.0),
            cap_height: Some(700.0),
            ideographic_advance: None,
        }
    }

    fn rasterize(
        &self,
        glyph_id: u16,
        size_px: f32,
        transform: Option<GlyphTransform>,
    ) -> Option<GlyphBitmap> {
        let b = self.glyph_bounds(glyph_id)?;
        let s = size_px / 1000.0;
        let (mut x0, mut y0) = (b.x_min * s, b.y_min * s);
        let (mut x1, mut y1) = (b.x_max * s, b.y_max * s);
        if let Some(t) = transform {
            (x0, y0) = t.apply(x0, y0);
            (x1, y1) = t.apply(x1, y1);
        }
        let width = (x1 - x0).round().max(1.0) as u32;
        let height = (y1 - y0).round().max(1.0) as u32;
        let bpp = if self.colored { 4 } else { 1 };
        Some(GlyphBitmap {
            width,
            height,
            left: x0.floor() as i32,
            top: y1.ceil() as i32,
            colored: self.colored,
            data: vec![255; (width * height) as usize * bpp],
        })
    }
}

/// Config with a 20px font: 12x20 cells, baseline at 16.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.font.size = 20.0;
    config
}

/// Font list with an ASCII primary and the given fallbacks in order.
pub fn font_list(fallbacks: Vec<(&str, Box<dyn FontFace>)>) -> FontManager {
    let mut fonts = FontManager::with_primary(
        "JetBrains Mono",
        MockFace::narrow(ASCII),
        FontClassifier::default(),
    );
    for (label, face) in fallbacks {
        fonts.push_fallback(label, face);
    }
    fonts
}

pub fn render_context(config: Config, fallbacks: Vec<(&str, Box<dyn FontFace>)>) -> RenderContext {
    RenderContext::new(config, font_list(fallbacks), 1.0).expect("valid render context")
}

/// Snapshot of `lines` with the cursor hidden.
pub fn grid(lines: &[&str], cols: usize) -> GridSnapshot {
    let mut snapshot = GridSnapshot::from_lines(lines, cols);
    snapshot.set_cursor(CursorDescriptor {
        visible: false,
        ..CursorDescriptor::default()
    });
    snapshot
}
