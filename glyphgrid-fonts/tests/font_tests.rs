//! Font fallback manager tests using an in-memory face.

use std::collections::HashSet;

use glyphgrid_fonts::{
    FaceMetrics, FontClassifier, FontFace, FontManager, FontStyle, GlyphBitmap, GlyphBounds,
    GlyphTransform,
};

struct MockFace {
    chars: HashSet<char>,
}

impl MockFace {
    fn boxed(chars: &str) -> Box<dyn FontFace> {
        Box::new(Self {
            chars: chars.chars().collect(),
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
        600.0
    }
    fn glyph_bounds(&self, _glyph_id: u16) -> Option<GlyphBounds> {
        Some(GlyphBounds {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 600.0,
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
    fn rasterize(&self, _: u16, _: f32, _: Option<GlyphTransform>) -> Option<GlyphBitmap> {
        None
    }
}

const ASCII: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

fn manager(fallbacks: &[(&str, &str)]) -> FontManager {
    let mut fm = FontManager::with_primary(
        "JetBrains Mono",
        MockFace::boxed(ASCII),
        FontClassifier::default(),
    );
    for (label, chars) in fallbacks {
        fm.push_fallback(*label, MockFace::boxed(chars));
    }
    fm
}

#[test]
fn test_scenario_only_third_font_covers() {
    let mut fm = manager(&[("DejaVu Sans", "é"), ("Noto Sans CJK JP", "蟹")]);
    assert_eq!(fm.font_count(), 3);
    assert_eq!(fm.pick_font_index_for_text("蟹", 2), 2);
}

#[test]
fn test_pick_is_memoized() {
    let mut fm = manager(&[("DejaVu Sans", "é"), ("Noto Sans CJK JP", "蟹")]);
    let first = fm.pick_font_index_for_text("蟹", 2);
    let checks = fm.pick_stats().coverage_checks;
    assert!(checks > 0);

    let second = fm.pick_font_index_for_text("蟹", 2);
    assert_eq!(first, second);
    let stats = fm.pick_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.coverage_checks, checks, "cache hit must not check coverage");

    // A different span is a different key
    fm.pick_font_index_for_text("蟹", 1);
    assert_eq!(fm.pick_stats().misses, 2);
}

#[test]
fn test_uncovered_cluster_falls_back_to_primary_and_is_cached() {
    let mut fm = manager(&[("DejaVu Sans", "é")]);
    assert_eq!(fm.pick_font_index_for_text("\u{10FFFD}", 1), 0);
    assert_eq!(fm.pick_font_index_for_text("\u{10FFFD}", 1), 0);
    assert_eq!(fm.pick_stats().hits, 1);
}

#[test]
fn test_nerd_icon_prefers_symbol_font() {
    // The text font also claims the icon, but the Nerd Font symbol font wins
    let mut fm = manager(&[
        ("Some Patched Mono", "\u{F115}"),
        ("Symbols Nerd Font Mono", "\u{F115}"),
    ]);
    assert_eq!(fm.pick_font_index_for_text("\u{F115}", 1), 2);
}

#[test]
fn test_emoji_presentation_prefers_color_font() {
    let mut fm = manager(&[
        ("Noto Sans Symbols 2", "❤😀"),
        ("Noto Color Emoji", "❤😀"),
    ]);
    // Emoji-range codepoint
    assert_eq!(fm.pick_font_index_for_text("😀", 2), 2);
    // Explicit VS16 on a text-default codepoint
    assert_eq!(fm.pick_font_index_for_text("❤\u{FE0F}", 2), 2);
    // Explicit VS15 keeps text presentation
    assert_eq!(fm.pick_font_index_for_text("😀\u{FE0E}", 2), 1);
    // No hint: first covering font in order
    assert_eq!(fm.pick_font_index_for_text("❤", 1), 1);
}

#[test]
fn test_zwj_sequence_needs_every_component() {
    let mut fm = manager(&[
        ("Partial Emoji", "👨"),
        ("Noto Color Emoji", "👨👩👧"),
    ]);
    assert_eq!(fm.pick_font_index_for_text("👨\u{200D}👩\u{200D}👧", 2), 2);
}

#[test]
fn test_combining_marks_are_not_required() {
    let mut fm = manager(&[("DejaVu Sans", "é")]);
    // U+0301 is ignorable; the primary covers 'e'
    assert_eq!(fm.pick_font_index_for_text("e\u{0301}", 1), 0);
}

#[test]
fn test_style_hint_redirects_to_covering_variant() {
    let mut fm = manager(&[("Noto Sans CJK JP", "蟹")]);
    let bold = fm.push_styled(FontStyle::Bold, "JetBrains Mono Bold", MockFace::boxed("ab"));
    assert_eq!(bold, 2);

    assert_eq!(fm.pick_font_index_for_style("a", 1, FontStyle::Bold), bold);
    // The variant lacks 'z', so the primary is kept
    assert_eq!(fm.pick_font_index_for_style("z", 1, FontStyle::Bold), 0);
    // No italic variant is loaded
    assert_eq!(fm.pick_font_index_for_style("a", 1, FontStyle::Italic), 0);
    // Non-primary picks are not redirected
    assert_eq!(fm.pick_font_index_for_style("蟹", 2, FontStyle::Bold), 1);
    // Styled variants never win a plain coverage search
    assert_eq!(fm.pick_font_index_for_text("b", 1), 0);
}

#[test]
fn test_adding_fonts_invalidates_picks() {
    let mut fm = manager(&[]);
    assert_eq!(fm.pick_font_index_for_text("蟹", 2), 0);
    fm.push_fallback("Noto Sans CJK JP", MockFace::boxed("蟹"));
    assert_eq!(fm.pick_font_index_for_text("蟹", 2), 1);
}

#[test]
fn test_classification_is_recorded_per_entry() {
    let fm = manager(&[("Noto Color Emoji", "😀"), ("Noto Sans CJK SC", "蟹")]);
    assert!(fm.class(1).color_emoji);
    assert_eq!(fm.class(1).max_cell_span, 2);
    assert_eq!(fm.class(2).max_cell_span, 2);
    assert!(!fm.class(0).color_emoji);
}

#[test]
fn test_shaping_through_manager_uses_charmap_for_mock_faces() {
    let mut fm = manager(&[]);
    let run = fm.shape_text_with_font_index("ab", 0).unwrap();
    assert_eq!(run.glyphs.len(), 2);
    assert!(run.has_glyphs());
    assert!(fm.shape_text_with_font_index("ab", 9).is_none());
    assert_eq!(fm.shape_cache_size(), 1);
}
