//! Codepoint classes used by the font picker and the compositor.
//!
//! All predicates are pure and total over `u32`, so they accept values that
//! are not valid scalar values without panicking.

pub const ZWJ: u32 = 0x200D;
pub const ZWNJ: u32 = 0x200C;
/// VARIATION SELECTOR-15 (text presentation)
pub const VS_TEXT: u32 = 0xFE0E;
/// VARIATION SELECTOR-16 (emoji presentation)
pub const VS_EMOJI: u32 = 0xFE0F;

/// Combining mark blocks skipped by coverage checks.
const COMBINING_RANGES: [(u32, u32); 5] = [
    (0x0300, 0x036F), // Combining Diacritical Marks
    (0x1AB0, 0x1AFF), // Combining Diacritical Marks Extended
    (0x1DC0, 0x1DFF), // Combining Diacritical Marks Supplement
    (0x20D0, 0x20FF), // Combining Diacritical Marks for Symbols
    (0xFE20, 0xFE2F), // Combining Half Marks
];

/// Presentation requested by a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Emoji,
    Text,
    Auto,
}

#[inline]
pub fn is_variation_selector(cp: u32) -> bool {
    (0xFE00..=0xFE0F).contains(&cp) || (0xE0100..=0xE01EF).contains(&cp)
}

#[inline]
pub fn is_combining_mark(cp: u32) -> bool {
    COMBINING_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

#[inline]
pub fn is_joiner(cp: u32) -> bool {
    cp == ZWJ || cp == ZWNJ
}

/// Codepoints a font does not need to cover for a cluster to render.
pub fn is_coverage_ignorable(cp: u32) -> bool {
    is_joiner(cp) || is_variation_selector(cp) || is_combining_mark(cp)
}

/// Flag components U+1F1E6..U+1F1FF.
#[inline]
pub fn is_regional_indicator(cp: u32) -> bool {
    (0x1F1E6..=0x1F1FF).contains(&cp)
}

/// Pictographic emoji blocks U+1F300..U+1FAFF.
#[inline]
pub fn is_emoji_range(cp: u32) -> bool {
    (0x1F300..=0x1FAFF).contains(&cp)
}

/// Fitzpatrick skin tone modifiers.
#[inline]
pub fn is_skin_tone_modifier(cp: u32) -> bool {
    (0x1F3FB..=0x1F3FF).contains(&cp)
}

/// Codepoints that attach to the preceding cell's cluster.
pub fn is_cluster_extender(cp: u32) -> bool {
    is_joiner(cp) || is_variation_selector(cp) || is_combining_mark(cp) || is_skin_tone_modifier(cp)
}

/// Presentation preference of a cluster.
///
/// An explicit variation selector wins; otherwise a joiner or any emoji-range
/// codepoint selects emoji presentation.
pub fn presentation(codepoints: &[u32]) -> Presentation {
    if codepoints.contains(&VS_EMOJI) {
        return Presentation::Emoji;
    }
    if codepoints.contains(&VS_TEXT) {
        return Presentation::Text;
    }
    if codepoints.contains(&ZWJ) {
        return Presentation::Emoji;
    }
    if codepoints
        .iter()
        .any(|&cp| is_regional_indicator(cp) || is_emoji_range(cp))
    {
        return Presentation::Emoji;
    }
    Presentation::Auto
}

#[inline]
pub fn is_private_use(cp: u32) -> bool {
    (0xE000..=0xF8FF).contains(&cp)
        || (0xF0000..=0xFFFFD).contains(&cp)
        || (0x100000..=0x10FFFD).contains(&cp)
}

/// Icon codepoints patched in by Nerd Fonts.
pub fn is_nerd_font_icon(cp: u32) -> bool {
    matches!(cp,
        0x23FB..=0x23FE       // IEC power symbols
        | 0x2B58              // IEC power off
        | 0x2665 | 0x26A1     // Octicons heart, zap
        | 0xE000..=0xE00A     // Pomicons
        | 0xE0A0..=0xE0A3     // Powerline
        | 0xE0B0..=0xE0D7     // Powerline extra
        | 0xE200..=0xE2A9     // Font Awesome extension
        | 0xE300..=0xE3E3     // Weather
        | 0xE5FA..=0xE6B7     // Seti-UI and custom
        | 0xE700..=0xE8EF     // Devicons
        | 0xEA60..=0xEC1E     // Codicons
        | 0xED00..=0xF2FF     // Font Awesome
        | 0xF300..=0xF381     // Font Logos
        | 0xF400..=0xF533     // Octicons
        | 0xF0001..=0xF1AF0   // Material Design
    )
}

/// Powerline separators drawn by the shortcut drawer.
#[inline]
pub fn is_powerline(cp: u32) -> bool {
    (0xE0B0..=0xE0BF).contains(&cp)
}

/// Box drawing, block elements, braille, Powerline and legacy computing
/// glyphs that are drawn as geometry.
pub fn is_graphics_element(cp: u32) -> bool {
    matches!(cp,
        0x2500..=0x257F       // Box Drawing
        | 0x2580..=0x259F     // Block Elements
        | 0x25A0..=0x25FF     // Geometric Shapes
        | 0x2800..=0x28FF     // Braille Patterns
        | 0x1FB00..=0x1FBFF   // Symbols for Legacy Computing
    ) || is_powerline(cp)
}

/// Symbols and icons whose glyphs may be wider than one cell.
pub fn is_symbol_like(cp: u32) -> bool {
    is_private_use(cp)
        || is_nerd_font_icon(cp)
        || matches!(cp,
            0x2190..=0x21FF       // Arrows
            | 0x2300..=0x23FF     // Miscellaneous Technical
            | 0x2600..=0x26FF     // Miscellaneous Symbols
            | 0x2700..=0x27BF     // Dingbats
            | 0x2B00..=0x2BFF     // Miscellaneous Symbols and Arrows
        )
}

/// Symbol-like codepoints that are not drawn as geometry.
pub fn is_non_graphics_symbol(cp: u32) -> bool {
    is_symbol_like(cp) && !is_graphics_element(cp)
}
