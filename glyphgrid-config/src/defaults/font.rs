//! Default values for font and text-rendering settings.

use crate::types::FontScaleRule;

pub fn font_size() -> f32 {
    12.0
}

pub fn line_spacing() -> f32 {
    1.0 // Default line height multiplier
}

pub fn char_spacing() -> f32 {
    1.0 // Default character width multiplier
}

pub fn hinting() -> bool {
    true
}

pub fn antialias() -> bool {
    true
}

/// Fallback families in priority order: Nerd Font icons, CJK, monochrome
/// symbols, then color emoji.
pub fn fallback_families() -> Vec<String> {
    [
        "Symbols Nerd Font Mono",
        "Symbols Nerd Font",
        "JetBrainsMono Nerd Font",
        "Noto Sans CJK JP",
        "Noto Sans CJK SC",
        "Noto Sans CJK KR",
        "Microsoft YaHei",
        "Apple Symbols",
        "Noto Sans Symbols",
        "Noto Sans Symbols 2",
        "DejaVu Sans",
        "Symbola",
        "Noto Color Emoji",
        "Apple Color Emoji",
        "Segoe UI Emoji",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn font_scale_overrides() -> Vec<FontScaleRule> {
    Vec::new()
}

pub fn symbol_font_hints() -> Vec<String> {
    [
        r"symbol",
        r"dingbat",
        r"\bstix\b",
        r"\bmath\b",
        r"awesome",
        r"codicon",
        r"octicon",
        r"material ?design ?icons",
        r"powerline",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn nerd_symbol_font_hints() -> Vec<String> {
    [r"symbols? ?nerd ?font", r"nerd ?font ?symbols?", r"\bsymbols? nf\b"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn color_emoji_font_hints() -> Vec<String> {
    [
        r"colou?r ?emoji",
        r"segoe ui emoji",
        r"twemoji",
        r"emojione",
        r"joypixels",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn wide_font_hints() -> Vec<String> {
    [
        r"\bcjk\b",
        r"\b(sc|tc|jp|kr|hk)\b",
        r"source han",
        r"han ?sans",
        r"yahei",
        r"simhei",
        r"simsun",
        r"pingfang",
        r"hiragino",
        r"malgun",
        r"ms gothic",
        r"mincho",
        r"emoji",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
