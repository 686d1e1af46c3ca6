//! Heuristic font classification by display label.
//!
//! The label of a font ("Noto Color Emoji", "Symbols Nerd Font Mono") is
//! matched case-insensitively against the regex tables from
//! [`FontClassRules`]. This is best-effort: a font whose label gives no hint
//! is treated as a plain text font.

use glyphgrid_config::{FontClassRules, FontScaleRule};
use regex::{Regex, RegexBuilder};

use crate::error::FontError;

/// Classification of one font, computed once when the font list is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontClass {
    pub symbol: bool,
    pub nerd_symbol: bool,
    pub color_emoji: bool,
    /// 2 for CJK/emoji families, else 1
    pub max_cell_span: u8,
    /// Multiplier from the scale override table
    pub scale_override: f32,
    /// Atlas raster scale (override times the symbol atlas scale for
    /// non-primary symbol fonts)
    pub raster_scale: f32,
}

impl FontClass {
    /// Symbol and emoji fonts keep their own proportions instead of being
    /// matched to the primary font's metrics.
    pub fn is_natural_scale(&self) -> bool {
        self.symbol || self.nerd_symbol || self.color_emoji
    }
}

impl Default for FontClass {
    fn default() -> Self {
        Self {
            symbol: false,
            nerd_symbol: false,
            color_emoji: false,
            max_cell_span: 1,
            scale_override: 1.0,
            raster_scale: 1.0,
        }
    }
}

/// Compiled classification rule tables.
#[derive(Debug, Clone)]
pub struct FontClassifier {
    symbol: Vec<Regex>,
    nerd_symbol: Vec<Regex>,
    color_emoji: Vec<Regex>,
    wide: Vec<Regex>,
    scale_rules: Vec<(Regex, f32)>,
    symbol_atlas_scale: f32,
}

fn compile(pattern: &str) -> Result<Regex, FontError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| FontError::InvalidRule {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, FontError> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn any_match(table: &[Regex], label: &str) -> bool {
    table.iter().any(|re| re.is_match(label))
}

impl FontClassifier {
    pub fn new(
        rules: &FontClassRules,
        overrides: &[FontScaleRule],
        symbol_atlas_scale: f32,
    ) -> Result<Self, FontError> {
        let scale_rules = overrides
            .iter()
            .map(|rule| Ok((compile(&rule.pattern)?, rule.scale)))
            .collect::<Result<Vec<_>, FontError>>()?;

        Ok(Self {
            symbol: compile_all(&rules.symbol)?,
            nerd_symbol: compile_all(&rules.nerd_symbol)?,
            color_emoji: compile_all(&rules.color_emoji)?,
            wide: compile_all(&rules.wide)?,
            scale_rules,
            symbol_atlas_scale,
        })
    }

    pub fn is_symbol_font(&self, label: &str) -> bool {
        any_match(&self.symbol, label)
    }

    pub fn is_nerd_symbol_font(&self, label: &str) -> bool {
        any_match(&self.nerd_symbol, label)
    }

    pub fn is_color_emoji_font(&self, label: &str) -> bool {
        any_match(&self.color_emoji, label)
    }

    pub fn font_max_cell_span(&self, label: &str) -> u8 {
        if any_match(&self.wide, label) { 2 } else { 1 }
    }

    /// First matching override wins; 1.0 when nothing matches.
    pub fn font_scale_override(&self, label: &str) -> f32 {
        self.scale_rules
            .iter()
            .find(|(re, _)| re.is_match(label))
            .map_or(1.0, |(_, scale)| *scale)
    }

    pub fn font_raster_scale(&self, label: &str, is_primary: bool) -> f32 {
        let base = self.font_scale_override(label);
        if !is_primary && (self.is_symbol_font(label) || self.is_nerd_symbol_font(label)) {
            base * self.symbol_atlas_scale
        } else {
            base
        }
    }

    pub fn classify(&self, label: &str, is_primary: bool) -> FontClass {
        FontClass {
            symbol: self.is_symbol_font(label),
            nerd_symbol: self.is_nerd_symbol_font(label),
            color_emoji: self.is_color_emoji_font(label),
            max_cell_span: self.font_max_cell_span(label),
            scale_override: self.font_scale_override(label),
            raster_scale: self.font_raster_scale(label, is_primary),
        }
    }
}

impl Default for FontClassifier {
    fn default() -> Self {
        let rules = FontClassRules::default();
        Self {
            symbol: compile_all(&rules.symbol).unwrap_or_default(),
            nerd_symbol: compile_all(&rules.nerd_symbol).unwrap_or_default(),
            color_emoji: compile_all(&rules.color_emoji).unwrap_or_default(),
            wide: compile_all(&rules.wide).unwrap_or_default(),
            scale_rules: Vec::new(),
            symbol_atlas_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_labels() {
        let c = FontClassifier::default();
        // (label, symbol, nerd, emoji, span)
        let table = [
            ("JetBrains Mono", false, false, false, 1),
            ("Symbols Nerd Font Mono", true, true, false, 1),
            ("Noto Color Emoji", false, false, true, 2),
            ("Apple Color Emoji", false, false, true, 2),
            ("Segoe UI Emoji", false, false, true, 2),
            ("Noto Sans CJK JP", false, false, false, 2),
            ("Source Han Sans SC", false, false, false, 2),
            ("Noto Sans Symbols 2", true, false, false, 1),
            ("STIX Two Math", true, false, false, 1),
            ("Font Awesome 6 Free", true, false, false, 1),
        ];
        for (label, symbol, nerd, emoji, span) in table {
            assert_eq!(c.is_symbol_font(label), symbol, "symbol: {label}");
            assert_eq!(c.is_nerd_symbol_font(label), nerd, "nerd: {label}");
            assert_eq!(c.is_color_emoji_font(label), emoji, "emoji: {label}");
            assert_eq!(c.font_max_cell_span(label), span, "span: {label}");
        }
    }

    #[test]
    fn first_scale_rule_wins() {
        let overrides = vec![
            FontScaleRule {
                pattern: "emoji".into(),
                scale: 0.8,
            },
            FontScaleRule {
                pattern: "noto".into(),
                scale: 1.5,
            },
        ];
        let c = FontClassifier::new(&FontClassRules::default(), &overrides, 1.25).unwrap();
        assert_eq!(c.font_scale_override("Noto Color Emoji"), 0.8);
        assert_eq!(c.font_scale_override("Noto Sans"), 1.5);
        assert_eq!(c.font_scale_override("Hack"), 1.0);
        assert_eq!(c.font_raster_scale("Symbols Nerd Font", false), 1.25);
        assert_eq!(c.font_raster_scale("Symbols Nerd Font", true), 1.0);
    }

    #[test]
    fn bad_rule_is_reported() {
        let rules = FontClassRules {
            symbol: vec!["[".into()],
            ..FontClassRules::default()
        };
        let err = FontClassifier::new(&rules, &[], 1.0).unwrap_err();
        assert!(matches!(err, FontError::InvalidRule { .. }));
    }
}
