//! Font selection and classification configuration types.

use serde::{Deserialize, Serialize};

/// Per-font multiplicative scale applied when a font label matches `pattern`.
///
/// Rules are evaluated in order; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontScaleRule {
    /// Case-insensitive regular expression matched against the font label
    pub pattern: String,
    /// Scale multiplier (1.0 = unchanged)
    pub scale: f32,
}

/// Regex hint tables used to classify fonts by their display label.
///
/// Classification is a heuristic: a label is matched case-insensitively against
/// each list and any match puts the font in that class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontClassRules {
    /// Generic symbol/icon fonts
    #[serde(default = "crate::defaults::symbol_font_hints")]
    pub symbol: Vec<String>,
    /// Nerd Font symbol-only fonts
    #[serde(default = "crate::defaults::nerd_symbol_font_hints")]
    pub nerd_symbol: Vec<String>,
    /// Color emoji fonts
    #[serde(default = "crate::defaults::color_emoji_font_hints")]
    pub color_emoji: Vec<String>,
    /// CJK and emoji families whose glyphs may span two cells
    #[serde(default = "crate::defaults::wide_font_hints")]
    pub wide: Vec<String>,
}

impl Default for FontClassRules {
    fn default() -> Self {
        Self {
            symbol: crate::defaults::symbol_font_hints(),
            nerd_symbol: crate::defaults::nerd_symbol_font_hints(),
            color_emoji: crate::defaults::color_emoji_font_hints(),
            wide: crate::defaults::wide_font_hints(),
        }
    }
}

impl FontClassRules {
    /// Every pattern together with the name of the table it belongs to.
    pub fn patterns(&self) -> Vec<(&'static str, &str)> {
        let tables: [(&'static str, &[String]); 4] = [
            ("symbol", &self.symbol),
            ("nerd_symbol", &self.nerd_symbol),
            ("color_emoji", &self.color_emoji),
            ("wide", &self.wide),
        ];
        tables
            .into_iter()
            .flat_map(|(name, list)| list.iter().map(move |p| (name, p.as_str())))
            .collect()
    }
}
