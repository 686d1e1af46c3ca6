//! Per-cluster font selection with memoization.

use crate::unicode::{self, Presentation};

use super::types::{FontEntry, FontStyle};
use super::FontManager;

impl FontManager {
    /// Best font index for a cluster expected to span `span` cells.
    ///
    /// Results (including the fallback to font 0) are cached by
    /// `(span, text)` until the font list changes.
    pub fn pick_font_index_for_text(&mut self, text: &str, span: u8) -> usize {
        let key = (span, text.to_string());
        if let Some(&index) = self.pick_cache.get(&key) {
            self.stats.hits += 1;
            return index;
        }
        self.stats.misses += 1;

        let index = self.search(text);
        log::debug!(
            "Picked font {} ({}) for {:?} span {}",
            index,
            self.entries[index].label,
            text,
            span
        );
        self.pick_cache.insert(key, index);
        index
    }

    /// Like [`pick_font_index_for_text`](Self::pick_font_index_for_text), but
    /// when the pick lands on the primary font a bold/italic variant that
    /// covers the cluster is preferred.
    pub fn pick_font_index_for_style(&mut self, text: &str, span: u8, style: FontStyle) -> usize {
        let index = self.pick_font_index_for_text(text, span);
        if index != 0 || style == FontStyle::Regular {
            return index;
        }

        let key = (style, text.to_string());
        if let Some(&styled) = self.style_cache.get(&key) {
            return styled;
        }
        let required = required_chars(text);
        let mut checks = 0;
        let styled = self
            .styled_index(style)
            .filter(|&i| {
                checks += 1;
                self.entries[i].covers(&required)
            })
            .unwrap_or(0);
        self.stats.coverage_checks += checks;
        self.style_cache.insert(key, styled);
        styled
    }

    fn search(&mut self, text: &str) -> usize {
        let codepoints: Vec<u32> = text.chars().map(|c| c as u32).collect();
        let required = required_chars(text);
        let preference = unicode::presentation(&codepoints);

        if codepoints
            .first()
            .is_some_and(|&cp| unicode::is_nerd_font_icon(cp))
            && let Some(index) = self.first_covering(&required, |e| {
                e.class.nerd_symbol || e.class.symbol
            })
        {
            return index;
        }

        let preferred = match preference {
            Presentation::Emoji => self.first_covering(&required, |e| e.class.color_emoji),
            Presentation::Text => self.first_covering(&required, |e| !e.class.color_emoji),
            Presentation::Auto => None,
        };
        if let Some(index) = preferred {
            return index;
        }

        self.first_covering(&required, |_| true).unwrap_or(0)
    }

    fn first_covering(
        &mut self,
        required: &[char],
        accept: impl Fn(&FontEntry) -> bool,
    ) -> Option<usize> {
        let mut checks = 0;
        let found = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_searchable() && accept(e))
            .find(|(_, e)| {
                checks += 1;
                e.covers(required)
            })
            .map(|(i, _)| i);
        self.stats.coverage_checks += checks;
        found
    }
}

/// Codepoints of `text` a font must have glyphs for.
pub(crate) fn required_chars(text: &str) -> Vec<char> {
    text.chars()
        .filter(|&c| !unicode::is_coverage_ignorable(c as u32))
        .collect()
}
