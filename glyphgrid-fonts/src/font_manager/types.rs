//! Font list entry types.

use crate::classify::FontClass;
use crate::face::FontFace;

/// Style variant requested for a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Regular,
        }
    }
}

/// Position of a font in the fallback list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Primary,
    /// Bold/italic face of the primary family; excluded from coverage search
    Styled(FontStyle),
    Fallback,
}

/// A loaded font with its label and classification.
pub struct FontEntry {
    pub face: Box<dyn FontFace>,
    /// Display label used for heuristic classification
    pub label: String,
    pub role: FontRole,
    pub class: FontClass,
}

impl FontEntry {
    /// Whether the font can render every codepoint in `required`.
    pub fn covers(&self, required: &[char]) -> bool {
        required.iter().all(|&ch| self.face.has_glyph(ch))
    }

    pub fn is_searchable(&self) -> bool {
        !matches!(self.role, FontRole::Styled(_))
    }
}

impl std::fmt::Debug for FontEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontEntry")
            .field("label", &self.label)
            .field("role", &self.role)
            .field("class", &self.class)
            .finish()
    }
}

/// Counters for the pick cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of per-font coverage checks performed
    pub coverage_checks: u64,
}
