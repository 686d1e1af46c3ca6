//! Font management with fallback chain for comprehensive Unicode coverage.
//!
//! Font indices are assigned in load order:
//! - 0: Primary font
//! - 1..=N: Fallback fonts (explicit font files first, then families)
//! - N+1..: Bold/italic/bold-italic variants of the primary family
//!
//! The whole manager is replaced when fonts are reconfigured; the pick cache
//! has no per-entry eviction.

mod pick;
mod types;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family};
use glyphgrid_config::Config;

use crate::classify::{FontClass, FontClassifier};
use crate::error::FontError;
use crate::face::{FontFace, SwashFace};
use crate::loader::{self, LoadedFont};
use crate::text_shaper::{ShapedRun, ShapingOptions, TextShaper};

pub use types::{FontEntry, FontRole, FontStyle, PickStats};

/// Manages multiple fonts with fallback chain.
pub struct FontManager {
    entries: Vec<FontEntry>,
    classifier: FontClassifier,

    /// `(span, cluster text)` -> font index
    pick_cache: HashMap<(u8, String), usize>,

    /// `(style, cluster text)` -> styled variant index (or 0)
    style_cache: HashMap<(FontStyle, String), usize>,

    stats: PickStats,

    /// Text shaper for ligatures and complex scripts
    text_shaper: TextShaper,

    shaping_options: ShapingOptions,
}

impl FontManager {
    /// Create a manager whose only font is `primary`.
    pub fn with_primary(
        label: impl Into<String>,
        face: Box<dyn FontFace>,
        classifier: FontClassifier,
    ) -> Self {
        let label = label.into();
        let class = classifier.classify(&label, true);
        Self {
            entries: vec![FontEntry {
                face,
                label,
                role: FontRole::Primary,
                class,
            }],
            classifier,
            pick_cache: HashMap::new(),
            style_cache: HashMap::new(),
            stats: PickStats::default(),
            text_shaper: TextShaper::new(),
            shaping_options: ShapingOptions::default(),
        }
    }

    /// Append a fallback font and return its index.
    pub fn push_fallback(&mut self, label: impl Into<String>, face: Box<dyn FontFace>) -> usize {
        self.push(label.into(), face, FontRole::Fallback)
    }

    /// Append a styled variant of the primary font and return its index.
    pub fn push_styled(
        &mut self,
        style: FontStyle,
        label: impl Into<String>,
        face: Box<dyn FontFace>,
    ) -> usize {
        self.push(label.into(), face, FontRole::Styled(style))
    }

    fn push(&mut self, label: String, face: Box<dyn FontFace>, role: FontRole) -> usize {
        let class = self.classifier.classify(&label, false);
        log::info!(
            "Added font {} '{}' ({:?}, span {}, raster scale {})",
            self.entries.len(),
            label,
            role,
            class.max_cell_span,
            class.raster_scale
        );
        self.entries.push(FontEntry {
            face,
            label,
            role,
            class,
        });
        self.reset_cache();
        self.entries.len() - 1
    }

    /// Build the font list described by `config` from system fonts and files.
    ///
    /// A missing primary font is fatal; missing fallbacks are skipped.
    pub fn from_config(config: &Config) -> Result<Self, FontError> {
        let font = &config.font;
        let classifier = FontClassifier::new(
            &font.font_classes,
            &font.font_scale_overrides,
            config.atlas.symbol_atlas_scale,
        )?;

        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let make_face = |loaded: LoadedFont| -> Box<dyn FontFace> {
            Box::new(SwashFace::new(loaded.data, font.hinting, font.antialias))
        };

        log::info!("Attempting to load primary font: {}", font.family);
        let primary = match loader::load_font_from_db(&mut font_db, &font.family) {
            Some(loaded) => loaded,
            None => {
                log::warn!(
                    "Primary font '{}' not found, using first monospace family",
                    font.family
                );
                loader::load_monospace_from_db(&mut font_db)
                    .ok_or_else(|| FontError::PrimaryNotFound(font.family.clone()))?
            }
        };
        let primary_label = primary.label.clone();
        log::info!("Loaded primary font: {}", primary_label);
        let mut manager = Self::with_primary(primary_label.clone(), make_face(primary), classifier);

        for path in &font.font_files {
            match loader::load_font_file(Path::new(path)) {
                Ok(loaded) => {
                    let label = loaded.label.clone();
                    manager.push_fallback(label, make_face(loaded));
                }
                Err(e) => log::warn!("Skipping font file: {}", e),
            }
        }

        for family_name in &font.fallback_families {
            if family_name.eq_ignore_ascii_case(&primary_label) {
                continue;
            }
            match loader::load_font_from_db(&mut font_db, family_name) {
                Some(loaded) => {
                    manager.push_fallback(loaded.label.clone(), make_face(loaded));
                }
                None => log::warn!("Fallback font '{}' not found, skipping", family_name),
            }
        }

        let styled = [
            (FontStyle::Bold, &font.bold_family, fontdb::Weight::BOLD, fontdb::Style::Normal),
            (FontStyle::Italic, &font.italic_family, fontdb::Weight::NORMAL, fontdb::Style::Italic),
            (
                FontStyle::BoldItalic,
                &font.bold_italic_family,
                fontdb::Weight::BOLD,
                fontdb::Style::Italic,
            ),
        ];
        for (style, family, weight, slant) in styled {
            let Some(family_name) = family else { continue };
            log::info!("Attempting to load {:?} font: {}", style, family_name);
            match loader::load_font_from_db_with_style(
                &mut font_db,
                Family::Name(family_name),
                Some(weight),
                Some(slant),
            ) {
                Some(loaded) => {
                    manager.push_styled(style, loaded.label.clone(), make_face(loaded));
                }
                None => log::warn!(
                    "{:?} font '{}' not found, will use primary font",
                    style,
                    family_name
                ),
            }
        }

        Ok(manager)
    }

    /// Number of fonts loaded (primary + fallbacks + styled variants).
    pub fn font_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn entry(&self, font_index: usize) -> Option<&FontEntry> {
        self.entries.get(font_index)
    }

    pub fn face(&self, font_index: usize) -> Option<&dyn FontFace> {
        self.entries.get(font_index).map(|e| e.face.as_ref())
    }

    pub fn primary(&self) -> &FontEntry {
        &self.entries[0]
    }

    pub fn class(&self, font_index: usize) -> FontClass {
        self.entries
            .get(font_index)
            .map(|e| e.class)
            .unwrap_or_default()
    }

    pub fn classifier(&self) -> &FontClassifier {
        &self.classifier
    }

    /// Index of the styled variant for `style`, if one is loaded.
    pub fn styled_index(&self, style: FontStyle) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.role == FontRole::Styled(style))
    }

    pub fn pick_stats(&self) -> PickStats {
        self.stats
    }

    /// Drop every memoized pick.
    pub fn reset_cache(&mut self) {
        self.pick_cache.clear();
        self.style_cache.clear();
        self.text_shaper.clear_cache();
    }

    /// Shape text using a specific font index.
    pub fn shape_text_with_font_index(
        &mut self,
        text: &str,
        font_index: usize,
    ) -> Option<Arc<ShapedRun>> {
        let face = self.entries.get(font_index)?.face.as_ref();
        Some(
            self.text_shaper
                .shape_text(text, face, font_index, self.shaping_options),
        )
    }

    /// Get the current size of the shape cache.
    pub fn shape_cache_size(&self) -> usize {
        self.text_shaper.cache_size()
    }
}

impl std::fmt::Debug for FontManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontManager")
            .field("entries", &self.entries)
            .field("cached_picks", &self.pick_cache.len())
            .field("stats", &self.stats)
            .finish()
    }
}
