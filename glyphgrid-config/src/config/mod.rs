//! Top-level configuration structure and its sections.
//!
//! Every field carries a serde default so partial YAML files load cleanly.

mod persistence;
mod validate;

use crate::types::{CursorStyle, FontClassRules, FontScaleRule};
use serde::{Deserialize, Serialize};

/// Font family, fallback chain and text metrics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Primary monospace family
    #[serde(default = "default_family")]
    pub family: String,

    /// Bold variant family (optional; the primary family is used when unset)
    #[serde(default)]
    pub bold_family: Option<String>,

    /// Italic variant family (optional)
    #[serde(default)]
    pub italic_family: Option<String>,

    /// Bold italic variant family (optional)
    #[serde(default)]
    pub bold_italic_family: Option<String>,

    /// Fallback families tried in order when the primary lacks a glyph
    #[serde(default = "crate::defaults::fallback_families")]
    pub fallback_families: Vec<String>,

    /// Font files added to the fallback chain ahead of `fallback_families`
    #[serde(default)]
    pub font_files: Vec<String>,

    /// Font size in points
    #[serde(default = "crate::defaults::font_size")]
    pub size: f32,

    /// Line height multiplier
    #[serde(default = "crate::defaults::line_spacing")]
    pub line_spacing: f32,

    /// Cell width multiplier
    #[serde(default = "crate::defaults::char_spacing")]
    pub char_spacing: f32,

    /// Snap glyph origins to whole pixels
    #[serde(default = "crate::defaults::hinting")]
    pub hinting: bool,

    /// Rasterize with antialiasing
    #[serde(default = "crate::defaults::antialias")]
    pub antialias: bool,

    /// Per-font scale multipliers keyed by a label pattern (first match wins)
    #[serde(default = "crate::defaults::font_scale_overrides")]
    pub font_scale_overrides: Vec<FontScaleRule>,

    /// Label heuristics used to classify fallback fonts
    #[serde(default)]
    pub font_classes: FontClassRules,
}

fn default_family() -> String {
    "JetBrains Mono".to_string()
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_family(),
            bold_family: None,
            italic_family: None,
            bold_italic_family: None,
            fallback_families: crate::defaults::fallback_families(),
            font_files: Vec::new(),
            size: crate::defaults::font_size(),
            line_spacing: crate::defaults::line_spacing(),
            char_spacing: crate::defaults::char_spacing(),
            hinting: crate::defaults::hinting(),
            antialias: crate::defaults::antialias(),
            font_scale_overrides: crate::defaults::font_scale_overrides(),
            font_classes: FontClassRules::default(),
        }
    }
}

/// Glyph atlas sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Maximum atlas edge length in pixels
    #[serde(default = "crate::defaults::atlas_max_size")]
    pub max_size: u32,

    /// Empty pixels kept between packed glyphs
    #[serde(default = "crate::defaults::atlas_padding")]
    pub padding: u32,

    /// Extra raster scale for non-primary symbol fonts
    #[serde(default = "crate::defaults::symbol_atlas_scale")]
    pub symbol_atlas_scale: f32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_size: crate::defaults::atlas_max_size(),
            padding: crate::defaults::atlas_padding(),
            symbol_atlas_scale: crate::defaults::symbol_atlas_scale(),
        }
    }
}

/// Cell compositor tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositorConfig {
    /// Maximum number of cells merged into one shaping cluster
    #[serde(default = "crate::defaults::cluster_merge_limit")]
    pub cluster_merge_limit: usize,

    /// Bold text in one of the 8 base ANSI colors uses the bright variant
    #[serde(default = "crate::defaults::bold_is_bright")]
    pub bold_is_bright: bool,

    /// Alpha multiplier applied to faint (SGR 2) text
    #[serde(default = "crate::defaults::faint_alpha")]
    pub faint_alpha: f32,

    /// Overflow ratio beyond which a glyph is shrunk to fit its cells
    #[serde(default = "crate::defaults::force_fit_tolerance")]
    pub force_fit_tolerance: f32,

    /// Minimum WCAG contrast ratio between text and background (1.0 = off)
    #[serde(default = "crate::defaults::minimum_contrast")]
    pub minimum_contrast: f32,

    /// Theme default foreground
    #[serde(default = "crate::defaults::foreground")]
    pub default_fg: [u8; 3],

    /// Theme default background
    #[serde(default = "crate::defaults::background")]
    pub default_bg: [u8; 3],

    /// Selection highlight background
    #[serde(default = "crate::defaults::selection_background")]
    pub selection_bg: [u8; 3],

    /// Selection text color (keeps the cell foreground when unset)
    #[serde(default)]
    pub selection_fg: Option<[u8; 3]>,

    /// ANSI base and bright palette (16 entries) used by bold-as-bright
    #[serde(default = "default_palette")]
    pub palette: Vec<[u8; 3]>,
}

fn default_palette() -> Vec<[u8; 3]> {
    vec![
        [0, 0, 0],
        [205, 49, 49],
        [13, 188, 121],
        [229, 229, 16],
        [36, 114, 200],
        [188, 63, 188],
        [17, 168, 205],
        [229, 229, 229],
        [102, 102, 102],
        [241, 76, 76],
        [35, 209, 139],
        [245, 245, 67],
        [59, 142, 234],
        [214, 112, 214],
        [41, 184, 219],
        [255, 255, 255],
    ]
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            cluster_merge_limit: crate::defaults::cluster_merge_limit(),
            bold_is_bright: crate::defaults::bold_is_bright(),
            faint_alpha: crate::defaults::faint_alpha(),
            force_fit_tolerance: crate::defaults::force_fit_tolerance(),
            minimum_contrast: crate::defaults::minimum_contrast(),
            default_fg: crate::defaults::foreground(),
            default_bg: crate::defaults::background(),
            selection_bg: crate::defaults::selection_background(),
            selection_fg: None,
            palette: default_palette(),
        }
    }
}

/// Cursor appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub style: CursorStyle,

    #[serde(default = "crate::defaults::cursor_color")]
    pub color: [u8; 3],

    /// Text color under a block cursor (cell background when unset)
    #[serde(default)]
    pub text_color: Option<[u8; 3]>,

    /// Bar cursor width in pixels
    #[serde(default = "crate::defaults::cursor_bar_width")]
    pub bar_width: f32,

    /// Underline cursor height in pixels
    #[serde(default = "crate::defaults::cursor_underline_height")]
    pub underline_height: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            style: CursorStyle::default(),
            color: crate::defaults::cursor_color(),
            text_color: None,
            bar_width: crate::defaults::cursor_bar_width(),
            underline_height: crate::defaults::cursor_underline_height(),
        }
    }
}

/// Overlay layer timing and appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// How long the resize indicator stays visible
    #[serde(default = "crate::defaults::resize_indicator_ms")]
    pub resize_indicator_ms: u64,

    /// Synchronized-output mode is forced off after this long without an end marker
    #[serde(default = "crate::defaults::sync_output_timeout_ms")]
    pub sync_output_timeout_ms: u64,

    #[serde(default = "crate::defaults::scrollbar_width")]
    pub scrollbar_width: f32,

    /// Minimum scrollbar thumb length in pixels
    #[serde(default = "crate::defaults::scrollbar_min_thumb")]
    pub scrollbar_min_thumb: f32,

    #[serde(default = "crate::defaults::scrollbar_thumb_color")]
    pub scrollbar_thumb_color: [f32; 4],

    #[serde(default = "crate::defaults::preedit_background")]
    pub preedit_bg: [f32; 4],

    #[serde(default = "crate::defaults::preedit_underline")]
    pub preedit_underline: [f32; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            resize_indicator_ms: crate::defaults::resize_indicator_ms(),
            sync_output_timeout_ms: crate::defaults::sync_output_timeout_ms(),
            scrollbar_width: crate::defaults::scrollbar_width(),
            scrollbar_min_thumb: crate::defaults::scrollbar_min_thumb(),
            scrollbar_thumb_color: crate::defaults::scrollbar_thumb_color(),
            preedit_bg: crate::defaults::preedit_background(),
            preedit_underline: crate::defaults::preedit_underline(),
        }
    }
}

/// Complete rendering-core configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub atlas: AtlasConfig,
    #[serde(default)]
    pub compositor: CompositorConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}
