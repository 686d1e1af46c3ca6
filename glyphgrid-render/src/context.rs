//! Owned render state passed through every compositor call.

use std::time::Instant;

use glyphgrid_config::{AtlasConfig, CompositorConfig, Config};
use glyphgrid_fonts::{FontClass, FontManager, FontRole};

use crate::atlas::{AtlasParams, FontAtlasState, GlyphAtlas};
use crate::compositor::ColorResolver;
use crate::error::RenderError;
use crate::metrics::CellMetrics;
use crate::overlay::{ImeAnchor, OverlayState, Preedit};
use crate::snapshot::TerminalSnapshot;

/// Smallest atlas edge the builder accepts.
const MIN_ATLAS_SIZE: u32 = 64;

/// Font list, per-font atlases, cell geometry and transient overlay state.
///
/// One context drives one terminal view; it is mutated only by the thread
/// running `compose`.
pub struct RenderContext {
    pub(crate) config: Config,
    pub(crate) fonts: FontManager,
    /// One entry per font index
    pub(crate) atlases: Vec<FontAtlasState>,
    pub(crate) metrics: CellMetrics,
    pub(crate) colors: ColorResolver,
    pub(crate) scale_factor: f32,
    /// Link id under the pointer, 0 for none
    pub(crate) hovered_link: u32,
    /// Phase of the text and cursor blink timer
    pub(crate) blink_visible: bool,
    pub(crate) overlays: OverlayState,
}

impl RenderContext {
    /// Create a context around an already loaded font list.
    pub fn new(config: Config, fonts: FontManager, scale_factor: f32) -> Result<Self, RenderError> {
        validate_atlas(&config.atlas)?;
        let metrics = CellMetrics::from_face(fonts.primary().face.as_ref(), &config.font, scale_factor);
        log::info!(
            "Render context: {} fonts, cell {}x{} px, baseline {}",
            fonts.font_count(),
            metrics.cell_width,
            metrics.cell_height,
            metrics.baseline
        );
        let atlases = (0..fonts.font_count()).map(|_| FontAtlasState::new()).collect();
        Ok(Self {
            colors: ColorResolver::new(&config.compositor),
            overlays: OverlayState::new(&config.overlay),
            config,
            fonts,
            atlases,
            metrics,
            scale_factor,
            hovered_link: 0,
            blink_visible: true,
        })
    }

    /// Load the font list described by `config` and create a context.
    pub fn from_config(config: Config, scale_factor: f32) -> Result<Self, RenderError> {
        let fonts = FontManager::from_config(&config)?;
        Self::new(config, fonts, scale_factor)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontManager {
        &mut self.fonts
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Built atlas for `font_index`, if any glyph has been drawn with it.
    pub fn atlas(&self, font_index: usize) -> Option<&GlyphAtlas> {
        self.atlases.get(font_index).and_then(FontAtlasState::atlas)
    }

    pub fn atlas_state(&self, font_index: usize) -> Option<&FontAtlasState> {
        self.atlases.get(font_index)
    }

    /// Replace the whole font list; atlases and caches start over.
    pub fn replace_fonts(&mut self, fonts: FontManager) {
        self.metrics = CellMetrics::from_face(
            fonts.primary().face.as_ref(),
            &self.config.font,
            self.scale_factor,
        );
        self.atlases = (0..fonts.font_count()).map(|_| FontAtlasState::new()).collect();
        self.fonts = fonts;
    }

    /// Change the device scale factor; every atlas is rebuilt on next use.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor == self.scale_factor {
            return;
        }
        self.scale_factor = scale_factor;
        self.metrics = CellMetrics::from_face(
            self.fonts.primary().face.as_ref(),
            &self.config.font,
            scale_factor,
        );
        self.atlases.iter_mut().for_each(FontAtlasState::invalidate);
    }

    pub fn set_hovered_link(&mut self, link_id: Option<u32>) {
        self.hovered_link = link_id.unwrap_or(0);
    }

    pub fn set_blink_visible(&mut self, visible: bool) {
        self.blink_visible = visible;
    }

    /// Swap colors; cancels the resize indicator and any held synchronized-output window.
    pub fn set_theme(&mut self, compositor: CompositorConfig) {
        self.colors = ColorResolver::new(&compositor);
        self.config.compositor = compositor;
        self.overlays.resize.cancel();
        self.overlays.sync.cancel();
    }

    /// The grid was resized to `cols` x `rows`.
    pub fn resize(&mut self, cols: usize, rows: usize, now: Instant) {
        self.overlays.resize.show(cols, rows, now);
        self.overlays.sync.cancel();
    }

    pub fn set_preedit(&mut self, preedit: Option<Preedit>) {
        self.overlays.preedit = preedit.filter(|p| !p.text.is_empty());
    }

    pub fn preedit(&self) -> Option<&Preedit> {
        self.overlays.preedit.as_ref()
    }

    pub fn ime_anchor_at(&self, row: usize, col: usize) -> ImeAnchor {
        ImeAnchor::at(&self.metrics, row, col)
    }

    /// Whether a frame should be composed now, honouring synchronized output.
    pub fn frame_ready(&mut self, snapshot: &dyn TerminalSnapshot, now: Instant) -> bool {
        !self
            .overlays
            .sync
            .should_defer(snapshot.synchronized_output(), now)
    }

    /// Atlas build inputs for `font_index`.
    pub fn atlas_params(&self, font_index: usize) -> AtlasParams {
        let role = self.fonts.entry(font_index).map(|e| e.role);
        atlas_params(
            &self.metrics,
            &self.config.atlas,
            &self.fonts.class(font_index),
            role,
        )
    }

    /// Rebuild every atlas that gained glyphs this frame.
    pub(crate) fn rebuild_dirty_atlases(&mut self) -> usize {
        let mut rebuilt = 0;
        for (font_index, state) in self.atlases.iter_mut().enumerate() {
            if !state.is_dirty() {
                continue;
            }
            let Some(entry) = self.fonts.entry(font_index) else {
                continue;
            };
            let params = atlas_params(
                &self.metrics,
                &self.config.atlas,
                &entry.class,
                Some(entry.role),
            );
            if state.rebuild_if_dirty(entry.face.as_ref(), font_index, &params) {
                rebuilt += 1;
            }
        }
        rebuilt
    }
}

fn atlas_params(
    metrics: &CellMetrics,
    config: &AtlasConfig,
    class: &FontClass,
    role: Option<FontRole>,
) -> AtlasParams {
    // Fallback fonts may rasterize larger to stay crisp after upscaling
    let raster_scale = match role {
        Some(FontRole::Fallback) => class.raster_scale,
        _ => 1.0,
    };
    AtlasParams {
        size_px: metrics.font_size_px * raster_scale,
        cell: metrics.constraint_cell(),
        max_size: config.max_size,
        padding: config.padding,
    }
}

fn validate_atlas(config: &AtlasConfig) -> Result<(), RenderError> {
    if !config.max_size.is_power_of_two() || config.max_size < MIN_ATLAS_SIZE {
        return Err(RenderError::InvalidAtlasBounds(format!(
            "max size {} is not a power of two >= {MIN_ATLAS_SIZE}",
            config.max_size
        )));
    }
    Ok(())
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("fonts", &self.fonts.font_count())
            .field("metrics", &self.metrics)
            .field("scale_factor", &self.scale_factor)
            .finish_non_exhaustive()
    }
}
