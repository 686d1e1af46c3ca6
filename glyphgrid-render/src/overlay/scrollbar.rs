//! Scrollbar thumb geometry.

use glyphgrid_config::OverlayConfig;

use crate::instances::RectInstance;
use crate::snapshot::ScrollState;

/// Thumb rect along the right edge of a `grid_width` x `grid_height` area,
/// or `None` when everything fits on screen.
pub fn thumb_rect(
    state: ScrollState,
    grid_width: f32,
    grid_height: f32,
    config: &OverlayConfig,
) -> Option<RectInstance> {
    if state.total_lines <= state.visible_lines || grid_height <= 0.0 {
        return None;
    }
    let ratio = state.visible_lines as f32 / state.total_lines as f32;
    let height = (grid_height * ratio)
        .max(config.scrollbar_min_thumb)
        .min(grid_height);

    let max_offset = (state.total_lines - state.visible_lines) as f32;
    let offset = (state.offset as f32).min(max_offset);
    // Offset 0 is the live bottom of the scrollback
    let top = (grid_height - height) * (1.0 - offset / max_offset);

    Some(RectInstance::new(
        grid_width - config.scrollbar_width,
        top,
        config.scrollbar_width,
        height,
        config.scrollbar_thumb_color,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(offset: usize, visible: usize, total: usize) -> ScrollState {
        ScrollState {
            offset,
            visible_lines: visible,
            total_lines: total,
        }
    }

    #[test]
    fn no_thumb_without_scrollback() {
        let config = OverlayConfig::default();
        assert!(thumb_rect(state(0, 24, 24), 800.0, 480.0, &config).is_none());
    }

    #[test]
    fn thumb_tracks_offset() {
        let config = OverlayConfig::default();
        let bottom = thumb_rect(state(0, 24, 96), 800.0, 480.0, &config).expect("thumb");
        assert_eq!(bottom.size[1], 120.0);
        assert_eq!(bottom.bottom(), 480.0);
        assert_eq!(bottom.position[0], 800.0 - config.scrollbar_width);

        let top = thumb_rect(state(72, 24, 96), 800.0, 480.0, &config).expect("thumb");
        assert_eq!(top.position[1], 0.0);
    }

    #[test]
    fn thumb_has_minimum_height() {
        let config = OverlayConfig::default();
        let thumb = thumb_rect(state(0, 24, 100_000), 800.0, 480.0, &config).expect("thumb");
        assert_eq!(thumb.size[1], config.scrollbar_min_thumb);
    }
}
