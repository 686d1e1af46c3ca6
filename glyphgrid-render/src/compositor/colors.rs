//! Cell color resolution.
//!
//! Packed colors are decoded once per distinct value and cached. Style
//! transforms apply in a fixed order: inverse video, bold-brighten, faint.

use std::collections::HashMap;

use glyphgrid_config::{CompositorConfig, color_u8x4_to_f32, pack_rgba, unpack_rgba};

use crate::snapshot::CellFlags;

/// Luminance below which a background counts as dark.
const DARK_BACKGROUND_THRESHOLD: f32 = 0.5;

/// Colors of one cell after all style transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedColors {
    pub fg: [f32; 4],
    pub bg: [f32; 4],
    pub underline: [f32; 4],
    /// Background differs from the theme default and needs a rect
    pub paint_bg: bool,
}

/// Decodes packed cell colors and applies style transforms.
#[derive(Debug, Clone)]
pub struct ColorResolver {
    cache: HashMap<u32, [f32; 4]>,
    default_fg: u32,
    default_bg: u32,
    /// The 16 ANSI colors, packed with full alpha
    palette: Vec<u32>,
    bold_is_bright: bool,
    faint_alpha: f32,
    selection_bg: [f32; 4],
    selection_fg: Option<[f32; 4]>,
    minimum_contrast: f32,
}

fn pack_rgb(rgb: [u8; 3]) -> u32 {
    pack_rgba([rgb[0], rgb[1], rgb[2], 255])
}

fn is_default(packed: u32) -> bool {
    packed & 0xFF == 0
}

impl ColorResolver {
    pub fn new(config: &CompositorConfig) -> Self {
        Self {
            cache: HashMap::new(),
            default_fg: pack_rgb(config.default_fg),
            default_bg: pack_rgb(config.default_bg),
            palette: config.palette.iter().map(|&c| pack_rgb(c)).collect(),
            bold_is_bright: config.bold_is_bright,
            faint_alpha: config.faint_alpha,
            selection_bg: color_u8x4_to_f32(unpack_rgba(pack_rgb(config.selection_bg))),
            selection_fg: config
                .selection_fg
                .map(|c| color_u8x4_to_f32(unpack_rgba(pack_rgb(c)))),
            minimum_contrast: config.minimum_contrast,
        }
    }

    /// Decode a packed `0xRRGGBBAA` value.
    pub fn decode(&mut self, packed: u32) -> [f32; 4] {
        *self
            .cache
            .entry(packed)
            .or_insert_with(|| color_u8x4_to_f32(unpack_rgba(packed)))
    }

    pub fn default_fg(&mut self) -> [f32; 4] {
        self.decode(self.default_fg)
    }

    pub fn default_bg(&mut self) -> [f32; 4] {
        self.decode(self.default_bg)
    }

    pub fn selection_bg(&self) -> [f32; 4] {
        self.selection_bg
    }

    /// Number of distinct packed values decoded so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a cell's colors.
    pub fn resolve(
        &mut self,
        fg: u32,
        bg: u32,
        underline: u32,
        flags: CellFlags,
        selected: bool,
    ) -> ResolvedColors {
        let mut fg_packed = if is_default(fg) { self.default_fg } else { fg };
        let mut bg_packed = if is_default(bg) { self.default_bg } else { bg };
        let mut paint_bg = !is_default(bg);

        if flags.contains(CellFlags::INVERSE) {
            std::mem::swap(&mut fg_packed, &mut bg_packed);
            paint_bg = true;
        }

        if self.bold_is_bright && flags.contains(CellFlags::BOLD) {
            let rgb = fg_packed >> 8;
            if let Some(i) = self.palette.iter().take(8).position(|&p| p >> 8 == rgb) {
                if let Some(&bright) = self.palette.get(i + 8) {
                    fg_packed = bright;
                }
            }
        }

        let mut fg = self.decode(fg_packed);
        if flags.contains(CellFlags::FAINT) {
            fg[3] *= self.faint_alpha;
        }

        let mut bg = self.decode(bg_packed);
        if selected {
            bg = self.selection_bg;
            if let Some(sel_fg) = self.selection_fg {
                fg = [sel_fg[0], sel_fg[1], sel_fg[2], fg[3]];
            }
        }

        let underline = if is_default(underline) {
            fg
        } else {
            self.decode(underline)
        };
        let fg = ensure_minimum_contrast(fg, bg, self.minimum_contrast);

        ResolvedColors {
            fg,
            bg,
            underline,
            paint_bg,
        }
    }
}

fn luminance(color: [f32; 4]) -> f32 {
    let r = color[0].powf(2.2);
    let g = color[1].powf(2.2);
    let b = color[2].powf(2.2);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn contrast_ratio(l1: f32, l2: f32) -> f32 {
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

fn mix(fg: [f32; 4], amount: f32, toward_white: bool) -> [f32; 4] {
    if toward_white {
        [
            fg[0] + (1.0 - fg[0]) * amount,
            fg[1] + (1.0 - fg[1]) * amount,
            fg[2] + (1.0 - fg[2]) * amount,
            fg[3],
        ]
    } else {
        [
            fg[0] * (1.0 - amount),
            fg[1] * (1.0 - amount),
            fg[2] * (1.0 - amount),
            fg[3],
        ]
    }
}

/// Push `fg` toward white (dark `bg`) or black (light `bg`) until the WCAG
/// contrast ratio reaches `minimum`. A minimum of 1.0 or less disables this.
pub fn ensure_minimum_contrast(fg: [f32; 4], bg: [f32; 4], minimum: f32) -> [f32; 4] {
    if minimum <= 1.0 {
        return fg;
    }
    let bg_lum = luminance(bg);
    if contrast_ratio(luminance(fg), bg_lum) >= minimum {
        return fg;
    }

    let toward_white = bg_lum < DARK_BACKGROUND_THRESHOLD;
    let mut low = 0.0f32;
    let mut high = 1.0f32;
    // 20 halvings is below one 8-bit color step
    for _ in 0..20 {
        let mid = (low + high) / 2.0;
        if contrast_ratio(luminance(mix(fg, mid, toward_white)), bg_lum) >= minimum {
            high = mid;
        } else {
            low = mid;
        }
    }
    mix(fg, high, toward_white)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ColorResolver {
        ColorResolver::new(&CompositorConfig::default())
    }

    #[test]
    fn default_colors_do_not_paint_background() {
        let mut r = resolver();
        let c = r.resolve(0, 0, 0, CellFlags::empty(), false);
        assert!(!c.paint_bg);
        assert_eq!(c.fg, r.default_fg());
        assert_eq!(c.underline, c.fg);
    }

    #[test]
    fn inverse_swaps_and_paints() {
        let mut r = resolver();
        let c = r.resolve(0xFF0000FF, 0, 0, CellFlags::INVERSE, false);
        assert!(c.paint_bg);
        assert_eq!(c.bg, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.fg, r.default_bg());
    }

    #[test]
    fn bold_brightens_base_palette_colors() {
        let config = CompositorConfig::default();
        let red = pack_rgb(config.palette[1]);
        let bright_red = color_u8x4_to_f32(unpack_rgba(pack_rgb(config.palette[9])));
        let mut r = ColorResolver::new(&config);
        assert_eq!(r.resolve(red, 0, 0, CellFlags::BOLD, false).fg, bright_red);
        // Truecolor values are left alone
        let custom = r.resolve(0x123456FF, 0, 0, CellFlags::BOLD, false);
        assert_eq!(custom.fg, color_u8x4_to_f32([0x12, 0x34, 0x56, 0xFF]));
    }

    #[test]
    fn faint_applies_after_inverse() {
        let mut r = resolver();
        let c = r.resolve(0, 0x00FF00FF, 0, CellFlags::INVERSE | CellFlags::FAINT, false);
        assert_eq!(c.fg, [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn decoded_values_are_cached() {
        let mut r = resolver();
        for _ in 0..10 {
            r.resolve(0x112233FF, 0x445566FF, 0, CellFlags::empty(), false);
        }
        // default fg, default bg and the two explicit colors
        assert!(r.cache_len() <= 4);
    }

    #[test]
    fn selection_overrides_background() {
        let mut config = CompositorConfig::default();
        config.selection_fg = Some([255, 255, 255]);
        let mut r = ColorResolver::new(&config);
        let c = r.resolve(0, 0, 0, CellFlags::empty(), true);
        assert_eq!(c.bg, r.selection_bg());
        assert_eq!(c.fg, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn minimum_contrast_lightens_on_dark_background() {
        let fg = [0.2, 0.2, 0.2, 1.0];
        let bg = [0.0, 0.0, 0.0, 1.0];
        let adjusted = ensure_minimum_contrast(fg, bg, 4.5);
        assert!(adjusted[0] > fg[0]);
        let ratio = contrast_ratio(luminance(adjusted), luminance(bg));
        assert!(ratio >= 4.5 - 1e-3, "ratio {ratio}");
        assert_eq!(ensure_minimum_contrast(fg, bg, 1.0), fg);
    }
}
