//! Icon constraints: declarative rules that fit symbol glyphs into cells.
//!
//! A constraint maps a glyph's natural pixel bounding box onto a target box
//! inside `constraint_width` cells. The atlas builder rasterizes the outline
//! through the resulting transform, so no bitmap resampling happens.

use glyphgrid_fonts::unicode::{is_nerd_font_icon, is_powerline};

/// How the glyph box is sized against the available cell box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSize {
    /// Shrink, preserving aspect ratio, until the glyph fits; never grow
    Fit,
    /// Scale, preserving aspect ratio, until the glyph touches both sides
    Cover,
    /// Fill the box on both axes
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    /// Keep the glyph's own offset from the baseline
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconConstraint {
    pub size: ConstraintSize,
    pub align: Align,
    pub valign: VAlign,
    /// Fraction of the box removed from every side
    pub padding: f32,
}

impl IconConstraint {
    /// Rule used when a glyph is force-fitted without a table entry.
    pub const FORCE_FIT: Self = Self {
        size: ConstraintSize::Fit,
        align: Align::Center,
        valign: VAlign::Center,
        padding: 0.0,
    };

    /// Target box for a glyph whose natural bounds are `glyph`, inside `cell`.
    ///
    /// Both boxes are `(x_min, y_min, x_max, y_max)` in y-up pixels relative
    /// to the pen position on the baseline.
    pub fn target_box(&self, glyph: [f32; 4], cell: [f32; 4]) -> [f32; 4] {
        let pad_x = (cell[2] - cell[0]) * self.padding;
        let pad_y = (cell[3] - cell[1]) * self.padding;
        let avail = [cell[0] + pad_x, cell[1] + pad_y, cell[2] - pad_x, cell[3] - pad_y];
        let avail_w = (avail[2] - avail[0]).max(0.0);
        let avail_h = (avail[3] - avail[1]).max(0.0);
        let glyph_w = (glyph[2] - glyph[0]).max(f32::EPSILON);
        let glyph_h = (glyph[3] - glyph[1]).max(f32::EPSILON);

        let (w, h) = match self.size {
            ConstraintSize::Fit => {
                let factor = (avail_w / glyph_w).min(avail_h / glyph_h).min(1.0);
                (glyph_w * factor, glyph_h * factor)
            }
            ConstraintSize::Cover => {
                let factor = (avail_w / glyph_w).min(avail_h / glyph_h);
                (glyph_w * factor, glyph_h * factor)
            }
            ConstraintSize::Stretch => (avail_w, avail_h),
        };

        let x0 = match self.align {
            Align::Start => avail[0],
            Align::Center => avail[0] + (avail_w - w) / 2.0,
            Align::End => avail[2] - w,
        };
        let y0 = match self.valign {
            VAlign::Bottom => avail[1],
            VAlign::Center => avail[1] + (avail_h - h) / 2.0,
            VAlign::Top => avail[3] - h,
            VAlign::Baseline => {
                // Scale about the baseline, then clamp into the box.
                let factor = h / glyph_h;
                (glyph[1] * factor).clamp(avail[1], (avail[3] - h).max(avail[1]))
            }
        };
        [x0, y0, x0 + w, y0 + h]
    }
}

/// Constraint rule for codepoints that always render through the icon path.
pub fn constraint_for(cp: u32) -> Option<IconConstraint> {
    if is_powerline(cp) {
        // Separators point into the neighbouring segment and hug that side.
        let align = if (cp - 0xE0B0) % 4 < 2 {
            Align::Start
        } else {
            Align::End
        };
        return Some(IconConstraint {
            size: ConstraintSize::Stretch,
            align,
            valign: VAlign::Center,
            padding: 0.0,
        });
    }
    if (0xE0C0..=0xE0D4).contains(&cp) {
        return Some(IconConstraint {
            size: ConstraintSize::Fit,
            align: Align::Start,
            valign: VAlign::Center,
            padding: 0.0,
        });
    }
    if is_nerd_font_icon(cp) {
        return Some(IconConstraint {
            size: ConstraintSize::Cover,
            align: Align::Center,
            valign: VAlign::Center,
            padding: 0.05,
        });
    }
    None
}
