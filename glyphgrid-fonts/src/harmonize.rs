//! Scale and baseline harmonization of fallback fonts.
//!
//! Fallback glyphs are scaled so their visual size approximates the primary
//! font, then shrunk if they would overflow the cells they occupy. Every
//! adjustment factor is clamped to `[MIN_FACTOR, MAX_FACTOR]`.

use crate::classify::FontClass;
use crate::face::FaceMetrics;

pub const MIN_FACTOR: f32 = 0.5;
pub const MAX_FACTOR: f32 = 2.0;

/// Metric used to match a fallback font to the primary font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMetric {
    IdeographicWidth,
    XHeight,
    CapHeight,
    LineHeight,
    /// No metric matching (natural-scale fonts)
    None,
}

/// The box a fallback glyph run must fit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBox {
    /// Cells the cluster occupies (1 or 2)
    pub cell_span: u8,
    /// Cell width in pixels
    pub cell_width: f32,
    /// Line height in pixels
    pub line_height: f32,
    /// Shaped advance of the run in the fallback's font units
    pub natural_advance: f32,
    /// Glyph height in font units; ascender + descender when unknown
    pub glyph_height: Option<f32>,
}

/// Result of harmonizing a fallback font for one glyph run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackScale {
    /// Pixels per font unit
    pub scale: f32,
    /// Vertical baseline shift in pixels; positive moves the glyph down
    pub baseline_offset: f32,
    pub anchor: AnchorMetric,
    pub metric_factor: f32,
    pub width_factor: f32,
    pub height_factor: f32,
}

impl FallbackScale {
    /// Scale for a glyph drawn with the primary font itself.
    pub fn primary(metrics: &FaceMetrics, size_px: f32) -> Self {
        Self {
            scale: size_px / metrics.units_per_em.max(1.0),
            baseline_offset: 0.0,
            anchor: AnchorMetric::None,
            metric_factor: 1.0,
            width_factor: 1.0,
            height_factor: 1.0,
        }
    }
}

fn clamp_factor(factor: f32) -> f32 {
    if factor.is_finite() && factor > 0.0 {
        factor.clamp(MIN_FACTOR, MAX_FACTOR)
    } else {
        1.0
    }
}

/// First metric present in both fonts, in rank order.
fn ranked_metric(primary: &FaceMetrics, fallback: &FaceMetrics) -> (AnchorMetric, f32, f32) {
    let candidates = [
        (
            AnchorMetric::IdeographicWidth,
            primary.ideographic_advance,
            fallback.ideographic_advance,
        ),
        (AnchorMetric::XHeight, primary.x_height, fallback.x_height),
        (AnchorMetric::CapHeight, primary.cap_height, fallback.cap_height),
    ];
    candidates
        .into_iter()
        .find_map(|(metric, p, f)| match (p, f) {
            (Some(p), Some(f)) if p > 0.0 && f > 0.0 => Some((metric, p, f)),
            _ => None,
        })
        .unwrap_or((
            AnchorMetric::LineHeight,
            primary.line_height(),
            fallback.line_height(),
        ))
}

/// Harmonize a fallback font against the primary font at `primary_size_px`.
pub fn harmonize_fallback(
    primary: &FaceMetrics,
    primary_size_px: f32,
    fallback: &FaceMetrics,
    class: &FontClass,
    fit: &FitBox,
) -> FallbackScale {
    let primary_scale = primary_size_px / primary.units_per_em.max(1.0);
    let base = primary_size_px / fallback.units_per_em.max(1.0) * class.scale_override;

    let (anchor, metric_factor) = if class.is_natural_scale() {
        (AnchorMetric::None, 1.0)
    } else {
        let (anchor, p, f) = ranked_metric(primary, fallback);
        (anchor, clamp_factor((p * primary_scale) / (f * base)))
    };
    let mut scale = base * metric_factor;

    let span = fit.cell_span.clamp(1, 2) as f32;
    let box_width = span * fit.cell_width;
    let advance_px = fit.natural_advance * scale;
    let width_factor = if advance_px > box_width && advance_px > 0.0 {
        clamp_factor(box_width / advance_px)
    } else {
        1.0
    };
    scale *= width_factor;

    let glyph_height = fit
        .glyph_height
        .unwrap_or(fallback.ascender + fallback.descender);
    let height_px = glyph_height * scale;
    let height_factor = if height_px > fit.line_height && height_px > 0.0 {
        clamp_factor(fit.line_height / height_px)
    } else {
        1.0
    };
    scale *= height_factor;

    let baseline_offset = match anchor {
        AnchorMetric::XHeight | AnchorMetric::CapHeight => {
            let (_, p, f) = ranked_metric(primary, fallback);
            f * scale - p * primary_scale
        }
        _ => fallback.ascender * scale - primary.ascender * primary_scale,
    };

    FallbackScale {
        scale,
        baseline_offset,
        anchor,
        metric_factor,
        width_factor,
        height_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(upem: f32, asc: f32, desc: f32, x: Option<f32>) -> FaceMetrics {
        FaceMetrics {
            units_per_em: upem,
            ascender: asc,
            descender: desc,
            line_gap: 0.0,
            x_height: x,
            cap_height: None,
            ideographic_advance: None,
        }
    }

    fn roomy() -> FitBox {
        FitBox {
            cell_span: 1,
            cell_width: 100.0,
            line_height: 100.0,
            natural_advance: 0.0,
            glyph_height: Some(0.0),
        }
    }

    #[test]
    fn x_height_matching() {
        let primary = metrics(1000.0, 800.0, 200.0, Some(500.0));
        let fallback = metrics(2048.0, 1600.0, 400.0, Some(800.0));
        let r = harmonize_fallback(&primary, 20.0, &fallback, &FontClass::default(), &roomy());
        assert_eq!(r.anchor, AnchorMetric::XHeight);
        // Fallback x-height in pixels matches the primary's 10px
        assert!((800.0 * r.scale - 10.0).abs() < 1e-3);
        // Anchors line up, so no baseline shift
        assert!(r.baseline_offset.abs() < 1e-3);
    }

    #[test]
    fn factors_are_clamped() {
        let primary = metrics(1000.0, 800.0, 200.0, Some(500.0));
        let tiny = metrics(1000.0, 800.0, 200.0, Some(50.0));
        let r = harmonize_fallback(&primary, 20.0, &tiny, &FontClass::default(), &roomy());
        assert_eq!(r.metric_factor, MAX_FACTOR);

        let wide = FitBox {
            cell_span: 1,
            cell_width: 10.0,
            line_height: 20.0,
            natural_advance: 10_000.0,
            glyph_height: None,
        };
        let r = harmonize_fallback(&primary, 20.0, &primary, &FontClass::default(), &wide);
        assert_eq!(r.width_factor, MIN_FACTOR);
    }

    #[test]
    fn natural_scale_fonts_skip_metric_matching() {
        let primary = metrics(1000.0, 800.0, 200.0, Some(500.0));
        let emoji = metrics(2048.0, 1900.0, 500.0, Some(100.0));
        let class = FontClass {
            color_emoji: true,
            ..FontClass::default()
        };
        let r = harmonize_fallback(&primary, 20.0, &emoji, &class, &roomy());
        assert_eq!(r.metric_factor, 1.0);
        assert_eq!(r.anchor, AnchorMetric::None);
    }

    #[test]
    fn height_overflow_shrinks() {
        let primary = metrics(1000.0, 800.0, 200.0, None);
        let tall = metrics(1000.0, 1200.0, 300.0, None);
        let fit = FitBox {
            cell_span: 2,
            cell_width: 10.0,
            line_height: 15.0,
            natural_advance: 0.0,
            glyph_height: None,
        };
        let r = harmonize_fallback(&primary, 20.0, &tall, &FontClass::default(), &fit);
        assert!(r.height_factor < 1.0);
        assert!(1500.0 * r.scale <= 15.0 + 1e-3);
    }
}
