//! Range checks applied after parsing.

use super::Config;
use crate::error::ConfigError;

impl Config {
    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let font = &self.font;
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "font.size must be positive, got {}",
                font.size
            )));
        }
        if font.family.trim().is_empty() {
            return Err(ConfigError::Validation(
                "font.family must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("font.line_spacing", font.line_spacing),
            ("font.char_spacing", font.char_spacing),
            ("atlas.symbol_atlas_scale", self.atlas.symbol_atlas_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        for rule in &font.font_scale_overrides {
            if !(rule.scale.is_finite() && rule.scale > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "font_scale_overrides: scale for {:?} must be positive",
                    rule.pattern
                )));
            }
            check_pattern(&rule.pattern)?;
        }
        for (table, pattern) in font.font_classes.patterns() {
            check_pattern(pattern).map_err(|e| {
                ConfigError::Validation(format!("font_classes.{table}: {e}"))
            })?;
        }

        let atlas = &self.atlas;
        if !atlas.max_size.is_power_of_two() || atlas.max_size < 64 {
            return Err(ConfigError::Validation(format!(
                "atlas.max_size must be a power of two >= 64, got {}",
                atlas.max_size
            )));
        }
        if atlas.padding > 16 {
            return Err(ConfigError::Validation(format!(
                "atlas.padding must be at most 16, got {}",
                atlas.padding
            )));
        }

        let comp = &self.compositor;
        if comp.cluster_merge_limit == 0 {
            return Err(ConfigError::Validation(
                "compositor.cluster_merge_limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&comp.faint_alpha) {
            return Err(ConfigError::Validation(format!(
                "compositor.faint_alpha must be within 0..=1, got {}",
                comp.faint_alpha
            )));
        }
        if comp.force_fit_tolerance.is_nan() || comp.force_fit_tolerance < 0.0 {
            return Err(ConfigError::Validation(
                "compositor.force_fit_tolerance must not be negative".to_string(),
            ));
        }
        if !(1.0..=21.0).contains(&comp.minimum_contrast) {
            return Err(ConfigError::Validation(format!(
                "compositor.minimum_contrast must be within 1..=21, got {}",
                comp.minimum_contrast
            )));
        }
        if comp.palette.len() != 16 {
            return Err(ConfigError::Validation(format!(
                "compositor.palette must have 16 entries, got {}",
                comp.palette.len()
            )));
        }

        if self.overlay.sync_output_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "overlay.sync_output_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_pattern(pattern: &str) -> Result<(), ConfigError> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("invalid pattern {pattern:?}: {e}")))
}
