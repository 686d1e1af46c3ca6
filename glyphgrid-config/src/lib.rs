//! Configuration system for the glyphgrid terminal rendering core.
//!
//! This crate provides configuration loading, saving, and default values
//! for the font fallback manager, glyph atlas builder, cell compositor and
//! overlay layer. It includes:
//!
//! - Font selection, fallback family and scale-override settings
//! - Pluggable label-based font classification rule tables
//! - Atlas, compositor, cursor and overlay tuning
//! - Color conversion helpers shared by the render crate

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::{
    AtlasConfig, CompositorConfig, Config, CursorConfig, FontConfig, OverlayConfig,
};
pub use error::ConfigError;
pub use types::{
    CursorStyle, FontClassRules, FontScaleRule, color_u8_to_f32, color_u8_to_f32_a,
    color_u8x4_to_f32, pack_rgba, unpack_rgba,
};
