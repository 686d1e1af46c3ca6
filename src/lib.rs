//! glyphgrid: the rendering core of a GPU terminal emulator.
//!
//! This facade re-exports the workspace crates so embedders can depend on a
//! single package:
//!
//! - [`config`]: YAML configuration with serde defaults
//! - [`fonts`]: font fallback list, classification, shaping and harmonization
//! - [`render`]: glyph atlases, the cell compositor and the overlay layer
//!
//! The `glyphgrid` binary wraps these in a small headless CLI.

pub mod cli;
pub mod debug;

pub use glyphgrid_config as config;
pub use glyphgrid_fonts as fonts;
pub use glyphgrid_render as render;

pub use glyphgrid_config::Config;
pub use glyphgrid_fonts::{FontFace, FontManager};
pub use glyphgrid_render::{Frame, GridSnapshot, RenderContext, TerminalSnapshot};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
