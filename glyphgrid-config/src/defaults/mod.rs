//! Default values used by `#[serde(default = ...)]` attributes.

mod colors;
mod font;
mod render;

pub use colors::*;
pub use font::*;
pub use render::*;
