//! Configuration value types shared across the workspace.

mod color;
mod cursor;
mod font;

pub use color::{color_u8_to_f32, color_u8_to_f32_a, color_u8x4_to_f32, pack_rgba, unpack_rgba};
pub use cursor::CursorStyle;
pub use font::{FontClassRules, FontScaleRule};
