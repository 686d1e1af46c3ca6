use serde::{Deserialize, Serialize};

/// Cursor shape drawn by the cursor pass.
///
/// `Default` follows the terminal's initial shape, which is a filled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    /// Terminal default shape
    #[default]
    Default,
    /// Filled cell; the glyph underneath takes the cell background color
    Block,
    /// Thin vertical bar at the left edge of the cell
    Bar,
    /// Thin horizontal bar at the bottom of the cell
    Underline,
    /// Outline of the cell (used for unfocused windows)
    Hollow,
}

impl CursorStyle {
    /// Whether this shape fills the whole cell.
    pub fn is_filled_block(self) -> bool {
        matches!(self, CursorStyle::Block | CursorStyle::Default)
    }

    /// Map a DECSCUSR parameter to a shape. Blink is tracked separately.
    pub fn from_decscusr(param: u8) -> Self {
        match param {
            0 => CursorStyle::Default,
            1 | 2 => CursorStyle::Block,
            3 | 4 => CursorStyle::Underline,
            5 | 6 => CursorStyle::Bar,
            _ => CursorStyle::Default,
        }
    }
}
