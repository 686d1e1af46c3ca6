//! Default values for color settings.

pub fn foreground() -> [u8; 3] {
    [220, 220, 220]
}

pub fn background() -> [u8; 3] {
    [24, 24, 24]
}

pub fn selection_background() -> [u8; 3] {
    [68, 90, 130]
}

pub fn cursor_color() -> [u8; 3] {
    [255, 255, 255] // White cursor
}

pub fn scrollbar_thumb_color() -> [f32; 4] {
    [0.4, 0.4, 0.4, 0.95] // Medium gray, nearly opaque
}

pub fn preedit_background() -> [f32; 4] {
    [0.15, 0.15, 0.15, 0.95]
}

pub fn preedit_underline() -> [f32; 4] {
    [0.9, 0.9, 0.9, 1.0]
}
