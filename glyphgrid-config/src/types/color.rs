//! Color conversion helper functions.
//!
//! Terminal snapshots carry colors as packed `0xRRGGBBAA` values. A packed
//! value with a zero alpha channel denotes "use the theme default".

/// Convert a `[u8; 3]` RGB color to `[f32; 3]` normalized to 0.0..1.0.
#[inline]
pub fn color_u8_to_f32(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

/// Convert a `[u8; 3]` RGB color to `[f32; 4]` normalized to 0.0..1.0 with
/// the given alpha value appended.
#[inline]
pub fn color_u8_to_f32_a(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}

/// Convert a `[u8; 4]` RGBA color to `[f32; 4]` normalized to 0.0..1.0.
#[inline]
pub fn color_u8x4_to_f32(rgba: [u8; 4]) -> [f32; 4] {
    [
        rgba[0] as f32 / 255.0,
        rgba[1] as f32 / 255.0,
        rgba[2] as f32 / 255.0,
        rgba[3] as f32 / 255.0,
    ]
}

/// Split a packed `0xRRGGBBAA` value into its four channels.
#[inline]
pub fn unpack_rgba(packed: u32) -> [u8; 4] {
    packed.to_be_bytes()
}

/// Pack four channels into a `0xRRGGBBAA` value.
#[inline]
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_be_bytes(rgba)
}
