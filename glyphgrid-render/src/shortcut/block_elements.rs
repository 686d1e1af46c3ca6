//! Block elements (U+2580–U+259F).

use super::types::GeometricBlock;

const UPPER_LEFT: GeometricBlock = GeometricBlock::new(0.0, 0.0, 0.5, 0.5);
const UPPER_RIGHT: GeometricBlock = GeometricBlock::new(0.5, 0.0, 0.5, 0.5);
const LOWER_LEFT: GeometricBlock = GeometricBlock::new(0.0, 0.5, 0.5, 0.5);
const LOWER_RIGHT: GeometricBlock = GeometricBlock::new(0.5, 0.5, 0.5, 0.5);

/// Rectangles making up a block element, `None` for codepoints outside the block.
pub fn block_element_rects(cp: u32) -> Option<Vec<GeometricBlock>> {
    let single = |b: GeometricBlock| Some(vec![b]);
    match cp {
        0x2580 => single(GeometricBlock::new(0.0, 0.0, 1.0, 0.5)),
        // Lower one eighth .. lower seven eighths, then the full block
        0x2581..=0x2588 => {
            let eighths = (cp - 0x2580) as f32 / 8.0;
            single(GeometricBlock::new(0.0, 1.0 - eighths, 1.0, eighths))
        }
        // Left seven eighths .. left one eighth
        0x2589..=0x258F => {
            let eighths = (0x2590 - cp) as f32 / 8.0;
            single(GeometricBlock::new(0.0, 0.0, eighths, 1.0))
        }
        0x2590 => single(GeometricBlock::new(0.5, 0.0, 0.5, 1.0)),
        // Shades are drawn as a translucent full block by the caller
        0x2591..=0x2593 => single(GeometricBlock::full()),
        0x2594 => single(GeometricBlock::new(0.0, 0.0, 1.0, 0.125)),
        0x2595 => single(GeometricBlock::new(0.875, 0.0, 0.125, 1.0)),
        0x2596 => single(LOWER_LEFT),
        0x2597 => single(LOWER_RIGHT),
        0x2598 => single(UPPER_LEFT),
        0x2599 => Some(vec![UPPER_LEFT, LOWER_LEFT, LOWER_RIGHT]),
        0x259A => Some(vec![UPPER_LEFT, LOWER_RIGHT]),
        0x259B => Some(vec![UPPER_LEFT, UPPER_RIGHT, LOWER_LEFT]),
        0x259C => Some(vec![UPPER_LEFT, UPPER_RIGHT, LOWER_RIGHT]),
        0x259D => single(UPPER_RIGHT),
        0x259E => Some(vec![UPPER_RIGHT, LOWER_LEFT]),
        0x259F => Some(vec![UPPER_RIGHT, LOWER_LEFT, LOWER_RIGHT]),
        _ => None,
    }
}

/// Alpha multiplier for the shade characters.
pub fn shade_alpha(cp: u32) -> f32 {
    match cp {
        0x2591 => 0.25,
        0x2592 => 0.5,
        0x2593 => 0.75,
        _ => 1.0,
    }
}
