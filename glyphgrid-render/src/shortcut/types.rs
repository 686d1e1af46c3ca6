//! Geometry shared by the shortcut drawers.

use crate::instances::RectInstance;

/// Pixel bounds of the cell a shortcut glyph is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A rectangle in normalized cell coordinates (0.0 = left/top, 1.0 = right/bottom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GeometricBlock {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn to_pixel_rect(self, cell: CellRect) -> PixelRect {
        PixelRect {
            x: cell.x + self.x * cell.width,
            y: cell.y + self.y * cell.height,
            width: self.width * cell.width,
            height: self.height * cell.height,
        }
    }
}

/// Rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    /// Round both edges to the pixel grid so adjacent blocks meet without
    /// seams; a non-empty rect keeps at least one pixel.
    pub fn snap_to_pixels(self) -> Self {
        let x0 = self.x.round();
        let y0 = self.y.round();
        let x1 = (self.x + self.width).round();
        let y1 = (self.y + self.height).round();
        Self {
            x: x0,
            y: y0,
            width: (x1 - x0).max(1.0),
            height: (y1 - y0).max(1.0),
        }
    }

    pub fn instance(self, color: [f32; 4]) -> RectInstance {
        RectInstance::new(self.x, self.y, self.width, self.height, color)
    }
}
