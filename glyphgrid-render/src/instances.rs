//! Per-frame instance buffers handed to the GPU backend.
//!
//! Positions are device pixels with the origin at the top-left of the grid.
//! Every buffer is rebuilt from scratch each frame.

use bytemuck::{Pod, Zeroable};

/// A solid rectangle (background, decoration, cursor, shortcut or overlay).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            size: [width, height],
            color,
        }
    }

    pub fn right(&self) -> f32 {
        self.position[0] + self.size[0]
    }

    pub fn bottom(&self) -> f32 {
        self.position[1] + self.size[1]
    }
}

/// A textured glyph quad sampling one font's atlas.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Normalised atlas offset
    pub tex_offset: [f32; 2],
    /// Normalised atlas extent
    pub tex_size: [f32; 2],
    pub color: [f32; 4],
    /// 1 when the atlas texel already carries color
    pub is_colored: u32,
}

/// Rectangle layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Selection,
    Cursor,
    Underline,
    Shortcut,
    Overlay,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Background,
        Layer::Selection,
        Layer::Cursor,
        Layer::Underline,
        Layer::Shortcut,
        Layer::Overlay,
    ];
}

/// All instance buffers of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInstances {
    pub background: Vec<RectInstance>,
    pub selection: Vec<RectInstance>,
    pub cursor: Vec<RectInstance>,
    pub underline: Vec<RectInstance>,
    pub shortcuts: Vec<RectInstance>,
    pub overlay: Vec<RectInstance>,
    /// Glyph quads indexed by font index
    pub glyphs: Vec<Vec<GlyphInstance>>,
}

impl FrameInstances {
    pub fn new(font_count: usize) -> Self {
        Self {
            glyphs: vec![Vec::new(); font_count],
            ..Self::default()
        }
    }

    pub fn layer(&self, layer: Layer) -> &[RectInstance] {
        match layer {
            Layer::Background => &self.background,
            Layer::Selection => &self.selection,
            Layer::Cursor => &self.cursor,
            Layer::Underline => &self.underline,
            Layer::Shortcut => &self.shortcuts,
            Layer::Overlay => &self.overlay,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Vec<RectInstance> {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Selection => &mut self.selection,
            Layer::Cursor => &mut self.cursor,
            Layer::Underline => &mut self.underline,
            Layer::Shortcut => &mut self.shortcuts,
            Layer::Overlay => &mut self.overlay,
        }
    }

    /// A rect layer as a flat float array (8 floats per instance).
    pub fn layer_floats(&self, layer: Layer) -> &[f32] {
        bytemuck::cast_slice(self.layer(layer))
    }

    pub fn glyphs_for(&self, font_index: usize) -> &[GlyphInstance] {
        self.glyphs.get(font_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw bytes of one font's glyph buffer, ready for upload.
    pub fn glyph_bytes(&self, font_index: usize) -> &[u8] {
        bytemuck::cast_slice(self.glyphs_for(font_index))
    }

    pub fn rect_count(&self) -> usize {
        Layer::ALL.iter().map(|&l| self.layer(l).len()).sum()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.iter().map(Vec::len).sum()
    }
}

/// Instance counts logged once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub background: usize,
    pub selection: usize,
    pub cursor: usize,
    pub underline: usize,
    pub shortcuts: usize,
    pub overlay: usize,
    pub glyphs: usize,
    /// Fonts with at least one glyph instance
    pub active_fonts: usize,
    pub clusters: usize,
    pub atlas_rebuilds: usize,
}

impl FrameSummary {
    pub fn from_instances(instances: &FrameInstances, clusters: usize, atlas_rebuilds: usize) -> Self {
        Self {
            background: instances.background.len(),
            selection: instances.selection.len(),
            cursor: instances.cursor.len(),
            underline: instances.underline.len(),
            shortcuts: instances.shortcuts.len(),
            overlay: instances.overlay.len(),
            glyphs: instances.glyph_count(),
            active_fonts: instances.glyphs.iter().filter(|g| !g.is_empty()).count(),
            clusters,
            atlas_rebuilds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_layers_flatten_to_eight_floats() {
        let mut frame = FrameInstances::new(2);
        frame
            .background
            .push(RectInstance::new(1.0, 2.0, 3.0, 4.0, [0.5, 0.5, 0.5, 1.0]));
        assert_eq!(
            frame.layer_floats(Layer::Background),
            &[1.0, 2.0, 3.0, 4.0, 0.5, 0.5, 0.5, 1.0]
        );
        assert!(frame.layer_floats(Layer::Overlay).is_empty());
    }

    #[test]
    fn glyph_instances_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 52);
        let frame = FrameInstances::new(1);
        assert!(frame.glyph_bytes(0).is_empty());
        assert!(frame.glyph_bytes(5).is_empty());
    }
}
