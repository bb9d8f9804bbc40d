//! Vertex assembly from raw game records
//!
//! Combiner state is folded into a template vertex plus two color masks. The
//! derivation is cached and only redone after a state change marks it dirty.

use glidebridge_shared::WHITE_PALETTE_INDEX;

use crate::batch::{AlphaBlend, Batch, RgbCombine};
use crate::vertex::{GameVertex, Vertex};

#[derive(Debug, Clone)]
pub struct VertexAssembler {
    template: Vertex,
    iterated_color_mask: u32,
    masked_constant_color: u32,
    /// Texture and palette the template was built for
    key: (u16, u16),
    dirty: bool,
}

impl Default for VertexAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexAssembler {
    pub fn new() -> Self {
        Self {
            template: Vertex::default(),
            iterated_color_mask: 0,
            masked_constant_color: 0,
            key: (0, 0),
            dirty: true,
        }
    }

    /// Force the next [`prepare`](Self::prepare) to rebuild
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the template and masks for `batch` if state changed
    pub fn prepare(&mut self, batch: &Batch, constant_color: u32) {
        let texture_index = batch.location.map_or(0, |l| l.index as u16);
        let key = (texture_index, batch.palette_index);
        if !self.dirty && key == self.key {
            return;
        }

        let iterated = batch.rgb_combine == RgbCombine::ColorMultipliedByTexture;
        let palette_index = if iterated {
            batch.palette_index
        } else {
            WHITE_PALETTE_INDEX as u16
        };

        self.template = Vertex::new(0.0, 0.0, 0, 0, 0, batch.chroma_key, texture_index, palette_index);

        let constant_mask = if iterated { 0xff00_0000 } else { 0xffff_ffff };
        self.iterated_color_mask = if iterated { 0x00ff_ffff } else { 0 };

        let forced_alpha = if batch.alpha_blend != AlphaBlend::SrcAlphaInvSrcAlpha {
            0xff00_0000
        } else {
            0
        };
        self.masked_constant_color = constant_mask & (constant_color | forced_alpha);

        self.key = key;
        self.dirty = false;
    }

    /// Template vertex carrying the batch's per-vertex state
    #[inline]
    pub fn template(&self) -> Vertex {
        self.template
    }

    #[inline]
    pub fn color(&self, vertex_color: u32) -> u32 {
        self.masked_constant_color | (vertex_color & self.iterated_color_mask)
    }

    /// Normalize one game vertex
    #[inline]
    pub fn assemble(&self, gv: &GameVertex, st_shift: u32) -> Vertex {
        let mut v = self.template;
        v.x = gv.x;
        v.y = gv.y;
        let (s, t) = gv.texcoord(st_shift);
        v.set_texcoord(s, t);
        v.color = self.color(gv.color);
        v
    }
}
