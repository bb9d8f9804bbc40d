//! Vertex formats
//!
//! `GameVertex` is the record layout the game writes into its own memory.
//! `Vertex` is the normalized format handed to the backend in bulk.

use bytemuck::{Pod, Zeroable};
use glidebridge_shared::OffsetF;

const CHROMA_KEY_BIT: u16 = 0x8000;
const PALETTE_MASK: u16 = 0x7fff;

/// Normalized vertex (24 bytes, GPU-ready)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub s: i16,
    pub t: i16,
    /// Packed ARGB
    pub color: u32,
    pub texture_index: u16,
    /// Palette index in the low 15 bits, chroma key flag in the top bit
    pub palette_and_flags: u16,
    pub surface_id: u16,
    _pad: u16,
}

impl Vertex {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32,
        y: f32,
        s: i16,
        t: i16,
        color: u32,
        chroma_key: bool,
        texture_index: u16,
        palette_index: u16,
    ) -> Self {
        let mut v = Self {
            x,
            y,
            s,
            t,
            color,
            texture_index,
            ..Self::default()
        };
        v.set_palette_index(palette_index);
        v.set_chroma_key_enabled(chroma_key);
        v
    }

    #[inline]
    pub fn position(&self) -> OffsetF {
        OffsetF::new(self.x, self.y)
    }

    #[inline]
    pub fn set_position(&mut self, p: OffsetF) {
        self.x = p.x;
        self.y = p.y;
    }

    #[inline]
    pub fn add_offset(&mut self, d: OffsetF) {
        self.x += d.x;
        self.y += d.y;
    }

    #[inline]
    pub fn set_texcoord(&mut self, s: i16, t: i16) {
        self.s = s;
        self.t = t;
    }

    #[inline]
    pub fn palette_index(&self) -> u16 {
        self.palette_and_flags & PALETTE_MASK
    }

    #[inline]
    pub fn set_palette_index(&mut self, index: u16) {
        self.palette_and_flags = (self.palette_and_flags & CHROMA_KEY_BIT) | (index & PALETTE_MASK);
    }

    #[inline]
    pub fn is_chroma_key_enabled(&self) -> bool {
        self.palette_and_flags & CHROMA_KEY_BIT != 0
    }

    #[inline]
    pub fn set_chroma_key_enabled(&mut self, enabled: bool) {
        if enabled {
            self.palette_and_flags |= CHROMA_KEY_BIT;
        } else {
            self.palette_and_flags &= !CHROMA_KEY_BIT;
        }
    }

    #[inline]
    pub fn set_surface_id(&mut self, id: u16) {
        self.surface_id = id;
    }
}

/// Raw vertex record as laid out in game memory.
///
/// Layout matches the offsets the game declares: XY at 0, packed ARGB at 8,
/// ST0 at 16.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameVertex {
    pub x: f32,
    pub y: f32,
    pub color: u32,
    pub reserved: u32,
    pub s: f32,
    pub t: f32,
}

pub const GAME_VERTEX_STRIDE: usize = size_of::<GameVertex>();

impl GameVertex {
    pub fn new(x: f32, y: f32, color: u32, s: f32, t: f32) -> Self {
        Self {
            x,
            y,
            color,
            reserved: 0,
            s,
            t,
        }
    }

    /// Texture coordinate converted into atlas texels.
    ///
    /// The game addresses textures in a 256-texel space regardless of their
    /// size, so coordinates shift right by `st_shift`.
    #[inline]
    pub fn texcoord(&self, st_shift: u32) -> (i16, i16) {
        (
            ((self.s as i32) >> st_shift) as i16,
            ((self.t as i32) >> st_shift) as i16,
        )
    }
}

/// Shift mapping the game's 256-texel coordinate space to a texture of the given size.
pub fn st_shift_for(width: u32, height: u32) -> u32 {
    let large = width.max(height).max(1);
    8u32.saturating_sub(large.ilog2())
}
