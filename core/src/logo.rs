//! Title screen watermark
//!
//! A small palettized badge drawn in the bottom-right corner of the title
//! screen. It lives in the side TMU arena and its own palette slot so it
//! never competes with game textures.

use glidebridge_shared::{LOGO_PALETTE_INDEX, SURFACE_ID_USER_INTERFACE, Size};
use xxhash_rust::xxh3::xxh3_64;

use crate::batch::{AlphaBlend, Batch, RgbCombine, TextureCategory};
use crate::palette::{Palette, with_opaque_alpha};
use crate::vertex::Vertex;

pub const LOGO_WIDTH: usize = 80;
pub const LOGO_HEIGHT: usize = 41;
/// Edge of the square texture the badge is stored in
pub const LOGO_TEXTURE_SIZE: usize = 128;

const LOGO_COLOR: u32 = 0xffff_a090;
const BORDER: usize = 2;

/// Badge pixels, row-major, `LOGO_WIDTH * LOGO_HEIGHT` palette indices.
///
/// Index 0 is transparent under chroma keying; the frame uses the top of the
/// ramp and the interior a diagonal gradient.
pub fn logo_pixels() -> Vec<u8> {
    let mut pixels = vec![0u8; LOGO_WIDTH * LOGO_HEIGHT];
    for y in 0..LOGO_HEIGHT {
        for x in 0..LOGO_WIDTH {
            let on_frame = x < BORDER || y < BORDER || x >= LOGO_WIDTH - BORDER || y >= LOGO_HEIGHT - BORDER;
            let corner = (x < BORDER || x >= LOGO_WIDTH - BORDER) && (y < BORDER || y >= LOGO_HEIGHT - BORDER);
            pixels[y * LOGO_WIDTH + x] = if corner {
                0
            } else if on_frame {
                255
            } else {
                (64 + (x + y) * 96 / (LOGO_WIDTH + LOGO_HEIGHT)) as u8
            };
        }
    }
    pixels
}

/// Grayscale ramp with opaque alpha
pub fn logo_palette() -> Palette {
    let ramp: Palette = std::array::from_fn(|i| {
        let c = i as u32;
        (c << 16) | (c << 8) | c
    });
    with_opaque_alpha(&ramp)
}

/// Copy the badge into the top-left corner of a square texture
pub fn write_logo_texture(side_tmu: &mut [u8]) {
    let pixels = logo_pixels();
    for (row, src) in pixels.chunks_exact(LOGO_WIDTH).enumerate() {
        let start = row * LOGO_TEXTURE_SIZE;
        if let Some(dst) = side_tmu.get_mut(start..start + LOGO_WIDTH) {
            dst.copy_from_slice(src);
        }
    }
}

/// Batch state for the badge; the location is filled in per frame
pub fn logo_batch() -> Batch {
    Batch {
        texture_start_address: 0,
        texture_hash: xxh3_64(&logo_pixels()),
        texture_width: LOGO_TEXTURE_SIZE as u16,
        texture_height: LOGO_TEXTURE_SIZE as u16,
        palette_index: LOGO_PALETTE_INDEX as u16,
        rgb_combine: RgbCombine::ColorMultipliedByTexture,
        alpha_blend: AlphaBlend::SrcAlphaInvSrcAlpha,
        chroma_key: true,
        category: TextureCategory::TitleScreen,
        ..Default::default()
    }
}

/// Two triangles placing the badge at the bottom-right of the game area
pub fn logo_quad(game_size: Size, texture_index: u16) -> [Vertex; 6] {
    let x1 = (game_size.width - 106) as f32;
    let x2 = (game_size.width - 26) as f32;
    let y1 = (game_size.height - 66) as f32;
    let y2 = (game_size.height - 25) as f32;

    let corner = |x: f32, y: f32, s: i16, t: i16| {
        let mut v = Vertex::new(x, y, s, t, LOGO_COLOR, true, texture_index, LOGO_PALETTE_INDEX as u16);
        v.set_surface_id(SURFACE_ID_USER_INTERFACE);
        v
    };

    let w = LOGO_WIDTH as i16;
    let h = LOGO_HEIGHT as i16;
    let v0 = corner(x1, y1, 0, 0);
    let v1 = corner(x2, y1, w, 0);
    let v2 = corner(x2, y2, w, h);
    let v3 = corner(x1, y2, 0, h);

    [v0, v1, v2, v0, v2, v3]
}
