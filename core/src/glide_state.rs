//! Process-wide render state mirroring the API's implicit globals

use tracing::warn;

use glidebridge_shared::{
    GAMMA_TABLE_ENTRIES, MAX_GAME_PALETTES, SIDE_TMU_MEMORY_SIZE, TMU_ADDRESS_ALIGNMENT,
    TMU_MEMORY_SIZE,
};

use crate::error::{CoreError, CoreResult};
use crate::glide;
use crate::palette::PaletteTable;

/// Arena sizes, overridable so tests can run with small allocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub tmu_memory: usize,
    pub max_vertices: usize,
    pub max_batches: usize,
    pub max_palettes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            tmu_memory: TMU_MEMORY_SIZE,
            max_vertices: glidebridge_shared::MAX_VERTICES_PER_FRAME,
            max_batches: glidebridge_shared::MAX_BATCHES_PER_FRAME,
            max_palettes: MAX_GAME_PALETTES,
        }
    }
}

#[derive(Debug)]
pub struct GlideState {
    tmu_memory: Vec<u8>,
    /// Separate arena for textures the engine injects itself
    side_tmu_memory: Vec<u8>,
    pub palettes: PaletteTable,
    gamma_table: [u32; GAMMA_TABLE_ENTRIES],
    /// ARGB, converted from the API's RGBA on write
    pub constant_color: u32,
    /// Texture coordinate shift for the sourced texture
    pub st_shift: u32,
}

impl GlideState {
    pub fn new(limits: &Limits) -> Self {
        Self {
            tmu_memory: vec![0; limits.tmu_memory],
            side_tmu_memory: vec![0; SIDE_TMU_MEMORY_SIZE],
            palettes: PaletteTable::new(limits.max_palettes),
            gamma_table: [0; GAMMA_TABLE_ENTRIES],
            constant_color: 0,
            st_shift: 0,
        }
    }

    fn check_address(tmu: u32, start_address: u32) -> CoreResult<()> {
        if tmu != 0 {
            return Err(CoreError::UnsupportedTmu(tmu));
        }
        if start_address % TMU_ADDRESS_ALIGNMENT != 0 {
            return Err(CoreError::MisalignedTextureAddress(start_address));
        }
        Ok(())
    }

    fn range(&self, start_address: u32, len: usize) -> CoreResult<std::ops::Range<usize>> {
        let start = start_address as usize;
        let end = start.checked_add(len).filter(|&end| end <= self.tmu_memory.len());
        end.map(|end| start..end)
            .ok_or(CoreError::TextureOutOfBounds {
                address: start_address,
                len,
                capacity: self.tmu_memory.len(),
            })
    }

    /// Copy downloaded pixels into TMU memory
    pub fn download_texture(&mut self, tmu: u32, start_address: u32, pixels: &[u8]) -> CoreResult<()> {
        Self::check_address(tmu, start_address)?;
        let range = self.range(start_address, pixels.len())?;
        self.tmu_memory[range].copy_from_slice(pixels);
        Ok(())
    }

    /// Validate a texture source declaration and return its pixel range
    pub fn source_range(
        &self,
        tmu: u32,
        start_address: u32,
        width: u32,
        height: u32,
    ) -> CoreResult<std::ops::Range<usize>> {
        Self::check_address(tmu, start_address)?;
        self.range(start_address, (width * height) as usize)
    }

    pub fn tmu_memory(&self) -> &[u8] {
        &self.tmu_memory
    }

    pub fn tmu_memory_mut(&mut self) -> &mut [u8] {
        &mut self.tmu_memory
    }

    pub fn side_tmu_memory(&self) -> &[u8] {
        &self.side_tmu_memory
    }

    pub fn side_tmu_memory_mut(&mut self) -> &mut [u8] {
        &mut self.side_tmu_memory
    }

    /// Store the constant color register, rotating RGBA to ARGB
    pub fn set_constant_color(&mut self, rgba: u32) {
        self.constant_color = rgba.rotate_right(8);
    }

    /// Fill the gamma table from per-channel curves. Entries past the
    /// supplied length keep their previous values.
    pub fn load_gamma_table(&mut self, red: &[u32], green: &[u32], blue: &[u32]) -> &[u32] {
        let n = red.len().min(green.len()).min(blue.len()).min(GAMMA_TABLE_ENTRIES);
        for i in 0..n {
            self.gamma_table[i] = ((blue[i] & 0xff) << 16) | ((green[i] & 0xff) << 8) | (red[i] & 0xff);
        }
        &self.gamma_table
    }

    pub fn gamma_table(&self) -> &[u32; GAMMA_TABLE_ENTRIES] {
        &self.gamma_table
    }
}

/// Gamma table from per-channel power curves
pub fn gamma_rgb_powers(red: f32, green: f32, blue: f32) -> [u32; GAMMA_TABLE_ENTRIES] {
    let channel = |v: f32, gamma: f32| (v.powf(1.0 / gamma) * 255.0) as u32;
    std::array::from_fn(|i| {
        let v = i as f32 / 255.0;
        (channel(v, red) << 16) | (channel(v, green) << 8) | channel(v, blue)
    })
}

/// Check one vertex layout parameter against the game vertex record.
///
/// Returns `false` (and logs) when the game declares an unexpected offset.
pub fn validate_vertex_layout(param: u32, offset: i32) -> bool {
    match glide::expected_layout_offset(param) {
        Some(expected) if expected == offset => true,
        Some(expected) => {
            warn!(param, offset, expected, "unexpected vertex layout offset");
            false
        }
        None => {
            warn!(param, offset, "unhandled vertex layout parameter");
            false
        }
    }
}
