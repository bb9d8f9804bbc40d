//! Texture memory, palette and gamma handlers

use tracing::{debug, warn};

use super::GlideContext;
use crate::backend::{GameIntrospector, GraphicsBackend};
use crate::batch::TextureCategory;
use crate::debug::dump_texture;
use crate::error::CoreError;
use crate::glide::GR_TEXTABLE_PALETTE;
use crate::glide_state::gamma_rgb_powers;
use crate::palette::{Palette, PaletteSlot};
use crate::profiler::ProfCategory;
use crate::vertex::st_shift_for;

impl<B: GraphicsBackend, G: GameIntrospector> GlideContext<B, G> {
    /// Copy `width` x `height` palettized pixels into TMU memory
    pub fn download_texture(&mut self, tmu: u32, start_address: u32, pixels: &[u8], width: u32, height: u32) {
        let _timer = self.profiler.timer(ProfCategory::TextureDownload);

        let len = (width * height) as usize;
        let pixels = match pixels.get(..len) {
            Some(pixels) => pixels,
            None => {
                debug!(start_address, len, supplied = pixels.len(), "short texture download");
                pixels
            }
        };

        match self.glide.download_texture(tmu, start_address, pixels) {
            Ok(()) => self.hasher.invalidate(start_address),
            Err(err) => self.contract_violation("download_texture", err),
        }
    }

    /// Declare the texture the following draws sample from.
    ///
    /// Hashes the texture (memoized until its memory is rewritten), applies
    /// any pixel patches registered for the hash and records the texture in
    /// the scratch state.
    pub fn declare_texture_source(
        &mut self,
        tmu: u32,
        start_address: u32,
        width: u32,
        height: u32,
        large_log2: u32,
        ratio_log2: u32,
    ) {
        let _timer = self.profiler.timer(ProfCategory::TextureSource);

        let range = match self.glide.source_range(tmu, start_address, width, height) {
            Ok(range) => range,
            Err(err) => {
                self.contract_violation("declare_texture_source", err);
                return;
            }
        };

        self.assembler.mark_dirty();
        self.glide.st_shift = st_shift_for(width, height);

        let hash = self
            .hasher
            .hash(start_address, &self.glide.tmu_memory()[range.clone()], large_log2, ratio_log2);
        self.patches
            .apply(hash, &mut self.glide.tmu_memory_mut()[range.clone()]);

        let scratch = &mut self.scratch_batch;
        scratch.texture_start_address = start_address;
        scratch.texture_hash = hash;
        scratch.texture_width = width as u16;
        scratch.texture_height = height as u16;

        if scratch.category == TextureCategory::Unknown {
            scratch.category = self.introspector.classify_texture(hash);
        }

        if self.config.debug.dump_textures {
            self.dump_sourced_texture(range);
        }
    }

    fn dump_sourced_texture(&self, range: std::ops::Range<usize>) {
        let batch = &self.scratch_batch;
        let Some(palette) = self.glide.palettes.get(batch.palette_index as u32) else {
            debug!(hash = batch.texture_hash, "no palette bound, texture not dumped");
            return;
        };

        if let Err(err) = dump_texture(
            &self.config.debug.dump_dir,
            batch.texture_hash,
            batch.category,
            batch.texture_width as u32,
            batch.texture_height as u32,
            &self.glide.tmu_memory()[range],
            palette,
        ) {
            warn!("Texture dump failed: {err:#}");
        }
    }

    /// Upload a palette, reusing an identical one when already resident
    pub fn download_palette_table(&mut self, table_type: u32, entries: &Palette) {
        let _timer = self.profiler.timer(ProfCategory::TextureDownload);

        if table_type != GR_TEXTABLE_PALETTE {
            self.contract_violation("download_palette_table", CoreError::UnsupportedTableType(table_type));
            return;
        }

        self.assembler.mark_dirty();

        match self.glide.palettes.upload(entries) {
            Ok(PaletteSlot::Existing(index)) => {
                self.scratch_batch.palette_index = index as u16;
            }
            Ok(PaletteSlot::Inserted(index)) => {
                if let Some(stored) = self.glide.palettes.get(index) {
                    self.backend.set_palette(index, stored);
                }
                self.scratch_batch.palette_index = index as u16;
            }
            Err(err) => warn!(%err, "too many palettes"),
        }
    }

    /// Load per-channel gamma curves
    pub fn load_gamma_table(&mut self, red: &[u32], green: &[u32], blue: &[u32]) {
        let _timer = self.profiler.timer(ProfCategory::TextureDownload);
        let table = self.glide.load_gamma_table(red, green, blue);
        self.backend.load_gamma_table(table);
    }

    /// Load a gamma table generated from per-channel power curves
    pub fn load_gamma_rgb_powers(&mut self, red: f32, green: f32, blue: f32) {
        let _timer = self.profiler.timer(ProfCategory::TextureDownload);
        let table = gamma_rgb_powers(red, green, blue);
        self.backend.load_gamma_table(&table);
    }
}
