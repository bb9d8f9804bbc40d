//! Palette table with content deduplication
//!
//! Palettes are keyed by a hash of their raw bytes. Re-uploading the
//! same content reuses the existing slot; once every slot is taken further
//! palettes are rejected.

use xxhash_rust::xxh3::xxh3_64;

use glidebridge_shared::{PALETTE_ENTRIES, PALETTE_SIZE_BYTES};

use crate::error::{CoreError, CoreResult};

pub type Palette = [u32; PALETTE_ENTRIES];

/// Outcome of a palette upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    /// Same content was already resident at this index
    Existing(u32),
    /// Content was stored in a fresh slot and must be sent to the backend
    Inserted(u32),
}

impl PaletteSlot {
    pub fn index(self) -> u32 {
        match self {
            PaletteSlot::Existing(i) | PaletteSlot::Inserted(i) => i,
        }
    }
}

#[derive(Debug)]
pub struct PaletteTable {
    keys: Vec<u64>,
    palettes: Vec<Palette>,
    capacity: usize,
}

impl PaletteTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            palettes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Find or insert `entries`.
    ///
    /// Stored palettes have alpha forced to opaque on every entry.
    pub fn upload(&mut self, entries: &Palette) -> CoreResult<PaletteSlot> {
        let bytes: &[u8; PALETTE_SIZE_BYTES] = bytemuck::cast_ref(entries);
        let hash = xxh3_64(bytes);

        if let Some(i) = self.keys.iter().position(|&k| k == hash) {
            return Ok(PaletteSlot::Existing(i as u32));
        }

        if self.keys.len() >= self.capacity {
            return Err(CoreError::PaletteTableFull(self.capacity));
        }

        self.keys.push(hash);
        self.palettes.push(with_opaque_alpha(entries));
        Ok(PaletteSlot::Inserted((self.keys.len() - 1) as u32))
    }

    pub fn get(&self, index: u32) -> Option<&Palette> {
        self.palettes.get(index as usize)
    }
}

/// Force every entry of `palette` opaque
pub fn with_opaque_alpha(palette: &Palette) -> Palette {
    let mut out = *palette;
    for entry in out.iter_mut() {
        *entry |= 0xff00_0000;
    }
    out
}
