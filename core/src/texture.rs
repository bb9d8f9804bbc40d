//! Texture content hashing and pixel patches
//!
//! Textures are identified by a hash of their pixel bytes. Hashing is
//! memoized per 256-byte block of TMU memory and invalidated when a download
//! lands on that block.

use hashbrown::HashMap;
use xxhash_rust::xxh3::xxh3_64;

use glidebridge_shared::TMU_ADDRESS_ALIGNMENT;

const SHAPE_MULTIPLIER: u32 = 0x0100_0193;

/// Hash of a texture's bytes combined with its LOD shape.
///
/// Identical pixels at a different size or aspect ratio hash differently.
pub fn content_hash(pixels: &[u8], large_log2: u32, ratio_log2: u32) -> u64 {
    let mut hash = xxh3_64(pixels);
    hash ^= large_log2.wrapping_mul(SHAPE_MULTIPLIER) as u64;
    hash ^= (ratio_log2.wrapping_mul(SHAPE_MULTIPLIER) as u64) << 32;
    hash
}

/// Snapshot of hash cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HasherStats {
    pub lookups: u64,
    pub misses: u64,
    pub miss_bytes: u64,
}

/// Per-block memo of texture content hashes
#[derive(Debug)]
pub struct TextureHasher {
    cache: Vec<Option<u64>>,
    stats: HasherStats,
}

impl TextureHasher {
    /// Create a hasher covering `arena_size` bytes of TMU memory
    pub fn new(arena_size: usize) -> Self {
        let blocks = arena_size.div_ceil(TMU_ADDRESS_ALIGNMENT as usize);
        Self {
            cache: vec![None; blocks],
            stats: HasherStats::default(),
        }
    }

    #[inline]
    fn block(start_address: u32) -> usize {
        (start_address / TMU_ADDRESS_ALIGNMENT) as usize
    }

    /// Forget the hash of the block starting at `start_address`
    pub fn invalidate(&mut self, start_address: u32) {
        debug_assert!(start_address % TMU_ADDRESS_ALIGNMENT == 0);
        if let Some(slot) = self.cache.get_mut(Self::block(start_address)) {
            *slot = None;
        }
    }

    /// Hash of the texture at `start_address`, computed on first use
    pub fn hash(&mut self, start_address: u32, pixels: &[u8], large_log2: u32, ratio_log2: u32) -> u64 {
        debug_assert!(start_address % TMU_ADDRESS_ALIGNMENT == 0);
        self.stats.lookups = self.stats.lookups.wrapping_add(1);

        let block = Self::block(start_address);
        if let Some(Some(hash)) = self.cache.get(block) {
            return *hash;
        }

        self.stats.misses = self.stats.misses.wrapping_add(1);
        self.stats.miss_bytes = self.stats.miss_bytes.wrapping_add(pixels.len() as u64);

        let hash = content_hash(pixels, large_log2, ratio_log2);
        if let Some(slot) = self.cache.get_mut(block) {
            *slot = Some(hash);
        }
        hash
    }

    pub fn stats(&self) -> HasherStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = HasherStats::default();
    }
}

/// A single byte rewrite inside a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPatch {
    pub offset: usize,
    pub value: u8,
}

/// Pixel fixes for known broken assets, keyed by content hash
#[derive(Debug, Clone, Default)]
pub struct TexturePatchTable {
    patches: HashMap<u64, Vec<PixelPatch>>,
}

/// Font atlas whose '5' glyph reads as a '6'
const FONT_FIVE_GLYPH_HASH: u64 = 0xbeed_610a_cac3_87d3;

impl TexturePatchTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table with the built-in asset fixes
    pub fn with_builtin_patches() -> Self {
        let mut table = Self::empty();
        let stride = 16;
        table.insert(
            FONT_FIVE_GLYPH_HASH,
            vec![
                PixelPatch { offset: 1 + 10 * stride, value: 181 },
                PixelPatch { offset: 2 + 10 * stride, value: 181 },
                PixelPatch { offset: 1 + 11 * stride, value: 29 },
            ],
        );
        table
    }

    pub fn insert(&mut self, hash: u64, patches: Vec<PixelPatch>) {
        self.patches.insert(hash, patches);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Apply the patches registered for `hash`. Out-of-range offsets are skipped.
    ///
    /// Returns the number of bytes written.
    pub fn apply(&self, hash: u64, pixels: &mut [u8]) -> usize {
        let Some(patches) = self.patches.get(&hash) else {
            return 0;
        };
        let mut written = 0;
        for patch in patches {
            if let Some(px) = pixels.get_mut(patch.offset) {
                *px = patch.value;
                written += 1;
            }
        }
        written
    }
}
