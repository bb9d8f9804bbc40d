//! Centralized constants for the glidebridge renderer.
//!
//! Single source of truth for per-frame capacities, palette slots and the
//! simulated texture memory layout.

// =============================================================================
// Texture memory
// =============================================================================

/// Size of the simulated TMU memory arena the game downloads textures into.
pub const TMU_MEMORY_SIZE: usize = 22 * 1024 * 1024;

/// Size of the side arena holding engine-owned textures (the title-screen watermark).
pub const SIDE_TMU_MEMORY_SIZE: usize = 128 * 128;

/// Texture start addresses must be aligned to this many bytes.
pub const TMU_ADDRESS_ALIGNMENT: u32 = 256;

/// Largest texture edge the legacy API reports.
pub const MAX_TEXTURE_SIZE: i32 = 256;

// =============================================================================
// Palettes and gamma
// =============================================================================

/// Entries per palette (ARGB, 4 bytes each).
pub const PALETTE_ENTRIES: usize = 256;

/// Size of one palette in bytes.
pub const PALETTE_SIZE_BYTES: usize = PALETTE_ENTRIES * 4;

/// Total palette slots on the backend.
pub const MAX_PALETTES: usize = 16;

/// Palette slots available to game-downloaded palettes.
pub const MAX_GAME_PALETTES: usize = MAX_PALETTES - 2;

/// Palette slot holding an all-white palette (constant color draws, lines).
pub const WHITE_PALETTE_INDEX: u32 = MAX_GAME_PALETTES as u32;

/// Palette slot holding the watermark palette.
pub const LOGO_PALETTE_INDEX: u32 = MAX_PALETTES as u32 - 1;

/// Entries in a gamma ramp.
pub const GAMMA_TABLE_ENTRIES: usize = 256;

// =============================================================================
// Per-frame capacities
// =============================================================================

/// Hard cap on vertices emitted per frame.
pub const MAX_VERTICES_PER_FRAME: usize = 1024 * 1024;

/// Hard cap on batches recorded per frame.
pub const MAX_BATCHES_PER_FRAME: usize = 16384;

/// Largest vertex count a single merged draw may cover.
pub const MAX_VERTICES_PER_DRAW: u32 = 65535;

// =============================================================================
// Surfaces
// =============================================================================

/// Reserved surface id for user interface content.
///
/// UI vertices never receive motion-prediction offsets.
pub const SURFACE_ID_USER_INTERFACE: u16 = 16383;

// =============================================================================
// Motion tracking capacities
// =============================================================================

/// Tracked units (monsters, NPCs, missiles) per predictor.
pub const MAX_TRACKED_UNITS: usize = 1024;

/// Tracked floating texts per predictor.
pub const MAX_TRACKED_TEXTS: usize = 128;

/// Tracked weather particle strokes per predictor.
pub const MAX_TRACKED_PARTICLES: usize = 512;
