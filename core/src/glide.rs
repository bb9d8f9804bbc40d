//! Raw Glide 3 API values and their translation to engine render state
//!
//! The host hands us the legacy API's integer enums verbatim. Everything is
//! translated into closed engine enums here, at the boundary, so the rest of
//! the core matches exhaustively on typed values.

use glidebridge_shared::{GAMMA_TABLE_ENTRIES, MAX_TEXTURE_SIZE, TMU_ADDRESS_ALIGNMENT};

use crate::batch::{AlphaBlend, AlphaCombine, FilterMode, RgbCombine};

// =============================================================================
// Raw constants
// =============================================================================

pub const GR_COMBINE_FUNCTION_ZERO: u32 = 0x0;
pub const GR_COMBINE_FUNCTION_LOCAL: u32 = 0x1;
pub const GR_COMBINE_FUNCTION_LOCAL_ALPHA: u32 = 0x2;
pub const GR_COMBINE_FUNCTION_SCALE_OTHER: u32 = 0x3;

pub const GR_COMBINE_FACTOR_ZERO: u32 = 0x0;
pub const GR_COMBINE_FACTOR_LOCAL: u32 = 0x1;

pub const GR_COMBINE_LOCAL_ITERATED: u32 = 0x0;
pub const GR_COMBINE_LOCAL_CONSTANT: u32 = 0x1;

pub const GR_COMBINE_OTHER_ITERATED: u32 = 0x0;
pub const GR_COMBINE_OTHER_TEXTURE: u32 = 0x1;
pub const GR_COMBINE_OTHER_CONSTANT: u32 = 0x2;

pub const GR_BLEND_ZERO: u32 = 0x0;
pub const GR_BLEND_SRC_ALPHA: u32 = 0x1;
pub const GR_BLEND_SRC_COLOR: u32 = 0x2;
pub const GR_BLEND_DST_ALPHA: u32 = 0x3;
pub const GR_BLEND_ONE: u32 = 0x4;
pub const GR_BLEND_ONE_MINUS_SRC_ALPHA: u32 = 0x5;

pub const GR_TRIANGLE_STRIP: u32 = 4;
pub const GR_TRIANGLE_FAN: u32 = 5;

pub const GR_CHROMAKEY_DISABLE: u32 = 0;
pub const GR_CHROMAKEY_ENABLE: u32 = 1;

pub const GR_TEXTUREFILTER_POINT_SAMPLED: u32 = 0;
pub const GR_TEXTUREFILTER_BILINEAR: u32 = 1;

pub const GR_TEXTABLE_PALETTE: u32 = 2;

pub const GR_PARAM_XY: u32 = 0x01;
pub const GR_PARAM_PARGB: u32 = 0x30;
pub const GR_PARAM_ST0: u32 = 0x40;

// =============================================================================
// Combine / blend translation
// =============================================================================

/// Translate a color combine setup.
///
/// Only the two setups the game uses are recognised; anything else returns
/// `None` and the caller keeps texture-modulated color.
pub fn rgb_combine_from_glide(function: u32, factor: u32, local: u32, other: u32) -> Option<RgbCombine> {
    match (function, factor, local, other) {
        (
            GR_COMBINE_FUNCTION_SCALE_OTHER,
            GR_COMBINE_FACTOR_LOCAL,
            GR_COMBINE_LOCAL_ITERATED,
            GR_COMBINE_OTHER_TEXTURE,
        ) => Some(RgbCombine::ColorMultipliedByTexture),
        (
            GR_COMBINE_FUNCTION_LOCAL,
            GR_COMBINE_FACTOR_ZERO,
            GR_COMBINE_LOCAL_CONSTANT,
            GR_COMBINE_OTHER_CONSTANT,
        ) => Some(RgbCombine::ConstantColor),
        _ => None,
    }
}

/// Translate an alpha combine setup (constant-local means alpha comes from color)
pub fn alpha_combine_from_glide(function: u32, factor: u32, local: u32, other: u32) -> AlphaCombine {
    match (function, factor, local, other) {
        (
            GR_COMBINE_FUNCTION_LOCAL,
            GR_COMBINE_FACTOR_ZERO,
            GR_COMBINE_LOCAL_CONSTANT,
            GR_COMBINE_OTHER_CONSTANT,
        ) => AlphaCombine::FromColor,
        _ => AlphaCombine::One,
    }
}

/// Translate the four blend factors into one of the supported blend modes.
///
/// Unrecognised combinations fall back to opaque.
pub fn alpha_blend_from_glide(rgb_sf: u32, rgb_df: u32, alpha_sf: u32, alpha_df: u32) -> AlphaBlend {
    match (rgb_sf, rgb_df, alpha_sf, alpha_df) {
        (GR_BLEND_ONE, GR_BLEND_ZERO, GR_BLEND_ZERO, GR_BLEND_ZERO) => AlphaBlend::Opaque,
        (GR_BLEND_SRC_ALPHA, GR_BLEND_ONE_MINUS_SRC_ALPHA, GR_BLEND_ZERO, GR_BLEND_ZERO) => {
            AlphaBlend::SrcAlphaInvSrcAlpha
        }
        (GR_BLEND_ONE, GR_BLEND_ONE, GR_BLEND_ZERO, GR_BLEND_ZERO) => AlphaBlend::Additive,
        (GR_BLEND_ZERO, GR_BLEND_SRC_COLOR, GR_BLEND_ZERO, GR_BLEND_ZERO) => {
            AlphaBlend::Multiplicative
        }
        _ => AlphaBlend::Opaque,
    }
}

pub fn filter_mode_from_glide(mode: u32) -> FilterMode {
    match mode {
        GR_TEXTUREFILTER_BILINEAR => FilterMode::Bilinear,
        _ => FilterMode::Point,
    }
}

/// Primitive modes accepted by the vertex array entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn from_glide(mode: u32) -> Option<Self> {
        match mode {
            GR_TRIANGLE_STRIP => Some(PrimitiveMode::TriangleStrip),
            GR_TRIANGLE_FAN => Some(PrimitiveMode::TriangleFan),
            _ => None,
        }
    }
}

/// Expected byte offset of each vertex layout parameter in the game vertex.
pub fn expected_layout_offset(param: u32) -> Option<i32> {
    match param {
        GR_PARAM_XY => Some(0),
        GR_PARAM_PARGB => Some(8),
        GR_PARAM_ST0 => Some(16),
        _ => None,
    }
}

// =============================================================================
// Capability queries
// =============================================================================

/// Numeric capability queries (`grGet`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideQuery {
    GammaTableEntries,
    MaxTextureSize,
    MaxTextureAspectRatio,
    MemoryUma,
    NumBoards,
    NumFramebuffers,
    NumTmu,
    TextureAlign,
    BitsGamma,
}

impl GlideQuery {
    pub fn from_glide(pname: u32) -> Option<Self> {
        match pname {
            0x05 => Some(GlideQuery::GammaTableEntries),
            0x0a => Some(GlideQuery::MaxTextureSize),
            0x0b => Some(GlideQuery::MaxTextureAspectRatio),
            0x0e => Some(GlideQuery::MemoryUma),
            0x0f => Some(GlideQuery::NumBoards),
            0x11 => Some(GlideQuery::NumFramebuffers),
            0x13 => Some(GlideQuery::NumTmu),
            0x24 => Some(GlideQuery::TextureAlign),
            0x2a => Some(GlideQuery::BitsGamma),
            _ => None,
        }
    }

    /// The value reported to the game
    pub fn value(self) -> i32 {
        match self {
            GlideQuery::GammaTableEntries => GAMMA_TABLE_ENTRIES as i32,
            GlideQuery::MaxTextureSize => MAX_TEXTURE_SIZE,
            GlideQuery::MaxTextureAspectRatio => 3,
            GlideQuery::MemoryUma => 0,
            GlideQuery::NumBoards => 1,
            GlideQuery::NumFramebuffers => 1,
            GlideQuery::NumTmu => 1,
            GlideQuery::TextureAlign => TMU_ADDRESS_ALIGNMENT as i32,
            GlideQuery::BitsGamma => 8,
        }
    }
}

/// Answer a raw `grGet` query, or `None` for unknown parameters
pub fn query(pname: u32) -> Option<i32> {
    GlideQuery::from_glide(pname).map(GlideQuery::value)
}

/// Answer a raw `grGetString` query
pub fn query_string(pname: u32) -> Option<&'static str> {
    match pname {
        0xa0 => Some(" "),
        0xa1 => Some("Banshee"),
        0xa2 => Some("Glide"),
        0xa3 => Some("3Dfx Interactive"),
        0xa4 => Some("3.0"),
        _ => None,
    }
}
