//! glidebridge core - Glide interception engine
//!
//! Turns the stream of immediate-mode Glide calls issued by the game into
//! batched, state-tagged vertex submissions for a modern graphics backend,
//! and smooths the game's low-rate motion for high-refresh displays.
//!
//! # Architecture
//!
//! - [`GlideContext`] - Owns all render state and handles every intercepted call
//! - [`GraphicsBackend`] / [`GameIntrospector`] - Collaborators the host supplies
//! - [`BatchAccumulator`] - Per-frame vertex and batch arenas with greedy merging
//! - [`motion`] - Unit, text and weather motion predictors
//! - [`Config`] - TOML configuration

pub mod assembler;
pub mod backend;
pub mod batch;
pub mod buffer;
pub mod config;
pub mod context;
pub mod debug;
pub mod error;
pub mod game_state;
pub mod glide;
pub mod glide_state;
#[cfg(test)]
mod integration;
pub mod logging;
pub mod logo;
pub mod motion;
pub mod palette;
pub mod profiler;
pub mod surface_id;
#[cfg(test)]
pub mod test_utils;
pub mod texture;
pub mod vertex;

// Re-export the engine surface
pub use backend::{EntityHandle, GameIntrospector, GraphicsBackend, ImageDrawInfo, Metrics};
pub use batch::{
    AlphaBlend, AlphaCombine, Batch, FilterMode, GameAddress, RgbCombine, TextureCacheLocation,
    TextureCategory,
};
pub use buffer::BatchAccumulator;
pub use config::Config;
pub use context::GlideContext;
pub use error::{ConfigError, CoreError, CoreResult};
pub use game_state::MajorGameState;
pub use glide_state::Limits;
pub use palette::Palette;
pub use profiler::{ProfCategory, Profiler};
pub use vertex::{GameVertex, Vertex};

// Re-export shared geometry for convenience
pub use glidebridge_shared::{Offset, OffsetF, Rect, Size};
