//! Collaborator interfaces
//!
//! The engine never touches a GPU or the game's process directly. A
//! [`GraphicsBackend`] receives textures, vertices and draws; a
//! [`GameIntrospector`] answers questions about the running game.

use glidebridge_shared::{PALETTE_ENTRIES, Rect, Size};

use crate::batch::{Batch, GameAddress, TextureCacheLocation, TextureCategory};
use crate::vertex::Vertex;

/// Display geometry reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Size the game renders at
    pub game_size: Size,
    /// Where the game image lands inside the window
    pub render_rect: Rect,
    pub display_size: Size,
}

pub trait GraphicsBackend {
    /// Upload or look up the texture described by `batch`.
    ///
    /// `pixels` is the texture's byte range in TMU memory. `None` means the
    /// texture cannot be drawn this frame.
    fn update_texture(&mut self, batch: &Batch, pixels: &[u8]) -> Option<TextureCacheLocation>;

    /// Draw `batch`'s vertex range, offset by `vertex_base` into the bulk upload
    fn draw(&mut self, batch: &Batch, vertex_base: u32);

    /// Upload the frame's vertices, returning the base offset they landed at
    fn bulk_write_vertices(&mut self, vertices: &[Vertex]) -> u32;

    fn present(&mut self);

    fn current_metrics(&self) -> Metrics;

    fn set_palette(&mut self, index: u32, palette: &[u32; PALETTE_ENTRIES]);

    fn load_gamma_table(&mut self, table: &[u32]);

    /// Duration of the last frame, for motion prediction
    fn frame_time_seconds(&self) -> f32;
}

/// Opaque identity of a game entity.
///
/// Usually a memory address, so it can be reused once the entity dies.
/// Motion tracking treats it as valid only within a short liveness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u64);

/// What is being drawn by the current image call, as reported by the game hooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageDrawInfo {
    /// The entity being drawn, if the call draws a unit
    pub unit: Option<EntityHandle>,
    pub unit_type: u32,
    pub unit_mode: u32,
    pub draw_mode: u32,
    pub is_shadow: bool,
}

pub trait GameIntrospector {
    fn is_in_playable_level(&self) -> bool;

    fn player_entity(&self) -> Option<EntityHandle>;

    /// Map a call-site return address to the game routine it belongs to
    fn identify_call_site(&self, return_address: u32) -> GameAddress;

    fn classify_texture(&self, hash: u64) -> TextureCategory;

    fn refine_category(&self, category: TextureCategory, call_site: GameAddress) -> TextureCategory;

    fn current_act(&self) -> i32;

    /// Bit 0: left panel open. Bit 1: right panel open.
    fn screen_open_mode(&self) -> u32;

    /// Called once the first time a playable level is reached
    fn attach_late_hooks(&mut self) {}
}
