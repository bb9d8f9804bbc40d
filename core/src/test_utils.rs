//! Shared test utilities for integration and unit tests

use hashbrown::{HashMap, HashSet};

use glidebridge_shared::{MAX_GAME_PALETTES, PALETTE_ENTRIES, Rect, Size};

use crate::backend::{EntityHandle, GameIntrospector, GraphicsBackend, Metrics};
use crate::batch::{Batch, GameAddress, TextureCacheLocation, TextureCategory};
use crate::config::Config;
use crate::context::GlideContext;
use crate::glide_state::Limits;
use crate::vertex::Vertex;

// ============================================================================
// Recording Backend
// ============================================================================

/// One `draw` call as seen by the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub batch: Batch,
    pub vertex_base: u32,
}

/// Backend that records everything it is asked to do
#[derive(Debug)]
pub struct RecordingBackend {
    pub metrics: Metrics,
    pub frame_time: f32,
    /// Texture hashes that are never resident
    pub missing_textures: HashSet<u64>,
    /// `(hash, pixel byte count)` per texture lookup
    pub texture_requests: Vec<(u64, usize)>,
    pub draws: Vec<DrawCall>,
    /// Vertices of the last bulk upload
    pub vertices: Vec<Vertex>,
    pub bulk_writes: u32,
    pub palettes: Vec<(u32, [u32; PALETTE_ENTRIES])>,
    pub gamma_tables: Vec<Vec<u32>>,
    pub presents: u32,
    slots: HashMap<u64, u32>,
}

impl RecordingBackend {
    pub fn new(game_size: Size) -> Self {
        Self {
            metrics: Metrics {
                game_size,
                render_rect: Rect::new(0, 0, game_size.width, game_size.height),
                display_size: game_size,
            },
            frame_time: 1.0 / 60.0,
            missing_textures: HashSet::new(),
            texture_requests: Vec::new(),
            draws: Vec::new(),
            vertices: Vec::new(),
            bulk_writes: 0,
            palettes: Vec::new(),
            gamma_tables: Vec::new(),
            presents: 0,
            slots: HashMap::new(),
        }
    }

    /// Total vertices covered by the recorded draws
    pub fn drawn_vertex_count(&self) -> u32 {
        self.draws.iter().map(|d| d.batch.vertex_count).sum()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(Size::new(800, 600))
    }
}

impl GraphicsBackend for RecordingBackend {
    fn update_texture(&mut self, batch: &Batch, pixels: &[u8]) -> Option<TextureCacheLocation> {
        self.texture_requests.push((batch.texture_hash, pixels.len()));
        if self.missing_textures.contains(&batch.texture_hash) {
            return None;
        }
        let next = self.slots.len() as u32;
        let index = *self.slots.entry(batch.texture_hash).or_insert(next);
        Some(TextureCacheLocation { atlas: 0, index })
    }

    fn draw(&mut self, batch: &Batch, vertex_base: u32) {
        self.draws.push(DrawCall {
            batch: *batch,
            vertex_base,
        });
    }

    fn bulk_write_vertices(&mut self, vertices: &[Vertex]) -> u32 {
        self.vertices = vertices.to_vec();
        self.bulk_writes += 1;
        0
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn current_metrics(&self) -> Metrics {
        self.metrics
    }

    fn set_palette(&mut self, index: u32, palette: &[u32; PALETTE_ENTRIES]) {
        self.palettes.push((index, *palette));
    }

    fn load_gamma_table(&mut self, table: &[u32]) {
        self.gamma_tables.push(table.to_vec());
    }

    fn frame_time_seconds(&self) -> f32 {
        self.frame_time
    }
}

// ============================================================================
// Fake Introspector
// ============================================================================

/// Scriptable game view
#[derive(Debug, Default)]
pub struct FakeIntrospector {
    pub in_game: bool,
    pub player: Option<EntityHandle>,
    pub act: i32,
    pub screen_open_mode: u32,
    pub call_sites: HashMap<u32, GameAddress>,
    pub categories: HashMap<u64, TextureCategory>,
    /// Category forced for draws from a given call site
    pub call_site_categories: HashMap<GameAddress, TextureCategory>,
    pub late_hooks_attached: u32,
}

impl GameIntrospector for FakeIntrospector {
    fn is_in_playable_level(&self) -> bool {
        self.in_game
    }

    fn player_entity(&self) -> Option<EntityHandle> {
        self.player
    }

    fn identify_call_site(&self, return_address: u32) -> GameAddress {
        self.call_sites.get(&return_address).copied().unwrap_or_default()
    }

    fn classify_texture(&self, hash: u64) -> TextureCategory {
        self.categories.get(&hash).copied().unwrap_or_default()
    }

    fn refine_category(&self, category: TextureCategory, call_site: GameAddress) -> TextureCategory {
        self.call_site_categories
            .get(&call_site)
            .copied()
            .unwrap_or(category)
    }

    fn current_act(&self) -> i32 {
        self.act
    }

    fn screen_open_mode(&self) -> u32 {
        self.screen_open_mode
    }

    fn attach_late_hooks(&mut self) {
        self.late_hooks_attached += 1;
    }
}

// ============================================================================
// Context Helpers
// ============================================================================

pub type TestContext = GlideContext<RecordingBackend, FakeIntrospector>;

/// Small arenas so tests stay cheap
pub fn test_limits() -> Limits {
    Limits {
        tmu_memory: 64 * 1024,
        max_vertices: 1024,
        max_batches: 64,
        max_palettes: MAX_GAME_PALETTES,
    }
}

pub fn test_context() -> TestContext {
    test_context_with(Config::default(), FakeIntrospector::default())
}

pub fn test_context_with(config: Config, introspector: FakeIntrospector) -> TestContext {
    crate::logging::init_test();
    let mut ctx = GlideContext::with_limits(RecordingBackend::default(), introspector, config, test_limits());
    ctx.on_window_open(800, 600);
    ctx
}

/// Palettized pixels with a recognisable pattern
pub fn pattern_pixels(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// Palette whose entries differ per `seed`
pub fn test_palette(seed: u32) -> [u32; PALETTE_ENTRIES] {
    std::array::from_fn(|i| (i as u32).wrapping_mul(0x010101).wrapping_add(seed))
}
