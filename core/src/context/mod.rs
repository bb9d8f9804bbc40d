//! The interception context
//!
//! [`GlideContext`] owns every piece of per-process render state and is the
//! single entry point for the intercepted API calls. Handlers are split by
//! concern:
//!
//! - `draw`: point, line and triangle submission
//! - `texture`: TMU downloads, texture sourcing, palettes and gamma
//! - `frame`: buffer swap and clear
//! - `interception`: game-side hooks (text, images, weather, mouse)
//!
//! Handlers never return errors. Contract breaches (capacity overflow,
//! misaligned addresses) assert in debug builds; release builds log and drop
//! the offending call.

mod draw;
mod frame;
mod interception;
mod texture;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use glidebridge_shared::{Offset, Size};

use crate::assembler::VertexAssembler;
use crate::backend::{GameIntrospector, GraphicsBackend};
use crate::batch::Batch;
use crate::buffer::BatchAccumulator;
use crate::config::Config;
use crate::error::CoreError;
use crate::game_state::{GameStateClassifier, MajorGameState};
use crate::glide::{self, GR_CHROMAKEY_ENABLE};
use crate::glide_state::{GlideState, Limits, validate_vertex_layout};
use crate::logo;
use crate::motion::{TextMotionPredictor, UnitMotionPredictor, WeatherMotionPredictor};
use crate::profiler::Profiler;
use crate::surface_id::SurfaceIdTracker;
use crate::texture::{TextureHasher, TexturePatchTable};

pub struct GlideContext<B: GraphicsBackend, G: GameIntrospector> {
    backend: B,
    introspector: G,
    config: Config,

    glide: GlideState,
    hasher: TextureHasher,
    patches: TexturePatchTable,
    accumulator: BatchAccumulator,
    assembler: VertexAssembler,
    /// Render state accumulated from state-setting calls
    scratch_batch: Batch,
    /// Per-draw vertex staging, reused across draws
    staging: Vec<crate::vertex::Vertex>,

    surface_ids: SurfaceIdTracker,
    game_state: GameStateClassifier,
    units: UnitMotionPredictor,
    texts: TextMotionPredictor,
    weather: WeatherMotionPredictor,
    profiler: Arc<Profiler>,

    frame: u32,
    game_size: Size,
    last_screen_open_mode: u32,
    last_draw_calls: u32,
    is_drawing_text: bool,
    player_screen_pos: Offset,
    /// Slot index of the weather particle being drawn, if any
    weather_particle: Option<u32>,
    logo_batch: Batch,
    logo_prepared: bool,
}

impl<B: GraphicsBackend, G: GameIntrospector> GlideContext<B, G> {
    pub fn new(backend: B, introspector: G, config: Config) -> Self {
        Self::with_limits(backend, introspector, config, Limits::default())
    }

    pub fn with_limits(backend: B, introspector: G, config: Config, limits: Limits) -> Self {
        let profiler = Profiler::new(
            config.debug.profile,
            Duration::try_from_secs_f32(config.debug.profile_threshold_ms / 1000.0).unwrap_or_default(),
        );
        let game_size = backend.current_metrics().game_size;

        Self {
            units: UnitMotionPredictor::new(config.motion.unit_snap_distance),
            backend,
            introspector,
            config,
            glide: GlideState::new(&limits),
            hasher: TextureHasher::new(limits.tmu_memory),
            patches: TexturePatchTable::with_builtin_patches(),
            accumulator: BatchAccumulator::new(limits.max_vertices, limits.max_batches),
            assembler: VertexAssembler::new(),
            scratch_batch: Batch::default(),
            staging: Vec::with_capacity(16),
            surface_ids: SurfaceIdTracker::new(),
            game_state: GameStateClassifier::new(),
            texts: TextMotionPredictor::new(),
            weather: WeatherMotionPredictor::new(),
            profiler: Arc::new(profiler),
            frame: 0,
            game_size,
            last_screen_open_mode: 0,
            last_draw_calls: 0,
            is_drawing_text: false,
            player_screen_pos: Offset::ZERO,
            weather_particle: None,
            logo_batch: logo::logo_batch(),
            logo_prepared: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn introspector(&self) -> &G {
        &self.introspector
    }

    pub fn introspector_mut(&mut self) -> &mut G {
        &mut self.introspector
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profiler(&self) -> &Arc<Profiler> {
        &self.profiler
    }

    pub fn glide_state(&self) -> &GlideState {
        &self.glide
    }

    pub fn major_game_state(&self) -> MajorGameState {
        self.game_state.state()
    }

    /// Frames presented since the context was created
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn game_size(&self) -> Size {
        self.game_size
    }

    /// Draw submissions made by the last buffer swap
    pub fn last_draw_calls(&self) -> u32 {
        self.last_draw_calls
    }

    /// Render state that the next draw will capture
    pub fn scratch_batch(&self) -> &Batch {
        &self.scratch_batch
    }

    /// Batches committed since the last buffer swap
    pub fn pending_batches(&self) -> &[Batch] {
        self.accumulator.batches()
    }

    pub fn pending_vertices(&self) -> &[crate::vertex::Vertex] {
        self.accumulator.vertices()
    }

    /// Record a batch directly, bypassing texture sourcing
    #[cfg(test)]
    pub(crate) fn push_raw_batch(&mut self, state: Batch, vertices: &[crate::vertex::Vertex]) {
        if let Err(err) = self.accumulator.push_batch(state, vertices) {
            self.contract_violation("push_raw_batch", err);
        }
    }

    pub fn unit_predictor(&self) -> &UnitMotionPredictor {
        &self.units
    }

    pub fn text_predictor(&self) -> &TextMotionPredictor {
        &self.texts
    }

    pub fn weather_predictor(&self) -> &WeatherMotionPredictor {
        &self.weather
    }

    fn prediction_enabled(&self) -> bool {
        self.config.motion.enabled
    }

    // ------------------------------------------------------------------
    // Window and capability queries
    // ------------------------------------------------------------------

    /// The game opened its output window at `width` x `height`
    pub fn on_window_open(&mut self, width: i32, height: i32) {
        self.profiler.set_render_thread(std::thread::current().id());
        self.game_size = Size::new(width, height);
        self.accumulator.clear();
        self.scratch_batch = Batch::default();
        self.assembler.mark_dirty();
        debug!(width, height, "window opened");
    }

    pub fn set_vertex_layout(&mut self, param: u32, offset: i32) {
        validate_vertex_layout(param, offset);
    }

    pub fn query(&self, pname: u32) -> Option<i32> {
        let value = glide::query(pname);
        if value.is_none() {
            debug!(pname, "unhandled query");
        }
        value
    }

    pub fn query_string(&self, pname: u32) -> Option<&'static str> {
        glide::query_string(pname)
    }

    // ------------------------------------------------------------------
    // Render state
    // ------------------------------------------------------------------

    pub fn set_color_combine(&mut self, function: u32, factor: u32, local: u32, other: u32) {
        self.scratch_batch.rgb_combine = glide::rgb_combine_from_glide(function, factor, local, other)
            .unwrap_or_else(|| {
                debug!(function, factor, local, other, "unhandled color combine");
                Default::default()
            });
        self.assembler.mark_dirty();
    }

    pub fn set_alpha_combine(&mut self, function: u32, factor: u32, local: u32, other: u32) {
        self.scratch_batch.alpha_combine = glide::alpha_combine_from_glide(function, factor, local, other);
    }

    /// Constant color register, in the API's RGBA order
    pub fn set_constant_color(&mut self, rgba: u32) {
        self.glide.set_constant_color(rgba);
        self.assembler.mark_dirty();
    }

    pub fn set_alpha_blend(&mut self, rgb_sf: u32, rgb_df: u32, alpha_sf: u32, alpha_df: u32) {
        self.scratch_batch.alpha_blend = glide::alpha_blend_from_glide(rgb_sf, rgb_df, alpha_sf, alpha_df);
        self.assembler.mark_dirty();
    }

    pub fn set_chroma_key(&mut self, mode: u32) {
        self.scratch_batch.chroma_key = mode == GR_CHROMAKEY_ENABLE;
        self.assembler.mark_dirty();
    }

    pub fn set_filter_mode(&mut self, tmu: u32, mode: u32) {
        if tmu != 0 {
            self.contract_violation("set_filter_mode", CoreError::UnsupportedTmu(tmu));
            return;
        }
        self.scratch_batch.filter_mode = glide::filter_mode_from_glide(mode);
    }

    /// Log a failed handler and drop the call.
    ///
    /// Capacity overflow and bad texture addressing are caller bugs and
    /// abort debug builds.
    fn contract_violation(&self, op: &'static str, err: CoreError) {
        warn!(op, %err, "call dropped");
        debug_assert!(
            !matches!(
                err,
                CoreError::CapacityExceeded { .. }
                    | CoreError::MisalignedTextureAddress(_)
                    | CoreError::UnsupportedTmu(_)
            ),
            "{op}: {err}"
        );
    }
}
