//! Frame boundaries

use tracing::debug;

use glidebridge_shared::{LOGO_PALETTE_INDEX, MAX_VERTICES_PER_DRAW, Offset, SURFACE_ID_USER_INTERFACE};

use super::GlideContext;
use crate::backend::{GameIntrospector, GraphicsBackend};
use crate::batch::TextureCategory;
use crate::game_state::MajorGameState;
use crate::logo;
use crate::profiler::ProfCategory;

impl<B: GraphicsBackend, G: GameIntrospector> GlideContext<B, G> {
    /// Finish the frame: classify it, apply the player's predicted motion,
    /// submit everything to the backend and present.
    pub fn on_buffer_swap(&mut self) {
        let state = self.game_state.classify(
            &mut self.introspector,
            self.accumulator.batches(),
            self.accumulator.vertices(),
        );

        self.insert_logo_on_title_screen();

        if self.prediction_enabled() && state == MajorGameState::InGame {
            self.apply_player_motion();
        }

        {
            let _timer = self.profiler.timer(ProfCategory::DrawBatches);
            let base = self.backend.bulk_write_vertices(self.accumulator.vertices());
            let backend = &mut self.backend;
            let draws = self
                .accumulator
                .merge_and_flush(MAX_VERTICES_PER_DRAW, |batch| backend.draw(batch, base));

            if self.frame & 255 == 0 {
                debug!(frame = self.frame, draws, "draw calls");
            }
            self.last_draw_calls = draws;
        }

        {
            let _timer = self.profiler.timer(ProfCategory::Present);
            self.backend.present();
        }

        if self.profiler.is_enabled() {
            self.profiler
                .write_profile(state == MajorGameState::InGame, self.hasher.stats());
            self.hasher.reset_stats();
        }

        self.frame = self.frame.wrapping_add(1);
        self.accumulator.clear();

        let screen_open_mode = self.introspector.screen_open_mode();
        if screen_open_mode != self.last_screen_open_mode {
            debug!(screen_open_mode, "side panels changed");
            self.last_screen_open_mode = screen_open_mode;
        }
        self.surface_ids.on_new_frame();
        self.game_size = self.backend.current_metrics().game_size;
        self.weather.reset_frame_transients();
        self.assembler.mark_dirty();
    }

    /// Advance motion prediction by one frame step
    pub fn on_buffer_clear(&mut self) {
        if self.game_state.state() != MajorGameState::InGame || !self.prediction_enabled() {
            return;
        }

        let _timer = self.profiler.timer(ProfCategory::MotionPrediction);
        let dt = self.backend.frame_time_seconds();
        let rate = self.config.motion.approach_rate;
        let game_size = self.backend.current_metrics().game_size;

        self.units.update(dt, rate);
        self.texts.update(game_size, dt, rate);
        self.weather.update(dt, rate);
    }

    /// Shift the world opposite to the player's predicted motion.
    ///
    /// The player sprite itself and interface content stay put.
    fn apply_player_motion(&mut self) {
        let _timer = self.profiler.timer(ProfCategory::MotionPrediction);

        let offset = self
            .introspector
            .player_entity()
            .map_or(Offset::ZERO, |player| self.units.get_offset(player));
        if offset == Offset::ZERO {
            return;
        }

        self.accumulator.offset_batches(-offset.as_vec2(), |batch, first| {
            first.surface_id != SURFACE_ID_USER_INTERFACE && batch.category != TextureCategory::Player
        });
    }

    fn insert_logo_on_title_screen(&mut self) {
        if !self.config.render.logo
            || self.game_state.state() != MajorGameState::TitleScreen
            || self.accumulator.batch_count() == 0
        {
            return;
        }

        if !self.logo_prepared {
            logo::write_logo_texture(self.glide.side_tmu_memory_mut());
            self.backend.set_palette(LOGO_PALETTE_INDEX, &logo::logo_palette());
            self.logo_prepared = true;
        }

        let mut batch = self.logo_batch;
        let Some(location) = self.backend.update_texture(&batch, self.glide.side_tmu_memory()) else {
            debug!("logo texture not resident");
            return;
        };
        batch.location = Some(location);

        let quad = logo::logo_quad(self.game_size, location.index as u16);
        if let Err(err) = self.accumulator.push_batch(batch, &quad) {
            self.contract_violation("insert_logo", err);
        }
    }
}
