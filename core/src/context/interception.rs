//! Hooks called from inside the game's own drawing routines
//!
//! These see game-level context the Glide stream lacks (which unit or string
//! is being drawn) and return the screen offset the game should apply to
//! the draw.

use xxhash_rust::xxh3::xxh3_64;

use glidebridge_shared::{Offset, math::chebyshev_distance};

use super::GlideContext;
use crate::backend::{GameIntrospector, GraphicsBackend, ImageDrawInfo};
use crate::batch::TextureCategory;
use crate::profiler::ProfCategory;

/// A shadow this close to the player's sprite belongs to the player
const PLAYER_SHADOW_DISTANCE: i32 = 8;

const BELT_ITEM_UNIT_TYPE: u32 = 4;
const BELT_ITEM_UNIT_MODE: u32 = 4;
/// Draw mode used for world objects that report unit type and mode 0
const WORLD_DRAW_MODE: u32 = 3;

impl<B: GraphicsBackend, G: GameIntrospector> GlideContext<B, G> {
    /// The game starts drawing `text` at `pos`.
    ///
    /// `address` is the string buffer's address. Interface text is never
    /// predicted; floating world text is tracked across frames.
    pub fn begin_draw_text(&mut self, address: u64, text: &[u16], pos: Offset, is_interface_text: bool) -> Offset {
        self.scratch_batch.category = TextureCategory::UserInterface;
        self.is_drawing_text = true;

        if text.is_empty() || is_interface_text || !self.prediction_enabled() {
            return Offset::ZERO;
        }

        let _timer = self.profiler.timer(ProfCategory::MotionPrediction);
        let hash = xxh3_64(bytemuck::cast_slice(text));
        let screen_open_mode = self.introspector.screen_open_mode();
        self.texts.get_offset(address, hash, pos, screen_open_mode)
    }

    pub fn end_draw_text(&mut self) {
        self.scratch_batch.category = TextureCategory::Unknown;
        self.is_drawing_text = false;
    }

    /// The game starts drawing a sprite at `pos`
    pub fn begin_draw_image(&mut self, info: &ImageDrawInfo, pos: Offset) -> Offset {
        if self.is_drawing_text {
            return Offset::ZERO;
        }

        if let Some(unit) = info.unit {
            let is_player = self.introspector.player_entity() == Some(unit);
            if is_player {
                self.scratch_batch.category = TextureCategory::Player;
                self.player_screen_pos = pos;
            }

            if !self.prediction_enabled() {
                return Offset::ZERO;
            }

            let _timer = self.profiler.timer(ProfCategory::MotionPrediction);
            self.units.set_unit_screen_pos(unit, pos);
            return if is_player {
                Offset::ZERO
            } else {
                self.units.get_offset(unit)
            };
        }

        if info.is_shadow {
            let is_player_shadow = self.player_screen_pos.x > 0
                && chebyshev_distance(pos, self.player_screen_pos) < PLAYER_SHADOW_DISTANCE;

            if is_player_shadow {
                self.scratch_batch.category = TextureCategory::Player;
            } else if self.prediction_enabled() {
                let _timer = self.profiler.timer(ProfCategory::MotionPrediction);
                return self.units.get_offset_for_shadow(pos);
            }
            return Offset::ZERO;
        }

        let is_misc_ui = info.unit_type == 0 && info.unit_mode == 0 && info.draw_mode != WORLD_DRAW_MODE;
        let is_belt_item = info.unit_type == BELT_ITEM_UNIT_TYPE && info.unit_mode == BELT_ITEM_UNIT_MODE;
        if is_misc_ui || is_belt_item {
            self.scratch_batch.category = TextureCategory::UserInterface;
        }

        Offset::ZERO
    }

    pub fn end_draw_image(&mut self) {
        if !self.is_drawing_text {
            self.scratch_batch.category = TextureCategory::Unknown;
        }
    }

    /// Set while the game draws its rain or snow, with the particle's slot index
    pub fn set_weather_particle(&mut self, index: Option<u32>) {
        self.weather_particle = index;
    }

    /// Map a position in game coordinates to the render rectangle
    pub fn map_mouse_position(&self, pos: Offset) -> Offset {
        let metrics = self.backend.current_metrics();
        if metrics.game_size.is_empty() {
            return pos;
        }

        let scale = metrics.render_rect.size.as_vec2() / metrics.game_size.as_vec2();
        (pos.as_vec2() * scale).as_ivec2() + metrics.render_rect.offset
    }

    /// Like [`map_mouse_position`](Self::map_mouse_position), but positions
    /// outside the game area pass through untouched
    pub fn map_cursor_position(&self, pos: Offset) -> Offset {
        let game_size = self.backend.current_metrics().game_size;
        if pos.x < 0 || pos.y < 0 || pos.x > game_size.width || pos.y > game_size.height {
            return pos;
        }
        self.map_mouse_position(pos)
    }
}
