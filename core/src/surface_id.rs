//! Surface ids for the antialiasing resolve
//!
//! Every batch is tagged with a small integer so edge smoothing never blends
//! across unrelated content. Ids are a best-effort heuristic.

use glidebridge_shared::{SURFACE_ID_USER_INTERFACE, Size};

use crate::batch::{Batch, TextureCategory};
use crate::game_state::MajorGameState;
use crate::vertex::Vertex;

#[derive(Debug, Default)]
pub struct SurfaceIdTracker {
    current: u16,
    last_was_world_tile: bool,
}

impl SurfaceIdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_new_frame(&mut self) {
        self.current = 0;
        self.last_was_world_tile = false;
    }

    #[inline]
    pub fn current_surface_id(&self) -> u16 {
        self.current
    }

    fn advance(&mut self) -> u16 {
        self.current += 1;
        if self.current >= SURFACE_ID_USER_INTERFACE {
            self.current = 1;
        }
        self.current
    }

    /// Assign a surface id to a freshly committed batch and stamp its vertices.
    ///
    /// Outside gameplay, UI draws and draws starting outside the game area
    /// are interface content. Consecutive floor and wall tiles form one
    /// surface; every other world draw gets its own.
    pub fn update_batch_surface_id(
        &mut self,
        batch: &Batch,
        state: MajorGameState,
        game_size: Size,
        vertices: &mut [Vertex],
    ) -> u16 {
        let Some(first) = vertices.first() else {
            return self.current;
        };

        let in_game_area = game_size.is_empty()
            || (first.x >= 0.0
                && first.y >= 0.0
                && first.x < game_size.width as f32
                && first.y < game_size.height as f32);

        let id = if state != MajorGameState::InGame
            || batch.category == TextureCategory::UserInterface
            || !in_game_area
        {
            SURFACE_ID_USER_INTERFACE
        } else if batch.game_address.is_world_tile() {
            if !self.last_was_world_tile {
                self.advance();
            }
            self.last_was_world_tile = true;
            self.current
        } else {
            self.last_was_world_tile = false;
            self.advance()
        };

        for v in vertices.iter_mut() {
            v.set_surface_id(id);
        }
        id
    }
}
