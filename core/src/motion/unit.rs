use glidebridge_shared::math::chebyshev_distance_f;
use glidebridge_shared::{MAX_TRACKED_UNITS, Offset};

use super::MotionTable;
use crate::backend::EntityHandle;

/// Largest Chebyshev distance between a shadow and the unit that casts it
const SHADOW_MATCH_DISTANCE: f32 = 16.0;

/// Tracks units (players, monsters, missiles) by entity handle
#[derive(Debug)]
pub struct UnitMotionPredictor {
    table: MotionTable<EntityHandle>,
    snap_distance: f32,
}

impl UnitMotionPredictor {
    pub fn new(snap_distance: f32) -> Self {
        Self::with_capacity(snap_distance, MAX_TRACKED_UNITS)
    }

    pub fn with_capacity(snap_distance: f32, capacity: usize) -> Self {
        Self {
            table: MotionTable::new("units", capacity),
            snap_distance,
        }
    }

    pub fn active_count(&self) -> usize {
        self.table.active_count()
    }

    /// Record where the game drew `unit` this frame.
    ///
    /// Jumps longer than the snap distance (teleports, new areas) are not
    /// smoothed.
    pub fn set_unit_screen_pos(&mut self, unit: EntityHandle, pos: Offset) {
        let pos = pos.as_vec2();
        match self.table.position(unit) {
            Some(i) => {
                let snap = self.table.entry(i).current.distance(pos) > self.snap_distance;
                self.table.touch(i, pos);
                if snap {
                    self.table.entry_mut(i).current = pos;
                }
            }
            None => {
                self.table.insert(unit, pos);
            }
        }
    }

    /// Offset from the game's position to the predicted position
    pub fn get_offset(&self, unit: EntityHandle) -> Offset {
        self.table
            .position(unit)
            .map_or(Offset::ZERO, |i| self.table.entry(i).offset().as_ivec2())
    }

    /// Offset for a shadow, borrowed from the nearest unit at that spot
    pub fn get_offset_for_shadow(&self, pos: Offset) -> Offset {
        let pos = pos.as_vec2();
        self.table
            .entries()
            .iter()
            .filter(|e| e.key.is_some())
            .map(|e| (e, chebyshev_distance_f(e.game_pos, pos)))
            .filter(|&(_, d)| d <= SHADOW_MATCH_DISTANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(Offset::ZERO, |(e, _)| e.offset().as_ivec2())
    }

    pub fn update(&mut self, dt: f32, rate: f32) {
        self.table.update(dt, rate);
    }
}
