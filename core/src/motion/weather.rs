use glidebridge_shared::{MAX_TRACKED_PARTICLES, OffsetF};

use super::MotionTable;
use crate::vertex::Vertex;

/// Moves longer than this are a respawned particle, not motion
const SNAP_DISTANCE: f32 = 64.0;

/// Added to a particle index the second time it appears in a row
const DUPLICATE_INDEX_OFFSET: u32 = 256;

const STREAK_HALF_WIDTH: f32 = 1.25;

/// Act whose weather (snow) is drawn without a long tail
const SNOW_ACT: i32 = 4;

/// Tracks rain and snow particles by slot index
#[derive(Debug)]
pub struct WeatherMotionPredictor {
    table: MotionTable<u32>,
    last_particle_index: Option<u32>,
    avg_dir: OffsetF,
}

impl Default for WeatherMotionPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherMotionPredictor {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TRACKED_PARTICLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: MotionTable::new("particles", capacity),
            last_particle_index: None,
            avg_dir: OffsetF::ZERO,
        }
    }

    pub fn active_count(&self) -> usize {
        self.table.active_count()
    }

    /// Stable key for the particle the game is drawing.
    ///
    /// The game draws two independent strokes per slot, back to back with
    /// the same index. The second one is tracked under a shifted index.
    pub fn resolve_particle_key(&mut self, raw_index: u32) -> u32 {
        let key = if self.last_particle_index == Some(raw_index) {
            raw_index + DUPLICATE_INDEX_OFFSET
        } else {
            raw_index
        };
        self.last_particle_index = Some(key);
        key
    }

    pub fn get_offset(&mut self, key: u32, pos: OffsetF) -> OffsetF {
        let index = match self.table.position(key) {
            Some(i) => {
                let snap = self.table.entry(i).game_pos.distance(pos) > SNAP_DISTANCE;
                self.table.touch(i, pos);
                if snap {
                    self.table.entry_mut(i).current = pos;
                }
                Some(i)
            }
            None => self.table.insert(key, pos),
        };
        index.map_or(OffsetF::ZERO, |i| self.table.entry(i).offset())
    }

    /// Blend `dir` into the running average stroke direction
    pub fn smooth_direction(&mut self, dir: OffsetF, blend: f32) -> OffsetF {
        self.avg_dir = if self.avg_dir == OffsetF::ZERO {
            dir
        } else {
            (self.avg_dir * (1.0 - blend) + dir * blend).normalize_or_zero()
        };
        self.avg_dir
    }

    /// Clear state that only lives for one frame
    pub fn reset_frame_transients(&mut self) {
        self.avg_dir = OffsetF::ZERO;
    }

    pub fn update(&mut self, dt: f32, rate: f32) {
        self.table.update(dt, rate);
    }
}

/// Expand a particle stroke into a four-triangle streak.
///
/// The streak is centered on `mid`, stretched back along `dir` and fanned
/// out to a diamond; outer vertices are fully transparent.
pub fn build_streak(template: Vertex, mid: OffsetF, len: f32, dir: OffsetF, act: i32) -> [Vertex; 12] {
    let widening = OffsetF::new(-dir.y, dir.x) * STREAK_HALF_WIDTH;
    let stretch_back = if act == SNOW_ACT { 1.0 } else { 3.0 };
    let stretch_ahead = 1.0;

    let start = mid - dir * len * stretch_back;
    let end = start + dir * len * (stretch_back + stretch_ahead);

    let transparent = template.color & 0x00ff_ffff;
    let corner = |p: OffsetF| {
        let mut v = template;
        v.set_position(p);
        v.color = transparent;
        v
    };

    let mut center = template;
    center.set_position(mid);

    let ring = [
        corner(start),
        corner(mid + widening),
        corner(end),
        corner(mid - widening),
    ];

    [
        center, ring[0], ring[1],
        center, ring[1], ring[2],
        center, ring[2], ring[3],
        center, ring[3], ring[0],
    ]
}
