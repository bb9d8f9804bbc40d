//! Motion prediction
//!
//! The game simulates at 25 Hz while frames present much faster. Each
//! predictor remembers where the game last placed an object (the target) and
//! where it was drawn (the current position), and eases current toward
//! target every frame. Draws are shifted by `current - target` so motion
//! appears continuous.
//!
//! Identities are approximate: entity addresses and text buffers get reused.
//! An entry not referenced for more than two frames expires.

mod text;
mod unit;
mod weather;

pub use text::TextMotionPredictor;
pub use unit::UnitMotionPredictor;
pub use weather::{WeatherMotionPredictor, build_streak};

use glidebridge_shared::OffsetF;
use tracing::warn;

/// Frames an entry survives without being referenced
pub const EXPIRY_FRAMES: u32 = 2;

/// Move `current` toward `target` by `min(dt * rate * distance, distance)`.
///
/// Proportional approach: converges quickly after large jumps and never
/// overshoots.
pub fn approach(current: OffsetF, target: OffsetF, dt: f32, rate: f32) -> OffsetF {
    // The step is proportional to distance, so it reduces to a fraction of the gap
    let fraction = (dt * rate).clamp(0.0, 1.0);
    if fraction >= 1.0 {
        return target;
    }
    current + (target - current) * fraction
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEntry<K> {
    /// `None` once expired; the slot is reclaimed by compaction
    pub key: Option<K>,
    pub target: OffsetF,
    pub current: OffsetF,
    /// Last position reported by the game
    pub game_pos: OffsetF,
    pub last_used_frame: u32,
}

impl<K> MotionEntry<K> {
    /// Predicted delta to apply to the game's position
    pub fn offset(&self) -> OffsetF {
        self.current - self.target
    }
}

/// Bounded table of tracked motions
#[derive(Debug)]
pub struct MotionTable<K> {
    what: &'static str,
    entries: Vec<MotionEntry<K>>,
    capacity: usize,
    frame: u32,
    /// Inserts refused for lack of space since the last update
    rejected: u32,
}

impl<K: Copy + PartialEq> MotionTable<K> {
    pub fn new(what: &'static str, capacity: usize) -> Self {
        Self {
            what,
            entries: Vec::with_capacity(capacity),
            capacity,
            frame: 0,
            rejected: 0,
        }
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Inserts refused since the last update
    pub fn rejected_inserts(&self) -> u32 {
        self.rejected
    }

    /// Entries still holding an identity
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.key.is_some()).count()
    }

    pub fn entries(&self) -> &[MotionEntry<K>] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> &MotionEntry<K> {
        &self.entries[index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut MotionEntry<K> {
        &mut self.entries[index]
    }

    pub fn position(&self, key: K) -> Option<usize> {
        self.entries.iter().position(|e| e.key == Some(key))
    }

    /// Mark an entry as referenced this frame and set its target
    pub fn touch(&mut self, index: usize, pos: OffsetF) {
        let frame = self.frame;
        let e = &mut self.entries[index];
        e.target = pos;
        e.game_pos = pos;
        e.last_used_frame = frame;
    }

    /// Start tracking `key` at `pos`. Returns `None` when the table is full.
    ///
    /// A full table warns on the first refusal of each frame only.
    pub fn insert(&mut self, key: K, pos: OffsetF) -> Option<usize> {
        if self.entries.len() >= self.capacity {
            if self.rejected == 0 {
                warn!(table = self.what, capacity = self.capacity, "motion table full");
            }
            self.rejected += 1;
            return None;
        }
        self.entries.push(MotionEntry {
            key: Some(key),
            target: pos,
            current: pos,
            game_pos: pos,
            last_used_frame: self.frame,
        });
        Some(self.entries.len() - 1)
    }

    /// Advance all live entries and expire stale ones.
    ///
    /// Compaction moves at most one entry per call.
    pub fn update(&mut self, dt: f32, rate: f32) {
        let frame = self.frame;
        let mut expired = None;

        for (i, e) in self.entries.iter_mut().enumerate() {
            if e.key.is_none() {
                expired = Some(i);
                continue;
            }
            if frame.abs_diff(e.last_used_frame) > EXPIRY_FRAMES {
                e.key = None;
                expired = Some(i);
                continue;
            }
            e.current = approach(e.current, e.target, dt, rate);
        }

        let len = self.entries.len();
        if len > 0 {
            if self.entries[len - 1].key.is_none() {
                self.entries.pop();
            } else if let Some(i) = expired.filter(|&i| i < len - 1) {
                self.entries.swap_remove(i);
            }
        }

        self.frame = self.frame.wrapping_add(1);
        self.rejected = 0;
    }
}
