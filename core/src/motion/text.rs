use std::f32::consts::SQRT_2;

use glidebridge_shared::{MAX_TRACKED_TEXTS, Offset, OffsetF, Size};

use super::MotionTable;

/// Screen-space size of one isometric tile step
const GAME_TO_SCREEN: OffsetF = OffsetF::new(32.0 / SQRT_2, 16.0 / SQRT_2);

/// How far (per axis) a text may move between frames and still be the same text
const SEARCH_DIST: OffsetF = OffsetF::new(1.5 * GAME_TO_SCREEN.x, 1.5 * GAME_TO_SCREEN.y);

/// Initial "best distance" sentinel; larger than any candidate within `SEARCH_DIST`
const NO_CANDIDATE_DELTA: f32 = 100.0;

/// Screen-open-mode bits
const LEFT_PANEL_OPEN: u32 = 1;
const RIGHT_PANEL_OPEN: u32 = 2;

fn min_delta_len() -> f32 {
    SEARCH_DIST.length() / 2.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextKey {
    address: u64,
    hash: u64,
}

/// Tracks floating texts (names, damage numbers, item labels)
#[derive(Debug)]
pub struct TextMotionPredictor {
    table: MotionTable<TextKey>,
    game_size: Size,
}

impl Default for TextMotionPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMotionPredictor {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TRACKED_TEXTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: MotionTable::new("texts", capacity),
            game_size: Size::default(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.table.active_count()
    }

    pub fn update(&mut self, game_size: Size, dt: f32, rate: f32) {
        self.game_size = game_size;
        self.table.update(dt, rate);
    }

    /// Offset to apply to a text the game is drawing at `pos`.
    ///
    /// Text buffers are reused, so identity falls back from the exact
    /// (address, content) pair to the single nearby text with the same
    /// content. When more than one candidate is plausible no guess is made
    /// and the text starts fresh.
    pub fn get_offset(&mut self, address: u64, hash: u64, pos: Offset, screen_open_mode: u32) -> Offset {
        let frame = self.table.frame();
        let posf = pos.as_vec2();
        let half_width = (self.game_size.width / 2) as f32;

        let mut found = None;
        let mut candidate = None;
        let mut candidate_delta = NO_CANDIDATE_DELTA;
        let mut ambiguous = false;

        for (i, e) in self.table.entries().iter().enumerate() {
            let Some(key) = e.key else { continue };
            if key.hash != hash {
                continue;
            }

            let delta = (e.game_pos - posf).abs();
            let within = delta.x <= SEARCH_DIST.x && delta.y <= SEARCH_DIST.y;

            if key.address == address {
                let under_panel = (screen_open_mode & LEFT_PANEL_OPEN != 0 && posf.x >= half_width)
                    || (screen_open_mode & RIGHT_PANEL_OPEN != 0 && posf.x <= half_width);
                found = Some((i, under_panel || !within));
                break;
            }

            if within && e.last_used_frame != frame {
                let len = delta.length();
                if candidate.is_none() || (len < candidate_delta && candidate_delta - len >= min_delta_len()) {
                    ambiguous = false;
                    candidate_delta = len;
                    candidate = Some(i);
                } else {
                    ambiguous = true;
                    candidate_delta = candidate_delta.min(len);
                }
            }
        }

        let index = match (found, candidate) {
            (Some((i, snap)), _) => {
                self.table.touch(i, posf);
                if snap {
                    self.table.entry_mut(i).current = posf;
                }
                Some(i)
            }
            (None, Some(i)) if !ambiguous => {
                self.table.touch(i, posf);
                self.table.entry_mut(i).key = Some(TextKey { address, hash });
                Some(i)
            }
            _ => self.table.insert(TextKey { address, hash }, posf),
        };

        index.map_or(Offset::ZERO, |i| {
            (self.table.entry(i).current - posf).as_ivec2()
        })
    }
}
