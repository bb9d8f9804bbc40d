//! Coarse classification of which screen the game is showing

use tracing::info;

use crate::backend::GameIntrospector;
use crate::batch::Batch;
use crate::vertex::Vertex;

/// Hash of the title screen's bottom artwork
pub const TITLE_SCREEN_TEXTURE_HASH: u64 = 0x84ab_94c3_74c4_2d9a;

/// The title artwork sits at the bottom of the screen
pub const TITLE_SCREEN_MIN_Y: f32 = 550.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MajorGameState {
    #[default]
    Unknown,
    FmvIntro,
    Menus,
    TitleScreen,
    InGame,
}

/// Re-evaluates the major game state once per frame
#[derive(Debug, Default)]
pub struct GameStateClassifier {
    state: MajorGameState,
    late_hooks_attached: bool,
}

impl GameStateClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MajorGameState {
        self.state
    }

    /// Classify the frame that just finished.
    ///
    /// Zero batches before anything else was seen is the intro video. Past
    /// that the state is derived fresh each frame: a playable level is
    /// `InGame`, the title artwork near the bottom of the screen is
    /// `TitleScreen`, anything else is `Menus`.
    pub fn classify<G: GameIntrospector>(
        &mut self,
        introspector: &mut G,
        batches: &[Batch],
        vertices: &[Vertex],
    ) -> MajorGameState {
        let previous = self.state;

        self.state = if matches!(previous, MajorGameState::Unknown | MajorGameState::FmvIntro)
            && batches.is_empty()
        {
            MajorGameState::FmvIntro
        } else if introspector.is_in_playable_level() {
            if !self.late_hooks_attached {
                introspector.attach_late_hooks();
                self.late_hooks_attached = true;
            }
            MajorGameState::InGame
        } else if batches.iter().any(|b| is_title_artwork(b, vertices)) {
            MajorGameState::TitleScreen
        } else {
            MajorGameState::Menus
        };

        if self.state != previous {
            info!(from = ?previous, to = ?self.state, "major game state changed");
        }
        self.state
    }
}

fn is_title_artwork(batch: &Batch, vertices: &[Vertex]) -> bool {
    batch.texture_hash == TITLE_SCREEN_TEXTURE_HASH
        && vertices
            .get(batch.start_vertex as usize)
            .is_some_and(|v| v.y >= TITLE_SCREEN_MIN_Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeIntrospector;

    fn title_batch(start: u32) -> Batch {
        Batch {
            texture_hash: TITLE_SCREEN_TEXTURE_HASH,
            start_vertex: start,
            vertex_count: 3,
            ..Default::default()
        }
    }

    fn vertex_at_y(y: f32) -> Vertex {
        Vertex::new(0.0, y, 0, 0, 0, false, 0, 0)
    }

    #[test]
    fn test_empty_frames_are_intro() {
        let mut gi = FakeIntrospector::default();
        let mut c = GameStateClassifier::new();
        assert_eq!(c.classify(&mut gi, &[], &[]), MajorGameState::FmvIntro);
        assert_eq!(c.classify(&mut gi, &[], &[]), MajorGameState::FmvIntro);
    }

    #[test]
    fn test_empty_frame_after_menus_stays_menus() {
        let mut gi = FakeIntrospector::default();
        let mut c = GameStateClassifier::new();
        c.classify(&mut gi, &[Batch::default()], &[Vertex::default()]);
        assert_eq!(c.classify(&mut gi, &[], &[]), MajorGameState::Menus);
    }

    #[test]
    fn test_title_screen_detection() {
        let mut gi = FakeIntrospector::default();
        let mut c = GameStateClassifier::new();
        let vertices = [vertex_at_y(100.0), vertex_at_y(560.0)];

        assert_eq!(
            c.classify(&mut gi, &[title_batch(0)], &vertices),
            MajorGameState::Menus
        );
        assert_eq!(
            c.classify(&mut gi, &[title_batch(0), title_batch(1)], &vertices),
            MajorGameState::TitleScreen
        );
    }

    #[test]
    fn test_in_game_attaches_hooks_once() {
        let mut gi = FakeIntrospector {
            in_game: true,
            ..Default::default()
        };
        let mut c = GameStateClassifier::new();
        let batches = [Batch::default()];
        let vertices = [Vertex::default()];
        assert_eq!(c.classify(&mut gi, &batches, &vertices), MajorGameState::InGame);
        assert_eq!(c.classify(&mut gi, &batches, &vertices), MajorGameState::InGame);
        assert_eq!(gi.late_hooks_attached, 1);

        gi.in_game = false;
        assert_eq!(c.classify(&mut gi, &batches, &vertices), MajorGameState::Menus);
    }
}
