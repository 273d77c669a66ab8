use std::time::Duration;

use crate::core::{board::Board, shape::Piece};

use super::{
    game_session::{GameSession, PlacementPreview},
    line_clear::LineClear,
};

/// Whether a clear animation finished synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum ClearAnimation {
    /// Nothing left to show; the controller resolves the clear immediately.
    #[default]
    Done,
    /// The animation is still running. The owner must call
    /// [`Game::complete_clear`](super::Game::complete_clear) once it ends.
    Pending,
}

/// Rendering collaborator driven by [`Game`](super::Game).
///
/// Every method defaults to a no-op so implementors only override what they
/// display.
pub trait Presenter {
    /// Full refresh, called on start and restart.
    fn redraw(&mut self, _session: &GameSession) {}

    /// Board occupancy and ages, with the scoring clock the ages count against.
    fn update_grid(&mut self, _board: &Board, _clock: u32) {}

    fn update_hand(&mut self, _hand: &[Piece]) {}

    fn update_score(&mut self, _score: u64) {}

    fn update_round(&mut self, _round: u32) {}

    fn update_time(&mut self, _elapsed: Duration) {}

    /// Highlights the lines about to be cleared.
    fn animate_clear(&mut self, _lines: &LineClear) -> ClearAnimation {
        ClearAnimation::Done
    }

    fn show_preview(&mut self, _preview: &PlacementPreview) {}

    fn clear_preview(&mut self) {}

    fn show_game_over(&mut self, _score: u64, _elapsed: Duration) {}

    fn hide_game_over(&mut self) {}
}

/// Presenter that shows nothing; for headless games and simulations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
