use std::time::Duration;

use tetroku_engine::{
    Board, ClearAnimation, GameSession, LineClear, Piece, PlacementPreview, Presenter,
};

/// How long cleared lines flash before they are removed.
pub const CLEAR_FLASH: Duration = Duration::from_millis(500);

/// Flash toggles every this often.
const BLINK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct ClearFlash {
    lines: LineClear,
    remaining: Duration,
}

/// Keeps the last state pushed by the game so the frame can be drawn from it.
#[derive(Debug, Clone)]
pub struct TuiPresenter {
    board: Board,
    clock: u32,
    hand: Vec<Piece>,
    score: u64,
    round: u32,
    elapsed: Duration,
    preview: Option<PlacementPreview>,
    flash: Option<ClearFlash>,
    game_over: Option<(u64, Duration)>,
}

impl TuiPresenter {
    pub fn new(board_size: usize) -> Self {
        Self {
            board: Board::new(board_size),
            clock: 0,
            hand: vec![],
            score: 0,
            round: 0,
            elapsed: Duration::ZERO,
            preview: None,
            flash: None,
            game_over: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Scoring clock the board's cell ages are measured against.
    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn hand(&self) -> &[Piece] {
        &self.hand
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn preview(&self) -> Option<&PlacementPreview> {
        self.preview.as_ref()
    }

    pub fn game_over(&self) -> Option<(u64, Duration)> {
        self.game_over
    }

    /// Lines to draw highlighted this frame; `None` during the off half of a blink.
    pub fn flashing_lines(&self) -> Option<&LineClear> {
        let flash = self.flash.as_ref()?;
        let shown = CLEAR_FLASH.saturating_sub(flash.remaining);
        let phase = shown.as_millis() / BLINK_PERIOD.as_millis();
        (phase % 2 == 0).then_some(&flash.lines)
    }

    /// Runs the clear flash down by `dt`. Returns true once it has just ended.
    pub fn advance_animation(&mut self, dt: Duration) -> bool {
        let Some(flash) = &mut self.flash else {
            return false;
        };
        flash.remaining = flash.remaining.saturating_sub(dt);
        if flash.remaining.is_zero() {
            self.flash = None;
            return true;
        }
        false
    }
}

impl Presenter for TuiPresenter {
    fn redraw(&mut self, session: &GameSession) {
        self.board = session.board().clone();
        self.clock = session.clock();
        self.flash = None;
    }

    fn update_grid(&mut self, board: &Board, clock: u32) {
        self.board.clone_from(board);
        self.clock = clock;
    }

    fn update_hand(&mut self, hand: &[Piece]) {
        self.hand = hand.to_vec();
    }

    fn update_score(&mut self, score: u64) {
        self.score = score;
    }

    fn update_round(&mut self, round: u32) {
        self.round = round;
    }

    fn update_time(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    fn animate_clear(&mut self, lines: &LineClear) -> ClearAnimation {
        self.flash = Some(ClearFlash {
            lines: lines.clone(),
            remaining: CLEAR_FLASH,
        });
        ClearAnimation::Pending
    }

    fn show_preview(&mut self, preview: &PlacementPreview) {
        self.preview = Some(preview.clone());
    }

    fn clear_preview(&mut self) {
        self.preview = None;
    }

    fn show_game_over(&mut self, score: u64, elapsed: Duration) {
        self.game_over = Some((score, elapsed));
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}

#[cfg(test)]
mod tests {
    use tetroku_engine::Cell;

    use super::*;

    #[test]
    fn test_flash_runs_for_fixed_duration() {
        let mut presenter = TuiPresenter::new(7);
        let lines = LineClear::new(vec![1], vec![]);
        assert!(presenter.animate_clear(&lines).is_pending());
        assert_eq!(presenter.flashing_lines(), Some(&lines));

        assert!(!presenter.advance_animation(Duration::from_millis(150)));
        // 150ms in: off half of the second blink.
        assert_eq!(presenter.flashing_lines(), None);
        assert!(!presenter.advance_animation(Duration::from_millis(300)));
        assert!(presenter.advance_animation(Duration::from_millis(50)));
        assert_eq!(presenter.flashing_lines(), None);
        assert!(!presenter.advance_animation(Duration::from_millis(50)));
    }

    #[test]
    fn test_grid_update_stores_clock() {
        let mut presenter = TuiPresenter::new(7);
        let mut board = Board::new(7);
        board.set_cell(2, 3, Cell::Placed, 4);
        presenter.update_grid(&board, 19);
        assert_eq!(presenter.board(), &board);
        assert_eq!(presenter.clock(), 19);
    }

    #[test]
    fn test_game_over_modal_toggles() {
        let mut presenter = TuiPresenter::new(7);
        presenter.show_game_over(90, Duration::from_secs(3));
        assert_eq!(presenter.game_over(), Some((90, Duration::from_secs(3))));
        presenter.hide_game_over();
        assert_eq!(presenter.game_over(), None);
    }
}
