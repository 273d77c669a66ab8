use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};
use tetroku_engine::{Game, GameSession};

use crate::{
    command::play::{input::PlacementCursor, presenter::TuiPresenter},
    tui::{App, Runtime},
    view::widgets::{
        BoardDisplay, GameOverDisplay, HandDisplay, KeyBinding, KeyBindingDisplay, StatsDisplay,
        StatsView, style,
    },
};

const TICK_RATE: f64 = 30.0;
const FRAME_RATE: f64 = 60.0;

const BINDINGS: &[KeyBinding] = &[
    (&["1", "2", "3"], "Select"),
    (&["←↑↓→", "hjkl"], "Move"),
    (&["Enter", "Space"], "Place"),
    (&["Esc"], "Deselect"),
    (&["r"], "Restart"),
    (&["q"], "Quit"),
];

#[derive(Debug)]
pub struct PlayApp {
    game: Game<TuiPresenter>,
    cursor: PlacementCursor,
    selected: Option<usize>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        let size = session.config().board_size;
        Self {
            game: Game::new(session, TuiPresenter::new(size)),
            cursor: PlacementCursor::new(size),
            selected: None,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        self.game.session()
    }

    fn select(&mut self, index: usize) {
        if index < self.game.session().hand().len() {
            self.selected = Some(index);
            self.cursor.reset();
        }
    }

    fn place_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        let session = self.game.session();
        let Some(piece) = session.hand().get(index).copied() else {
            return;
        };
        let Some((x, y)) = self.cursor.target(session.board(), piece.shape()) else {
            return;
        };
        match self.game.place_piece(x, y, index) {
            Ok(_) => {
                self.selected = None;
                self.cursor.reset();
            }
            Err(err) => tracing::debug!(%err, x, y, index, "placement declined"),
        }
    }

    fn restart(&mut self) {
        self.game.restart();
        self.selected = None;
        self.cursor = PlacementCursor::new(self.game.session().config().board_size);
    }

    fn refresh_preview(&mut self) {
        let session = self.game.session();
        let Some((index, piece)) = self
            .selected
            .and_then(|index| Some((index, *session.hand().get(index)?)))
        else {
            self.game.clear_preview();
            return;
        };
        match self.cursor.target(session.board(), piece.shape()) {
            Some((x, y)) => _ = self.game.preview(x, y, index),
            None => self.game.clear_preview(),
        }
    }

    fn stats_view(&self) -> StatsView {
        let presenter = self.game.presenter();
        let stats = self.game.session().stats();
        StatsView {
            score: presenter.score(),
            elapsed: presenter.elapsed(),
            round: presenter.round(),
            turn: stats.turn_count(),
            lines: stats.cleared_lines(),
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(TICK_RATE));
        runtime.set_frame_rate(FRAME_RATE);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        let is_over = self.game.session().phase().is_game_over();
        match event.code {
            KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Char('r') => self.restart(),
            _ if is_over => {}
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(digit) = c.to_digit(10) {
                    self.select(digit as usize - 1);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.cursor.move_by(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.move_by(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_by(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_by(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.place_selected(),
            KeyCode::Esc => self.selected = None,
            _ => {}
        }
        self.refresh_preview();
    }

    fn update(&mut self, _runtime: &mut Runtime, dt: Duration) {
        self.game.tick(dt);
        if self.game.presenter_mut().advance_animation(dt) {
            if let Err(err) = self.game.complete_clear() {
                tracing::warn!(%err, "clear finished without a pending clear");
            }
            self.refresh_preview();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let presenter = self.game.presenter();
        let session = self.game.session();
        let config = session.config();

        let board = BoardDisplay::new(presenter.board())
            .scoring(&config.scoring, presenter.clock())
            .preview(presenter.preview())
            .clearing(presenter.flashing_lines())
            .cursor(self.cursor.cell())
            .block(
                BlockWidget::bordered()
                    .title(" TETROKU ")
                    .border_style(style::BORDER),
            );
        let stats = StatsDisplay::new(self.stats_view())
            .block(BlockWidget::bordered().border_style(style::BORDER));
        let hand = HandDisplay::new(presenter.hand(), config.hand_size).selected(self.selected);
        let keys = KeyBindingDisplay::new(BINDINGS);

        let main_height = board.height().max(stats.height());
        let [main_area, hand_area, keys_area] = Layout::vertical([
            Constraint::Length(main_height),
            Constraint::Length(hand.height()),
            Constraint::Length(KeyBindingDisplay::height()),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [board_area, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let stats_area = stats_area.centered_vertically(Constraint::Length(stats.height()));

        frame.render_widget(&board, board_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(hand, hand_area);
        frame.render_widget(keys, keys_area);

        if let Some((score, elapsed)) = presenter.game_over() {
            frame.render_widget(GameOverDisplay::new(score, elapsed), frame.area());
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use tetroku_engine::{GameConfig, PieceSeed};

    use super::*;

    fn app() -> PlayApp {
        let config = GameConfig {
            prefill_cells: 0,
            ..GameConfig::default()
        };
        PlayApp::new(GameSession::with_seed(config, PieceSeed::from_u128(7)).unwrap())
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_event(&mut Runtime::new(), &Event::Key(KeyEvent::from(code)));
    }

    #[test]
    fn test_select_and_place() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.selected, Some(1));
        assert!(app.game.presenter().preview().is_some_and(|p| p.is_valid));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected, None);
        assert_eq!(app.session().stats().turn_count(), 1);
        assert_eq!(app.session().hand().len(), 2);
        assert!(app.game.presenter().preview().is_none());
    }

    #[test]
    fn test_selecting_empty_slot_is_ignored() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.selected, None);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.selected, None);
        assert!(app.game.presenter().preview().is_none());
    }

    #[test]
    fn test_cursor_keys_move() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor.cell(), (2, 2));
    }

    #[test]
    fn test_quit_and_restart() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session().stats().turn_count(), 0);
        assert_eq!(app.session().hand().len(), 3);
        assert!(!app.should_exit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut app = app();
        app.update(&mut Runtime::new(), Duration::from_millis(250));
        assert_eq!(app.game.presenter().elapsed(), Duration::from_millis(250));
    }
}
