use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Stylize as _,
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear, Paragraph, Widget},
};

use super::{KeyBinding, KeyBindingDisplay, format_elapsed, style};

const BINDINGS: &[KeyBinding] = &[(&["r"], "Restart"), (&["q"], "Quit")];

/// Centred modal shown once no hand piece fits.
#[derive(Debug, Clone, Copy)]
pub struct GameOverDisplay {
    score: u64,
    elapsed: Duration,
}

impl GameOverDisplay {
    pub fn new(score: u64, elapsed: Duration) -> Self {
        Self { score, elapsed }
    }

    pub fn width() -> u16 {
        26
    }

    pub fn height() -> u16 {
        8
    }
}

impl Widget for GameOverDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.centered(
            Constraint::Length(Self::width()),
            Constraint::Length(Self::height()),
        );
        Clear.render(area, buf);

        let block = BlockWidget::bordered()
            .title(Line::from(" GAME OVER ").bold().centered())
            .border_style(style::SELECTED_BORDER)
            .style(style::DEFAULT);
        let inner = block.inner(area);
        block.render(area, buf);

        let [body_area, keys_area] = inner.layout(&Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
        ]));
        let body = Text::from(vec![
            Line::default(),
            Line::from(format!("Score: {}", self.score)),
            Line::from(format!("Time:  {}", format_elapsed(self.elapsed))),
        ]);
        Paragraph::new(body).centered().render(body_area, buf);
        KeyBindingDisplay::new(BINDINGS).render(keys_area, buf);
    }
}
