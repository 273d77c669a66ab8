use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetroku_engine::Cell;

use super::style;

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const EMPTY_DOT: Self = Self::new(style::EMPTY_DOT, "··");
    pub const CURSOR: Self = Self::new(style::CURSOR, "()");
    pub const PREVIEW_VALID: Self = Self::new(style::PREVIEW_VALID, "[]");
    pub const PREVIEW_INVALID: Self = Self::new(style::PREVIEW_INVALID, "><");
    pub const CLEARING: Self = Self::new(style::CLEARING, "");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    /// Display for an occupied or empty cell; `tier` indexes
    /// [`style::TILE_TIERS`] (clamped).
    pub fn from_cell(cell: Cell, tier: usize) -> Self {
        let tile = style::TILE_TIERS[tier.min(style::TILE_TIERS.len() - 1)];
        match cell {
            Cell::Empty => Self::EMPTY_DOT,
            Cell::Placed => Self::new(tile, ""),
            Cell::Prefilled => {
                let style = style::PREFILLED_MARK.bg(tile.bg.unwrap_or_default());
                Self::new(style, "▪▪")
            }
        }
    }

    /// Same symbol, extra style on top.
    #[must_use]
    pub fn patch(self, extra: Style) -> Self {
        Self {
            style: self.style.patch(extra),
            ..self
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the symbol.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
