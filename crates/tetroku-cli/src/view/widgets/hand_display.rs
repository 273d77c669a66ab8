use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, Widget},
};
use tetroku_engine::Piece;

use super::{CellDisplay, style};

/// Cells reserved per side of a slot; fits every catalog shape in any rotation.
const SLOT_CELLS: u16 = 4;

/// The pieces in hand, one numbered slot each.
#[derive(Debug)]
pub struct HandDisplay<'a> {
    hand: &'a [Piece],
    slots: usize,
    selected: Option<usize>,
}

impl<'a> HandDisplay<'a> {
    pub fn new(hand: &'a [Piece], slots: usize) -> Self {
        Self {
            hand,
            slots: slots.max(hand.len()),
            selected: None,
        }
    }

    pub fn selected(self, selected: Option<usize>) -> Self {
        Self { selected, ..self }
    }

    fn slot_block(&self, index: usize) -> BlockWidget<'static> {
        let border_style = if self.selected == Some(index) {
            style::SELECTED_BORDER
        } else {
            style::BORDER
        };
        BlockWidget::bordered()
            .title(format!(" {} ", index + 1))
            .border_style(border_style)
    }

    pub fn slot_width() -> u16 {
        SLOT_CELLS * CellDisplay::width() + 2
    }

    pub fn slot_height() -> u16 {
        SLOT_CELLS * CellDisplay::height() + 2
    }

    pub fn width(&self) -> u16 {
        u16::try_from(self.slots).unwrap_or(u16::MAX) * Self::slot_width()
    }

    pub fn height(&self) -> u16 {
        Self::slot_height()
    }
}

impl Widget for HandDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &HandDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let slot_constraints =
            (0..self.slots).map(|_| Constraint::Length(HandDisplay::slot_width()));
        let horizontal = Layout::horizontal(slot_constraints).flex(Flex::Center);
        for (index, slot_area) in area.layout_vec(&horizontal).into_iter().enumerate() {
            let block = self.slot_block(index);
            let inner = block.inner(slot_area);
            block.render(slot_area, buf);
            if let Some(piece) = self.hand.get(index) {
                render_piece(piece, inner, buf);
            }
        }
    }
}

fn render_piece(piece: &Piece, area: Rect, buf: &mut Buffer) {
    let shape = piece.shape();
    let cols = u16::try_from(shape.cols()).unwrap_or(SLOT_CELLS);
    let rows = u16::try_from(shape.rows()).unwrap_or(SLOT_CELLS);
    let piece_area = area.centered(
        Constraint::Length(cols * CellDisplay::width()),
        Constraint::Length(rows * CellDisplay::height()),
    );

    let horizontal =
        Layout::horizontal((0..cols).map(|_| Constraint::Length(CellDisplay::width())));
    let vertical = Layout::vertical((0..rows).map(|_| Constraint::Length(CellDisplay::height())));
    let tile = CellDisplay::new(style::TILE_TIERS[0], "");
    for (row, row_area) in piece_area.layout_vec(&vertical).into_iter().enumerate() {
        for (col, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
            if shape.is_filled(row, col) {
                tile.render(cell_area, buf);
            }
        }
    }
}
