use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetroku_engine::{Board, LineClear, PlacementPreview, ScoringRule};

use super::{CellDisplay, style};

/// The board grid with the placement preview, cursor and clear flash on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    scoring: Option<(&'a ScoringRule, u32)>,
    preview: Option<&'a PlacementPreview>,
    clearing: Option<&'a LineClear>,
    cursor: Option<(i32, i32)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            scoring: None,
            preview: None,
            clearing: None,
            cursor: None,
            block: None,
        }
    }

    /// Colours tiles by what they would score at clock value `clock`.
    pub fn scoring(self, rule: &'a ScoringRule, clock: u32) -> Self {
        Self {
            scoring: Some((rule, clock)),
            ..self
        }
    }

    pub fn preview(self, preview: Option<&'a PlacementPreview>) -> Self {
        Self { preview, ..self }
    }

    /// Lines to flash; `None` while no clear is being animated.
    pub fn clearing(self, clearing: Option<&'a LineClear>) -> Self {
        Self { clearing, ..self }
    }

    pub fn cursor(self, cell: (i32, i32)) -> Self {
        Self {
            cursor: Some(cell),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.cells_len() * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.cells_len() * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cells_len(&self) -> u16 {
        u16::try_from(self.board.size()).unwrap_or(u16::MAX)
    }

    fn tier(&self, x: usize, y: usize) -> usize {
        let Some((rule, clock)) = self.scoring else {
            return 0;
        };
        let age = clock.saturating_sub(self.board.age(x, y));
        rule.buckets()
            .iter()
            .filter(|bucket| bucket.min_age <= age)
            .count()
            .saturating_sub(1)
    }

    fn cell_display(&self, x: usize, y: usize) -> CellDisplay {
        let cell = self.board.cell(x, y);
        let base = CellDisplay::from_cell(cell, self.tier(x, y));

        if let Some(lines) = self.clearing
            && lines.contains_cell(x, y)
        {
            return CellDisplay::CLEARING;
        }
        if let Some(preview) = self.preview {
            if preview.covers(x, y) {
                return if preview.is_valid {
                    CellDisplay::PREVIEW_VALID
                } else {
                    CellDisplay::PREVIEW_INVALID
                };
            }
            if preview.is_clearing(x, y) {
                return base.patch(style::PREVIEW_CLEARING);
            }
        }
        let on_cursor = self
            .cursor
            .is_some_and(|(cx, cy)| self.board.cell_at(cx, cy) == Some((x, y)));
        if on_cursor && cell.is_empty() {
            return CellDisplay::CURSOR;
        }
        base
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let size = self.board.size();
        let col_constraints = (0..size).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..size).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints).flex(Flex::Center);

        for (y, row_area) in area.layout_vec(&vertical).into_iter().enumerate() {
            for (x, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
                self.cell_display(x, y).render(cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetroku_engine::Cell;

    use super::*;

    #[test]
    fn test_tiers_follow_scoring_buckets() {
        let mut board = Board::new(4);
        board.set_cell(0, 0, Cell::Placed, 10);
        board.set_cell(1, 0, Cell::Placed, 5);
        board.set_cell(2, 0, Cell::Placed, 2);
        board.set_cell(3, 0, Cell::Prefilled, 0);
        let rule = ScoringRule::round_based();
        let display = BoardDisplay::new(&board).scoring(&rule, 10);
        assert_eq!(display.tier(0, 0), 0);
        assert_eq!(display.tier(1, 0), 1);
        assert_eq!(display.tier(2, 0), 2);
        assert_eq!(display.tier(3, 0), 3);
        assert_eq!(BoardDisplay::new(&board).tier(3, 0), 0);
    }

    #[test]
    fn test_size_includes_block() {
        let board = Board::new(7);
        let display = BoardDisplay::new(&board);
        assert_eq!((display.width(), display.height()), (14, 7));
        let display = display.block(BlockWidget::bordered());
        assert_eq!((display.width(), display.height()), (16, 9));
    }

    #[test]
    fn test_render_marks_preview_and_cursor() {
        let board = Board::new(4);
        let preview = PlacementPreview {
            cells: vec![(0, 0), (1, 0)],
            is_valid: true,
            clearing_rows: vec![],
            clearing_cols: vec![],
        };
        let display = BoardDisplay::new(&board)
            .preview(Some(&preview))
            .cursor((3, 3));
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "[");
        assert_eq!(buf[(3, 0)].symbol(), "]");
        assert_eq!(buf[(6, 3)].symbol(), "(");
        assert_eq!(buf[(4, 1)].symbol(), "·");
    }
}
