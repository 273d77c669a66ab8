use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, game_over_display::*, hand_display::*,
    key_binding_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod game_over_display;
mod hand_display;
mod key_binding_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const BLUE: Color = Color::Rgb(60, 110, 230);
    pub const GREEN: Color = Color::Rgb(60, 200, 90);
    pub const YELLOW: Color = Color::Rgb(240, 210, 40);
    pub const RED: Color = Color::Rgb(235, 60, 60);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(70, 70, 70);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const CURSOR: Style = fg_bg(color::CYAN, color::BLACK);

    /// Tiles by how much they are worth if cleared now, cheapest first.
    pub const TILE_TIERS: [Style; 4] = [
        bg_only(color::BLUE),
        bg_only(color::GREEN),
        bg_only(color::YELLOW),
        bg_only(color::RED),
    ];
    pub const PREFILLED_MARK: Style = fg_bg(color::BLACK, color::GRAY);

    pub const PREVIEW_VALID: Style = fg_bg(color::WHITE, color::DARK_GRAY);
    pub const PREVIEW_INVALID: Style = fg_bg(color::RED, color::BLACK);
    pub const PREVIEW_CLEARING: Style = Style::new().add_modifier(Modifier::REVERSED);
    pub const CLEARING: Style = bg_only(color::WHITE);

    pub const SELECTED_BORDER: Style = Style::new().fg(color::YELLOW);
    pub const BORDER: Style = Style::new().fg(color::GRAY);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
