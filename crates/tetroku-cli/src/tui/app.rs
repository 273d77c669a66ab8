use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// Application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure the tick rate here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles key input, resizes and other terminal events.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    /// Advances application state; `dt` is the time since the previous tick.
    fn update(&mut self, runtime: &mut Runtime, dt: Duration);

    fn draw(&self, frame: &mut Frame);
}
