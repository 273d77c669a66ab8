use std::{io, time::Duration};

use super::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// Owns the event loop and runs an [`App`] inside the terminal.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
        }
    }

    /// Sets the tick rate in Hz; `None` disables ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Caps redraws at `rate` frames per second.
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_min_render_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs `app` until [`App::should_exit`] returns true.
    ///
    /// 1. Calls [`App::init`]
    /// 2. Dispatches events:
    ///    - tick: [`App::update`]
    ///    - render: [`App::draw`]
    ///    - terminal event: [`App::handle_event`]
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(dt) => app.update(&mut self, dt),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
