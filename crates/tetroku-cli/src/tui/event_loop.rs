use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

#[derive(Debug, Clone)]
pub(super) enum TuiEvent {
    /// Fixed-rate update; carries the time since the previous tick.
    Tick(Duration),
    /// Redraw after something changed.
    Render,
    Crossterm(Event),
}

/// Produces [`TuiEvent`]s in priority order: tick, render, input.
///
/// Renders happen only when a tick or an input event made the screen dirty,
/// and never more often than `min_render_interval`.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    min_render_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            min_render_interval: Duration::ZERO,
            last_tick: now,
            last_render: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    pub(super) fn set_min_render_interval(&mut self, interval: Duration) {
        self.min_render_interval = interval;
    }

    /// Blocks until the next event is due.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval {
                let since = now.duration_since(self.last_tick);
                if since >= interval {
                    self.last_tick = now;
                    self.dirty = true;
                    return Ok(TuiEvent::Tick(since));
                }
            }

            if self.dirty && now.duration_since(self.last_render) >= self.min_render_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }

    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render = self
            .dirty
            .then(|| self.last_render + self.min_render_interval);
        let deadline = [next_tick, next_render].into_iter().flatten().min()?;
        Some(deadline.saturating_duration_since(now))
    }
}
