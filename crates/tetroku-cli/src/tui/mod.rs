//! Minimal terminal application runtime.
//!
//! [`Runtime::run`] owns the terminal and drives an [`App`] with three kinds
//! of events: fixed-rate ticks, renders after state changes, and crossterm
//! input events.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event_loop;
mod runtime;
