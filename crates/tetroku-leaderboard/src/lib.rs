//! Score service for Tetroku.
//!
//! Keeps a table of submitted scores and serves it over HTTP:
//!
//! - `GET /scores`: the best [`MAX_LISTED`] entries, highest score first
//! - `POST /scores`: `{name, score, captcha}`; the captcha token is checked by
//!   a [`CaptchaVerifier`] before the score is stored
//!
//! Errors are JSON bodies of the form `{"error": "..."}`; see
//! [`SubmitError`] for the submission failures and their status codes.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tetroku_leaderboard::{AppState, ScoreStore, ServerConfig, StaticTokenVerifier, router};
//!
//! let config = ServerConfig::default();
//! let state = Arc::new(AppState {
//!     store: ScoreStore::in_memory(),
//!     verifier: StaticTokenVerifier::new(["dev-token".to_owned()]),
//! });
//! let app = router(state, config.cors_origins().unwrap());
//! # drop(app);
//! ```

pub use self::{api::*, captcha::*, config::*, store::*};

mod api;
mod captcha;
mod config;
mod store;
