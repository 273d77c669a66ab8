use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::captcha::VerifierConfig;

/// Origins allowed when the config file names none.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "https://harsh-avinash.github.io",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:4173",
];

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid allowed origin {origin:?}")]
pub struct InvalidOrigin {
    pub origin: String,
}

/// Server settings read from a JSON file; every key is optional.
///
/// ```
/// use tetroku_leaderboard::ServerConfig;
///
/// let config: ServerConfig = serde_json::from_str(r#"{
///     "listen": "0.0.0.0:9000",
///     "store_path": "scores.json",
///     "verifier": { "kind": "static", "tokens": ["dev"] }
/// }"#).unwrap();
/// assert_eq!(config.listen.port(), 9000);
/// assert_eq!(config.allowed_origins.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub allowed_origins: Vec<String>,
    /// Scores are kept in memory only when unset.
    pub store_path: Option<PathBuf>,
    pub verifier: VerifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(str::to_owned).to_vec(),
            store_path: None,
            verifier: VerifierConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>, InvalidOrigin> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| InvalidOrigin {
                    origin: origin.clone(),
                })
            })
            .collect()
    }
}
