use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    captcha::{CaptchaError, CaptchaVerifier},
    store::{MAX_LISTED, ScoreEntry, ScoreStore, StoreError},
};

/// Shared state of the score service.
#[derive(Debug)]
pub struct AppState<V> {
    pub store: ScoreStore,
    pub verifier: V,
}

/// Why a submission was refused; the display text is the `error` field of
/// the response body.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum SubmitError {
    #[display("Invalid Request")]
    InvalidRequest { source: serde_json::Error },
    #[display("Missing fields")]
    MissingFields,
    #[display("Invalid Captcha")]
    InvalidCaptcha,
    #[display("Captcha validation failed")]
    CaptchaFailed { source: CaptchaError },
    #[display("Failed to save score")]
    Store { source: StoreError },
}

impl SubmitError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } | Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::InvalidCaptcha => StatusCode::FORBIDDEN,
            Self::CaptchaFailed { .. } | Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// A `POST /scores` body that passed the field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Submission {
    name: String,
    score: i64,
    captcha: String,
}

impl Submission {
    fn parse(body: &[u8]) -> Result<Self, SubmitError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|source| SubmitError::InvalidRequest { source })?;
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let name = text("name");
        let captcha = text("captcha");
        let score = value.get("score").and_then(Value::as_i64);
        match (name, score, captcha) {
            (Some(name), Some(score), Some(captcha)) => Ok(Self {
                name,
                score,
                captcha,
            }),
            _ => Err(SubmitError::MissingFields),
        }
    }
}

async fn list_scores<V>(State(state): State<Arc<AppState<V>>>) -> Json<Vec<ScoreEntry>> {
    Json(state.store.top(MAX_LISTED).await)
}

async fn submit_score<V>(
    State(state): State<Arc<AppState<V>>>,
    body: Bytes,
) -> Result<Json<Value>, SubmitError>
where
    V: CaptchaVerifier,
{
    let submission = Submission::parse(&body)?;

    match state.verifier.verify(&submission.captcha).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(name = %submission.name, "captcha rejected");
            return Err(SubmitError::InvalidCaptcha);
        }
        Err(source) => {
            tracing::error!(error = %source, "captcha verification failed");
            return Err(SubmitError::CaptchaFailed { source });
        }
    }

    let entry = ScoreEntry::new(&submission.name, submission.score, Utc::now());
    tracing::info!(name = %entry.name, score = entry.score, "score submitted");
    state.store.insert(entry).await.map_err(|source| {
        tracing::error!(error = %source, "failed to persist scores");
        SubmitError::Store { source }
    })?;
    Ok(Json(json!({ "success": true })))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// `GET /scores` and `POST /scores`, with CORS limited to `allowed_origins`.
///
/// Every other path or method answers `404 {"error":"Not Found"}`.
pub fn router<V>(state: Arc<AppState<V>>, allowed_origins: Vec<HeaderValue>) -> Router
where
    V: CaptchaVerifier,
{
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            "/scores",
            get(list_scores::<V>)
                .post(submit_score::<V>)
                .options(|| async { StatusCode::OK })
                .fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
}
