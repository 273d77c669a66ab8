use std::{collections::HashSet, future::Future, time::Duration};

use bytes::Bytes;
use http_body_util::{BodyExt as _, Full};
use hyper::{Request, StatusCode, Uri, header::CONTENT_TYPE};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};

/// Verifier requests give up after this long.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Decides whether a captcha token proves a human submitted the score.
pub trait CaptchaVerifier: Send + Sync + 'static {
    /// `Ok(false)` for a token the verifier rejects; `Err` when no answer
    /// could be obtained.
    fn verify(&self, token: &str) -> impl Future<Output = Result<bool, CaptchaError>> + Send;
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum CaptchaError {
    #[display("failed to build verifier request: {source}")]
    Build { source: hyper::http::Error },
    #[display("verifier request failed: {source}")]
    Request {
        source: hyper_util::client::legacy::Error,
    },
    #[display("verifier did not answer within {}s", VERIFY_TIMEOUT.as_secs())]
    Timeout,
    #[display("verifier answered with status {status}")]
    Status { status: StatusCode },
    #[display("failed to read verifier response: {source}")]
    Body { source: hyper::Error },
    #[display("verifier JSON error: {source}")]
    Json { source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum VerifierConfigError {
    #[display("invalid verifier endpoint {endpoint:?}")]
    InvalidEndpoint { endpoint: String },
    #[display("verifier endpoint {endpoint:?} must use plain http")]
    UnsupportedScheme { endpoint: String },
}

/// Which verifier the server uses, as written in its config file.
///
/// ```
/// use tetroku_leaderboard::VerifierConfig;
///
/// let config: VerifierConfig = serde_json::from_str(r#"{
///     "kind": "siteverify",
///     "endpoint": "http://127.0.0.1:3000/d9256640cf/siteverify",
///     "secret": "s3cret"
/// }"#).unwrap();
/// assert!(config.build().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum VerifierConfig {
    /// A Cap-style standalone server reached over HTTP.
    Siteverify { endpoint: String, secret: String },
    /// A fixed token list, for development.
    Static { tokens: Vec<String> },
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::Static { tokens: vec![] }
    }
}

impl VerifierConfig {
    pub fn build(&self) -> Result<AnyVerifier, VerifierConfigError> {
        Ok(match self {
            Self::Siteverify { endpoint, secret } => {
                AnyVerifier::Siteverify(HttpSiteverifyVerifier::new(endpoint, secret.clone())?)
            }
            Self::Static { tokens } => {
                AnyVerifier::Static(StaticTokenVerifier::new(tokens.iter().cloned()))
            }
        })
    }
}

/// Verifier chosen at startup from [`VerifierConfig`].
#[derive(Debug, Clone)]
pub enum AnyVerifier {
    Siteverify(HttpSiteverifyVerifier),
    Static(StaticTokenVerifier),
}

impl CaptchaVerifier for AnyVerifier {
    async fn verify(&self, token: &str) -> Result<bool, CaptchaError> {
        match self {
            Self::Siteverify(verifier) => verifier.verify(token).await,
            Self::Static(verifier) => verifier.verify(token).await,
        }
    }
}

#[derive(Debug, Serialize)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
}

/// Posts `{secret, response}` to a siteverify endpoint and reads `{success}`.
#[derive(Debug, Clone)]
pub struct HttpSiteverifyVerifier {
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: Uri,
    secret: String,
}

impl HttpSiteverifyVerifier {
    pub fn new(endpoint: &str, secret: String) -> Result<Self, VerifierConfigError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|_| VerifierConfigError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
            })?;
        match uri.scheme_str() {
            Some("http") => {}
            Some(_) => {
                return Err(VerifierConfigError::UnsupportedScheme {
                    endpoint: endpoint.to_owned(),
                });
            }
            None => {
                return Err(VerifierConfigError::InvalidEndpoint {
                    endpoint: endpoint.to_owned(),
                });
            }
        }
        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            endpoint: uri,
            secret,
        })
    }

    async fn siteverify(&self, token: &str) -> Result<bool, CaptchaError> {
        let body = serde_json::to_vec(&SiteverifyRequest {
            secret: &self.secret,
            response: token,
        })
        .map_err(|source| CaptchaError::Json { source })?;
        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|source| CaptchaError::Build { source })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| CaptchaError::Request { source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CaptchaError::Status { status });
        }
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|source| CaptchaError::Body { source })?
            .to_bytes();
        let reply: SiteverifyResponse =
            serde_json::from_slice(&bytes).map_err(|source| CaptchaError::Json { source })?;
        Ok(reply.success)
    }
}

impl CaptchaVerifier for HttpSiteverifyVerifier {
    async fn verify(&self, token: &str) -> Result<bool, CaptchaError> {
        tokio::time::timeout(VERIFY_TIMEOUT, self.siteverify(token))
            .await
            .map_err(|_| CaptchaError::Timeout)?
    }
}

/// Accepts exactly the configured tokens.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashSet<String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl CaptchaVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<bool, CaptchaError> {
        Ok(self.tokens.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};

    use super::*;

    #[tokio::test]
    async fn test_static_tokens() {
        let verifier = StaticTokenVerifier::new(["good".to_owned()]);
        assert!(verifier.verify("good").await.unwrap());
        assert!(!verifier.verify("bad").await.unwrap());
        assert!(StaticTokenVerifier::default().is_empty());
    }

    #[test]
    fn test_endpoint_validation() {
        let err = HttpSiteverifyVerifier::new("https://cap.example/siteverify", String::new())
            .unwrap_err();
        assert!(matches!(err, VerifierConfigError::UnsupportedScheme { .. }));
        let err = HttpSiteverifyVerifier::new("/siteverify", String::new()).unwrap_err();
        assert!(matches!(err, VerifierConfigError::InvalidEndpoint { .. }));
        let err = HttpSiteverifyVerifier::new("not a uri", String::new()).unwrap_err();
        assert!(matches!(err, VerifierConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_config_kinds() {
        let config: VerifierConfig =
            serde_json::from_str(r#"{ "kind": "static", "tokens": ["a"] }"#).unwrap();
        assert!(matches!(config.build().unwrap(), AnyVerifier::Static(_)));
        assert!(serde_json::from_str::<VerifierConfig>(r#"{ "kind": "magic" }"#).is_err());
        assert_eq!(VerifierConfig::default(), VerifierConfig::Static { tokens: vec![] });
    }

    async fn spawn_verifier(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/siteverify")
    }

    #[tokio::test]
    async fn test_siteverify_roundtrip() {
        let app = Router::new().route(
            "/siteverify",
            post(|Json(body): Json<Value>| async move {
                let ok = body["secret"] == "s" && body["response"] == "human";
                Json(json!({ "success": ok }))
            }),
        );
        let endpoint = spawn_verifier(app).await;
        let verifier = HttpSiteverifyVerifier::new(&endpoint, "s".to_owned()).unwrap();
        assert!(verifier.verify("human").await.unwrap());
        assert!(!verifier.verify("robot").await.unwrap());
    }

    #[tokio::test]
    async fn test_siteverify_faults() {
        let app = Router::new().route(
            "/siteverify",
            post(|| async { (hyper::StatusCode::BAD_GATEWAY, "down") }),
        );
        let endpoint = spawn_verifier(app).await;
        let verifier = HttpSiteverifyVerifier::new(&endpoint, "s".to_owned()).unwrap();
        let err = verifier.verify("human").await.unwrap_err();
        assert!(err.is_status(), "{err}");

        let app = Router::new().route("/siteverify", post(|| async { "plain text" }));
        let endpoint = spawn_verifier(app).await;
        let verifier = HttpSiteverifyVerifier::new(&endpoint, "s".to_owned()).unwrap();
        assert!(verifier.verify("human").await.unwrap_err().is_json());
    }
}
