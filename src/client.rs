use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{GateError, Result};
use crate::models::{ReviewRequest, ReviewResponse};

/// Path of the review endpoint relative to the base URL
pub const REVIEW_PATH: &str = "/api/v1/review";

/// Anything that can turn a review request into a review response.
///
/// The collectors depend on this rather than on [`ReviewClient`] directly.
pub trait ReviewService {
    fn submit_review(
        &self,
        request: &ReviewRequest,
    ) -> impl Future<Output = Result<ReviewResponse>> + Send;
}

/// Root status payload of the review service
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// HTTP client for the review service
pub struct ReviewClient {
    client: Client,
    base_url: String,
}

impl ReviewClient {
    /// Create a client after validating the base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(GateError::MissingBaseUrl);
        }

        let parsed = reqwest::Url::parse(trimmed).map_err(|e| GateError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GateError::InvalidBaseUrl {
                url: trimmed.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client: Client::new(),
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the review endpoint
    pub fn review_url(&self) -> String {
        format!("{}{}", self.base_url, REVIEW_PATH)
    }

    /// Submit a review request; exactly one POST, no retries
    #[instrument(skip(self, request), fields(language = %request.language(), context = ?request.context()))]
    pub async fn review(&self, request: &ReviewRequest) -> Result<ReviewResponse> {
        let url = self.review_url();
        debug!(%url, "Sending review request");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Status { status, body });
        }

        let review: ReviewResponse = response.json().await?;

        info!(
            decision = %review.decision,
            issues = review.issues.len(),
            "Review received"
        );

        Ok(review)
    }

    /// Query the service's root status endpoint
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

impl ReviewService for ReviewClient {
    fn submit_review(
        &self,
        request: &ReviewRequest,
    ) -> impl Future<Output = Result<ReviewResponse>> + Send {
        self.review(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, Language, ReviewContextKind, Severity};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rejects_missing_base_url() {
        assert!(matches!(
            ReviewClient::new("  "),
            Err(GateError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            ReviewClient::new("not a url"),
            Err(GateError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ReviewClient::new("ftp://example.com"),
            Err(GateError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_review_url_tolerates_trailing_slash() {
        let client = ReviewClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.review_url(), "http://127.0.0.1:8000/api/v1/review");
    }

    #[tokio::test]
    async fn test_posts_request_and_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/review"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "language": "python",
                "context": "review",
                "code": "eval(x)"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "decision": "BLOCK",
                "risk_score": 90,
                "issues": [{"severity": "CRITICAL", "message": "SQL injection"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReviewClient::new(&server.uri()).unwrap();
        let request = ReviewRequest::single(Language::Python, ReviewContextKind::Review, "eval(x)");
        let response = client.review(&request).await.unwrap();

        assert_eq!(response.decision, Decision::Block);
        assert_eq!(response.risk_score, Some(90.0));
        assert_eq!(response.issues[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/review"))
            .respond_with(ResponseTemplate::new(422).set_body_string("Invalid or empty JSON body"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReviewClient::new(&server.uri()).unwrap();
        let request = ReviewRequest::single(Language::Python, ReviewContextKind::Review, "x = 1");
        let err = client.review(&request).await.unwrap_err();

        match err {
            GateError::Status { status, body } => {
                assert_eq!(status.as_u16(), 422);
                assert!(body.contains("Invalid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/review"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ReviewClient::new(&server.uri()).unwrap();
        let request = ReviewRequest::single(Language::C, ReviewContextKind::Review, "int main;");
        let err = client.review(&request).await.unwrap_err();

        assert!(matches!(err, GateError::Transport(_)));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "AI Code Quality Gate is running"})),
            )
            .mount(&server)
            .await;

        let client = ReviewClient::new(&server.uri()).unwrap();
        let health = client.health().await.unwrap();
        assert!(health.status.contains("running"));
    }
}
