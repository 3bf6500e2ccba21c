//! HTTP client for Claude API

use futures_util::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, Response};

use super::error::ExplainError;
use super::explainer::{ChunkStream, Explainer};
use super::models::{ClaudeModel, CreateMessageRequest, Message};
use super::prompt::explanation_prompt;
use super::streaming;

/// Claude API client
pub struct ClaudeClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model every explanation is requested from
    model: ClaudeModel,
    /// Messages endpoint
    api_url: String,
}

impl ClaudeClient {
    /// Claude API messages endpoint
    pub const API_URL: &'static str = "https://api.anthropic.com/v1/messages";
    /// API version header value
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a new Claude client with the given API key and model
    pub fn new(api_key: String, model: ClaudeModel) -> Result<Self, ExplainError> {
        let client = Client::builder()
            .user_agent(concat!("blueprint-explainer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, api_key, model, api_url: Self::API_URL.to_string() })
    }

    /// Send requests to a different messages endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Model used for explanations
    pub fn model(&self) -> ClaudeModel {
        self.model
    }

    /// Send a streaming request and check the response status
    async fn open_stream(
        client: &Client,
        api_url: &str,
        api_key: &str,
        request: &CreateMessageRequest,
    ) -> Result<Response, ExplainError> {
        let response = client
            .post(api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ExplainError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ExplainError::ApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExplainError::ApiError { status: status.as_u16(), message });
        }

        Ok(response)
    }
}

impl Explainer for ClaudeClient {
    fn explain(&self, section_content: &str) -> ChunkStream {
        let request = CreateMessageRequest::new(
            self.model,
            vec![Message::user(explanation_prompt(section_content))],
        );
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let api_url = self.api_url.clone();

        stream::once(async move {
            tracing::debug!("Requesting explanation from {}", request.model);
            let response = Self::open_stream(&client, &api_url, &api_key, &request).await?;
            Ok::<_, ExplainError>(streaming::text_deltas(response.bytes_stream()))
        })
        .try_flatten()
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = ClaudeClient::new("sk-ant-test-key".to_string(), ClaudeModel::Sonnet45).unwrap();
        assert_eq!(client.api_key, "sk-ant-test-key");
        assert_eq!(client.model(), ClaudeModel::Sonnet45);
        assert_eq!(client.api_url, ClaudeClient::API_URL);
    }

    #[test]
    fn api_url_override() {
        let client = ClaudeClient::new("k".into(), ClaudeModel::default())
            .unwrap()
            .with_api_url("http://localhost:8080/v1/messages");
        assert_eq!(client.api_url, "http://localhost:8080/v1/messages");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_on_first_poll() {
        let client = ClaudeClient::new("k".into(), ClaudeModel::default())
            .unwrap()
            .with_api_url("http://127.0.0.1:1/v1/messages");

        let mut chunks = client.explain("## Section");
        let first = chunks.next().await;

        assert!(matches!(first, Some(Err(ExplainError::RequestError(_)))));
        assert!(chunks.next().await.is_none());
    }

    /// First stream item from an endpoint answering with a fixed response
    async fn first_item(
        status: &'static str,
        headers: &'static [(&'static str, &'static str)],
        body: &'static str,
    ) -> Option<Result<String, ExplainError>> {
        let base = crate::test_support::serve_once(status, headers, body).await;
        let client = ClaudeClient::new("sk-ant-test-key".into(), ClaudeModel::default())
            .unwrap()
            .with_api_url(format!("{}/v1/messages", base));
        client.explain("## Section").next().await
    }

    #[tokio::test]
    async fn unauthorized_is_invalid_key() {
        let first = first_item("401 Unauthorized", &[], "{}").await;
        assert!(matches!(
            first,
            Some(Err(ExplainError::ApiError { status: 401, ref message })) if message == "Invalid API key"
        ));
    }

    #[tokio::test]
    async fn rate_limit_reports_retry_after() {
        let first = first_item("429 Too Many Requests", &[("retry-after", "7")], "").await;
        assert!(matches!(first, Some(Err(ExplainError::RateLimited { retry_after_seconds: 7 }))));
    }

    #[tokio::test]
    async fn rate_limit_without_header_defaults() {
        let first = first_item("429 Too Many Requests", &[], "").await;
        assert!(matches!(first, Some(Err(ExplainError::RateLimited { retry_after_seconds: 60 }))));
    }

    #[tokio::test]
    async fn server_error_keeps_body() {
        let first = first_item("500 Internal Server Error", &[], "overloaded").await;
        assert!(matches!(
            first,
            Some(Err(ExplainError::ApiError { status: 500, ref message })) if message == "overloaded"
        ));
    }

    #[tokio::test]
    async fn success_streams_text_deltas() {
        let body = "event: content_block_delta\ndata: {\"delta\":{\"text\":\"Hello \"}}\n\n\
                    event: content_block_delta\ndata: {\"delta\":{\"text\":\"world\"}}\n\n\
                    event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n";
        let base = crate::test_support::serve_once(
            "200 OK",
            &[("content-type", "text/event-stream")],
            body,
        )
        .await;
        let client = ClaudeClient::new("sk-ant-test-key".into(), ClaudeModel::default())
            .unwrap()
            .with_api_url(format!("{}/v1/messages", base));

        let chunks: Vec<String> = client.explain("## Section").map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["Hello ", "world"]);
    }
}
