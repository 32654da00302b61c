//! One HTTP call to one named inference endpoint.
//!
//! The gateway never retries. Falling back means trying the *next*
//! provider, which is the orchestrator's job.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::capability::Capability;
use crate::error::GatewayError;

/// Longest slice of an error body kept for logs.
const ERROR_BODY_PREVIEW: usize = 300;

/// What is sent to a provider.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw image content for the vision capabilities.
    Image(Bytes),
    /// Text prompt for image generation, sent as `{"inputs": prompt}`.
    Prompt(String),
}

/// Provider-specific response, not yet interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Json(serde_json::Value),
    Image { content_type: String, bytes: Bytes },
}

#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn call(
        &self,
        provider: &str,
        payload: &Payload,
        capability: Capability,
    ) -> Result<RawResponse, GatewayError>;
}

/// Hugging Face style inference API: `POST {base_url}/{provider}`.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    analysis_timeout: Duration,
    generation_timeout: Duration,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        analysis_timeout: Duration,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
            analysis_timeout,
            generation_timeout,
        }
    }

    fn endpoint(&self, provider: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), provider)
    }

    fn timeout_for(&self, capability: Capability) -> Duration {
        if capability.is_vision() {
            self.analysis_timeout
        } else {
            self.generation_timeout
        }
    }
}

#[async_trait]
impl InferenceGateway for HttpGateway {
    async fn call(
        &self,
        provider: &str,
        payload: &Payload,
        capability: Capability,
    ) -> Result<RawResponse, GatewayError> {
        let timeout = self.timeout_for(capability);
        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    provider: provider.to_string(),
                    after: timeout,
                }
            } else {
                GatewayError::Network {
                    provider: provider.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let mut request = self.client.post(self.endpoint(provider)).timeout(timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Payload::Image(bytes) => request
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes.clone()),
            Payload::Prompt(prompt) => request.json(&serde_json::json!({ "inputs": prompt })),
        };

        tracing::debug!(%provider, %capability, "calling inference endpoint");
        let response = request.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                provider: provider.to_string(),
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await.map_err(transport)?;

        if capability.is_vision() || content_type.starts_with("application/json") {
            serde_json::from_slice(&bytes)
                .map(RawResponse::Json)
                .map_err(|e| GatewayError::InvalidBody {
                    provider: provider.to_string(),
                    message: e.to_string(),
                })
        } else {
            Ok(RawResponse::Image {
                content_type,
                bytes,
            })
        }
    }
}
