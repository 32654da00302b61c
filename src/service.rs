//! Entry point used by the HTTP layer.
//!
//! `analyze` always produces a result: without a credential, or when no
//! caption provider answers, it returns the fixed mock. `generate` has no
//! meaningful placeholder and reports its failures to the caller instead.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;

use crate::capability::{Capability, ProviderLists};
use crate::config::Config;
use crate::error::GenerateError;
use crate::gateway::{HttpGateway, InferenceGateway, Payload, RawResponse};
use crate::media;
use crate::mock::mock_result;
use crate::orchestrator::{EnrichmentPolicy, FallbackOrchestrator};
use crate::postprocess::{format_alt_text, format_caption};
use crate::result::AnalysisResult;

/// A generated image ready to be sent back as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct CaptionService {
    gateway: Arc<dyn InferenceGateway>,
    orchestrator: FallbackOrchestrator,
    image_model: String,
    live: bool,
}

impl CaptionService {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        providers: ProviderLists,
        policy: EnrichmentPolicy,
        image_model: impl Into<String>,
        live: bool,
    ) -> Self {
        Self {
            orchestrator: FallbackOrchestrator::new(gateway.clone(), providers, policy),
            gateway,
            image_model: image_model.into(),
            live,
        }
    }

    /// Wire the HTTP gateway from the start-up configuration.
    pub fn from_config(config: &Config) -> Self {
        let gateway = HttpGateway::new(
            config.base_url.clone(),
            config.api_token.clone(),
            config.analysis_timeout,
            config.generation_timeout,
        );
        Self::new(
            Arc::new(gateway),
            config.providers.clone(),
            config.enrichment,
            config.image_model.clone(),
            config.has_token(),
        )
    }

    /// Whether real providers are called at all.
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub async fn analyze(&self, image: Bytes) -> AnalysisResult {
        if !self.live {
            tracing::warn!("no provider token configured, returning placeholder result");
            return mock_result();
        }

        let started = Instant::now();
        let outcomes = self.orchestrator.run_vision(&Payload::Image(image)).await;

        let Some(basic) = outcomes.caption.text() else {
            tracing::warn!(
                attempts = outcomes.caption.attempts,
                "no caption provider answered, returning placeholder result"
            );
            return mock_result();
        };

        let detailed = outcomes
            .analysis
            .as_ref()
            .and_then(|a| a.text())
            .unwrap_or_default();
        let labels = outcomes
            .classification
            .as_ref()
            .map(|c| c.labels())
            .unwrap_or_default();

        let mut result = AnalysisResult::new(
            format_alt_text(basic),
            format_caption(detailed, basic, labels),
        );
        if let Some(model) = &outcomes.caption.provider {
            result = result.with_extra("model", model.as_str());
        }
        if let Some(score) = outcomes.classification.as_ref().and_then(|c| c.top_score()) {
            result = result.with_score("confidence", score);
        }
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(elapsed_ms, labels = labels.len(), "image analysed");
        result.with_extra("processingTimeMs", elapsed_ms)
    }

    /// One attempt against the single text-to-image provider.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        if !self.live {
            return Err(GenerateError::NotConfigured);
        }

        let started = Instant::now();
        let raw = self
            .gateway
            .call(
                &self.image_model,
                &Payload::Prompt(prompt.trim().to_string()),
                Capability::TextToImage,
            )
            .await?;

        let not_an_image = || GenerateError::NotAnImage {
            provider: self.image_model.clone(),
        };
        let image = match raw {
            RawResponse::Image {
                content_type,
                bytes,
            } => {
                let content_type = if content_type.starts_with("image/") {
                    content_type
                } else {
                    media::sniff_mime(&bytes).ok_or_else(not_an_image)?.to_string()
                };
                GeneratedImage {
                    content_type,
                    bytes,
                }
            }
            RawResponse::Json(body) => {
                tracing::warn!(provider = %self.image_model, %body, "generation answered with JSON");
                return Err(not_an_image());
            }
        };

        tracing::info!(
            provider = %self.image_model,
            bytes = image.bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image generated"
        );
        Ok(image)
    }
}
