//! Sequential provider fallback per capability.
//!
//! Providers in a list are tried strictly in order and never concurrently:
//! the first usable answer wins and the rest of the list is not called.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capability::{Capability, ProviderLists};
use crate::error::GatewayError;
use crate::gateway::{InferenceGateway, Payload};
use crate::normalize::{normalize, Normalized};

/// Whether the enrichment capabilities (analysis, classification) run when
/// the caption capability found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrichmentPolicy {
    /// Skip enrichment unless a caption was found.
    #[default]
    RequiresCaption,
    /// Always run enrichment.
    Always,
}

/// Record of one provider call. Lives only for the capability loop.
#[derive(Debug)]
pub struct ProviderAttempt<'a> {
    pub provider: &'a str,
    pub capability: Capability,
    pub outcome: Result<Normalized, GatewayError>,
    pub elapsed: Duration,
}

impl ProviderAttempt<'_> {
    pub fn usable(&self) -> bool {
        matches!(&self.outcome, Ok(n) if n.is_usable())
    }

    fn log(&self) {
        let elapsed_ms = self.elapsed.as_millis() as u64;
        match &self.outcome {
            Ok(n) if n.is_usable() => tracing::info!(
                provider = self.provider,
                capability = %self.capability,
                elapsed_ms,
                "provider answered"
            ),
            Ok(_) => tracing::info!(
                provider = self.provider,
                capability = %self.capability,
                elapsed_ms,
                "provider answer unusable, trying next"
            ),
            Err(e) => tracing::info!(
                provider = self.provider,
                capability = %self.capability,
                elapsed_ms,
                error = %e,
                "provider failed, trying next"
            ),
        }
    }
}

/// Result of running one capability's provider list.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityOutcome {
    pub capability: Capability,
    /// Provider whose answer was kept.
    pub provider: Option<String>,
    /// `Unusable` when every provider failed.
    pub value: Normalized,
    pub attempts: usize,
}

impl CapabilityOutcome {
    fn failed(capability: Capability, attempts: usize) -> Self {
        Self {
            capability,
            provider: None,
            value: Normalized::Unusable,
            attempts,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.value.is_usable()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Normalized::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn labels(&self) -> &[String] {
        match &self.value {
            Normalized::Labels { labels, .. } => labels,
            _ => &[],
        }
    }

    pub fn top_score(&self) -> Option<f64> {
        match &self.value {
            Normalized::Labels { top_score, .. } => *top_score,
            _ => None,
        }
    }
}

/// Outcomes of the vision capabilities for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionOutcomes {
    pub caption: CapabilityOutcome,
    /// `None` when skipped by the [`EnrichmentPolicy`].
    pub analysis: Option<CapabilityOutcome>,
    pub classification: Option<CapabilityOutcome>,
}

/// One entry of a provider list, bound to the gateway that reaches it.
struct Provider<'a> {
    id: &'a str,
    capability: Capability,
    gateway: &'a dyn InferenceGateway,
}

impl<'a> Provider<'a> {
    async fn attempt(&self, payload: &Payload) -> ProviderAttempt<'a> {
        let started = Instant::now();
        let outcome = self
            .gateway
            .call(self.id, payload, self.capability)
            .await
            .map(|raw| normalize(&raw, self.capability));
        ProviderAttempt {
            provider: self.id,
            capability: self.capability,
            outcome,
            elapsed: started.elapsed(),
        }
    }
}

pub struct FallbackOrchestrator {
    gateway: Arc<dyn InferenceGateway>,
    providers: ProviderLists,
    policy: EnrichmentPolicy,
}

impl FallbackOrchestrator {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        providers: ProviderLists,
        policy: EnrichmentPolicy,
    ) -> Self {
        Self {
            gateway,
            providers,
            policy,
        }
    }

    /// Try the capability's providers in order until one answers usably.
    pub async fn run_capability(&self, capability: Capability, payload: &Payload) -> CapabilityOutcome {
        let Some(list) = self.providers.for_capability(capability) else {
            return CapabilityOutcome::failed(capability, 0);
        };

        let mut attempts = 0;
        for id in list.iter() {
            let provider = Provider {
                id,
                capability,
                gateway: self.gateway.as_ref(),
            };
            let attempt = provider.attempt(payload).await;
            attempts += 1;
            attempt.log();

            if attempt.usable() {
                if let Ok(value) = attempt.outcome {
                    return CapabilityOutcome {
                        capability,
                        provider: Some(id.to_string()),
                        value,
                        attempts,
                    };
                }
            }
        }

        tracing::warn!(%capability, attempts, "every provider failed");
        CapabilityOutcome::failed(capability, attempts)
    }

    /// Caption, then analysis and classification as the policy allows.
    pub async fn run_vision(&self, image: &Payload) -> VisionOutcomes {
        let caption = self.run_capability(Capability::Caption, image).await;

        let enrich = match self.policy {
            EnrichmentPolicy::RequiresCaption => caption.succeeded(),
            EnrichmentPolicy::Always => true,
        };
        if !enrich {
            tracing::debug!("no caption found, skipping analysis and classification");
            return VisionOutcomes {
                caption,
                analysis: None,
                classification: None,
            };
        }

        let analysis = self.run_capability(Capability::Analysis, image).await;
        let classification = self.run_capability(Capability::Classification, image).await;
        VisionOutcomes {
            caption,
            analysis: Some(analysis),
            classification: Some(classification),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::capability::ProviderList;
    use crate::gateway::RawResponse;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Gateway answering from a fixed script and recording every call.
    #[derive(Default)]
    pub(crate) struct ScriptedGateway {
        script: HashMap<String, Result<RawResponse, u16>>,
        calls: Mutex<Vec<(String, Capability)>>,
    }

    impl ScriptedGateway {
        pub(crate) fn answer(mut self, provider: &str, value: Value) -> Self {
            self.script.insert(provider.to_string(), Ok(RawResponse::Json(value)));
            self
        }

        pub(crate) fn image(mut self, provider: &str, content_type: &str, bytes: &'static [u8]) -> Self {
            self.script.insert(
                provider.to_string(),
                Ok(RawResponse::Image {
                    content_type: content_type.to_string(),
                    bytes: axum::body::Bytes::from_static(bytes),
                }),
            );
            self
        }

        pub(crate) fn fail(mut self, provider: &str, status: u16) -> Self {
            self.script.insert(provider.to_string(), Err(status));
            self
        }

        pub(crate) fn calls(&self) -> Vec<(String, Capability)> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn called(&self, provider: &str) -> usize {
            self.calls().iter().filter(|(p, _)| p == provider).count()
        }
    }

    #[async_trait]
    impl InferenceGateway for ScriptedGateway {
        async fn call(
            &self,
            provider: &str,
            _payload: &Payload,
            capability: Capability,
        ) -> Result<RawResponse, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((provider.to_string(), capability));
            match self.script.get(provider) {
                Some(Ok(raw)) => Ok(raw.clone()),
                Some(Err(status)) => Err(GatewayError::Status {
                    provider: provider.to_string(),
                    status: *status,
                    body: String::new(),
                }),
                None => Err(GatewayError::Network {
                    provider: provider.to_string(),
                    message: "connection refused".into(),
                }),
            }
        }
    }

    pub(crate) fn lists() -> ProviderLists {
        ProviderLists {
            caption: ProviderList::new(["cap-a", "cap-b", "cap-c"]),
            analysis: ProviderList::new(["ana-a", "ana-b"]),
            classification: ProviderList::new(["cls-a", "cls-b"]),
        }
    }

    fn orchestrator(gateway: Arc<ScriptedGateway>, policy: EnrichmentPolicy) -> FallbackOrchestrator {
        FallbackOrchestrator::new(gateway, lists(), policy)
    }

    fn image() -> Payload {
        Payload::Image(axum::body::Bytes::from_static(b"img"))
    }

    #[tokio::test]
    async fn first_usable_provider_short_circuits_the_list() {
        let gw = Arc::new(
            ScriptedGateway::default()
                .fail("cap-a", 503)
                .answer("cap-b", json!([{ "generated_text": "a dog" }]))
                .answer("cap-c", json!("never used")),
        );
        let out = orchestrator(gw.clone(), EnrichmentPolicy::RequiresCaption)
            .run_capability(Capability::Caption, &image())
            .await;

        assert!(out.succeeded());
        assert_eq!(out.text(), Some("a dog"));
        assert_eq!(out.provider.as_deref(), Some("cap-b"));
        assert_eq!(out.attempts, 2);
        assert_eq!(gw.called("cap-a"), 1);
        assert_eq!(gw.called("cap-b"), 1);
        assert_eq!(gw.called("cap-c"), 0);
    }

    #[tokio::test]
    async fn unusable_answers_fall_through_in_order() {
        let gw = Arc::new(
            ScriptedGateway::default()
                .answer("cap-a", json!({ "error": "loading" }))
                .answer("cap-b", json!([]))
                .answer("cap-c", json!({ "generated_text": "a cat" })),
        );
        let out = orchestrator(gw.clone(), EnrichmentPolicy::RequiresCaption)
            .run_capability(Capability::Caption, &image())
            .await;

        assert_eq!(out.text(), Some("a cat"));
        let order: Vec<String> = gw.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec!["cap-a", "cap-b", "cap-c"]);
    }

    #[tokio::test]
    async fn exhausted_list_reports_failure() {
        let gw = Arc::new(ScriptedGateway::default().fail("cap-a", 500));
        let out = orchestrator(gw.clone(), EnrichmentPolicy::RequiresCaption)
            .run_capability(Capability::Caption, &image())
            .await;

        assert!(!out.succeeded());
        assert_eq!(out.attempts, 3);
        assert_eq!(out.provider, None);
        assert_eq!(gw.calls().len(), 3);
    }

    #[tokio::test]
    async fn enrichment_is_skipped_without_caption() {
        let gw = Arc::new(
            ScriptedGateway::default()
                .answer("ana-a", json!("detail"))
                .answer("cls-a", json!(["cat"])),
        );
        let out = orchestrator(gw.clone(), EnrichmentPolicy::RequiresCaption)
            .run_vision(&image())
            .await;

        assert!(!out.caption.succeeded());
        assert!(out.analysis.is_none());
        assert!(out.classification.is_none());
        assert!(gw
            .calls()
            .iter()
            .all(|(_, capability)| *capability == Capability::Caption));
    }

    #[tokio::test]
    async fn always_policy_enriches_even_without_caption() {
        let gw = Arc::new(
            ScriptedGateway::default()
                .answer("ana-a", json!("a long detailed description"))
                .answer("cls-b", json!([{ "label": "cat", "score": 0.8 }])),
        );
        let out = orchestrator(gw.clone(), EnrichmentPolicy::Always)
            .run_vision(&image())
            .await;

        assert!(!out.caption.succeeded());
        let analysis = out.analysis.unwrap();
        assert_eq!(analysis.text(), Some("a long detailed description"));
        let classification = out.classification.unwrap();
        assert_eq!(classification.labels(), ["cat".to_string()]);
        assert_eq!(classification.top_score(), Some(0.8));
        assert_eq!(gw.called("cls-a"), 1);
    }

    #[tokio::test]
    async fn caption_success_runs_both_enrichments() {
        let gw = Arc::new(
            ScriptedGateway::default()
                .answer("cap-a", json!("a dog"))
                .answer("ana-b", json!({ "generated_text": "a dog running on grass" }))
                .answer("cls-a", json!(["dog", "grass"])),
        );
        let out = orchestrator(gw.clone(), EnrichmentPolicy::RequiresCaption)
            .run_vision(&image())
            .await;

        assert_eq!(out.caption.text(), Some("a dog"));
        assert_eq!(
            out.analysis.as_ref().and_then(|a| a.text()),
            Some("a dog running on grass")
        );
        assert_eq!(
            out.classification.as_ref().map(|c| c.labels().to_vec()),
            Some(vec!["dog".to_string(), "grass".to_string()])
        );
        assert_eq!(gw.called("cap-b"), 0);
        assert_eq!(gw.called("cls-b"), 0);
    }

    #[tokio::test]
    async fn text_to_image_has_no_list_to_run() {
        let gw = Arc::new(ScriptedGateway::default());
        let out = orchestrator(gw.clone(), EnrichmentPolicy::Always)
            .run_capability(Capability::TextToImage, &Payload::Prompt("x".into()))
            .await;
        assert!(!out.succeeded());
        assert!(gw.calls().is_empty());
    }
}
