//! Process configuration, read once at start-up.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::capability::{ProviderList, ProviderLists, DEFAULT_IMAGE_MODEL};
use crate::orchestrator::EnrichmentPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Checked in order; the first non-blank value is the credential.
const TOKEN_VARS: &[&str] = &["HF_TOKEN", "HUGGINGFACE_API_KEY", "HF_API_TOKEN"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential. `None` puts analysis in mock mode.
    pub api_token: Option<String>,
    pub base_url: String,
    pub providers: ProviderLists,
    pub image_model: String,
    pub analysis_timeout: Duration,
    pub generation_timeout: Duration,
    pub enrichment: EnrichmentPolicy,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            providers: ProviderLists::default(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            analysis_timeout: Duration::from_secs(30),
            generation_timeout: Duration::from_secs(120),
            enrichment: EnrichmentPolicy::RequiresCaption,
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Config::default();

        config.api_token = TOKEN_VARS.iter().find_map(|&key| get(key));
        if let Some(url) = get("INFERENCE_BASE_URL") {
            config.base_url = url;
        }
        if let Some(raw) = get("CAPTION_MODELS") {
            config.providers.caption = non_empty_list("CAPTION_MODELS", &raw)?;
        }
        if let Some(raw) = get("ANALYSIS_MODELS") {
            config.providers.analysis = non_empty_list("ANALYSIS_MODELS", &raw)?;
        }
        if let Some(raw) = get("CLASSIFICATION_MODELS") {
            config.providers.classification = non_empty_list("CLASSIFICATION_MODELS", &raw)?;
        }
        if let Some(model) = get("IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(raw) = get("ANALYSIS_TIMEOUT_SECS") {
            config.analysis_timeout = Duration::from_secs(parse("ANALYSIS_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = get("GENERATION_TIMEOUT_SECS") {
            config.generation_timeout =
                Duration::from_secs(parse("GENERATION_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = get("ENRICH_REQUIRES_CAPTION") {
            config.enrichment = if parse_bool("ENRICH_REQUIRES_CAPTION", &raw)? {
                EnrichmentPolicy::RequiresCaption
            } else {
                EnrichmentPolicy::Always
            };
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(raw) = get("PORT") {
            config.port = parse("PORT", &raw)?;
        }
        if let Some(raw) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse("MAX_UPLOAD_BYTES", &raw)?;
        }

        Ok(config)
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be true or false, got {raw:?}"),
    }
}

fn non_empty_list(key: &str, raw: &str) -> Result<ProviderList> {
    let list = ProviderList::parse(raw);
    if list.is_empty() {
        bail!("{key} does not name any provider");
    }
    Ok(list)
}
