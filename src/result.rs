use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of an optional provider-contributed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraField {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for ExtraField {
    fn from(value: &str) -> Self {
        ExtraField::Text(value.to_string())
    }
}

impl From<String> for ExtraField {
    fn from(value: String) -> Self {
        ExtraField::Text(value)
    }
}

impl From<u64> for ExtraField {
    fn from(value: u64) -> Self {
        ExtraField::Number(value.into())
    }
}

/// The alt-text/caption pair returned for an analysed image.
///
/// `alt_text` and `caption` are never empty. Unknown keys in `extra` are
/// optional for every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub alt_text: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, ExtraField>,
}

impl AnalysisResult {
    pub fn new(alt_text: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            alt_text: alt_text.into(),
            caption: caption.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<ExtraField>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Attach a score, skipping values JSON cannot represent.
    pub fn with_score(mut self, key: &str, score: f64) -> Self {
        if let Some(n) = serde_json::Number::from_f64(score) {
            self.extra.insert(key.to_string(), ExtraField::Number(n));
        }
        self
    }
}
