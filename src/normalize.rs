//! Extraction of generated text and labels from provider responses.
//!
//! Providers answer in a handful of JSON shapes. Each recognised shape is a
//! variant of [`ResponseShape`]; anything else is [`Normalized::Unusable`] and
//! the orchestrator moves on to the next provider.

use serde_json::Value;

use crate::capability::Capability;
use crate::gateway::RawResponse;

/// Most labels kept from a classification response.
pub const MAX_LABELS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Text(String),
    Labels {
        labels: Vec<String>,
        /// Score reported with the first kept label, if any.
        top_score: Option<f64>,
    },
    Unusable,
}

impl Normalized {
    pub fn is_usable(&self) -> bool {
        !matches!(self, Normalized::Unusable)
    }
}

/// Recognised shapes of a caption/analysis response.
#[derive(Debug, PartialEq)]
enum ResponseShape<'a> {
    /// `[{"generated_text": "..."}, ...]`
    GeneratedList(&'a str),
    /// `{"generated_text": "..."}`
    GeneratedObject(&'a str),
    /// `"..."`
    Bare(&'a str),
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    fn parse(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => match items.first().and_then(generated_text) {
                Some(text) => ResponseShape::GeneratedList(text),
                None => ResponseShape::Unrecognized,
            },
            Value::Object(_) => match generated_text(value) {
                Some(text) => ResponseShape::GeneratedObject(text),
                None => ResponseShape::Unrecognized,
            },
            Value::String(text) => ResponseShape::Bare(text),
            _ => ResponseShape::Unrecognized,
        }
    }

    fn text(&self) -> Option<&'a str> {
        match *self {
            ResponseShape::GeneratedList(t)
            | ResponseShape::GeneratedObject(t)
            | ResponseShape::Bare(t) => Some(t),
            ResponseShape::Unrecognized => None,
        }
    }
}

fn generated_text(value: &Value) -> Option<&str> {
    value.get("generated_text").and_then(Value::as_str)
}

/// Pure function of the raw response; never fails.
pub fn normalize(raw: &RawResponse, capability: Capability) -> Normalized {
    let RawResponse::Json(value) = raw else {
        return Normalized::Unusable;
    };

    match capability {
        Capability::Caption | Capability::Analysis => normalize_text(value),
        Capability::Classification => normalize_labels(value),
        Capability::TextToImage => Normalized::Unusable,
    }
}

fn normalize_text(value: &Value) -> Normalized {
    match ResponseShape::parse(value).text().map(str::trim) {
        Some(text) if is_meaningful(text) => Normalized::Text(text.to_string()),
        _ => Normalized::Unusable,
    }
}

/// A text that cannot yield a non-empty alt text is treated as absent.
fn is_meaningful(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

fn normalize_labels(value: &Value) -> Normalized {
    let Some(entries) = value.as_array() else {
        return Normalized::Unusable;
    };

    let kept: Vec<(&str, Option<f64>)> = entries
        .iter()
        .filter_map(|entry| {
            let label = match entry {
                Value::String(s) => Some(s.as_str()),
                _ => entry
                    .get("label")
                    .and_then(Value::as_str)
                    .or_else(|| generated_text(entry)),
            }?;
            let label = label.trim();
            if label.is_empty() {
                return None;
            }
            Some((label, entry.get("score").and_then(Value::as_f64)))
        })
        .take(MAX_LABELS)
        .collect();

    match kept.first() {
        Some(&(_, top_score)) => Normalized::Labels {
            labels: kept.iter().map(|(l, _)| l.to_string()).collect(),
            top_score,
        },
        None => Normalized::Unusable,
    }
}
