//! Inference capabilities and the ordered provider lists that serve them.

use std::fmt;

/// A category of inference task with its own provider list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Caption,
    Analysis,
    Classification,
    TextToImage,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Caption => "caption",
            Capability::Analysis => "analysis",
            Capability::Classification => "classification",
            Capability::TextToImage => "text-to-image",
        }
    }

    /// Vision capabilities take raw image bytes and answer with JSON.
    pub fn is_vision(self) -> bool {
        !matches!(self, Capability::TextToImage)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered provider identifiers for one capability.
///
/// Order encodes preference. Nothing reorders a list once it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderList(Vec<String>);

impl ProviderList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            ids.into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated override such as `a/b, c/d`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub const DEFAULT_CAPTION_MODELS: &[&str] = &[
    "Salesforce/blip-image-captioning-large",
    "Salesforce/blip-image-captioning-base",
    "nlpconnect/vit-gpt2-image-captioning",
];

pub const DEFAULT_ANALYSIS_MODELS: &[&str] = &[
    "microsoft/git-large-coco",
    "microsoft/git-base-coco",
];

pub const DEFAULT_CLASSIFICATION_MODELS: &[&str] = &[
    "google/vit-base-patch16-224",
    "microsoft/resnet-50",
];

pub const DEFAULT_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

/// Provider lists for the three vision capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLists {
    pub caption: ProviderList,
    pub analysis: ProviderList,
    pub classification: ProviderList,
}

impl ProviderLists {
    pub fn for_capability(&self, capability: Capability) -> Option<&ProviderList> {
        match capability {
            Capability::Caption => Some(&self.caption),
            Capability::Analysis => Some(&self.analysis),
            Capability::Classification => Some(&self.classification),
            Capability::TextToImage => None,
        }
    }
}

impl Default for ProviderLists {
    fn default() -> Self {
        Self {
            caption: ProviderList::new(DEFAULT_CAPTION_MODELS.iter().copied()),
            analysis: ProviderList::new(DEFAULT_ANALYSIS_MODELS.iter().copied()),
            classification: ProviderList::new(DEFAULT_CLASSIFICATION_MODELS.iter().copied()),
        }
    }
}
