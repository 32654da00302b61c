//! Alt text and captions for uploaded images, plus prompt-to-image
//! generation, backed by remote inference endpoints with ordered fallback.

pub mod capability;
pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod mock;
pub mod normalize;
pub mod orchestrator;
pub mod postprocess;
pub mod result;
pub mod server;
pub mod service;
pub mod snippet;
pub mod ui;

pub use config::Config;
pub use result::AnalysisResult;
pub use service::{CaptionService, GeneratedImage};
