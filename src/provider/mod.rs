//! Embedding and label providers, and the validation applied to their output
//! before it reaches the layout core.

mod hashing;
mod keywords;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use hashing::HashingEmbedder;
pub use keywords::{KeywordLabeler, TextLabeler};

pub trait Embedder: Send {
    fn name(&self) -> &str;

    /// Declared output length, when the backend knows it up front.
    fn dimensions(&self) -> Option<usize>;

    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

pub trait Labeler: Send {
    fn summarize(&self, text: &str) -> Result<String, ProviderError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbedderConfig {
    Hashing { dimensions: usize },
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self::Hashing {
            dimensions: hashing::DEFAULT_DIMENSIONS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelerConfig {
    Text { max_chars: usize },
    Keywords { max_keywords: usize, max_chars: usize },
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self::Keywords {
            max_keywords: 3,
            max_chars: 32,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub embedder: EmbedderConfig,
    pub labeler: LabelerConfig,
}

impl ProviderConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let EmbedderConfig::Hashing { dimensions } = self.embedder;
        if dimensions < 2 {
            bail!("providers.embedder.dimensions must be at least 2");
        }

        let max_chars = match self.labeler {
            LabelerConfig::Text { max_chars } => max_chars,
            LabelerConfig::Keywords {
                max_keywords,
                max_chars,
            } => {
                if max_keywords == 0 {
                    bail!("providers.labeler.max_keywords must be at least 1");
                }
                max_chars
            }
        };
        if max_chars < 2 {
            bail!("providers.labeler.max_chars must be at least 2");
        }
        Ok(())
    }
}

/// Provider output that passed boundary validation.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedInsert {
    pub text: String,
    pub label: String,
    pub vector: Vec<f32>,
}

/// The embedder/labeler pair, built once at startup and handed to whoever runs
/// insertions.
pub struct Providers {
    embedder: Box<dyn Embedder>,
    labeler: Box<dyn Labeler>,
}

impl Providers {
    pub fn new(embedder: Box<dyn Embedder>, labeler: Box<dyn Labeler>) -> Self {
        Self { embedder, labeler }
    }

    pub fn init(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let embedder: Box<dyn Embedder> = match config.embedder {
            EmbedderConfig::Hashing { dimensions } => Box::new(HashingEmbedder::new(dimensions)?),
        };
        let labeler: Box<dyn Labeler> = match config.labeler {
            LabelerConfig::Text { max_chars } => Box::new(TextLabeler::new(max_chars)),
            LabelerConfig::Keywords {
                max_keywords,
                max_chars,
            } => Box::new(KeywordLabeler::new(max_keywords, max_chars)),
        };
        log::info!(
            "providers ready: embedder={} dimensions={:?}",
            embedder.name(),
            embedder.dimensions()
        );
        Ok(Self::new(embedder, labeler))
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Runs both providers on `text` and validates what they return.
    pub fn prepare(&self, text: &str) -> Result<PreparedInsert, ProviderError> {
        let raw = self.embedder.embed(text)?;
        let vector = validate_embedding(raw, self.embedder.dimensions())?;
        let label = validate_label(self.labeler.summarize(text)?)?;
        Ok(PreparedInsert {
            text: text.to_owned(),
            label,
            vector,
        })
    }
}

pub fn validate_embedding(raw: Vec<f32>, expected: Option<usize>) -> Result<Vec<f32>, ProviderError> {
    if raw.is_empty() {
        return Err(ProviderError::MalformedEmbedding("embedding is empty".to_owned()));
    }
    if let Some(expected) = expected
        && raw.len() != expected
    {
        return Err(ProviderError::MalformedEmbedding(format!(
            "expected {expected} components, got {}",
            raw.len()
        )));
    }
    if let Some(index) = raw.iter().position(|value| !value.is_finite()) {
        return Err(ProviderError::MalformedEmbedding(format!(
            "component {index} is not finite"
        )));
    }
    Ok(raw)
}

pub fn validate_label(raw: String) -> Result<String, ProviderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::MalformedLabel("label is empty".to_owned()));
    }
    if trimmed.len() == raw.len() {
        Ok(raw)
    } else {
        Ok(trimmed.to_owned())
    }
}
