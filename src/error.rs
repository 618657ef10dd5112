use thiserror::Error;

/// Failures raised by the numeric layout core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("vector has {actual} dimensions, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid vector: {0}")]
    InvalidVector(String),
    #[error("projection needs at least one vector")]
    InsufficientData,
}

/// Failures raised by embedding and label providers, including malformed output
/// caught at the provider boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),
    #[error("label unavailable: {0}")]
    LabelUnavailable(String),
    #[error("malformed embedding: {0}")]
    MalformedEmbedding(String),
    #[error("malformed label: {0}")]
    MalformedLabel(String),
}

/// Failures of one insertion through the whole pipeline. An insertion that fails
/// leaves the committed store untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertError {
    #[error("input text is empty")]
    EmptyInput,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("insert worker disconnected")]
    WorkerDisconnected,
}
