//! Error types for the knowledge-base CLI.

use thiserror::Error;

/// Errors raised while extracting text from an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF {path}: {reason}")]
    Pdf { path: String, reason: String },

    #[error("unsupported file type: {0} (expected pdf, txt, md, or json)")]
    UnsupportedKind(String),
}

/// Errors raised by invalid chunking parameters.
#[derive(Debug, Error)]
pub enum ChunkerError {
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

/// Errors raised while loading or running the embedding model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("embedding model not found: {0}")]
    NotFound(String),

    #[error("failed to load embedding model: {0}")]
    LoadError(String),

    #[error("tokenizer error: {0}")]
    TokenizerError(String),

    #[error("inference error: {0}")]
    InferenceError(String),
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to Qdrant: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("scroll error: {0}")]
    ScrollError(String),

    #[error("delete error: {0}")]
    DeleteError(String),

    #[error("no stored documents matched {field} = '{value}'")]
    NoMatches { field: &'static str, value: String },
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),
}

/// Errors raised during document ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("chunking error: {0}")]
    Chunker(#[from] ChunkerError),

    #[error("embedding model error: {0}")]
    Model(#[from] ModelError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("{0}")]
    Other(String),
}
