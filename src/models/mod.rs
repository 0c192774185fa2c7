mod config;
mod document;

pub use config::{
    ChunkingConfig, Config, DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_QDRANT_URL, EmbeddingConfig, VectorStoreConfig,
};
pub use document::{Chunk, ChunkPayload, DocumentKey, PAYLOAD_KIND_TEXT, chunk_point_id};
