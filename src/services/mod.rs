mod catalog;
mod chunker;
mod embedding;
mod extractor;
mod vector_store;

pub use catalog::DocumentCatalog;
pub use chunker::TextChunker;
pub use embedding::{EmbeddingModel, EmbeddingProvider};
pub use extractor::{extract_pdf, extract_plain_text, extract_text};
pub use vector_store::{
    PointScroll, RemovalSelector, ScrolledPoint, StoreStats, UpsertReceipt, VectorStoreClient,
};
