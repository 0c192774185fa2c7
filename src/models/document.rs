use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload `type` value stored on every text chunk point.
pub const PAYLOAD_KIND_TEXT: &str = "text";

/// One window of a document's extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Ordinal position within the document's chunking run.
    pub index: usize,
    pub content: String,
}

/// Identity of a stored document: its title plus the source file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    pub doc_title: String,
    pub source_file: String,
}

/// The payload attached to every stored point.
///
/// Field names are a wire contract shared with the chatbot's retrieval
/// side; do not rename them. `page` is the chunk ordinal plus one, not a
/// source-document page number — consumers already depend on that reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub doc_title: String,
    pub source_file: String,
    pub page: i64,
    pub chunk_id: i64,
    pub has_images: bool,
    pub image_count: i64,
    pub content: String,
}

impl ChunkPayload {
    pub fn new(chunk: Chunk, doc_title: &str, source_file: &str) -> Self {
        Self {
            doc_title: doc_title.to_string(),
            source_file: source_file.to_string(),
            page: chunk.index as i64 + 1,
            chunk_id: chunk.index as i64,
            has_images: false,
            image_count: 0,
            content: chunk.content,
        }
    }
}

/// Deterministic point id for one chunk of one document.
///
/// UUIDv5 over (title, source, index): concurrent ingestions cannot hand
/// out colliding ids, and re-ingesting a document replaces its own points
/// instead of duplicating them.
pub fn chunk_point_id(doc_title: &str, source_file: &str, chunk_index: usize) -> String {
    let name = format!("{}:{}:{}", doc_title, source_file, chunk_index);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk {
            index,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_payload_page_is_ordinal_plus_one() {
        let payload = ChunkPayload::new(chunk(3, "body"), "Doc", "doc.txt");
        assert_eq!(payload.chunk_id, 3);
        assert_eq!(payload.page, 4);
    }

    #[test]
    fn test_payload_image_fields_are_fixed() {
        let payload = ChunkPayload::new(chunk(0, "body"), "Doc", "doc.txt");
        assert!(!payload.has_images);
        assert_eq!(payload.image_count, 0);
        assert_eq!(payload.content, "body");
        assert_eq!(payload.doc_title, "Doc");
        assert_eq!(payload.source_file, "doc.txt");
    }

    #[test]
    fn test_chunk_point_id_deterministic() {
        let id = chunk_point_id("Doc", "doc.txt", 5);
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|c| *c == '-').count(), 4);
        assert_eq!(id, chunk_point_id("Doc", "doc.txt", 5));
    }

    #[test]
    fn test_chunk_point_id_distinct_per_chunk_and_document() {
        let id = chunk_point_id("Doc", "doc.txt", 5);
        assert_ne!(id, chunk_point_id("Doc", "doc.txt", 6));
        assert_ne!(id, chunk_point_id("Other", "doc.txt", 5));
        assert_ne!(id, chunk_point_id("Doc", "other.txt", 5));
    }
}
