//! Aggregated view of the stored documents.

use std::collections::HashMap;

use crate::error::VectorStoreError;
use crate::models::DocumentKey;
use crate::services::VectorStoreClient;

/// Chunk counts per stored document, recomputed from a full scan of the
/// collection. Never persisted.
///
/// The key set is held in memory once the scan completes, which bounds
/// this to collections whose document set fits in memory.
#[derive(Debug, Default)]
pub struct DocumentCatalog {
    entries: HashMap<DocumentKey, u64>,
}

impl DocumentCatalog {
    /// Build the catalog by draining a payload-selective scroll.
    pub async fn load(store: &VectorStoreClient) -> Result<Self, VectorStoreError> {
        let mut catalog = Self::default();
        let mut scroll = store.scroll(&["doc_title", "source_file"]);
        while let Some(page) = scroll.next_page().await? {
            for point in page {
                catalog.count(point.doc_title, point.source_file);
            }
        }
        Ok(catalog)
    }

    /// Count one point under its (title, source) key. Points missing
    /// either field land under "Unknown".
    fn count(&mut self, doc_title: Option<String>, source_file: Option<String>) {
        let key = DocumentKey {
            doc_title: doc_title.unwrap_or_else(|| "Unknown".to_string()),
            source_file: source_file.unwrap_or_else(|| "Unknown".to_string()),
        };
        *self.entries.entry(key).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn chunk_count(&self, key: &DocumentKey) -> Option<u64> {
        self.entries.get(key).copied()
    }

    /// Entries sorted by title then source file, for display.
    pub fn sorted_entries(&self) -> Vec<(DocumentKey, u64)> {
        let mut entries: Vec<(DocumentKey, u64)> = self
            .entries
            .iter()
            .map(|(key, &count)| (key.clone(), count))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(title: &str, source: &str) -> DocumentKey {
        DocumentKey {
            doc_title: title.to_string(),
            source_file: source.to_string(),
        }
    }

    #[test]
    fn test_counts_points_per_document() {
        let mut catalog = DocumentCatalog::default();
        for _ in 0..4 {
            catalog.count(Some("Doc".to_string()), Some("doc.txt".to_string()));
        }
        catalog.count(Some("Other".to_string()), Some("other.pdf".to_string()));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.chunk_count(&key("Doc", "doc.txt")), Some(4));
        assert_eq!(catalog.chunk_count(&key("Other", "other.pdf")), Some(1));
        assert_eq!(catalog.chunk_count(&key("Missing", "missing.txt")), None);
    }

    #[test]
    fn test_same_title_different_source_is_distinct() {
        let mut catalog = DocumentCatalog::default();
        catalog.count(Some("Doc".to_string()), Some("a.txt".to_string()));
        catalog.count(Some("Doc".to_string()), Some("b.txt".to_string()));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.chunk_count(&key("Doc", "a.txt")), Some(1));
        assert_eq!(catalog.chunk_count(&key("Doc", "b.txt")), Some(1));
    }

    #[test]
    fn test_missing_fields_count_as_unknown() {
        let mut catalog = DocumentCatalog::default();
        catalog.count(None, None);
        catalog.count(None, Some("doc.txt".to_string()));

        assert_eq!(catalog.chunk_count(&key("Unknown", "Unknown")), Some(1));
        assert_eq!(catalog.chunk_count(&key("Unknown", "doc.txt")), Some(1));
    }

    #[test]
    fn test_sorted_entries_order() {
        let mut catalog = DocumentCatalog::default();
        catalog.count(Some("Zebra".to_string()), Some("z.txt".to_string()));
        catalog.count(Some("Alpha".to_string()), Some("b.txt".to_string()));
        catalog.count(Some("Alpha".to_string()), Some("a.txt".to_string()));

        let entries = catalog.sorted_entries();
        assert_eq!(entries[0].0, key("Alpha", "a.txt"));
        assert_eq!(entries[1].0, key("Alpha", "b.txt"));
        assert_eq!(entries[2].0, key("Zebra", "z.txt"));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = DocumentCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.sorted_entries().is_empty());
    }
}
