//! Qdrant-backed synchronization of the knowledge-base collection.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PayloadIncludeSelector, PointId,
    PointStruct, PointsIdsList, RetrievedPoint, ScrollPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder, point_id::PointIdOptions, value::Kind,
};

use crate::error::{IngestError, VectorStoreError};
use crate::models::{Chunk, ChunkPayload, PAYLOAD_KIND_TEXT, VectorStoreConfig, chunk_point_id};
use crate::services::EmbeddingProvider;

/// Points fetched per scroll page.
const SCROLL_PAGE_SIZE: u32 = 1000;

/// Owns the connection to the Qdrant collection backing the knowledge
/// base. Constructed once per command and passed by reference.
pub struct VectorStoreClient {
    client: Qdrant,
    collection: String,
}

/// Collection-level counters reported by [`VectorStoreClient::stats`].
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub point_count: u64,
}

/// Outcome of one batched upsert.
#[derive(Debug, Clone, Default)]
pub struct UpsertReceipt {
    pub points_written: u64,
    pub point_ids: Vec<String>,
}

impl VectorStoreClient {
    /// Connect and verify the connection with a health-check round trip.
    pub async fn connect(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        client
            .health_check()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
        })
    }

    /// Current point count, or `None` when the collection does not exist
    /// yet.
    pub async fn stats(&self) -> Result<Option<StoreStats>, VectorStoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => Ok(Some(StoreStats {
                point_count: info
                    .result
                    .and_then(|r| r.points_count)
                    .unwrap_or(0),
            })),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("not found") || msg.contains("doesn't exist") {
                    Ok(None)
                } else {
                    Err(VectorStoreError::CollectionError(msg))
                }
            }
        }
    }

    /// Create the collection if it does not exist yet.
    pub async fn ensure_collection(&self, dimension: u64) -> Result<(), VectorStoreError> {
        if self.stats().await?.is_some() {
            return Ok(());
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(())
    }

    /// Embed the chunks of one document and store them with a single
    /// batched upsert.
    ///
    /// Point ids are deterministic UUIDv5 values derived from
    /// `(doc_title, source_file, chunk index)`, so concurrent ingestions
    /// cannot collide and re-ingesting a document replaces its own points.
    /// Extraction and chunking have already fully succeeded by the time
    /// this runs; the write itself is one batch, all-or-nothing at the
    /// store layer.
    pub async fn upsert_chunks(
        &self,
        chunks: Vec<Chunk>,
        doc_title: &str,
        source_file: &str,
        provider: &EmbeddingProvider,
    ) -> Result<UpsertReceipt, IngestError> {
        if chunks.is_empty() {
            return Ok(UpsertReceipt::default());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = provider.embed_batch(&texts).await?;

        let mut point_ids = Vec::with_capacity(chunks.len());
        let points: Vec<PointStruct> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let id = chunk_point_id(doc_title, source_file, chunk.index);
                point_ids.push(id.clone());
                let payload = ChunkPayload::new(chunk, doc_title, source_file);
                PointStruct::new(id, vector, payload_values(payload))
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(UpsertReceipt {
            points_written: point_ids.len() as u64,
            point_ids,
        })
    }

    /// Start a paginated scan over the collection, fetching only the named
    /// payload fields. One page of points is held in memory at a time.
    pub fn scroll(&self, fields: &[&str]) -> PointScroll<'_> {
        PointScroll {
            store: self,
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            offset: None,
            done: false,
        }
    }

    /// Remove every point matching the selector, returning how many were
    /// removed.
    ///
    /// The whole collection is scanned first and the matching ids are
    /// buffered, then removed with one batched delete; nothing is deleted
    /// before the scan completes. The buffered id set must fit in memory,
    /// which bounds this to admin-scale collections. A selector that
    /// matches nothing is an error and leaves the collection untouched.
    pub async fn delete_matching(
        &self,
        selector: &RemovalSelector,
    ) -> Result<u64, VectorStoreError> {
        let mut matched: Vec<PointId> = Vec::new();
        let mut scroll = self.scroll(&["doc_title", "source_file"]);
        while let Some(page) = scroll.next_page().await? {
            for point in page {
                if selector.matches(&point) {
                    matched.push(point.id);
                }
            }
        }

        if matched.is_empty() {
            return Err(VectorStoreError::NoMatches {
                field: selector.field(),
                value: selector.value().to_string(),
            });
        }

        let deleted = matched.len() as u64;
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(PointsIdsList { ids: matched }),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;

        Ok(deleted)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn payload_values(payload: ChunkPayload) -> HashMap<String, qdrant_client::qdrant::Value> {
    let mut values: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
    values.insert("type".to_string(), PAYLOAD_KIND_TEXT.into());
    values.insert("doc_title".to_string(), payload.doc_title.into());
    values.insert("source_file".to_string(), payload.source_file.into());
    values.insert("page".to_string(), payload.page.into());
    values.insert("chunk_id".to_string(), payload.chunk_id.into());
    values.insert("has_images".to_string(), payload.has_images.into());
    values.insert("image_count".to_string(), payload.image_count.into());
    values.insert("content".to_string(), payload.content.into());
    values
}

/// Restartable cursor over the collection. Each [`next_page`] call fetches
/// one batch of points and the opaque continuation offset; the scan ends on
/// an empty page or a missing next offset.
///
/// [`next_page`]: PointScroll::next_page
pub struct PointScroll<'a> {
    store: &'a VectorStoreClient,
    fields: Vec<String>,
    offset: Option<PointId>,
    done: bool,
}

impl PointScroll<'_> {
    /// Fetch the next page of points, or `None` once the scan is complete.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ScrolledPoint>>, VectorStoreError> {
        if self.done {
            return Ok(None);
        }

        let mut builder = ScrollPointsBuilder::new(&self.store.collection)
            .limit(SCROLL_PAGE_SIZE)
            .with_payload(PayloadIncludeSelector {
                fields: self.fields.clone(),
            })
            .with_vectors(false);

        if let Some(offset) = self.offset.take() {
            builder = builder.offset(offset);
        }

        let response = self
            .store
            .client
            .scroll(builder)
            .await
            .map_err(|e| VectorStoreError::ScrollError(e.to_string()))?;

        if response.result.is_empty() {
            self.done = true;
            return Ok(None);
        }

        self.offset = response.next_page_offset;
        if self.offset.is_none() {
            self.done = true;
        }

        let page = response
            .result
            .into_iter()
            .map(ScrolledPoint::from_retrieved)
            .collect();
        Ok(Some(page))
    }
}

/// A point as returned by a payload-selective scroll.
#[derive(Debug, Clone)]
pub struct ScrolledPoint {
    pub id: PointId,
    pub doc_title: Option<String>,
    pub source_file: Option<String>,
}

impl ScrolledPoint {
    fn from_retrieved(point: RetrievedPoint) -> Self {
        let doc_title = string_field(&point.payload, "doc_title");
        let source_file = string_field(&point.payload, "source_file");
        Self {
            id: point.id.unwrap_or_default(),
            doc_title,
            source_file,
        }
    }

    /// The point id rendered as text, for display and id-based matching.
    pub fn id_string(&self) -> String {
        match &self.id.point_id_options {
            Some(PointIdOptions::Uuid(uuid)) => uuid.clone(),
            Some(PointIdOptions::Num(num)) => num.to_string(),
            None => String::new(),
        }
    }
}

fn string_field(
    payload: &HashMap<String, qdrant_client::qdrant::Value>,
    field: &str,
) -> Option<String> {
    payload.get(field).and_then(|v| match &v.kind {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    })
}

/// Which stored points a removal targets, mirroring the three selection
/// modes offered to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalSelector {
    /// Exact `source_file` payload match.
    SourceFile(String),
    /// Exact `doc_title` payload match.
    DocTitle(String),
    /// Exact point id match, compared as text so ids copied from a listing
    /// work unchanged.
    PointId(String),
}

impl RemovalSelector {
    pub fn matches(&self, point: &ScrolledPoint) -> bool {
        match self {
            RemovalSelector::SourceFile(value) => {
                point.source_file.as_deref() == Some(value.as_str())
            }
            RemovalSelector::DocTitle(value) => point.doc_title.as_deref() == Some(value.as_str()),
            RemovalSelector::PointId(value) => point.id_string() == *value,
        }
    }

    /// The payload field (or "id") the selector compares against.
    pub fn field(&self) -> &'static str {
        match self {
            RemovalSelector::SourceFile(_) => "source_file",
            RemovalSelector::DocTitle(_) => "doc_title",
            RemovalSelector::PointId(_) => "id",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            RemovalSelector::SourceFile(value)
            | RemovalSelector::DocTitle(value)
            | RemovalSelector::PointId(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn scrolled(id: PointId, title: Option<&str>, source: Option<&str>) -> ScrolledPoint {
        ScrolledPoint {
            id,
            doc_title: title.map(str::to_string),
            source_file: source.map(str::to_string),
        }
    }

    fn uuid_id(uuid: &str) -> PointId {
        PointId {
            point_id_options: Some(PointIdOptions::Uuid(uuid.to_string())),
        }
    }

    #[test]
    fn test_payload_values_wire_shape() {
        let chunk = Chunk {
            index: 2,
            content: "chunk body".to_string(),
        };
        let values = payload_values(ChunkPayload::new(chunk, "Doc", "doc.txt"));

        assert_eq!(values.len(), 8);
        for field in [
            "type",
            "doc_title",
            "source_file",
            "page",
            "chunk_id",
            "has_images",
            "image_count",
            "content",
        ] {
            assert!(values.contains_key(field), "missing field {field}");
        }
        assert_eq!(
            values["type"].kind,
            Some(Kind::StringValue(PAYLOAD_KIND_TEXT.to_string()))
        );
        assert_eq!(values["page"].kind, Some(Kind::IntegerValue(3)));
        assert_eq!(values["chunk_id"].kind, Some(Kind::IntegerValue(2)));
        assert_eq!(values["has_images"].kind, Some(Kind::BoolValue(false)));
        assert_eq!(values["image_count"].kind, Some(Kind::IntegerValue(0)));
    }

    #[test]
    fn test_selector_matches_source_file() {
        let selector = RemovalSelector::SourceFile("doc.txt".to_string());
        assert!(selector.matches(&scrolled(uuid_id("a"), Some("Doc"), Some("doc.txt"))));
        assert!(!selector.matches(&scrolled(uuid_id("a"), Some("Doc"), Some("other.txt"))));
        assert!(!selector.matches(&scrolled(uuid_id("a"), Some("doc.txt"), None)));
    }

    #[test]
    fn test_selector_matches_title() {
        let selector = RemovalSelector::DocTitle("Doc".to_string());
        assert!(selector.matches(&scrolled(uuid_id("a"), Some("Doc"), Some("doc.txt"))));
        assert!(!selector.matches(&scrolled(uuid_id("a"), Some("Other"), Some("doc.txt"))));
    }

    #[test]
    fn test_selector_matches_id_as_text() {
        let selector = RemovalSelector::PointId("42".to_string());
        let numeric = PointId {
            point_id_options: Some(PointIdOptions::Num(42)),
        };
        assert!(selector.matches(&scrolled(numeric, None, None)));

        let uuid = "7f2c1d38-0000-5000-8000-000000000000";
        let selector = RemovalSelector::PointId(uuid.to_string());
        assert!(selector.matches(&scrolled(uuid_id(uuid), None, None)));
        assert!(!selector.matches(&scrolled(uuid_id("other"), None, None)));
    }

    #[test]
    fn test_selector_field_and_value() {
        let selector = RemovalSelector::DocTitle("Doc".to_string());
        assert_eq!(selector.field(), "doc_title");
        assert_eq!(selector.value(), "Doc");
    }
}
