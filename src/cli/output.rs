use std::fmt::Write as FmtWrite;

use clap::ValueEnum;
use serde_json::json;

use crate::models::DocumentKey;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait Formatter {
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_documents(&self, docs: &[(DocumentKey, u64)]) -> String;
    fn format_ingest_stats(&self, stats: &IngestStats) -> String;
    fn format_removal(&self, removal: &RemovalOutcome) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub store_url: String,
    pub collection: String,
    pub connected: bool,
    pub collection_exists: bool,
    pub point_count: u64,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files_processed: u64,
    pub files_skipped: u64,
    pub chunks_created: u64,
    pub points_written: u64,
    pub avg_chunk_chars: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    pub field: String,
    pub value: String,
    pub deleted: u64,
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        let store_state = if status.connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "Vector Store:  {}", store_state).unwrap();
        writeln!(output, "  URL:         {}", status.store_url).unwrap();
        if status.connected {
            writeln!(output, "  Collection:  {}", status.collection).unwrap();
            if status.collection_exists {
                writeln!(output, "  Points:      {}", status.point_count).unwrap();
            } else {
                writeln!(output, "  Points:      (collection not created yet)").unwrap();
            }
        }
        writeln!(output).unwrap();
        writeln!(output, "Embedding:     {}", status.embedding_model).unwrap();

        output
    }

    fn format_documents(&self, docs: &[(DocumentKey, u64)]) -> String {
        let mut output = String::new();
        writeln!(output, "Stored Documents").unwrap();
        writeln!(output, "----------------").unwrap();

        for (key, chunk_count) in docs {
            writeln!(output, "{}", key.doc_title).unwrap();
            writeln!(output, "  Source: {}", key.source_file).unwrap();
            writeln!(output, "  Chunks: {}", chunk_count).unwrap();
        }

        let total: u64 = docs.iter().map(|(_, count)| count).sum();
        writeln!(output).unwrap();
        writeln!(
            output,
            "{} document(s), {} chunk(s) total",
            docs.len(),
            total
        )
        .unwrap();

        output
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        writeln!(output, "Ingestion Complete").unwrap();
        writeln!(output, "------------------").unwrap();
        writeln!(output, "Files processed: {}", stats.files_processed).unwrap();
        writeln!(output, "Files skipped:   {}", stats.files_skipped).unwrap();
        writeln!(output, "Chunks created:  {}", stats.chunks_created).unwrap();
        writeln!(output, "Points written:  {}", stats.points_written).unwrap();
        if stats.chunks_created > 0 {
            writeln!(output, "Avg chunk size:  {} chars", stats.avg_chunk_chars).unwrap();
        }
        writeln!(output, "Duration:        {}ms", stats.duration_ms).unwrap();
        output
    }

    fn format_removal(&self, removal: &RemovalOutcome) -> String {
        format!(
            "Removed {} chunk(s) where {} = '{}'\n",
            removal.deleted, removal.field, removal.value
        )
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        let value = json!({
            "vector_store": {
                "url": status.store_url,
                "connected": status.connected,
                "collection": status.collection,
                "collection_exists": status.collection_exists,
                "points": status.point_count,
            },
            "embedding": {
                "model": status.embedding_model,
            },
        });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }

    fn format_documents(&self, docs: &[(DocumentKey, u64)]) -> String {
        let entries: Vec<_> = docs
            .iter()
            .map(|(key, chunk_count)| {
                json!({
                    "doc_title": key.doc_title,
                    "source_file": key.source_file,
                    "chunk_count": chunk_count,
                })
            })
            .collect();
        format!(
            "{}\n",
            serde_json::to_string_pretty(&json!({ "documents": entries })).unwrap()
        )
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let value = json!({
            "files_processed": stats.files_processed,
            "files_skipped": stats.files_skipped,
            "chunks_created": stats.chunks_created,
            "points_written": stats.points_written,
            "avg_chunk_chars": stats.avg_chunk_chars,
            "duration_ms": stats.duration_ms,
        });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }

    fn format_removal(&self, removal: &RemovalOutcome) -> String {
        let value = json!({
            "field": removal.field,
            "value": removal.value,
            "deleted": removal.deleted,
        });
        format!("{}\n", serde_json::to_string_pretty(&value).unwrap())
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", json!({ "message": message }))
    }

    fn format_error(&self, error: &str) -> String {
        format!("{}\n", json!({ "error": error }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<(DocumentKey, u64)> {
        vec![
            (
                DocumentKey {
                    doc_title: "Doc".to_string(),
                    source_file: "doc.txt".to_string(),
                },
                4,
            ),
            (
                DocumentKey {
                    doc_title: "Guide".to_string(),
                    source_file: "guide.pdf".to_string(),
                },
                7,
            ),
        ]
    }

    #[test]
    fn test_text_documents_totals() {
        let output = TextFormatter.format_documents(&docs());
        assert!(output.contains("Doc"));
        assert!(output.contains("guide.pdf"));
        assert!(output.contains("2 document(s), 11 chunk(s) total"));
    }

    #[test]
    fn test_json_documents_roundtrip() {
        let output = JsonFormatter.format_documents(&docs());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["documents"][0]["chunk_count"], 4);
        assert_eq!(value["documents"][1]["source_file"], "guide.pdf");
    }

    #[test]
    fn test_text_removal() {
        let output = TextFormatter.format_removal(&RemovalOutcome {
            field: "source_file".to_string(),
            value: "doc.txt".to_string(),
            deleted: 4,
        });
        assert_eq!(output, "Removed 4 chunk(s) where source_file = 'doc.txt'\n");
    }
}
