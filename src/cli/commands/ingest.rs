//! Ingest command implementation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::cli::output::{IngestStats, OutputFormat, get_formatter};
use crate::models::{ChunkingConfig, Config};
use crate::services::{EmbeddingProvider, TextChunker, VectorStoreClient, extract_text};
use crate::utils::file::{FileKind, default_title, source_file_name};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Files or directories to ingest (pdf, txt, md, json)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Document title; defaults to the file name without its extension
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Extract and chunk only; do not embed or write to the store
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let start_time = Instant::now();

    let chunking = ChunkingConfig {
        chunk_size: args.chunk_size.unwrap_or(config.chunking.chunk_size),
        chunk_overlap: args.overlap.unwrap_or(config.chunking.chunk_overlap),
    };
    let chunker = TextChunker::new(&chunking)?;

    let files = collect_files(&args.paths)?;
    if files.is_empty() {
        println!(
            "{}",
            formatter.format_message("No supported files found to ingest.")
        );
        return Ok(());
    }

    if args.title.is_some() && files.len() > 1 {
        anyhow::bail!(
            "--title applies to a single document; found {} files",
            files.len()
        );
    }

    if verbose {
        println!("Found {} file(s) to process", files.len());
    }

    let store_parts = if args.dry_run {
        None
    } else {
        let provider = EmbeddingProvider::new(&config.embedding);
        let store = VectorStoreClient::connect(&config.vector_store)
            .await
            .context("vector store is not reachable")?;
        store.ensure_collection(provider.dimension()).await?;
        Some((provider, store))
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut stats = IngestStats::default();
    let mut chunk_chars_total: u64 = 0;

    for file_path in &files {
        pb.inc(1);

        let text = match extract_text(file_path) {
            Ok(text) => text,
            Err(e) => {
                pb.println(format!("Skipping {}: {}", file_path.display(), e));
                stats.files_skipped += 1;
                continue;
            }
        };

        if text.trim().is_empty() {
            pb.println(format!(
                "Skipping {}: no text extracted",
                file_path.display()
            ));
            stats.files_skipped += 1;
            continue;
        }

        let chunks = chunker.chunk(&text);

        stats.chunks_created += chunks.len() as u64;
        chunk_chars_total += chunks
            .iter()
            .map(|c| c.content.chars().count() as u64)
            .sum::<u64>();

        if verbose {
            pb.println(format!(
                "{}: {} chunk(s)",
                file_path.display(),
                chunks.len()
            ));
        }

        if let Some((ref provider, ref store)) = store_parts {
            let title = args
                .title
                .clone()
                .unwrap_or_else(|| default_title(file_path));
            let receipt = store
                .upsert_chunks(chunks, &title, &source_file_name(file_path), provider)
                .await?;
            stats.points_written += receipt.points_written;
        }

        stats.files_processed += 1;
    }

    pb.finish_and_clear();

    if stats.chunks_created > 0 {
        stats.avg_chunk_chars = chunk_chars_total / stats.chunks_created;
    }
    stats.duration_ms = start_time.elapsed().as_millis() as u64;

    if args.dry_run {
        println!(
            "{}",
            formatter.format_message("Dry run: nothing was written to the store.")
        );
    }
    print!("{}", formatter.format_ingest_stats(&stats));

    Ok(())
}

/// Expand the given paths into the list of supported files, walking
/// directories recursively.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            anyhow::bail!("path does not exist: {}", path.display());
        }
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.with_context(|| format!("failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && FileKind::is_supported(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_files_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "text").unwrap();
        fs::write(dir.path().join("b.md"), "text").unwrap();
        fs::write(dir.path().join("c.rs"), "fn main() {}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.json"), "{}").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.md", "d.json"]);
    }

    #[test]
    fn test_collect_files_keeps_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "text").unwrap();

        let files = collect_files(&[file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_collect_files_missing_path_fails() {
        assert!(collect_files(&[PathBuf::from("/nonexistent/path")]).is_err());
    }
}
