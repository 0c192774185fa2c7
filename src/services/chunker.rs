//! Text chunking with overlap for embedding.

use crate::error::ChunkerError;
use crate::models::{Chunk, ChunkingConfig};

/// Splits extracted text into overlapping fixed-size windows.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Window size in characters.
    chunk_size: usize,
    /// Overlap between consecutive windows in characters.
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker, rejecting parameters under which the window would
    /// never advance.
    pub fn new(config: &ChunkingConfig) -> Result<Self, ChunkerError> {
        if config.chunk_overlap >= config.chunk_size {
            return Err(ChunkerError::OverlapTooLarge {
                size: config.chunk_size,
                overlap: config.chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
        })
    }

    /// Split text into overlapping windows of `chunk_size` characters.
    ///
    /// Pure and deterministic: the window start advances by exactly
    /// `chunk_size - overlap` per step, so identical input always yields
    /// the identical sequence. The last chunk may be shorter than
    /// `chunk_size`; empty input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let step = self.chunk_size - self.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total {
            let end = (start + self.chunk_size).min(total);
            chunks.push(Chunk {
                index: chunks.len(),
                content: chars[start..end].iter().collect(),
            });
            start += step;
        }
        chunks
    }
}
