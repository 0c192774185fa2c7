use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "knowledge_base";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSION: u64 = 384;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kbctl").join("config.toml"))
    }

    /// Load the config file if present, then apply environment overrides.
    pub fn load() -> Result<Self, crate::error::ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// QDRANT_URL and QDRANT_API_KEY override the file-based settings,
    /// matching the deployment convention for the chatbot's store.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("QDRANT_URL")
            && !url.is_empty()
        {
            self.vector_store.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY")
            && !key.is_empty()
        {
            self.vector_store.api_key = Some(key);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name, used for display and for the default model directory.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Directory holding model.onnx and tokenizer.json. Defaults to the
    /// platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,

    #[serde(default = "default_dimension")]
    pub dimension: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_dimension() -> u64 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_max_tokens() -> u32 {
    256
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            model_dir: None,
            dimension: default_dimension(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl EmbeddingConfig {
    /// The directory the model files are loaded from.
    pub fn resolved_model_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.model_dir {
            return dir.clone();
        }
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("kbctl")
            .join("models")
            .join(self.model.replace('/', "--"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters. Must stay below
    /// the chunk size or the window would never advance.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.vector_store.url, DEFAULT_QDRANT_URL);
        assert_eq!(config.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding.dimension, DEFAULT_EMBEDDING_DIMENSION);
    }

    #[test]
    fn test_chunking_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert!(config.chunk_overlap < config.chunk_size);
    }

    #[test]
    fn test_resolved_model_dir_flattens_model_name() {
        let config = EmbeddingConfig::default();
        let dir = config.resolved_model_dir();
        let leaf = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(!leaf.contains('/'));
        assert!(leaf.contains("all-MiniLM-L6-v2"));
    }

    #[test]
    fn test_explicit_model_dir_wins() {
        let config = EmbeddingConfig {
            model_dir: Some(PathBuf::from("/opt/models/minilm")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_model_dir(),
            PathBuf::from("/opt/models/minilm")
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [vector_store]
            url = "http://qdrant.internal:6334"
            "#,
        )
        .unwrap();
        assert_eq!(config.vector_store.url, "http://qdrant.internal:6334");
        assert_eq!(config.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.chunking.chunk_size, 1000);
    }
}
