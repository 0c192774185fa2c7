//! Local ONNX embedding model behind a lazy, single-flight handle.

use std::sync::Mutex;

use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tokenizers::{PaddingParams, PaddingStrategy, TruncationParams, TruncationStrategy};
use tokio::sync::OnceCell;

use crate::error::ModelError;
use crate::models::EmbeddingConfig;

/// Process-wide handle to the embedding model.
///
/// Constructed once at startup and passed by reference into whatever needs
/// embeddings. The model itself is loaded on first use and reused for every
/// later call; concurrent first uses collapse into a single load. Creating
/// the handle never touches the model files, so operations that only read
/// the store never pay the load.
pub struct EmbeddingProvider {
    config: EmbeddingConfig,
    model: OnceCell<EmbeddingModel>,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            config: config.clone(),
            model: OnceCell::new(),
        }
    }

    /// Embed a batch of texts, loading the model on the first call.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        let model = self
            .model
            .get_or_try_init(|| async { EmbeddingModel::load(&self.config) })
            .await?;
        model.embed(texts)
    }

    /// Configured embedding dimension; the loaded model must agree.
    pub fn dimension(&self) -> u64 {
        self.config.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// A loaded sentence-embedding model: ONNX session plus tokenizer.
pub struct EmbeddingModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
}

impl EmbeddingModel {
    pub fn load(config: &EmbeddingConfig) -> Result<Self, ModelError> {
        let model_dir = config.resolved_model_dir();
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let max_tokens = config.max_tokens as usize;

        if !model_path.exists() {
            return Err(ModelError::NotFound(format!(
                "model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ModelError::LoadError(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::LoadError(e.to_string()))?
            .with_intra_threads(num_cpus())
            .map_err(|e| ModelError::LoadError(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e| ModelError::LoadError(e.to_string()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| ModelError::TokenizerError(e.to_string()))?;

        // Truncation bounds memory for long chunks
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                strategy: TruncationStrategy::LongestFirst,
                ..Default::default()
            }))
            .map_err(|e| ModelError::TokenizerError(e.to_string()))?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimension: config.dimension as usize,
        })
    }

    /// Embed a batch of texts: masked mean pooling over the token
    /// embeddings, then L2 normalisation.
    pub fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| ModelError::TokenizerError(e.to_string()))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);
        let batch_size = encodings.len();

        let mut input_ids = vec![0i64; batch_size * max_len];
        let mut attention_mask = vec![0i64; batch_size * max_len];
        let token_type_ids = vec![0i64; batch_size * max_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            for (j, (&id, &m)) in ids.iter().zip(mask.iter()).enumerate() {
                input_ids[i * max_len + j] = id as i64;
                attention_mask[i * max_len + j] = m as i64;
            }
        }

        let input_ids_tensor = Tensor::from_array(([batch_size, max_len], input_ids))
            .map_err(|e| ModelError::InferenceError(e.to_string()))?;
        let attention_mask_tensor =
            Tensor::from_array(([batch_size, max_len], attention_mask.clone()))
                .map_err(|e| ModelError::InferenceError(e.to_string()))?;
        let token_type_ids_tensor = Tensor::from_array(([batch_size, max_len], token_type_ids))
            .map_err(|e| ModelError::InferenceError(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::InferenceError("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])
            .map_err(|e| ModelError::InferenceError(e.to_string()))?;

        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ModelError::InferenceError(e.to_string()))?;

        let shape = output_array.shape();

        let embeddings: Vec<Vec<f32>> = if shape.len() == 3 {
            // Token-level output: mean over the attended tokens.
            (0..batch_size)
                .map(|i| {
                    let mut pooled = vec![0f32; self.dimension];
                    let mut attended = 0f32;
                    for j in 0..max_len {
                        if attention_mask[i * max_len + j] == 0 {
                            continue;
                        }
                        attended += 1.0;
                        for (d, value) in pooled.iter_mut().enumerate() {
                            *value += output_array[[i, j, d]];
                        }
                    }
                    if attended > 0.0 {
                        for value in &mut pooled {
                            *value /= attended;
                        }
                    }
                    normalize(&pooled)
                })
                .collect()
        } else if shape.len() == 2 {
            // Sentence-level output: the model pooled already.
            (0..batch_size)
                .map(|i| {
                    let embedding: Vec<f32> =
                        (0..self.dimension).map(|d| output_array[[i, d]]).collect();
                    normalize(&embedding)
                })
                .collect()
        } else {
            return Err(ModelError::InferenceError(format!(
                "unexpected output shape: {:?}",
                shape
            )));
        };

        Ok(embeddings)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
