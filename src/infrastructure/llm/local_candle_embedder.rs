use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::{Encoding, PaddingParams, Tokenizer, TruncationParams};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Sentence-transformer embeddings computed in-process with candle.
///
/// The forward pass is CPU-bound, so every batch runs on the blocking pool
/// against a shared encoder.
pub struct LocalCandleEmbedder {
    encoder: Arc<SentenceEncoder>,
}

struct SentenceEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
}

struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

fn load_error(what: &str, reason: impl std::fmt::Display) -> EmbedderError {
    EmbedderError::ModelLoadFailed(format!("{what}: {reason}"))
}

fn inference_error(reason: impl std::fmt::Display) -> EmbedderError {
    EmbedderError::InferenceFailed(reason.to_string())
}

impl ModelFiles {
    /// Resolves the model files through the Hugging Face cache, downloading on a miss.
    fn fetch(model_id: &str) -> Result<Self, EmbedderError> {
        let api = Api::new().map_err(|e| load_error("hub", e))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
        let get = |name: &str| repo.get(name).map_err(|e| load_error(name, e));

        Ok(Self {
            config: get("config.json")?,
            tokenizer: get("tokenizer.json")?,
            weights: get("model.safetensors")?,
        })
    }
}

impl SentenceEncoder {
    fn load(files: &ModelFiles, device: Device) -> Result<Self, EmbedderError> {
        let raw = std::fs::read_to_string(&files.config).map_err(|e| load_error("config", e))?;
        let config: BertConfig =
            serde_json::from_str(&raw).map_err(|e| load_error("config", e))?;

        let mut tokenizer =
            Tokenizer::from_file(&files.tokenizer).map_err(|e| load_error("tokenizer", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| load_error("truncation", e))?;
        // Batches pad to their longest member; padded positions get mask 0.
        tokenizer.with_padding(Some(PaddingParams::default()));

        let dtype = if device.is_cpu() { DType::F32 } else { DType::F16 };
        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], dtype, &device)
                .map_err(|e| load_error("weights", e))?
        };
        let model = BertModel::load(vb, &config).map_err(|e| load_error("model", e))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: config.hidden_size,
        })
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encodings = self
            .tokenizer
            .encode_batch(inputs, true)
            .map_err(|e| EmbedderError::InferenceFailed(format!("tokenization: {e}")))?;

        let input_ids = self.stack_rows(&encodings, Encoding::get_ids)?;
        let type_ids = self.stack_rows(&encodings, Encoding::get_type_ids)?;
        let attention_mask = self.stack_rows(&encodings, Encoding::get_attention_mask)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))
            .and_then(|t| t.to_dtype(DType::F32))
            .map_err(inference_error)?;

        pool_sentence_embeddings(&hidden, &attention_mask)
    }

    fn stack_rows(
        &self,
        encodings: &[Encoding],
        row: fn(&Encoding) -> &[u32],
    ) -> Result<Tensor, EmbedderError> {
        let rows: Vec<&[u32]> = encodings.iter().map(row).collect();
        Tensor::new(rows, &self.device).map_err(inference_error)
    }
}

fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Vec<Vec<f32>>> {
    let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let token_counts = mask.sum(1)?;
    summed.broadcast_div(&token_counts)?.to_vec2::<f32>()
}

/// Mean-pools token states under the attention mask, then L2-normalizes.
///
/// `hidden` is `(batch, tokens, hidden)` and `attention_mask` is `(batch, tokens)`.
pub fn pool_sentence_embeddings(
    hidden: &Tensor,
    attention_mask: &Tensor,
) -> Result<Vec<Embedding>, EmbedderError> {
    let pooled = masked_mean(hidden, attention_mask).map_err(inference_error)?;

    Ok(pooled
        .into_iter()
        .map(|mut values| {
            let length = values.iter().map(|x| x * x).sum::<f32>().sqrt();
            if length > 0.0 {
                values.iter_mut().for_each(|x| *x /= length);
            }
            Embedding::new(values)
        })
        .collect())
}

impl LocalCandleEmbedder {
    /// Loads `model_id` from the Hugging Face hub. Blocking; call at startup.
    pub fn new(model_id: &str) -> Result<Self, EmbedderError> {
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        tracing::info!(device = ?device, model = model_id, "Loading local embedding model");

        let files = ModelFiles::fetch(model_id)?;
        let encoder = SentenceEncoder::load(&files, device)?;

        tracing::info!(dimensions = encoder.hidden_size, "Local embedding model ready");
        Ok(Self {
            encoder: Arc::new(encoder),
        })
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Embedding>, EmbedderError> {
        let encoder = Arc::clone(&self.encoder);
        tokio::task::spawn_blocking(move || encoder.encode(&texts))
            .await
            .map_err(|e| EmbedderError::InferenceFailed(format!("embedding task: {e}")))?
    }
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    #[tracing::instrument(skip(self, texts), fields(batch = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts.iter().map(|t| t.to_string()).collect())
            .await
    }

    fn dimensions(&self) -> usize {
        self.encoder.hidden_size
    }
}
