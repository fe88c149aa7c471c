//! Sentence-embedding relevance ranking.
//!
//! Threads and keywords are embedded with a BERT sentence model (mean pooled
//! over tokens) and every thread is scored by the sum of its cosine
//! similarities to each keyword.

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use std::path::{Path, PathBuf};
use threadpick_core::{CoreError, EmbeddingError, RankedListing, RedditPost, RelevanceRanker};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// BERT position embeddings stop at 512 tokens.
const MAX_SEQUENCE_LENGTH: usize = 512;

struct LoadedModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

pub struct EmbeddingEngine {
    model_path: PathBuf,
    model: Option<LoadedModel>,
}

impl EmbeddingEngine {
    /// `model_path` is a directory holding `config.json`, `tokenizer.json`
    /// and `model.safetensors`.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            model: None,
        }
    }

    pub fn load_model(&mut self) -> Result<(), CoreError> {
        let dir = self.model_path.as_path();
        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                model_name: dir.display().to_string(),
            }
            .into());
        }

        let load_failed = |what: &Path| EmbeddingError::ModelLoadingFailed {
            model_path: what.display().to_string(),
        };

        let config_path = dir.join("config.json");
        let raw_config =
            std::fs::read_to_string(&config_path).map_err(|_| load_failed(&config_path))?;
        let config: Config =
            serde_json::from_str(&raw_config).map_err(|_| load_failed(&config_path))?;

        let tokenizer_path = dir.join("tokenizer.json");
        let mut tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|_| load_failed(&tokenizer_path))?;
        limit_sequence_length(&mut tokenizer, MAX_SEQUENCE_LENGTH)
            .map_err(|_| load_failed(&tokenizer_path))?;

        let weights_path = dir.join("model.safetensors");
        let device = Device::Cpu;
        // SAFETY: the weights file is only read, and is not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DTYPE, &device)
        }
        .map_err(|_| load_failed(&weights_path))?;
        let model = BertModel::load(vb, &config).map_err(|_| load_failed(&weights_path))?;

        info!("Loaded similarity model from {}", dir.display());
        self.model = Some(LoadedModel {
            model,
            tokenizer,
            device,
        });
        Ok(())
    }

    pub fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        let loaded = self.model.as_ref().ok_or(EmbeddingError::ModelNotLoaded)?;

        let encoding = loaded
            .tokenizer
            .encode(text, true)
            .map_err(|_| EmbeddingError::TokenizationFailed {
                text_length: text.len(),
            })?;
        let embedding = mean_pooled(&loaded.model, encoding.get_ids(), &loaded.device).map_err(|e| {
            EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            }
        })?;
        Ok(embedding)
    }
}

/// Truncation happens inside the tokenizer so `[CLS]` and `[SEP]` survive
/// on long inputs.
fn limit_sequence_length(tokenizer: &mut Tokenizer, max_length: usize) -> tokenizers::Result<()> {
    tokenizer.with_truncation(Some(TruncationParams {
        max_length,
        ..TruncationParams::default()
    }))?;
    Ok(())
}

fn mean_pooled(model: &BertModel, ids: &[u32], device: &Device) -> candle_core::Result<Vec<f32>> {
    let input_ids = Tensor::new(ids, device)?.unsqueeze(0)?;
    let token_type_ids = input_ids.zeros_like()?;
    let hidden = model.forward(&input_ids, &token_type_ids)?;
    let (_batch, n_tokens, _hidden_size) = hidden.dims3()?;
    let pooled = (hidden.sum(1)? / n_tokens as f64)?;
    pooled.squeeze(0)?.to_vec1::<f32>()
}

impl RelevanceRanker for EmbeddingEngine {
    fn rank(
        &self,
        listing: Vec<RedditPost>,
        keywords: &[String],
    ) -> Result<RankedListing, CoreError> {
        let thread_vectors = listing
            .iter()
            .map(|post| self.generate_embedding(&thread_text(post)))
            .collect::<Result<Vec<_>, _>>()?;
        let keyword_vectors = keywords
            .iter()
            .map(|keyword| self.generate_embedding(keyword))
            .collect::<Result<Vec<_>, _>>()?;

        let scores = relevance_scores(&thread_vectors, &keyword_vectors)?;
        debug!("Scored {} threads against {} keywords", listing.len(), keywords.len());
        rank_by_scores(listing, scores)
    }
}

/// Text a thread is judged by: its title followed directly by its body.
pub fn thread_text(post: &RedditPost) -> String {
    format!("{}{}", post.title, post.selftext)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// One score per thread: the sum of its similarities to every keyword.
pub fn relevance_scores(
    thread_vectors: &[Vec<f32>],
    keyword_vectors: &[Vec<f32>],
) -> Result<Vec<f32>, CoreError> {
    let expected = thread_vectors
        .first()
        .or(keyword_vectors.first())
        .map(Vec::len)
        .unwrap_or(0);
    if let Some(bad) = thread_vectors
        .iter()
        .chain(keyword_vectors)
        .find(|v| v.len() != expected)
    {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: bad.len(),
        }
        .into());
    }

    Ok(thread_vectors
        .iter()
        .map(|thread| {
            keyword_vectors
                .iter()
                .map(|keyword| cosine_similarity(keyword, thread))
                .sum()
        })
        .collect())
}

/// Sorts the listing by descending score; ties keep listing order.
pub fn rank_by_scores(
    listing: Vec<RedditPost>,
    scores: Vec<f32>,
) -> Result<RankedListing, CoreError> {
    if listing.len() != scores.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: listing.len(),
            actual: scores.len(),
        }
        .into());
    }

    let mut pairs: Vec<(RedditPost, f32)> = listing.into_iter().zip(scores).collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (posts, scores): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

    RankedListing::new(posts, scores).ok_or_else(|| CoreError::Internal {
        message: "ranked listing lost alignment".to_string(),
    })
}
