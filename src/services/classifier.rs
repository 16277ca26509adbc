use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_nn::ops::softmax;
use candle_transformers::models::modernbert::{
    Config as ModernBertConfig, ModernBertForSequenceClassification,
};
use hf_hub::{Repo, RepoType, api::sync::Api};
use serde::Deserialize;
use thiserror::Error;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

/// Candidate roles every résumé is ranked against
pub const CANDIDATE_ROLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "DevOps Engineer",
    "Project Manager",
];

/// Premise tokens beyond this are truncated before inference
const MAX_SEQUENCE_LENGTH: usize = 2048;

/// A candidate role with its confidence score
#[derive(Debug, Clone)]
pub struct RoleScore {
    pub role: String,
    pub score: f32,
}

/// Ranked classification over [`CANDIDATE_ROLES`], best match first
#[derive(Debug, Clone)]
pub struct Classification {
    pub ranked: Vec<RoleScore>,
}

impl Classification {
    fn from_scores(scores: Vec<(String, f32)>) -> Self {
        let mut ranked: Vec<RoleScore> = scores
            .into_iter()
            .map(|(role, score)| RoleScore { role, score })
            .collect();
        // Stable sort: equal scores keep the canonical role order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { ranked }
    }

    /// The highest-scoring role
    pub fn top(&self) -> Option<&RoleScore> {
        self.ranked.first()
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("The document contains no extractable text to classify")]
    EmptyDocument,
    #[error("Failed to load classifier model: {0}")]
    ModelLoad(String),
    #[error("Classifier inference failed: {0}")]
    Inference(String),
}

impl From<candle_core::Error> for ClassifyError {
    fn from(e: candle_core::Error) -> Self {
        ClassifyError::Inference(e.to_string())
    }
}

/// Trait for résumé role classification backends
#[async_trait]
pub trait RoleClassifier: Send + Sync {
    /// Rank all candidate roles for the given résumé text
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError>;

    /// Check if the classifier is ready to serve requests
    async fn health_check(&self) -> bool;

    /// Short backend identifier, reported by the health probe
    fn backend_name(&self) -> &'static str;
}

/// Which ModernBERT zero-shot checkpoint to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSize {
    Base,
    Large,
}

impl ModelSize {
    fn repo_id(self) -> &'static str {
        match self {
            ModelSize::Base => "MoritzLaurer/ModernBERT-base-zeroshot-v2.0",
            ModelSize::Large => "MoritzLaurer/ModernBERT-large-zeroshot-v2.0",
        }
    }
}

impl FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(ModelSize::Base),
            "large" => Ok(ModelSize::Large),
            other => Err(format!("unknown model size '{other}'")),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSize::Base => write!(f, "base"),
            ModelSize::Large => write!(f, "large"),
        }
    }
}

#[derive(Deserialize)]
struct ClassifierLabels {
    #[serde(default)]
    label2id: HashMap<String, u32>,
}

struct ZeroShotModel {
    model: ModernBertForSequenceClassification,
    tokenizer: Tokenizer,
    entailment_id: u32,
    device: Device,
}

/// Zero-shot NLI classifier backed by a ModernBERT checkpoint.
///
/// The model is downloaded from the Hugging Face Hub once at startup (the
/// local HF cache is reused across runs) and held for the process lifetime.
/// Inference serializes on a mutex and runs on the blocking thread pool.
pub struct ZeroShotClassifier {
    inner: Arc<Mutex<ZeroShotModel>>,
    repo_id: &'static str,
}

fn load_err(e: impl std::fmt::Display) -> ClassifyError {
    ClassifyError::ModelLoad(e.to_string())
}

#[cfg(feature = "cuda")]
fn select_device() -> Device {
    match Device::new_cuda(0) {
        Ok(device) => device,
        Err(e) => {
            tracing::warn!("CUDA unavailable ({}), falling back to CPU", e);
            Device::Cpu
        }
    }
}

#[cfg(not(feature = "cuda"))]
fn select_device() -> Device {
    Device::Cpu
}

impl ZeroShotClassifier {
    pub fn load(size: ModelSize) -> Result<Self, ClassifyError> {
        let repo_id = size.repo_id();
        let start = std::time::Instant::now();
        tracing::info!("Loading zero-shot model {}", repo_id);

        let api = Api::new().map_err(load_err)?;
        let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(load_err)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(load_err)?;
        let weights_path = repo
            .get("model.safetensors")
            .or_else(|_| repo.get("pytorch_model.bin"))
            .map_err(load_err)?;

        let config_str = std::fs::read_to_string(&config_path).map_err(load_err)?;
        let config: ModernBertConfig = serde_json::from_str(&config_str).map_err(load_err)?;
        let labels: ClassifierLabels = serde_json::from_str(&config_str).map_err(load_err)?;
        let entailment_id = *labels
            .label2id
            .get("entailment")
            .ok_or_else(|| load_err("config missing 'entailment' in label2id"))?;

        let device = select_device();
        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device) }
                .map_err(load_err)?
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device).map_err(load_err)?
        };
        let model = ModernBertForSequenceClassification::load(vb, &config).map_err(load_err)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(load_err)?;
        // Résumés routinely exceed the context window; drop premise overflow
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                strategy: TruncationStrategy::OnlyFirst,
                ..Default::default()
            }))
            .map_err(load_err)?;

        tracing::info!(
            "Zero-shot model {} ready in {:.1}s",
            repo_id,
            start.elapsed().as_secs_f32()
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(ZeroShotModel {
                model,
                tokenizer,
                entailment_id,
                device,
            })),
            repo_id,
        })
    }
}

impl ZeroShotModel {
    /// One NLI premise/hypothesis pair per candidate role, scored in a
    /// single batched forward pass.
    fn predict(&self, text: &str) -> Result<Classification, ClassifyError> {
        let mut encodings = Vec::new();
        for &role in CANDIDATE_ROLES {
            let hypothesis = format!("This example is {role}.");
            let encoding = self
                .tokenizer
                .encode((text, hypothesis.as_str()), true)
                .map_err(|e| ClassifyError::Inference(format!("tokenization error: {e}")))?;
            encodings.push(encoding);
        }

        let max_len = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
        let pad_token_id = self
            .tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| self.tokenizer.token_to_id("<pad>"))
            .or_else(|| self.tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);

        let mut all_token_ids: Vec<u32> = Vec::new();
        let mut all_attention_masks: Vec<u32> = Vec::new();
        for encoding in encodings {
            let mut token_ids = encoding.get_ids().to_vec();
            let mut attention_mask = encoding.get_attention_mask().to_vec();
            token_ids.resize(max_len, pad_token_id);
            attention_mask.resize(max_len, 0);
            all_token_ids.extend(token_ids);
            all_attention_masks.extend(attention_mask);
        }

        let input_ids =
            Tensor::from_vec(all_token_ids, (CANDIDATE_ROLES.len(), max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(
            all_attention_masks,
            (CANDIDATE_ROLES.len(), max_len),
            &self.device,
        )?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let probabilities = softmax(&logits, D::Minus1)?;
        let mut entailment_probs = probabilities
            .i((.., self.entailment_id as usize))?
            .to_vec1::<f32>()?;

        // Each pair is scored independently; renormalize so scores sum to 1
        let sum: f32 = entailment_probs.iter().sum();
        if sum > 0.0 {
            for p in entailment_probs.iter_mut() {
                *p /= sum;
            }
        }

        let scores = CANDIDATE_ROLES
            .iter()
            .map(|r| r.to_string())
            .zip(entailment_probs)
            .collect();
        Ok(Classification::from_scores(scores))
    }
}

#[async_trait]
impl RoleClassifier for ZeroShotClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyDocument);
        }

        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let model = inner
                .lock()
                .map_err(|_| ClassifyError::Inference("classifier mutex poisoned".to_string()))?;
            model.predict(&text)
        })
        .await
        .map_err(|e| ClassifyError::Inference(format!("inference task failed: {e}")))?
    }

    async fn health_check(&self) -> bool {
        !self.inner.is_poisoned()
    }

    fn backend_name(&self) -> &'static str {
        "modernbert"
    }
}

impl std::fmt::Debug for ZeroShotClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroShotClassifier")
            .field("repo_id", &self.repo_id)
            .finish()
    }
}

/// Deterministic keyword-overlap classifier for development and tests.
///
/// Counts per-role keyword hits in the lowercased text and Laplace-smooths
/// the counts into a probability distribution, so every role gets a nonzero
/// score and unrelated text degrades to a uniform ranking.
pub struct KeywordClassifier;

fn role_keywords(role: &str) -> &'static [&'static str] {
    match role {
        "Software Engineer" => &[
            "software",
            "developer",
            "backend",
            "frontend",
            "full stack",
            "python",
            "java",
            "rust",
            "api",
            "microservice",
            "code review",
        ],
        "Data Scientist" => &[
            "data scientist",
            "machine learning",
            "statistics",
            "pandas",
            "numpy",
            "deep learning",
            "analytics",
            "data analysis",
            "jupyter",
            "model training",
        ],
        "DevOps Engineer" => &[
            "devops",
            "kubernetes",
            "docker",
            "terraform",
            "ci/cd",
            "ansible",
            "infrastructure",
            "monitoring",
            "sre",
            "deployment pipeline",
        ],
        "Project Manager" => &[
            "project manager",
            "stakeholder",
            "roadmap",
            "scrum",
            "agile",
            "budget",
            "timeline",
            "jira",
            "delivery",
            "risk management",
        ],
        _ => &[],
    }
}

fn keyword_scores(text: &str) -> Vec<(String, f32)> {
    let lowered = text.to_lowercase();

    let hits: Vec<usize> = CANDIDATE_ROLES
        .iter()
        .map(|&role| {
            role_keywords(role)
                .iter()
                .filter(|&&kw| lowered.contains(kw))
                .count()
        })
        .collect();

    let total: usize = hits.iter().sum();
    let denominator = (CANDIDATE_ROLES.len() + total) as f32;

    CANDIDATE_ROLES
        .iter()
        .zip(hits)
        .map(|(role, h)| (role.to_string(), (1 + h) as f32 / denominator))
        .collect()
}

#[async_trait]
impl RoleClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyDocument);
        }
        Ok(Classification::from_scores(keyword_scores(text)))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

/// Factory function to create the classifier backend from config
pub async fn create_classifier(
    backend: &str,
    model_size: ModelSize,
) -> Result<Arc<dyn RoleClassifier>, ClassifyError> {
    match backend.to_lowercase().as_str() {
        "modernbert" | "zero-shot" | "zeroshot" => {
            let classifier =
                tokio::task::spawn_blocking(move || ZeroShotClassifier::load(model_size))
                    .await
                    .map_err(|e| ClassifyError::ModelLoad(format!("load task failed: {e}")))??;
            Ok(Arc::new(classifier))
        }
        "keyword" | "noop" | "none" => Ok(Arc::new(KeywordClassifier)),
        other => {
            tracing::warn!(
                "Unknown classifier backend '{}', using keyword fallback",
                other
            );
            Ok(Arc::new(KeywordClassifier))
        }
    }
}
