use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::{EmbedError, Embedder, split_batch};

const DEFAULT_MODEL_NAME: &str = "nomic-embed-text-v1.5";

/// Models the local backend knows how to load: name, fastembed model, dimensions.
const SUPPORTED_MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("nomic-embed-text-v1.5", EmbeddingModel::NomicEmbedTextV15, 768),
    ("all-MiniLM-L6-v2", EmbeddingModel::AllMiniLML6V2, 384),
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
];

/// Settings for [`LocalEmbedder`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalEmbedderConfig {
    pub model: String,
    pub show_download_progress: bool,
}

impl Default for LocalEmbedderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_NAME.to_string(),
            show_download_progress: true,
        }
    }
}

impl LocalEmbedderConfig {
    fn resolve(&self) -> Result<(EmbeddingModel, usize), EmbedError> {
        SUPPORTED_MODELS
            .iter()
            .find(|(name, _, _)| *name == self.model)
            .map(|(_, model, dims)| (model.clone(), *dims))
            .ok_or_else(|| {
                let known: Vec<&str> = SUPPORTED_MODELS.iter().map(|(name, _, _)| *name).collect();
                EmbedError::ModelLoad(format!(
                    "unknown model '{}'. Supported models: {}",
                    self.model,
                    known.join(", ")
                ))
            })
    }
}

/// Local embedding provider using fastembed with ONNX runtime.
///
/// The model needs exclusive access while encoding, so concurrent requests
/// queue on an internal mutex.
pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

impl LocalEmbedder {
    pub fn new(config: &LocalEmbedderConfig) -> Result<Self, EmbedError> {
        let (model, dimensions) = config.resolve()?;
        let options =
            InitOptions::new(model).with_show_download_progress(config.show_download_progress);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;
        tracing::info!(model = %config.model, dimensions, "local embedding model loaded");
        Ok(Self {
            model: Mutex::new(model),
            model_name: config.model.clone(),
            dimensions,
        })
    }

    /// Dimensionality of the vectors this model produces.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;
        model
            .embed(texts, None)
            .map_err(|e| EmbedError::EncodingFailed(e.to_string()))
    }
}

impl Embedder for LocalEmbedder {
    fn embed_single(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.encode(vec![text])?.into_iter().next().unwrap_or_default())
    }

    fn embed_batch(&self, block: &str) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.encode(split_batch(block))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn provider_type(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;

    /// Shared model instance across all tests to avoid parallel download races
    /// and redundant model loads.
    static EMBEDDER: LazyLock<LocalEmbedder> = LazyLock::new(|| {
        LocalEmbedder::new(&LocalEmbedderConfig {
            model: "all-MiniLM-L6-v2".into(),
            show_download_progress: false,
        })
        .unwrap()
    });

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        dot / (norm_a * norm_b)
    }

    #[test]
    fn default_config_uses_nomic_model() {
        let config = LocalEmbedderConfig::default();
        assert_eq!(config.model, "nomic-embed-text-v1.5");
        let (_, dims) = config.resolve().unwrap();
        assert_eq!(dims, 768);
    }

    #[test]
    fn unknown_model_is_a_load_error() {
        let config = LocalEmbedderConfig {
            model: "no-such-model".into(),
            show_download_progress: false,
        };
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, EmbedError::ModelLoad(_)));
        assert!(err.to_string().contains("no-such-model"));
    }

    #[test]
    #[ignore = "downloads model weights"]
    fn embed_single_text_returns_384_dims() {
        let result = EMBEDDER.embed_single("hello world").unwrap();
        assert_eq!(result.len(), 384);
        assert_eq!(EMBEDDER.dimensions(), 384);
    }

    #[test]
    #[ignore = "downloads model weights"]
    fn batch_block_of_three_lines_returns_three_vectors() {
        let result = EMBEDDER.embed_batch("one\ntwo\nthree").unwrap();
        assert_eq!(result.len(), 3);
        for vec in &result {
            assert_eq!(vec.len(), 384);
        }
    }

    #[test]
    #[ignore = "downloads model weights"]
    fn batch_preserves_line_order() {
        let batch = EMBEDDER.embed_batch("happy dog\nquantum physics").unwrap();
        let dog = EMBEDDER.embed_single("happy dog").unwrap();
        assert!(cosine_similarity(&batch[0], &dog) > 0.99);
        assert!(cosine_similarity(&batch[1], &dog) < 0.5);
    }

    #[test]
    #[ignore = "downloads model weights"]
    fn similar_texts_have_high_cosine_similarity() {
        let result = EMBEDDER
            .embed_batch("the cat sat on the mat\nthe cat is sitting on the mat")
            .unwrap();
        let sim = cosine_similarity(&result[0], &result[1]);
        assert!(
            sim > 0.7,
            "expected cosine similarity > 0.7 for similar texts, got {sim}"
        );
    }

    #[test]
    #[ignore = "downloads model weights"]
    fn model_name_returns_expected() {
        assert_eq!(EMBEDDER.model_name(), "all-MiniLM-L6-v2");
        assert_eq!(EMBEDDER.provider_type(), "local");
    }
}
