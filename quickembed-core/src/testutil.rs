//! Mock embedding backends for tests.

use std::sync::Mutex;

use crate::embedding::{EmbedError, Embedder, split_batch};

/// Deterministic embedder returning vectors of a fixed dimension.
///
/// Each value is derived from the text's bytes, so identical inputs always
/// produce identical vectors.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = text
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
        (0..self.dimensions)
            .map(|i| ((seed.wrapping_add(i as u32) % 1000) as f32) / 1000.0)
            .collect()
    }
}

impl Embedder for MockEmbedder {
    fn embed_single(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.vector_for(text))
    }

    fn embed_batch(&self, block: &str) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(split_batch(block).into_iter().map(|t| self.vector_for(t)).collect())
    }

    fn model_name(&self) -> &str {
        "test-embedder"
    }

    fn provider_type(&self) -> &str {
        "mock"
    }
}

/// Embedder that always returns an error.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_single(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::EncodingFailed("mock embedder failure".into()))
    }

    fn embed_batch(&self, _block: &str) -> Result<Vec<Vec<f32>>, EmbedError> {
        Err(EmbedError::EncodingFailed("mock embedder failure".into()))
    }

    fn model_name(&self) -> &str {
        "failing-embedder"
    }

    fn provider_type(&self) -> &str {
        "mock-failing"
    }
}

/// Embedder that succeeds but yields no data.
pub struct EmptyEmbedder;

impl Embedder for EmptyEmbedder {
    fn embed_single(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(Vec::new())
    }

    fn embed_batch(&self, _block: &str) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(Vec::new())
    }

    fn model_name(&self) -> &str {
        "empty-embedder"
    }

    fn provider_type(&self) -> &str {
        "mock-empty"
    }
}

/// Embedder that records every input it receives and returns a fixed batch.
///
/// Test-only: panics if its call log lock is poisoned.
pub struct RecordingEmbedder {
    batch_response: Vec<Vec<f32>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingEmbedder {
    pub fn new(batch_response: Vec<Vec<f32>>) -> Self {
        Self {
            batch_response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Inputs received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Embedder for RecordingEmbedder {
    fn embed_single(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(self.batch_response.first().cloned().unwrap_or_default())
    }

    fn embed_batch(&self, block: &str) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.lock().unwrap().push(block.to_string());
        Ok(self.batch_response.clone())
    }

    fn model_name(&self) -> &str {
        "recording-embedder"
    }

    fn provider_type(&self) -> &str {
        "mock-recording"
    }
}
