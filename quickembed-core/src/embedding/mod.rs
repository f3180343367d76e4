pub mod local;

use thiserror::Error;

pub use local::{LocalEmbedder, LocalEmbedderConfig};

/// Separator between logical texts in a batch block.
pub const BATCH_SEPARATOR: char = '\n';

/// Errors that can occur during embedding.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Failed to load or initialize the embedding model.
    #[error("model load error: {0}")]
    ModelLoad(String),
    /// Failed to encode input texts into vectors.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
    /// The backend cannot serve requests (e.g. a poisoned model lock).
    #[error("embedder unavailable: {0}")]
    Unavailable(String),
}

/// Trait abstracting text-to-vector embedding.
///
/// An empty result from either method is how a backend reports that it could
/// not produce vectors without raising an error. Implementations must be safe
/// to call from several threads at once; the gateway does not serialize calls.
pub trait Embedder: Send + Sync {
    /// Embed one text into a single vector.
    fn embed_single(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embed a block of newline-separated texts.
    ///
    /// Returns one vector per line, in input order.
    fn embed_batch(&self, block: &str) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Model identifier string.
    fn model_name(&self) -> &str;

    /// Provider type identifier (e.g., "local", "mock").
    fn provider_type(&self) -> &str;
}

/// Join texts into the block format accepted by [`Embedder::embed_batch`].
///
/// Texts that themselves contain the separator will be split into extra lines
/// by the backend, shifting every vector after them.
pub fn join_batch<S: AsRef<str>>(texts: &[S]) -> String {
    let mut block = String::new();
    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            block.push(BATCH_SEPARATOR);
        }
        block.push_str(text.as_ref());
    }
    block
}

/// Split a batch block back into its logical texts.
pub fn split_batch(block: &str) -> Vec<&str> {
    block.split(BATCH_SEPARATOR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_uses_single_newline_without_trailing_separator() {
        assert_eq!(join_batch(&["a", "b", "c"]), "a\nb\nc");
    }

    #[test]
    fn join_single_text_is_unchanged() {
        assert_eq!(join_batch(&["only one"]), "only one");
    }

    #[test]
    fn join_keeps_empty_entries_as_empty_lines() {
        assert_eq!(join_batch(&["a", "", "c"]), "a\n\nc");
    }

    #[test]
    fn split_reverses_join_for_plain_texts() {
        let texts = vec!["first".to_string(), "second".to_string()];
        let block = join_batch(&texts);
        assert_eq!(split_batch(&block), vec!["first", "second"]);
    }

    #[test]
    fn embedded_newline_yields_extra_line() {
        let block = join_batch(&["one\ntwo", "three"]);
        assert_eq!(split_batch(&block).len(), 3);
    }

    #[test]
    fn error_display_includes_context() {
        let err = EmbedError::EncodingFailed("bad tensor".into());
        assert_eq!(err.to_string(), "encoding failed: bad tensor");
    }
}
