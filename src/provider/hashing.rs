use crate::error::ProviderError;
use crate::util::{stable_hash, word_tokens};

use super::Embedder;

pub(super) const DEFAULT_DIMENSIONS: usize = 256;
const NGRAM_LEN: usize = 3;
const WORD_WEIGHT: f32 = 1.0;
const NGRAM_WEIGHT: f32 = 0.35;

/// Local embedder that needs no model: word tokens and character trigrams are
/// hashed into a fixed number of signed buckets, then L2-normalized.
///
/// Texts that share vocabulary land close together, which is enough for the
/// canvas to show meaningful clusters without network access.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self, ProviderError> {
        if dimensions < 2 {
            return Err(ProviderError::EmbeddingUnavailable(format!(
                "hashing embedder needs at least 2 dimensions, got {dimensions}"
            )));
        }
        Ok(Self { dimensions })
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = stable_hash(feature);
        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vector = vec![0.0f32; self.dimensions];
        let mut features = 0usize;

        for token in word_tokens(text) {
            self.add_feature(&mut vector, token.as_bytes(), WORD_WEIGHT);
            features += 1;

            let padded = format!(" {token} ");
            let chars = padded.chars().collect::<Vec<_>>();
            for window in chars.windows(NGRAM_LEN) {
                let gram = window.iter().collect::<String>();
                self.add_feature(&mut vector, gram.as_bytes(), NGRAM_WEIGHT);
            }
        }

        if features == 0 {
            return Err(ProviderError::EmbeddingUnavailable(
                "text has no embeddable tokens".to_owned(),
            ));
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}
