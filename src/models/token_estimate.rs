use serde::Serialize;

use crate::models::chunk::StructuredChunk;

/// Approximate token count using the ~4 chars per token heuristic.
const CHARS_PER_TOKEN: f64 = 4.0;

/// Rough fixed cost of the slide instruction wrapped around each chunk.
const PROMPT_OVERHEAD_TOKENS: u64 = 120;

/// Token estimate for sending a document's chunks to the slide generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenEstimate {
    /// Tokens in the extracted source text.
    #[serde(rename = "src")]
    pub source: u64,
    /// Tokens the generator will receive (chunk text plus prompt overhead).
    #[serde(rename = "gen")]
    pub generation: u64,
}

impl TokenEstimate {
    /// Estimate for a source text and the chunks that survived the pipeline.
    #[must_use]
    pub fn for_document(source: &str, chunks: &[StructuredChunk]) -> Self {
        let generation = chunks
            .iter()
            .map(|c| estimate_tokens(c.length) + PROMPT_OVERHEAD_TOKENS)
            .sum();
        Self {
            source: estimate_tokens(source.chars().count()),
            generation,
        }
    }
}

/// Estimate tokens from a character count.
#[must_use]
pub fn estimate_tokens(char_count: usize) -> u64 {
    (char_count as f64 / CHARS_PER_TOKEN).ceil() as u64
}
