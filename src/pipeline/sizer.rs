//! Chunk sizer: repartitions paragraphs into a target character band.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::models::chunk::char_len;
use crate::pipeline::filter::{self, DropReason, FilterVerdict};

pub const MIN_CHUNK_SIZE: usize = 200;
pub const MAX_CHUNK_SIZE: usize = 800;

/// Fallback fragments this short or shorter are discarded.
const FALLBACK_MAX_DISCARD: usize = 10;
const PREVIEW_CHARS: usize = 60;

/// Which tokenizer produced a sentence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceSource {
    /// Unicode sentence boundaries (UAX #29).
    Primary,
    /// Split after `.`, `!` and `?`.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentences {
    pub items: Vec<String>,
    pub source: SentenceSource,
}

/// Tokenize into sentences, falling back to punctuation splitting when the
/// primary tokenizer is unavailable or finds nothing.
#[must_use]
pub fn tokenize_sentences(text: &str) -> Sentences {
    if let Some(items) = primary_sentences(text).filter(|items| !items.is_empty()) {
        return Sentences {
            items,
            source: SentenceSource::Primary,
        };
    }

    let mut items = fallback_sentences(text);
    let trimmed = text.trim();
    if items.is_empty() && !trimmed.is_empty() {
        items.push(trimmed.to_string());
    }
    debug!(sentences = items.len(), "sentence tokenizer fell back to punctuation");
    Sentences {
        items,
        source: SentenceSource::Fallback,
    }
}

#[cfg(feature = "unicode-sentences")]
fn primary_sentences(text: &str) -> Option<Vec<String>> {
    use unicode_segmentation::UnicodeSegmentation;

    Some(
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(not(feature = "unicode-sentences"))]
fn primary_sentences(_text: &str) -> Option<Vec<String>> {
    None
}

/// Split after sentence punctuation, dropping fragments of 10 characters or fewer.
#[must_use]
pub fn fallback_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut push = |fragment: &str| {
        let fragment = fragment.trim();
        if char_len(fragment) > FALLBACK_MAX_DISCARD {
            sentences.push(fragment.to_string());
        }
    };

    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            push(&text[start..end]);
            start = end;
        }
    }
    push(&text[start..]);

    sentences
}

/// Why the sizer dropped a packed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum ChunkDrop {
    Duplicate,
    Filtered(DropReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedChunk {
    pub preview: String,
    pub drop: ChunkDrop,
}

/// Sizer output with everything it silently discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizedChunks {
    pub chunks: Vec<String>,
    pub dropped: Vec<DroppedChunk>,
    /// Tokenizer used for each oversized paragraph, in order.
    pub tokenizers: Vec<SentenceSource>,
}

/// Packs paragraphs into chunks between `min` and `max` characters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSizer {
    min: usize,
    max: usize,
}

impl Default for ChunkSizer {
    fn default() -> Self {
        Self::new(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
    }
}

impl ChunkSizer {
    #[must_use]
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    #[must_use]
    pub fn size(&self, paragraphs: &[String]) -> SizedChunks {
        let mut packed: Vec<String> = Vec::new();
        let mut tokenizers = Vec::new();

        for paragraph in paragraphs {
            let len = char_len(paragraph);
            if len > self.max {
                let sentences = tokenize_sentences(paragraph);
                tokenizers.push(sentences.source);
                self.pack_sentences(sentences.items, &mut packed);
            } else if len >= self.min {
                packed.push(paragraph.clone());
            } else {
                match packed.last_mut() {
                    Some(prev) if char_len(prev) + 1 + len <= self.max => {
                        prev.push(' ');
                        prev.push_str(paragraph);
                    }
                    // Under-sized standalone chunk: nothing to merge into.
                    _ => packed.push(paragraph.clone()),
                }
            }
        }

        let mut result = SizedChunks {
            tokenizers,
            ..SizedChunks::default()
        };
        let mut seen = HashSet::new();
        for chunk in packed {
            if !seen.insert(dedup_key(&chunk)) {
                debug!(chars = char_len(&chunk), "duplicate chunk dropped");
                result.dropped.push(DroppedChunk {
                    preview: preview(&chunk),
                    drop: ChunkDrop::Duplicate,
                });
                continue;
            }
            match filter::check(&chunk) {
                FilterVerdict::Kept => result.chunks.push(chunk),
                FilterVerdict::Dropped(reason) => {
                    debug!(reason = reason.as_str(), "sized chunk dropped");
                    result.dropped.push(DroppedChunk {
                        preview: preview(&chunk),
                        drop: ChunkDrop::Filtered(reason),
                    });
                }
            }
        }
        result
    }

    /// Greedy packing. A buffer that would overflow `max` is flushed; one
    /// still under `min` at that point joins the previous chunk when it fits
    /// and otherwise stands alone. The last buffer is flushed whatever its size.
    fn pack_sentences(&self, sentences: Vec<String>, out: &mut Vec<String>) {
        let mut buffer = String::new();
        let mut buffer_len = 0;

        for sentence in sentences {
            let sentence_len = char_len(&sentence);
            if buffer_len > 0 && buffer_len + 1 + sentence_len > self.max {
                let flushed = std::mem::take(&mut buffer);
                match out.last_mut() {
                    Some(prev)
                        if buffer_len < self.min
                            && char_len(prev) + 1 + buffer_len <= self.max =>
                    {
                        prev.push(' ');
                        prev.push_str(&flushed);
                    }
                    _ => out.push(flushed),
                }
                buffer_len = 0;
            }
            if buffer_len > 0 {
                buffer.push(' ');
                buffer_len += 1;
            }
            buffer.push_str(&sentence);
            buffer_len += sentence_len;
        }

        if !buffer.is_empty() {
            out.push(buffer);
        }
    }
}

/// Size paragraphs with the default band and return the surviving chunks.
#[must_use]
pub fn size_chunks(paragraphs: &[String]) -> Vec<String> {
    ChunkSizer::default().size(paragraphs).chunks
}

/// Whitespace-collapsed, lowercased form used to detect duplicates.
#[must_use]
pub fn dedup_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Leading characters of a chunk, for reports.
#[must_use]
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
