//! Document segmentation and classification pipeline.
//!
//! raw text → paragraphs → sized chunks → normalize → classify → merge →
//! budget truncation. Every stage is a deterministic function of its input
//! and keeps source order.

pub mod budget;
pub mod classify;
pub mod filter;
pub mod merge;
pub mod normalize;
pub mod sizer;
pub mod splitter;

use serde::Serialize;
use tracing::debug;

use crate::models::chunk::StructuredChunk;
use crate::pipeline::filter::FilterVerdict;
use crate::pipeline::sizer::{ChunkSizer, DroppedChunk, SentenceSource};

/// Tunables for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub merge_ceiling: usize,
    /// Truncate to the slide budget.
    pub apply_budget: bool,
    pub unknown_page_cap: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_chunk_size: sizer::MIN_CHUNK_SIZE,
            max_chunk_size: sizer::MAX_CHUNK_SIZE,
            merge_ceiling: sizer::MAX_CHUNK_SIZE,
            apply_budget: true,
            unknown_page_cap: budget::DEFAULT_UNKNOWN_PAGE_CAP,
        }
    }
}

/// What each stage did, including everything it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub paragraphs_seen: usize,
    pub paragraphs_kept: usize,
    pub paragraph_drops: Vec<ParagraphDrop>,
    pub chunk_drops: Vec<DroppedChunk>,
    pub tokenizers: Vec<SentenceSource>,
    pub chunks_sized: usize,
    pub chunks_merged: usize,
    /// Cap applied, if budgeting was enabled.
    pub cap: Option<usize>,
    pub truncated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphDrop {
    pub index: usize,
    pub verdict: FilterVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub chunks: Vec<StructuredChunk>,
    pub report: PipelineReport,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: PipelineSettings,
}

impl Pipeline {
    #[must_use]
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run every stage on one document. `page_count == 0` means unknown.
    #[must_use]
    pub fn run(&self, text: &str, page_count: u32) -> PipelineOutput {
        let mut report = PipelineReport::default();

        let verdicts = splitter::split_paragraphs_with_verdicts(text);
        report.paragraphs_seen = verdicts.len();
        let mut paragraphs = Vec::with_capacity(verdicts.len());
        for (index, (paragraph, verdict)) in verdicts.into_iter().enumerate() {
            if verdict.is_kept() {
                paragraphs.push(paragraph);
            } else {
                report.paragraph_drops.push(ParagraphDrop { index, verdict });
            }
        }
        report.paragraphs_kept = paragraphs.len();

        let sized = ChunkSizer::new(self.settings.min_chunk_size, self.settings.max_chunk_size)
            .size(&paragraphs);
        report.chunk_drops = sized.dropped;
        report.tokenizers = sized.tokenizers;
        report.chunks_sized = sized.chunks.len();

        let structured = structure(&sized.chunks);
        let mut chunks = merge::merge_chunks_with_ceiling(structured, self.settings.merge_ceiling);
        report.chunks_merged = chunks.len();

        if self.settings.apply_budget {
            let cap = budget::chunk_cap(page_count, self.settings.unknown_page_cap);
            report.cap = Some(cap);
            if chunks.len() > cap {
                report.truncated = chunks.len() - cap;
                chunks.truncate(cap);
            }
        }

        debug!(
            paragraphs = report.paragraphs_seen,
            sized = report.chunks_sized,
            merged = report.chunks_merged,
            truncated = report.truncated,
            "pipeline finished"
        );

        PipelineOutput { chunks, report }
    }
}

/// Run the pipeline with default settings and return only the chunks.
#[must_use]
pub fn process_document(text: &str, page_count: u32) -> Vec<StructuredChunk> {
    Pipeline::default().run(text, page_count).chunks
}

/// Normalize sized chunks and label each by its position among the chunks
/// that still have text.
fn structure(chunks: &[String]) -> Vec<StructuredChunk> {
    let texts: Vec<String> = chunks
        .iter()
        .map(|chunk| normalize::normalize(chunk))
        .filter(|text| !text.is_empty())
        .collect();
    let total = texts.len();
    texts
        .into_iter()
        .enumerate()
        .map(|(position, text)| classify::classify(&text, position, total).into_chunk(text))
        .collect()
}
