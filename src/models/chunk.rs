use serde::{Deserialize, Serialize};

/// Character count used for every size decision (not bytes).
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Coarse subject-matter label assigned by keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    HistoricalConflict,
    PoliticalSystems,
    GeographyPolitics,
    CauseEffect,
    EconomicFactors,
    KeyFigures,
    Methodology,
    ResearchFindings,
    Conclusions,
    Introduction,
    #[default]
    GeneralContent,
}

impl Topic {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HistoricalConflict => "historical_conflict",
            Self::PoliticalSystems => "political_systems",
            Self::GeographyPolitics => "geography_politics",
            Self::CauseEffect => "cause_effect",
            Self::EconomicFactors => "economic_factors",
            Self::KeyFigures => "key_figures",
            Self::Methodology => "methodology",
            Self::ResearchFindings => "research_findings",
            Self::Conclusions => "conclusions",
            Self::Introduction => "introduction",
            Self::GeneralContent => "general_content",
        }
    }

    #[must_use]
    pub fn is_general(&self) -> bool {
        *self == Self::GeneralContent
    }
}

/// Rhetorical role of a chunk once it becomes a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Title,
    Introduction,
    Background,
    Timeline,
    Definitions,
    Methodology,
    Data,
    Causes,
    Effects,
    Review,
    Conclusion,
    #[default]
    Content,
}

impl SlideType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Introduction => "introduction",
            Self::Background => "background",
            Self::Timeline => "timeline",
            Self::Definitions => "definitions",
            Self::Methodology => "methodology",
            Self::Data => "data",
            Self::Causes => "causes",
            Self::Effects => "effects",
            Self::Review => "review",
            Self::Conclusion => "conclusion",
            Self::Content => "content",
        }
    }
}

/// Readability/technicality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Low,
    Medium,
    High,
}

impl Complexity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A classified chunk ready for the slide generator.
///
/// The serialized field set (`text`, `topic`, `slideType`, `length`,
/// `complexity`, `generationHint`) is the downstream contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredChunk {
    pub text: String,
    pub topic: Topic,
    pub slide_type: SlideType,
    /// Character count of `text`.
    pub length: usize,
    pub complexity: Complexity,
    pub generation_hint: String,
}

impl StructuredChunk {
    #[must_use]
    pub fn new(
        text: String,
        topic: Topic,
        slide_type: SlideType,
        complexity: Complexity,
        generation_hint: String,
    ) -> Self {
        let length = char_len(&text);
        Self {
            text,
            topic,
            slide_type,
            length,
            complexity,
            generation_hint,
        }
    }

    /// Append text with a separating space and recompute `length`.
    pub fn append(&mut self, text: &str) {
        if !self.text.is_empty() && !text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.length = char_len(&self.text);
    }
}
