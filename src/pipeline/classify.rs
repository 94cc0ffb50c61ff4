//! Heuristic classifier: topic, slide type, complexity tier and generation hint.
//!
//! Every table here is process-wide constant data. Keyword matching is a
//! case-insensitive substring search over the text padded with one space on
//! each side, so a keyword written with a leading space only matches at the
//! start of a word.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::chunk::{Complexity, SlideType, StructuredChunk, Topic};

/// Topic categories in priority order; the first match wins.
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::HistoricalConflict,
        keywords: &[
            " war ", " war.", " war,", " wars", "warfare", "wartime", "world war", "civil war",
            "battle", "military", "army", "armies", "invasion", "invaded", "troops", "soldier",
            "siege", "armistice", "conflict", "weapon", " navy", "naval", "rebellion", "uprising",
        ],
    },
    TopicRule {
        topic: Topic::PoliticalSystems,
        keywords: &[
            "government", "democra", "monarch", "parliament", "election", "constitution",
            "republic", "dictator", "legislat", "senate", "political", "ideolog", "fascis",
            "communis", "totalitarian", "sovereign", "regime",
        ],
    },
    TopicRule {
        topic: Topic::GeographyPolitics,
        keywords: &[
            "europe", " asia", "africa", "america", "middle east", "country", "countries",
            " nation", "region", "border", "territor", "empire", " coloni", " colony",
            "continent", "geograph",
        ],
    },
    TopicRule {
        topic: Topic::CauseEffect,
        keywords: &[
            "because", "caused", "causes", "cause of", "led to", "leads to", "resulted in",
            "result of", "consequence", "due to", "as a result", "therefore", "impact on",
            "effect of", "effects of",
        ],
    },
    TopicRule {
        topic: Topic::EconomicFactors,
        keywords: &[
            "econom", "trade", "market", "inflation", "financ", " tax", "gdp", "industr",
            "currency", " bank", " price", "depression", "unemployment", " wage", " debt",
            "investment",
        ],
    },
    TopicRule {
        topic: Topic::KeyFigures,
        keywords: &[
            "president", " king ", " king,", " king.", " queen", "emperor", "prime minister",
            "chancellor", " leader", "minister", " pope", " tsar", "kaiser", " led by",
        ],
    },
    TopicRule {
        topic: Topic::Methodology,
        keywords: &[
            "methodolog", "method", "procedure", "experiment", "participants", "sample size",
            "survey", "questionnaire", "data collection", "analysis",
        ],
    },
    TopicRule {
        topic: Topic::ResearchFindings,
        keywords: &[
            "result", "finding", "found that", "show that", "shows that", "significant",
            "evidence", " data",
        ],
    },
    TopicRule {
        topic: Topic::Conclusions,
        keywords: &[
            "in conclusion", "conclude", "in summary", "to summarize", "overall",
            "future work", "implication",
        ],
    },
    TopicRule {
        topic: Topic::Introduction,
        keywords: &[
            "introduc", "overview", "this paper", "this chapter", "this report", "purpose of",
            "aim of", "we discuss",
        ],
    },
];

/// Condition a slide rule tests.
pub enum Condition {
    /// Any of the phrases occurs in the text.
    AnyPhrase(&'static [&'static str]),
    /// `position == 0`.
    First,
    /// `position < 0.25 * total`.
    LeadingQuarter,
    /// `position > 0.75 * total`.
    TrailingQuarter,
}

/// One step of the slide-type cascade.
pub struct SlideRule {
    pub name: &'static str,
    pub condition: Condition,
    pub slide_type: SlideType,
}

impl SlideRule {
    #[must_use]
    pub fn matches(&self, padded_lower: &str, position: usize, total: usize) -> bool {
        let position = position as f64;
        let total = total as f64;
        match self.condition {
            Condition::AnyPhrase(phrases) => phrases.iter().any(|p| padded_lower.contains(p)),
            Condition::First => position == 0.0,
            Condition::LeadingQuarter => position < 0.25 * total,
            Condition::TrailingQuarter => position > 0.75 * total,
        }
    }
}

/// Evaluated top to bottom; the first matching rule decides.
pub const SLIDE_RULES: &[SlideRule] = &[
    SlideRule {
        name: "phrase:review",
        condition: Condition::AnyPhrase(&[
            "reading check",
            "review questions",
            "check your understanding",
            "discussion questions",
        ]),
        slide_type: SlideType::Review,
    },
    SlideRule {
        name: "phrase:effects",
        condition: Condition::AnyPhrase(&["treaty of versailles", "aftermath", "legacy of"]),
        slide_type: SlideType::Effects,
    },
    SlideRule {
        name: "phrase:background",
        condition: Condition::AnyPhrase(&["background", "historical context"]),
        slide_type: SlideType::Background,
    },
    SlideRule {
        name: "phrase:timeline",
        condition: Condition::AnyPhrase(&["timeline", "chronology"]),
        slide_type: SlideType::Timeline,
    },
    SlideRule {
        name: "phrase:definitions",
        condition: Condition::AnyPhrase(&["key terms", "glossary", "is defined as"]),
        slide_type: SlideType::Definitions,
    },
    SlideRule {
        name: "phrase:conclusion",
        condition: Condition::AnyPhrase(&["in conclusion", "to conclude", "in summary"]),
        slide_type: SlideType::Conclusion,
    },
    SlideRule {
        name: "position:first",
        condition: Condition::First,
        slide_type: SlideType::Title,
    },
    SlideRule {
        name: "position:leading",
        condition: Condition::LeadingQuarter,
        slide_type: SlideType::Introduction,
    },
    SlideRule {
        name: "position:trailing",
        condition: Condition::TrailingQuarter,
        slide_type: SlideType::Conclusion,
    },
    SlideRule {
        name: "keyword:data",
        condition: Condition::AnyPhrase(&[
            "%", "percent", "statistic", " data", "table", "figure", "graph", "chart",
            "million", "billion",
        ]),
        slide_type: SlideType::Data,
    },
    SlideRule {
        name: "keyword:methodology",
        condition: Condition::AnyPhrase(&[
            "method", "approach", "procedure", "experiment", "sample", "technique",
        ]),
        slide_type: SlideType::Methodology,
    },
    SlideRule {
        name: "keyword:causes",
        condition: Condition::AnyPhrase(&[
            "cause", "because", "led to", "reason", "due to", "origin", "factor",
        ]),
        slide_type: SlideType::Causes,
    },
    SlideRule {
        name: "keyword:effects",
        condition: Condition::AnyPhrase(&[
            "effect", "impact", "result", "consequence", "outcome",
        ]),
        slide_type: SlideType::Effects,
    },
];

const DEFAULT_RULE: &str = "default";

static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?\s?%").unwrap());
static P_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bp\s*[<>=≤≥]\s*0?\.\d+").unwrap());
static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\b").unwrap());

/// Labels assigned to one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub topic: Topic,
    pub slide_type: SlideType,
    pub complexity: Complexity,
    pub generation_hint: String,
}

impl Classification {
    #[must_use]
    pub fn into_chunk(self, text: String) -> StructuredChunk {
        StructuredChunk::new(
            text,
            self.topic,
            self.slide_type,
            self.complexity,
            self.generation_hint,
        )
    }
}

fn padded_lower(text: &str) -> String {
    format!(" {} ", text.to_lowercase())
}

/// Classify a chunk at `position` among `total` chunks.
#[must_use]
pub fn classify(text: &str, position: usize, total: usize) -> Classification {
    let lowered = padded_lower(text);
    let topic = topic_of_lowered(&lowered);
    let (slide_type, _) = slide_type_of_lowered(&lowered, position, total);
    Classification {
        topic,
        slide_type,
        complexity: complexity(text),
        generation_hint: generation_hint(slide_type, topic),
    }
}

#[must_use]
pub fn topic(text: &str) -> Topic {
    topic_of_lowered(&padded_lower(text))
}

fn topic_of_lowered(lowered: &str) -> Topic {
    TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map_or(Topic::GeneralContent, |rule| rule.topic)
}

#[must_use]
pub fn slide_type(text: &str, position: usize, total: usize) -> SlideType {
    slide_type_with_rule(text, position, total).0
}

/// Slide type together with the name of the rule that produced it.
#[must_use]
pub fn slide_type_with_rule(
    text: &str,
    position: usize,
    total: usize,
) -> (SlideType, &'static str) {
    slide_type_of_lowered(&padded_lower(text), position, total)
}

fn slide_type_of_lowered(
    lowered: &str,
    position: usize,
    total: usize,
) -> (SlideType, &'static str) {
    SLIDE_RULES
        .iter()
        .find(|rule| rule.matches(lowered, position, total))
        .map_or((SlideType::Content, DEFAULT_RULE), |rule| {
            (rule.slide_type, rule.name)
        })
}

/// Mean length of whitespace words, ignoring surrounding punctuation.
#[must_use]
pub fn mean_word_length(text: &str) -> f64 {
    let lengths: Vec<usize> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).chars().count())
        .filter(|&n| n > 0)
        .collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

/// Percentages, p-values and acronyms.
#[must_use]
pub fn technical_indicators(text: &str) -> usize {
    PERCENTAGE.find_iter(text).count()
        + P_VALUE.find_iter(text).count()
        + ACRONYM.find_iter(text).count()
}

#[must_use]
pub fn complexity(text: &str) -> Complexity {
    let mean = mean_word_length(text);
    let indicators = technical_indicators(text);
    if mean > 6.0 || indicators > 3 {
        Complexity::High
    } else if mean > 4.0 || indicators > 1 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

fn slide_instruction(slide_type: SlideType) -> &'static str {
    match slide_type {
        SlideType::Title => {
            "Write a short, engaging title slide that names the subject and frames what follows."
        }
        SlideType::Introduction => "Introduce the main question and why it matters.",
        SlideType::Background => "Summarize the context a reader needs before the main content.",
        SlideType::Timeline => "Present the events in chronological order with dates first.",
        SlideType::Definitions => "List each key term with a one-line plain-language definition.",
        SlideType::Methodology => "Explain how the work was done as a sequence of clear steps.",
        SlideType::Data => "Highlight the key numbers and what each one shows.",
        SlideType::Causes => "List the main causes, most important first.",
        SlideType::Effects => "List the main effects and who they affected.",
        SlideType::Review => "Turn the material into short review questions with brief answers.",
        SlideType::Conclusion => "Summarize the key takeaways and end on the most important point.",
        SlideType::Content => "Condense the passage into three to five clear bullet points.",
    }
}

/// Instruction for the slide generator, derived from slide type and topic.
#[must_use]
pub fn generation_hint(slide_type: SlideType, topic: Topic) -> String {
    let label = topic.as_str();
    let guidance = if ["histor", "conflict", "war"].iter().any(|k| label.contains(k)) {
        "Frame events as causes and effects and keep their sequence clear.".to_string()
    } else if label.contains("politic") {
        "Explain the governance structure: who held power and how decisions were made.".to_string()
    } else if label.contains("econom") {
        "Emphasize the financial impact and who gained or lost.".to_string()
    } else {
        format!("Focus on {}.", label.replace('_', " "))
    };
    format!("{} {guidance}", slide_instruction(slide_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIMATE: &str = "This paper discusses climate policy in Europe after 1990. It covers emissions targets and treaties.";

    #[test]
    fn climate_example_is_geography_and_title() {
        let c = classify(CLIMATE, 0, 1);
        assert_eq!(c.topic, Topic::GeographyPolitics);
        assert_eq!(c.slide_type, SlideType::Title);
        assert!(c.generation_hint.contains("governance"));
    }

    #[test]
    fn topic_priority_order() {
        assert_eq!(
            topic("The army marched on the parliament of the republic."),
            Topic::HistoricalConflict
        );
        assert_eq!(
            topic("The parliament debated the border with the neighbouring country."),
            Topic::PoliticalSystems
        );
        assert_eq!(topic("Inflation rose because of the harvest."), Topic::CauseEffect);
        assert_eq!(topic("Inflation and trade figures improved."), Topic::EconomicFactors);
        assert_eq!(topic("The queen opened the new hall."), Topic::KeyFigures);
        assert_eq!(topic("Nothing in particular is said here."), Topic::GeneralContent);
        assert_eq!(topic(""), Topic::GeneralContent);
    }

    #[test]
    fn word_start_keywords_avoid_false_hits() {
        assert_eq!(topic("Toward an award for software design."), Topic::GeneralContent);
        assert_eq!(topic("The war ended in spring."), Topic::HistoricalConflict);
        assert_eq!(topic("Making and thinking take time."), Topic::GeneralContent);
    }

    #[test]
    fn phrase_overrides_beat_position() {
        let (st, rule) = slide_type_with_rule("Reading check: what did the treaty change?", 0, 10);
        assert_eq!(st, SlideType::Review);
        assert_eq!(rule, "phrase:review");
        assert_eq!(
            slide_type("The Treaty of Versailles punished Germany.", 9, 10),
            SlideType::Effects
        );
        assert_eq!(slide_type("Some background first.", 5, 10), SlideType::Background);
    }

    #[test]
    fn positional_rules() {
        assert_eq!(
            slide_type_with_rule("Plain words.", 0, 10),
            (SlideType::Title, "position:first")
        );
        assert_eq!(slide_type("Plain words.", 2, 10), SlideType::Introduction);
        assert_eq!(slide_type("Plain words.", 8, 10), SlideType::Conclusion);
        assert_eq!(slide_type("Plain words.", 5, 10), SlideType::Content);
    }

    #[test]
    fn keyword_fallback_in_middle_band() {
        assert_eq!(slide_type("About 40% of voters stayed home.", 5, 10), SlideType::Data);
        assert_eq!(slide_type("The method relied on interviews.", 5, 10), SlideType::Methodology);
        assert_eq!(slide_type("Drought led to famine.", 5, 10), SlideType::Causes);
        assert_eq!(slide_type("The impact was lasting.", 5, 10), SlideType::Effects);
        assert_eq!(
            slide_type_with_rule("Nothing special.", 5, 10),
            (SlideType::Content, "default")
        );
    }

    #[test]
    fn empty_document_position_is_title() {
        assert_eq!(slide_type("", 0, 0), SlideType::Title);
    }

    #[test]
    fn complexity_tiers() {
        assert_eq!(complexity("The cat sat on the mat and ate a fig."), Complexity::Low);
        assert_eq!(complexity(CLIMATE), Complexity::Medium);
        assert_eq!(
            complexity("Institutional reconfiguration necessitated considerable administrative reorganization."),
            Complexity::High
        );
        assert_eq!(
            complexity("We saw 12% and 14% gains, p < 0.05, in the EU and UK."),
            Complexity::High
        );
        assert_eq!(complexity(""), Complexity::Low);
    }

    #[test]
    fn technical_indicator_counting() {
        assert_eq!(technical_indicators("42% of the NATO budget, p = .01"), 3);
        assert_eq!(technical_indicators("nothing technical"), 0);
    }

    #[test]
    fn hint_topic_guidance() {
        let hint = generation_hint;
        assert!(hint(SlideType::Causes, Topic::HistoricalConflict).contains("causes and effects"));
        assert!(hint(SlideType::Content, Topic::EconomicFactors).contains("financial impact"));
        assert!(hint(SlideType::Content, Topic::PoliticalSystems).contains("governance"));
        assert_eq!(
            generation_hint(SlideType::Data, Topic::ResearchFindings),
            "Highlight the key numbers and what each one shows. Focus on research findings."
        );
    }
}
