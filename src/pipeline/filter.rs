//! Content filter: decides whether a span carries enough meaningful text.
//!
//! Used by both the paragraph splitter and the chunk sizer, so a span can be
//! rejected at either stage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::chunk::char_len;

const MIN_TRIMMED_CHARS: usize = 50;
const MIN_ALPHANUMERIC_CHARS: usize = 10;
const MIN_WORDS: usize = 5;
const MAX_SINGLE_CHAR_WORD_RATIO: f64 = 0.3;
const MAX_BRACKET_RATIO: f64 = 0.15;

static PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static ALL_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z\s]+$").unwrap());
static DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.+$").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-+$").unwrap());
static CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:Table|Figure|Page)\s+\d+").unwrap());

/// Junk shapes a span can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JunkPattern {
    PageNumber,
    AllCaps,
    Dots,
    Dashes,
    Caption,
}

/// Why a span was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "pattern")]
pub enum DropReason {
    TooShort,
    TooFewAlphanumeric,
    TooFewWords,
    SingleCharacterNoise,
    CitationHeavy,
    Junk(JunkPattern),
}

impl DropReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::TooFewAlphanumeric => "too_few_alphanumeric",
            Self::TooFewWords => "too_few_words",
            Self::SingleCharacterNoise => "single_character_noise",
            Self::CitationHeavy => "citation_heavy",
            Self::Junk(_) => "junk",
        }
    }
}

/// Outcome of the content filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict", content = "detail")]
pub enum FilterVerdict {
    Kept,
    Dropped(DropReason),
}

impl FilterVerdict {
    #[must_use]
    pub fn is_kept(&self) -> bool {
        matches!(self, Self::Kept)
    }
}

/// Run every check in order; the first failing check is the reported reason.
#[must_use]
pub fn check(text: &str) -> FilterVerdict {
    let trimmed = text.trim();
    let length = char_len(trimmed);

    if length < MIN_TRIMMED_CHARS {
        return FilterVerdict::Dropped(DropReason::TooShort);
    }

    let alphanumeric = trimmed.chars().filter(|c| c.is_alphanumeric()).count();
    if alphanumeric < MIN_ALPHANUMERIC_CHARS {
        return FilterVerdict::Dropped(DropReason::TooFewAlphanumeric);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() < MIN_WORDS {
        return FilterVerdict::Dropped(DropReason::TooFewWords);
    }

    let single = words.iter().filter(|w| w.chars().count() == 1).count();
    if single as f64 / words.len() as f64 > MAX_SINGLE_CHAR_WORD_RATIO {
        return FilterVerdict::Dropped(DropReason::SingleCharacterNoise);
    }

    let brackets = trimmed
        .chars()
        .filter(|c| matches!(c, '(' | ')' | '[' | ']'))
        .count();
    if brackets as f64 > length as f64 * MAX_BRACKET_RATIO {
        return FilterVerdict::Dropped(DropReason::CitationHeavy);
    }

    if let Some(pattern) = junk_pattern(trimmed) {
        return FilterVerdict::Dropped(DropReason::Junk(pattern));
    }

    FilterVerdict::Kept
}

/// True when the span survives every check.
#[must_use]
pub fn is_meaningful(text: &str) -> bool {
    check(text).is_kept()
}

fn junk_pattern(trimmed: &str) -> Option<JunkPattern> {
    let table: [(&Lazy<Regex>, JunkPattern); 5] = [
        (&PAGE_NUMBER, JunkPattern::PageNumber),
        (&ALL_CAPS, JunkPattern::AllCaps),
        (&DOTS, JunkPattern::Dots),
        (&DASHES, JunkPattern::Dashes),
        (&CAPTION, JunkPattern::Caption),
    ];
    table
        .iter()
        .find(|(re, _)| re.is_match(trimmed))
        .map(|(_, pattern)| *pattern)
}
