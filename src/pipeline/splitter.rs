//! Paragraph splitter: raw extracted text to paragraph-like units.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::chunk::char_len;
use crate::pipeline::filter::{self, FilterVerdict};

const HEADER_MAX_WORDS: usize = 8;
const HEADER_MIN_CHARS: usize = 10;

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+\S").unwrap());
static LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z]*(?:\s+[A-Za-z]+){0,3}:").unwrap());

/// Whether a trimmed line looks like a section header.
#[must_use]
pub fn is_header(line: &str) -> bool {
    let line = line.trim();
    if line.split_whitespace().count() > HEADER_MAX_WORDS || char_len(line) < HEADER_MIN_CHARS {
        return false;
    }
    NUMBERED.is_match(line) || is_all_caps(line) || LABEL.is_match(line)
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_alphabetic)
        && line
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

fn flush(current: &mut String, out: &mut Vec<String>) {
    if !current.is_empty() {
        out.push(std::mem::take(current));
    }
}

/// Scan line by line and build raw paragraphs, before any filtering.
fn raw_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut current, &mut paragraphs);
            continue;
        }

        if is_header(line) {
            flush(&mut current, &mut paragraphs);
            current.push_str(line);
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }
    flush(&mut current, &mut paragraphs);

    paragraphs
}

/// Every raw paragraph with its content-filter verdict, in source order.
#[must_use]
pub fn split_paragraphs_with_verdicts(text: &str) -> Vec<(String, FilterVerdict)> {
    raw_paragraphs(text)
        .into_iter()
        .map(|p| {
            let verdict = filter::check(&p);
            (p, verdict)
        })
        .collect()
}

/// Split text into paragraphs, keeping only meaningful ones.
#[must_use]
pub fn split_paragraphs(text: &str) -> Vec<String> {
    split_paragraphs_with_verdicts(text)
        .into_iter()
        .filter_map(|(p, verdict)| match verdict {
            FilterVerdict::Kept => Some(p),
            FilterVerdict::Dropped(reason) => {
                debug!(reason = reason.as_str(), chars = char_len(&p), "paragraph dropped");
                None
            }
        })
        .collect()
}
