//! Text normalizer: artifact repair, vocabulary simplification, citation stripping.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{Ll})-\s+(\p{Ll})").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static FUSED_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").unwrap());

// Citation patterns take the whitespace in front of them with them.
static YEAR_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\b\d{4}[a-z]?\b[^()]*\)").unwrap());
static NUMERIC_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[\s*\d+(?:\s*[,\-–]\s*\d+)*\s*\]").unwrap());
static SEE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(\s*see\b[^()]*\)").unwrap());

/// Formal term to plain replacement. No replacement is itself a source term.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("aforementioned", "previous"),
    ("thus", "therefore"),
    ("whilst", "while"),
    ("utilise", "use"),
    ("utilize", "use"),
    ("utilised", "used"),
    ("utilized", "used"),
    ("demonstrate", "show"),
    ("demonstrates", "shows"),
    ("demonstrated", "showed"),
    ("elucidate", "explain"),
    ("commence", "begin"),
    ("commenced", "began"),
    ("terminate", "end"),
    ("terminated", "ended"),
    ("approximately", "about"),
    ("subsequently", "later"),
    ("numerous", "many"),
    ("facilitate", "help"),
    ("endeavour", "try"),
    ("ascertain", "find out"),
    ("sufficient", "enough"),
    ("nevertheless", "still"),
    ("henceforth", "from now on"),
    ("prior to", "before"),
    ("in order to", "to"),
];

static VOCABULARY: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REPLACEMENTS
        .iter()
        .map(|(term, plain)| {
            let pattern = term
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            (Regex::new(&format!(r"(?i)\b{pattern}\b")).unwrap(), *plain)
        })
        .collect()
});

/// Apply artifact repair, vocabulary simplification and citation stripping.
///
/// Removing one citation or phrase can expose another (nested brackets, a
/// hyphen break that straddled a citation), so the composition is rerun until
/// the text stops changing. Each pass either shortens the text or splits a
/// fused pair that cannot re-form, so the loop ends.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = normalize_once(text);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    let repaired = repair_artifacts(text);
    let simplified = simplify_vocabulary(&repaired);
    strip_citations(&simplified)
}

/// Rejoin hyphen line breaks, collapse whitespace, split fused words.
#[must_use]
pub fn repair_artifacts(text: &str) -> String {
    let joined = HYPHEN_BREAK.replace_all(text, "$1$2");
    let collapsed = WHITESPACE.replace_all(&joined, " ");
    FUSED_WORDS.replace_all(&collapsed, "$1 $2").into_owned()
}

/// Replace formal vocabulary with plainer words, keeping an initial capital.
#[must_use]
pub fn simplify_vocabulary(text: &str) -> String {
    let mut out = text.to_string();
    for (re, plain) in VOCABULARY.iter() {
        if !re.is_match(&out) {
            continue;
        }
        out = re
            .replace_all(&out, |caps: &Captures| match_case(&caps[0], plain))
            .into_owned();
    }
    out
}

fn match_case(original: &str, replacement: &str) -> String {
    let capitalized = original.chars().next().is_some_and(char::is_uppercase);
    if !capitalized {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove year citations, numeric bracket citations and `(see ...)` references.
#[must_use]
pub fn strip_citations(text: &str) -> String {
    let text = cut(&YEAR_CITATION, text);
    let text = cut(&NUMERIC_CITATION, &text);
    let text = cut(&SEE_REFERENCE, &text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Delete every match, leaving a single space only where the match sat
/// between two words.
fn cut(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let end = caps.get(0).map_or(text.len(), |m| m.end());
        let before_word = text[end..].chars().next().is_some_and(char::is_alphanumeric);
        if before_word {
            " "
        } else {
            ""
        }
    })
    .into_owned()
}
