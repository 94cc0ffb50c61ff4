//! Pure half of the slide generator boundary: prompts, response parsing,
//! validation and deterministic fallback slides. The model call lives
//! outside this crate.

pub mod prompt;

pub use prompt::build_prompt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeckError, Result};
use crate::models::chunk::StructuredChunk;

const MAX_TITLE_CHARS: usize = 100;
const MAX_BULLET_CHARS: usize = 200;
const MAX_BULLETS: usize = 6;
const FALLBACK_TITLE_WORDS: usize = 8;
const FALLBACK_BULLETS: usize = 3;

/// Title and bullets for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDraft {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Where a slide's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideOrigin {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub index: usize,
    #[serde(flatten)]
    pub draft: SlideDraft,
    pub origin: SlideOrigin,
}

/// Parse a raw model response, tolerating code fences and surrounding prose.
pub fn parse_response(raw: &str) -> Result<SlideDraft> {
    let start = raw
        .find('{')
        .ok_or_else(|| DeckError::SlideResponse("no JSON object found".into()))?;
    let end = raw
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| DeckError::SlideResponse("unterminated JSON object".into()))?;
    let draft: SlideDraft = serde_json::from_str(&raw[start..=end])?;
    Ok(draft)
}

/// A usable slide has a short title and one to six short bullets.
#[must_use]
pub fn validate_slide(draft: &SlideDraft) -> bool {
    let title = draft.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return false;
    }
    if draft.bullets.is_empty() || draft.bullets.len() > MAX_BULLETS {
        return false;
    }
    draft.bullets.iter().all(|b| {
        let b = b.trim();
        !b.is_empty() && b.chars().count() <= MAX_BULLET_CHARS
    })
}

/// Deterministic slide built from the chunk's leading sentences.
#[must_use]
pub fn fallback_slide(chunk: &StructuredChunk) -> SlideDraft {
    let sentences: Vec<&str> = chunk
        .text
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let title = sentences
        .first()
        .map(|first| {
            let words: Vec<&str> = first.split_whitespace().collect();
            let mut title = words[..words.len().min(FALLBACK_TITLE_WORDS)].join(" ");
            title = title.trim_end_matches(['.', '!', '?', ',', ';', ':']).to_string();
            if words.len() > FALLBACK_TITLE_WORDS {
                title.push_str("...");
            }
            title
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| title_case(chunk.topic.as_str()));

    let bullets = sentences
        .iter()
        .take(FALLBACK_BULLETS)
        .map(|s| truncate_chars(s, MAX_BULLET_CHARS))
        .collect();

    SlideDraft { title, bullets }
}

fn title_case(label: &str) -> String {
    label
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Pair chunks with raw responses by index; missing, unparseable or invalid
/// responses get the fallback slide.
#[must_use]
pub fn assemble(chunks: &[StructuredChunk], responses: &[String]) -> Vec<Slide> {
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let parsed = responses.get(index).map(|raw| parse_response(raw));
            match parsed {
                Some(Ok(draft)) if validate_slide(&draft) => Slide {
                    index,
                    draft,
                    origin: SlideOrigin::Model,
                },
                other => {
                    if let Some(Err(e)) = &other {
                        debug!(index, error = %e, "slide response rejected");
                    }
                    Slide {
                        index,
                        draft: fallback_slide(chunk),
                        origin: SlideOrigin::Fallback,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chunk::{Complexity, SlideType, Topic};

    fn chunk(text: &str) -> StructuredChunk {
        StructuredChunk::new(
            text.into(),
            Topic::HistoricalConflict,
            SlideType::Content,
            Complexity::Low,
            "hint".into(),
        )
    }

    #[test]
    fn parses_fenced_response() {
        let raw = "Sure! Here it is:\n```json\n{\"title\": \"The Armistice\", \"bullets\": [\"Signed in 1918\", \"Ended the fighting\"]}\n```";
        let draft = parse_response(raw).unwrap();
        assert_eq!(draft.title, "The Armistice");
        assert_eq!(draft.bullets.len(), 2);
        assert!(validate_slide(&draft));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_response("no slide here"), Err(DeckError::SlideResponse(_))));
        assert!(matches!(parse_response("{\"title\": }"), Err(DeckError::Json(_))));
    }

    #[test]
    fn validation_limits() {
        let ok = SlideDraft {
            title: "Title".into(),
            bullets: vec!["One".into()],
        };
        assert!(validate_slide(&ok));
        assert!(!validate_slide(&SlideDraft { title: " ".into(), ..ok.clone() }));
        assert!(!validate_slide(&SlideDraft { bullets: vec![], ..ok.clone() }));
        assert!(!validate_slide(&SlideDraft { bullets: vec!["x".into(); 7], ..ok.clone() }));
        assert!(!validate_slide(&SlideDraft { bullets: vec!["y".repeat(201)], ..ok }));
    }

    #[test]
    fn fallback_uses_leading_sentences() {
        let draft = fallback_slide(&chunk(
            "The war began in the summer of that year after a long crisis. Armies mobilised quickly. Few expected a long war. Nobody planned for winter.",
        ));
        assert_eq!(draft.title, "The war began in the summer of that...");
        assert_eq!(draft.bullets.len(), 3);
        assert_eq!(draft.bullets[1], "Armies mobilised quickly.");
        assert!(validate_slide(&draft));
    }

    #[test]
    fn fallback_title_from_topic_when_text_is_empty() {
        let draft = fallback_slide(&chunk(""));
        assert_eq!(draft.title, "Historical Conflict");
        assert!(draft.bullets.is_empty());
    }

    #[test]
    fn assemble_mixes_model_and_fallback() {
        let chunks = vec![chunk("First chunk text."), chunk("Second chunk text."), chunk("Third.")];
        let responses = vec![
            "{\"title\": \"First\", \"bullets\": [\"a point\"]}".to_string(),
            "garbage".to_string(),
        ];
        let slides = assemble(&chunks, &responses);
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].origin, SlideOrigin::Model);
        assert_eq!(slides[0].draft.title, "First");
        assert_eq!(slides[1].origin, SlideOrigin::Fallback);
        assert_eq!(slides[1].draft.title, "Second chunk text");
        assert_eq!(slides[2].origin, SlideOrigin::Fallback);
    }
}
