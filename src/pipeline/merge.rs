//! Second pass that fuses adjacent small structured chunks.

use tracing::debug;

use crate::models::chunk::{SlideType, StructuredChunk, Topic};
use crate::pipeline::sizer::MAX_CHUNK_SIZE;

/// Topic of two fused chunks.
#[must_use]
pub fn reconcile_topic(a: Topic, b: Topic) -> Topic {
    if a == b {
        a
    } else if a.is_general() {
        b
    } else if b.is_general() {
        a
    } else {
        Topic::GeneralContent
    }
}

/// Slide type of two fused chunks.
#[must_use]
pub fn reconcile_slide_type(a: SlideType, b: SlideType) -> SlideType {
    if a == b {
        a
    } else if a == SlideType::Title || b == SlideType::Title {
        SlideType::Introduction
    } else {
        // A conclusion mixed with anything else, and every other mix.
        SlideType::Content
    }
}

/// Merge with the default ceiling.
#[must_use]
pub fn merge_chunks(chunks: Vec<StructuredChunk>) -> Vec<StructuredChunk> {
    merge_chunks_with_ceiling(chunks, MAX_CHUNK_SIZE)
}

/// Single left-to-right pass. `complexity` and `generation_hint` keep the
/// accumulator's values after a fuse.
#[must_use]
pub fn merge_chunks_with_ceiling(
    chunks: Vec<StructuredChunk>,
    ceiling: usize,
) -> Vec<StructuredChunk> {
    let mut merged = Vec::with_capacity(chunks.len());
    let mut iter = chunks.into_iter();
    let Some(mut acc) = iter.next() else {
        return merged;
    };

    for next in iter {
        if acc.length + next.length <= ceiling {
            debug!(left = acc.length, right = next.length, "fusing adjacent chunks");
            acc.append(&next.text);
            acc.topic = reconcile_topic(acc.topic, next.topic);
            acc.slide_type = reconcile_slide_type(acc.slide_type, next.slide_type);
        } else {
            merged.push(std::mem::replace(&mut acc, next));
        }
    }
    merged.push(acc);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chunk::{char_len, Complexity};

    fn chunk(text: &str, topic: Topic, slide_type: SlideType) -> StructuredChunk {
        StructuredChunk::new(
            text.to_string(),
            topic,
            slide_type,
            Complexity::Low,
            format!("hint for {}", slide_type.as_str()),
        )
    }

    #[test]
    fn empty_input() {
        assert!(merge_chunks(Vec::new()).is_empty());
    }

    #[test]
    fn small_neighbours_fuse() {
        let merged = merge_chunks(vec![
            chunk("First part.", Topic::GeneralContent, SlideType::Title),
            chunk("Second part.", Topic::EconomicFactors, SlideType::Content),
        ]);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.text, "First part. Second part.");
        assert_eq!(m.length, char_len(&m.text));
        assert_eq!(m.topic, Topic::EconomicFactors);
        assert_eq!(m.slide_type, SlideType::Introduction);
        assert_eq!(m.generation_hint, "hint for title");
    }

    #[test]
    fn ceiling_stops_fusing_and_preserves_order() {
        let a = "a".repeat(500);
        let b = "b".repeat(400);
        let c = "c".repeat(300);
        let merged = merge_chunks(vec![
            chunk(&a, Topic::Methodology, SlideType::Content),
            chunk(&b, Topic::Methodology, SlideType::Content),
            chunk(&c, Topic::Methodology, SlideType::Content),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, a);
        assert_eq!(merged[1].text, format!("{b} {c}"));
        assert_eq!(merged[1].length, 701);
    }

    #[test]
    fn exact_ceiling_fuses() {
        let merged = merge_chunks_with_ceiling(
            vec![
                chunk(&"x".repeat(60), Topic::GeneralContent, SlideType::Content),
                chunk(&"y".repeat(40), Topic::GeneralContent, SlideType::Content),
            ],
            100,
        );
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn topic_reconciliation() {
        assert_eq!(reconcile_topic(Topic::KeyFigures, Topic::KeyFigures), Topic::KeyFigures);
        assert_eq!(reconcile_topic(Topic::KeyFigures, Topic::GeneralContent), Topic::KeyFigures);
        assert_eq!(reconcile_topic(Topic::GeneralContent, Topic::Methodology), Topic::Methodology);
        assert_eq!(reconcile_topic(Topic::KeyFigures, Topic::Methodology), Topic::GeneralContent);
    }

    #[test]
    fn slide_type_reconciliation() {
        assert_eq!(reconcile_slide_type(SlideType::Data, SlideType::Data), SlideType::Data);
        assert_eq!(
            reconcile_slide_type(SlideType::Title, SlideType::Content),
            SlideType::Introduction
        );
        assert_eq!(
            reconcile_slide_type(SlideType::Causes, SlideType::Title),
            SlideType::Introduction
        );
        assert_eq!(
            reconcile_slide_type(SlideType::Conclusion, SlideType::Data),
            SlideType::Content
        );
        assert_eq!(reconcile_slide_type(SlideType::Causes, SlideType::Effects), SlideType::Content);
    }

    #[test]
    fn complexity_is_not_recomputed() {
        let mut first = chunk("Short words here.", Topic::GeneralContent, SlideType::Content);
        first.complexity = Complexity::Low;
        let mut second = chunk("Institutionalization.", Topic::GeneralContent, SlideType::Content);
        second.complexity = Complexity::High;
        let merged = merge_chunks(vec![first, second]);
        assert_eq!(merged[0].complexity, Complexity::Low);
    }
}
