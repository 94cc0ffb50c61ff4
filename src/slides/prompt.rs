use crate::models::chunk::StructuredChunk;

/// Instruction sent to the slide generator for one chunk.
#[must_use]
pub fn build_prompt(chunk: &StructuredChunk) -> String {
    format!(
        "Convert this text into a presentation slide.\n\
         \n\
         Slide type: {slide_type}\n\
         Topic: {topic}\n\
         Reading level: {complexity}\n\
         Guidance: {hint}\n\
         \n\
         Text: {text}\n\
         \n\
         Return JSON only, in this format:\n\
         {{\"title\": \"Clear, engaging slide title\", \"bullets\": [\"Key point 1\", \"Key point 2\", \"Key point 3\"]}}",
        slide_type = chunk.slide_type.as_str(),
        topic = chunk.topic.as_str().replace('_', " "),
        complexity = chunk.complexity.as_str(),
        hint = chunk.generation_hint,
        text = chunk.text,
    )
}
