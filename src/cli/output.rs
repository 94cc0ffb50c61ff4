use serde::Serialize;

use crate::models::chunk::StructuredChunk;
use crate::models::token_estimate::TokenEstimate;
use crate::pipeline::PipelineReport;

/// JSON envelope around one document's structured chunks.
#[derive(Debug, Serialize)]
pub struct DeckPlan {
    pub source: String,
    pub sha256: String,
    /// `0` when unknown.
    pub page_count: u32,
    /// Chunk cap applied, absent when budgeting is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<usize>,
    pub chunks: Vec<StructuredChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PipelineReport>,
    pub tokens: TokenEstimate,
}

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format_error(&e))
}

/// Format a result as indented JSON.
pub fn format_pretty<T: Serialize>(result: &T) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format_error(&e))
}

/// Format using the configured style.
pub fn render<T: Serialize>(result: &T, pretty: bool) -> String {
    if pretty {
        format_pretty(result)
    } else {
        format_json(result)
    }
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn data() -> TestData {
        TestData {
            name: "test".into(),
            value: 42,
        }
    }

    #[test]
    fn format_json_minified() {
        let json = format_json(&data());
        assert!(!json.contains('\n'));
        assert!(json.contains("\"name\":\"test\""));
    }

    #[test]
    fn format_pretty_indents() {
        let json = format_pretty(&data());
        assert!(json.contains('\n'));
        assert!(json.contains("\"value\": 42"));
        assert_eq!(render(&data(), false), format_json(&data()));
    }

    #[test]
    fn format_error_escapes_quotes() {
        let json = format_error(&"bad \"input\"");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["error"], "bad \"input\"");
    }

    #[test]
    fn deck_plan_omits_absent_fields() {
        let plan = DeckPlan {
            source: "doc.txt".into(),
            sha256: "abc".into(),
            page_count: 0,
            cap: None,
            chunks: Vec::new(),
            report: None,
            tokens: TokenEstimate::default(),
        };
        let json = format_json(&plan);
        assert!(!json.contains("\"cap\""));
        assert!(!json.contains("\"report\""));
        assert!(json.contains("\"tokens\":{\"src\":0,\"gen\":0}"));
    }
}
