// PiiShield Data Models
// Shared types for the detection pipeline and the masking engine

use serde::{Deserialize, Serialize};

// ============ Spans ============

/// Which detector produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanSource {
    Pattern,
    Model,
}

impl SpanSource {
    /// Sort rank used by the deduplicator: pattern spans win ties at equal
    /// start offsets.
    pub fn rank(self) -> u8 {
        match self {
            SpanSource::Pattern => 0,
            SpanSource::Model => 1,
        }
    }
}

/// A detected region of text. `value` equals the text slice at `[start, end)`
/// at the time of detection; the masking engine re-verifies this before
/// substituting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub category: String,
    pub value: String,
    /// UTF-8 byte offset (0-based) into the analyzed text.
    pub start: usize,
    /// UTF-8 byte offset (0-based, end-exclusive) into the analyzed text.
    pub end: usize,
    pub source: SpanSource,
    pub confidence: f64,
}

// ============ Chunking ============

/// A bounded-length window of the original text submitted to the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// UTF-8 byte offset of the chunk's first byte in the original text.
    pub offset: usize,
}

// ============ Classifier tokens ============

/// Raw sub-word prediction as returned by the classifier. Offsets are byte
/// offsets into the chunk text and may be absent; `fragment` may carry a
/// sub-word continuation prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToken {
    pub fragment: String,
    pub label: String,
    pub score: f64,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

/// Whole word reassembled from sub-word fragments. Offsets are resolved and
/// absolute; words whose offsets could not be recovered are never emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub label: String,
    pub score: f64,
    pub start: usize,
    pub end: usize,
}

/// Multi-word entity fused from consecutive same-category words. The score is
/// the minimum of the constituent word scores: a weak link anywhere lowers
/// trust in the whole phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntity {
    pub category: String,
    pub text: String,
    pub score: f64,
    pub start: usize,
    pub end: usize,
}

// ============ Masking ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskResult {
    pub masked_text: String,
    /// Spans actually substituted, ascending by start, for review display.
    pub applied_spans: Vec<Span>,
}

// ============ Detection outcome ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub request_id: String,
    pub spans: Vec<Span>,
    pub chunk_count: usize,
    pub failed_chunks: usize,
    pub latency_ms: i64,
}

// ============ Options ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOptions {
    /// Maximum classifier window, in characters.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Overlap between consecutive windows, in characters. Must stay below
    /// `max_chunk_chars`; entities shorter than this are always fully
    /// contained in at least one chunk.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Soft budget for the whole classifier phase. On expiry the pipeline
    /// proceeds pattern-only instead of blocking.
    #[serde(default = "default_classifier_budget_ms")]
    pub classifier_budget_ms: u64,
    /// Concurrent in-flight classifier calls.
    #[serde(default = "default_classifier_max_concurrency")]
    pub classifier_max_concurrency: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            chunk_overlap: default_chunk_overlap(),
            classifier_budget_ms: default_classifier_budget_ms(),
            classifier_max_concurrency: default_classifier_max_concurrency(),
        }
    }
}

fn default_max_chunk_chars() -> usize { 480 }
fn default_chunk_overlap() -> usize { 64 }
fn default_classifier_budget_ms() -> u64 { 8000 }
fn default_classifier_max_concurrency() -> usize { 4 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = DetectionOptions::default();
        assert_eq!(options.max_chunk_chars, 480);
        assert_eq!(options.chunk_overlap, 64);
        assert!(options.chunk_overlap < options.max_chunk_chars);
    }

    #[test]
    fn test_options_deserialize_with_partial_fields() {
        let options: DetectionOptions =
            serde_json::from_str(r#"{"maxChunkChars": 200}"#).unwrap();
        assert_eq!(options.max_chunk_chars, 200);
        assert_eq!(options.chunk_overlap, 64);
    }

    #[test]
    fn test_span_serialization_camel_case() {
        let span = Span {
            category: "email".to_string(),
            value: "a@b.co".to_string(),
            start: 0,
            end: 6,
            source: SpanSource::Pattern,
            confidence: 1.0,
        };
        let json = serde_json::to_string(&span).unwrap();
        assert!(json.contains(r#""source":"pattern""#));
        let parsed: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, span);
    }

    #[test]
    fn test_raw_token_offsets_optional() {
        let token: RawToken = serde_json::from_str(
            r#"{"fragment": "Jane", "label": "B-PER", "score": 0.97}"#,
        )
        .unwrap();
        assert_eq!(token.start, None);
        assert_eq!(token.end, None);
    }
}
