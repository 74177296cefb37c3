// Masking Engine
// Replaces retained spans with stable placeholders, back to front

use crate::models::{MaskResult, Span};
use crate::services::mapping_store::{MappingEntry, MappingStore};
use tracing::warn;

use super::categories::placeholder_for;

/// Substitute a placeholder for every span, processing spans in descending
/// start order so earlier replacements never shift the coordinates of spans
/// not yet processed. Each span's slice is re-verified against its recorded
/// value first; on any mismatch (stale coordinates, non-boundary offsets) the
/// span is skipped and the rest are still applied — this function never
/// panics over drifted input.
///
/// Applied mappings are appended to the store in ascending text order so
/// restoration can walk the masked text left to right.
pub fn mask_spans(text: &str, spans: &[Span], store: &MappingStore) -> MaskResult {
    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut masked = text.to_string();
    let mut applied: Vec<Span> = Vec::new();
    let mut entries: Vec<MappingEntry> = Vec::new();

    for span in ordered {
        match masked.get(span.start..span.end) {
            Some(slice) if slice == span.value => {}
            _ => {
                warn!(
                    "[MASKING] stale coordinates for {} span at {}..{}, skipping",
                    span.category, span.start, span.end
                );
                continue;
            }
        }

        let placeholder = placeholder_for(&span.category);
        masked.replace_range(span.start..span.end, &placeholder);
        entries.push(MappingEntry {
            placeholder,
            value: span.value.clone(),
        });
        applied.push(span.clone());
    }

    // Gathered back to front; store and report them in text order.
    entries.reverse();
    applied.reverse();
    store.append_batch(entries);

    MaskResult {
        masked_text: masked,
        applied_spans: applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpanSource;
    use crate::services::detection::pattern_rules;

    fn span(category: &str, value: &str, start: usize) -> Span {
        Span {
            category: category.to_string(),
            value: value.to_string(),
            start,
            end: start + value.len(),
            source: SpanSource::Pattern,
            confidence: 1.0,
        }
    }

    #[test]
    fn test_email_and_phone_masked_with_expected_placeholders() {
        let text = "Contact jane.doe@example.com or 555-123-4567";
        let store = MappingStore::new();
        let spans = vec![
            span("email", "jane.doe@example.com", 8),
            span("phone", "555-123-4567", 32),
        ];

        let result = mask_spans(text, &spans, &store);
        assert_eq!(
            result.masked_text,
            "Contact [REDACTED_EMAIL] or [REDACTED_PHONE]"
        );
        assert_eq!(result.applied_spans.len(), 2);
        assert_eq!(result.applied_spans[0].category, "email");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_round_trip_restores_original() {
        let text = "Contact jane.doe@example.com or 555-123-4567, SSN 123-45-6789";
        let store = MappingStore::new();
        let spans = vec![
            span("email", "jane.doe@example.com", 8),
            span("phone", "555-123-4567", 32),
            span("nationalId", "123-45-6789", 50),
        ];

        let result = mask_spans(text, &spans, &store);
        assert_ne!(result.masked_text, text);
        assert_eq!(store.restore(&result.masked_text), text);
    }

    #[test]
    fn test_stale_span_skipped_others_applied() {
        let text = "Contact jane.doe@example.com or 555-123-4567";
        let store = MappingStore::new();
        let spans = vec![
            span("email", "someone.else@example.com", 8),
            span("phone", "555-123-4567", 32),
        ];

        let result = mask_spans(text, &spans, &store);
        assert_eq!(result.applied_spans.len(), 1);
        assert_eq!(result.applied_spans[0].category, "phone");
        assert!(result.masked_text.contains("jane.doe@example.com"));
        assert!(result.masked_text.contains("[REDACTED_PHONE]"));
    }

    #[test]
    fn test_out_of_bounds_span_skipped() {
        let text = "short";
        let store = MappingStore::new();
        let spans = vec![span("email", "way.too.long@example.com", 2)];

        let result = mask_spans(text, &spans, &store);
        assert_eq!(result.masked_text, "short");
        assert!(result.applied_spans.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_masked_text_detects_nothing_further() {
        let text = "Contact jane.doe@example.com or 555-123-4567";
        let store = MappingStore::new();
        let spans = vec![
            span("email", "jane.doe@example.com", 8),
            span("phone", "555-123-4567", 32),
        ];

        let masked = mask_spans(text, &spans, &store).masked_text;
        assert!(pattern_rules::scan(&masked).is_empty());

        let again = mask_spans(&masked, &pattern_rules::scan(&masked), &store);
        assert_eq!(again.masked_text, masked);
        assert!(again.applied_spans.is_empty());
    }

    #[test]
    fn test_applied_spans_ascending_and_mappings_in_text_order() {
        let text = "a@b.co then 555-123-4567";
        let store = MappingStore::new();
        let spans = vec![
            span("phone", "555-123-4567", 12),
            span("email", "a@b.co", 0),
        ];

        let result = mask_spans(text, &spans, &store);
        assert_eq!(result.applied_spans[0].start, 0);
        assert_eq!(result.applied_spans[1].start, 12);

        let entries = store.entries();
        assert_eq!(entries[0].placeholder, "[REDACTED_EMAIL]");
        assert_eq!(entries[1].placeholder, "[REDACTED_PHONE]");
    }

    #[test]
    fn test_duplicate_values_restore_positionally() {
        let text = "a@b.co and a@b.co";
        let store = MappingStore::new();
        let spans = vec![span("email", "a@b.co", 0), span("email", "a@b.co", 11)];

        let result = mask_spans(text, &spans, &store);
        assert_eq!(
            result.masked_text,
            "[REDACTED_EMAIL] and [REDACTED_EMAIL]"
        );
        assert_eq!(store.restore(&result.masked_text), text);
    }
}
