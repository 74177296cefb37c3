// Span Deduplication
// Reconciles pattern and model spans into one ordered, non-overlapping set

use crate::models::Span;

/// Stable-sort the union by start offset, with pattern-sourced spans ranked
/// before model-sourced spans at equal start (the structural tie-break), then
/// greedily keep every span that does not overlap the previously kept one.
/// Any remaining tie falls back to input order because the sort is stable.
pub fn dedupe_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.source.rank().cmp(&b.source.rank()))
    });

    let mut kept: Vec<Span> = Vec::new();
    for span in spans {
        let overlaps = kept.last().map_or(false, |last| span.start < last.end);
        if !overlaps {
            kept.push(span);
        }
    }
    kept
}
