// Detection Module
// PII detection core logic organized into specialized submodules:
// - pattern_rules: ordered structural rules (ids, cards, emails, phones)
// - token_reassembly: sub-word fragments -> whole words with offsets
// - entity_merger: same-category word fusion into multi-word entities
// - plausibility: per-category confidence floors and format checks
// - dedupe: reconciliation into one non-overlapping span set
// - masking: reversible placeholder substitution
// - pipeline: orchestration of the pattern and classifier paths

pub mod categories;
pub mod dedupe;
pub mod entity_merger;
pub mod masking;
pub mod pattern_rules;
pub mod pipeline;
pub mod plausibility;
pub mod token_reassembly;

// Re-export commonly used functions
pub use categories::{category_tag, label_category, placeholder_for};
pub use dedupe::dedupe_spans;
pub use entity_merger::{merge_words, MERGE_GAP_MAX};
pub use masking::mask_spans;
pub use pipeline::{detect, detect_patterns, run_detection};
pub use plausibility::{filter_spans, span_passes};
pub use token_reassembly::{reassemble_words, SUBWORD_PREFIX};
