// PiiShield
// Hybrid PII detection and reversible redaction: a deterministic pattern
// detector combined with an optional span-level classifier, reconciled into
// one non-overlapping span set and masked with stable, restorable
// placeholders.

pub mod models;
pub mod services;

pub use models::{
    Chunk, DetectionOptions, DetectionOutcome, MaskResult, MergedEntity, RawToken, Span,
    SpanSource, Word,
};
pub use services::classifier::{Classifier, ClassifierError, HttpClassifier};
pub use services::detection::{detect, detect_patterns, mask_spans, run_detection};
pub use services::mapping_store::{MappingEntry, MappingStore};
pub use services::session::Session;
