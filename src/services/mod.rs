// PiiShield Core Services

pub mod chunker;
pub mod classifier;
pub mod config_store;
pub mod detection;
pub mod mapping_store;
pub mod session;

pub use chunker::chunk_text;
pub use classifier::{Classifier, ClassifierError, HttpClassifier};
pub use config_store::{AppConfig, ConfigError, ConfigStore};
pub use mapping_store::{restore_with, MappingEntry, MappingStore};
pub use session::Session;

// Re-export detection module functions
pub use detection::{
    category_tag,
    dedupe_spans,
    detect,
    detect_patterns,
    filter_spans,
    label_category,
    mask_spans,
    merge_words,
    placeholder_for,
    reassemble_words,
    run_detection,
};
