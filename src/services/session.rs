// Redaction Session
// Owns the mapping store and per-session detection configuration

use crate::models::{DetectionOptions, MaskResult, Span};
use crate::services::classifier::Classifier;
use crate::services::detection::{masking, pipeline};
use crate::services::mapping_store::{MappingEntry, MappingStore};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One user-facing redaction session. Holds the only cross-call state in the
/// crate: the mapping store the masking engine appends to, the detection
/// options, and the optional classifier handle. Readiness of the model itself
/// is the collaborator's concern; the session only carries the capability.
pub struct Session {
    id: Uuid,
    options: DetectionOptions,
    classifier: Option<Arc<dyn Classifier>>,
    store: MappingStore,
}

impl Session {
    pub fn new(options: DetectionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            options,
            classifier: None,
            store: MappingStore::new(),
        }
    }

    pub fn with_classifier(options: DetectionOptions, classifier: Arc<dyn Classifier>) -> Self {
        let mut session = Self::new(options);
        session.classifier = Some(classifier);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub async fn detect(&self, text: &str) -> Vec<Span> {
        pipeline::detect(text, self.classifier.clone(), &self.options).await
    }

    pub fn mask(&self, text: &str, spans: &[Span]) -> MaskResult {
        masking::mask_spans(text, spans, &self.store)
    }

    /// Detect and mask in one call.
    pub async fn redact(&self, text: &str) -> MaskResult {
        let spans = self.detect(text).await;
        self.mask(text, &spans)
    }

    pub fn restore(&self, masked: &str) -> String {
        self.store.restore(masked)
    }

    pub fn mappings(&self) -> Vec<MappingEntry> {
        self.store.entries()
    }

    /// Drop all recorded mappings. Called when the session ends; originals
    /// never outlive the session.
    pub fn clear(&self) {
        info!(
            "[SESSION] {} clearing {} mapping entries",
            self.id,
            self.store.len()
        );
        self.store.clear();
    }
}
