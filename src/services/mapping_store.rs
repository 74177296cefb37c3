// Mapping Store
// Session-scoped placeholder -> original value record enabling reversal

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub placeholder: String,
    pub value: String,
}

/// Ordered, append-only store of `placeholder -> original value` entries.
/// Process-lifetime only: the owning session clears it when it ends. Appends
/// are serialized by the internal mutex so overlapping sessions never lose
/// updates, and a duplicate placeholder appends a distinct entry rather than
/// overwriting an earlier one.
#[derive(Debug, Default)]
pub struct MappingStore {
    entries: Mutex<Vec<MappingEntry>>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, placeholder: String, value: String) {
        self.lock().push(MappingEntry { placeholder, value });
    }

    /// Append a batch in one critical section, preserving its order.
    pub fn append_batch(&self, batch: Vec<MappingEntry>) {
        if batch.is_empty() {
            return;
        }
        self.lock().extend(batch);
    }

    pub fn entries(&self) -> Vec<MappingEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Substitute stored original values back into a masked text. Entries are
    /// walked in insertion order with a monotonic cursor (entries for one
    /// masked text are stored in ascending text order); an entry whose
    /// placeholder does not occur ahead of the cursor is skipped.
    pub fn restore(&self, masked: &str) -> String {
        restore_with(masked, &self.entries())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MappingEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cursor-walk substitution over an explicit entry list, for callers that
/// keep per-text entries instead of a whole session store.
pub fn restore_with(masked: &str, entries: &[MappingEntry]) -> String {
    let mut out = String::with_capacity(masked.len());
    let mut cursor = 0usize;
    for entry in entries {
        if let Some(found) = masked[cursor..].find(&entry.placeholder) {
            let at = cursor + found;
            out.push_str(&masked[cursor..at]);
            out.push_str(&entry.value);
            cursor = at + entry.placeholder.len();
        }
    }
    out.push_str(&masked[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_append_preserves_order() {
        let store = MappingStore::new();
        store.append("[REDACTED_EMAIL]".to_string(), "a@b.co".to_string());
        store.append("[REDACTED_PHONE]".to_string(), "555-123-4567".to_string());

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "a@b.co");
        assert_eq!(entries[1].value, "555-123-4567");
    }

    #[test]
    fn test_duplicate_placeholder_never_overwrites() {
        let store = MappingStore::new();
        store.append("[REDACTED_EMAIL]".to_string(), "first@x.co".to_string());
        store.append("[REDACTED_EMAIL]".to_string(), "second@y.co".to_string());

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "first@x.co");
        assert_eq!(entries[1].value, "second@y.co");
    }

    #[test]
    fn test_restore_duplicate_placeholders_in_order() {
        let store = MappingStore::new();
        store.append("[REDACTED_EMAIL]".to_string(), "first@x.co".to_string());
        store.append("[REDACTED_EMAIL]".to_string(), "second@y.co".to_string());

        let masked = "from [REDACTED_EMAIL] to [REDACTED_EMAIL]";
        assert_eq!(store.restore(masked), "from first@x.co to second@y.co");
    }

    #[test]
    fn test_restore_skips_entries_not_present() {
        let store = MappingStore::new();
        store.append("[REDACTED_PHONE]".to_string(), "555-123-4567".to_string());
        store.append("[REDACTED_EMAIL]".to_string(), "a@b.co".to_string());

        assert_eq!(store.restore("mail: [REDACTED_EMAIL]"), "mail: a@b.co");
    }

    #[test]
    fn test_clear_empties_store() {
        let store = MappingStore::new();
        store.append("[REDACTED_NAME]".to_string(), "Jane".to_string());
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(MappingStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..50 {
                    store.append(format!("[REDACTED_T{}]", i), format!("v{}", j));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 400);
    }
}
