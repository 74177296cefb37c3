// Entity Merger
// Fuses consecutive same-category words into multi-word entities

use crate::models::{MergedEntity, Word};

use super::categories::label_category;

/// Maximum byte gap bridged when fusing words: one separating space or
/// punctuation mark, never arbitrary distance.
pub const MERGE_GAP_MAX: usize = 2;

/// Walk words in ascending start order and fuse runs of the same category
/// separated by at most `MERGE_GAP_MAX` bytes (titles plus names, first plus
/// last names). On fusion the entity text is re-sliced from the original text
/// so intervening punctuation is preserved verbatim, and the score becomes
/// the minimum of the parts. Words whose labels map to no category are
/// skipped.
pub fn merge_words(text: &str, words: &[Word]) -> Vec<MergedEntity> {
    let mut entities: Vec<MergedEntity> = Vec::new();
    let mut current: Option<MergedEntity> = None;

    for word in words {
        let category = match label_category(&word.label) {
            Some(category) => category,
            None => continue,
        };

        let fused = match current.as_mut() {
            Some(entity)
                if entity.category == category
                    && word.start >= entity.end
                    && word.start - entity.end <= MERGE_GAP_MAX =>
            {
                entity.end = word.end;
                entity.score = entity.score.min(word.score);
                if let Some(slice) = text.get(entity.start..entity.end) {
                    entity.text = slice.to_string();
                }
                true
            }
            _ => false,
        };

        if !fused {
            if let Some(done) = current.take() {
                entities.push(done);
            }
            current = Some(MergedEntity {
                category: category.to_string(),
                text: word.text.clone(),
                score: word.score,
                start: word.start,
                end: word.end,
            });
        }
    }

    if let Some(done) = current.take() {
        entities.push(done);
    }
    entities
}
