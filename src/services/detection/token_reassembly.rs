// Token Reassembly
// Rebuilds whole words from sub-word classifier fragments and recovers
// offsets the classifier did not provide

use crate::models::{Chunk, RawToken, Word};
use tracing::debug;

/// Sub-word continuation prefix emitted by WordPiece-style tokenizers.
pub const SUBWORD_PREFIX: &str = "##";

struct PendingWord {
    text: String,
    label: String,
    score: f64,
    start: Option<usize>,
    end: Option<usize>,
}

fn normalize_label(label: &str) -> String {
    label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label)
        .to_string()
}

/// Merge sub-word fragments into whole words and resolve their offsets.
///
/// Fragments carrying the continuation prefix extend the current word; the
/// word's score is the max of its fragments. A word whose offsets the
/// classifier did not fully provide is located in the chunk text by a search
/// anchored at the end of the previously resolved word (never earlier), so an
/// earlier duplicate substring is never chosen; if the search fails the word
/// is dropped, because it cannot be masked safely. Resolved offsets are
/// converted to absolute positions by adding the chunk offset, and the word
/// text is re-sliced from the chunk so it always equals the indexed slice.
pub fn reassemble_words(tokens: &[RawToken], chunk: &Chunk) -> Vec<Word> {
    let mut pending: Vec<PendingWord> = Vec::new();

    for token in tokens {
        if let Some(stripped) = token.fragment.strip_prefix(SUBWORD_PREFIX) {
            if let Some(current) = pending.last_mut() {
                current.text.push_str(stripped);
                current.score = current.score.max(token.score);
                // A continuation without an end offset leaves the word
                // unresolved and forces the anchored search below.
                current.end = match (current.end, token.end) {
                    (Some(_), Some(end)) => Some(end),
                    _ => None,
                };
                continue;
            }
        }
        pending.push(PendingWord {
            text: token
                .fragment
                .strip_prefix(SUBWORD_PREFIX)
                .unwrap_or(&token.fragment)
                .to_string(),
            label: normalize_label(&token.label),
            score: token.score,
            start: token.start,
            end: token.end,
        });
    }

    let mut words = Vec::new();
    let mut cursor = 0usize;

    for word in pending {
        if word.text.is_empty() {
            continue;
        }

        let resolved = match (word.start, word.end) {
            (Some(start), Some(end)) if start < end && chunk.text.get(start..end).is_some() => {
                Some((start, end))
            }
            _ => chunk
                .text
                .get(cursor..)
                .and_then(|rest| rest.find(&word.text))
                .map(|found| {
                    let start = cursor + found;
                    (start, start + word.text.len())
                }),
        };

        let (start, end) = match resolved {
            Some(offsets) => offsets,
            None => {
                debug!(
                    "[REASSEMBLY] dropping word with unresolvable offset: {:?}",
                    word.text
                );
                continue;
            }
        };

        cursor = end;
        let text = match chunk.text.get(start..end) {
            Some(slice) => slice.to_string(),
            None => continue,
        };

        words.push(Word {
            text,
            label: word.label,
            score: word.score,
            start: chunk.offset + start,
            end: chunk.offset + end,
        });
    }

    words
}
