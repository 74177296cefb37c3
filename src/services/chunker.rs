// Text Chunker
// Splits text exceeding the classifier window into overlapping chunks

use crate::models::Chunk;
use tracing::warn;

/// Split `text` into windows of at most `max_chars` characters, with
/// consecutive windows overlapping by `overlap` characters so an entity
/// shorter than the overlap is always fully contained in some chunk.
///
/// Window arithmetic counts Unicode scalars; emitted offsets are UTF-8 byte
/// positions into the original text, strictly increasing.
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Vec<Chunk> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let overlap = if overlap >= max_chars {
        warn!(
            "[CHUNKER] overlap {} >= max_chars {}, clamping",
            overlap, max_chars
        );
        max_chars - 1
    } else {
        overlap
    };

    // bounds[i] is the byte offset of the i-th character; the final entry is
    // the text length so bounds[i]..bounds[j] is always a valid slice.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let total_chars = bounds.len() - 1;

    if total_chars <= max_chars {
        return vec![Chunk {
            text: text.to_string(),
            offset: 0,
        }];
    }

    let step = max_chars - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + max_chars).min(total_chars);
        chunks.push(Chunk {
            text: text[bounds[start]..bounds[end]].to_string(),
            offset: bounds[start],
        });
        if end == total_chars {
            break;
        }
        start += step;
    }
    chunks
}
