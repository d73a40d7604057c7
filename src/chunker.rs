//! Splits page text into bounded-size chunks for the TTS service.
//!
//! Chunks honor sentence boundaries where possible:
//! - Short text (below ~1.5× the maximum) is kept whole
//! - Sentences are packed into chunks up to the maximum size
//! - Oversized sentences are broken at the last word boundary that fits
//!
//! Chunk boundaries never split inside a word unless a single word exceeds
//! the maximum chunk size.

use crate::defaults;
use crate::error::{ReadaloudError, Result};

/// Configuration for text chunking.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Minimum chunk size in characters (default: 100).
    ///
    /// Word-boundary breaks inside an oversized sentence are only taken if
    /// they leave at least this many characters in the emitted chunk.
    pub min_size: usize,
    /// Maximum chunk size in characters (default: 200).
    pub max_size: usize,
    /// Text below `factor × max_size` characters becomes a single chunk
    /// (default: 1.5).
    pub single_chunk_factor: f32,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            min_size: defaults::MIN_CHUNK_SIZE,
            max_size: defaults::MAX_CHUNK_SIZE,
            single_chunk_factor: defaults::SINGLE_CHUNK_FACTOR,
        }
    }
}

/// One bounded-size unit of text submitted as a single synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of this chunk within its generation run.
    pub index: usize,
    /// Chunk text. Never empty, never whitespace-only.
    pub content: String,
}

impl TextChunk {
    /// Returns the chunk length in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if the chunk contains no characters.
    ///
    /// `split` never produces empty chunks; this exists for completeness.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `text` into ordered chunks according to `config`.
///
/// Returns `EmptyInput` when the text is empty or whitespace-only — callers
/// must substitute a fallback narration string in that case.
pub fn split(text: &str, config: &ChunkerConfig) -> Result<Vec<TextChunk>> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Err(ReadaloudError::EmptyInput);
    }

    let total_chars = normalized.chars().count();
    let single_chunk_limit = (config.max_size as f32 * config.single_chunk_factor) as usize;
    if total_chars < single_chunk_limit {
        return Ok(vec![TextChunk {
            index: 0,
            content: normalized,
        }]);
    }

    let mut contents: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0usize;

    for sentence in split_sentences(&normalized) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_chars = sentence.chars().count();

        if sentence_chars > config.max_size {
            // Oversized sentence: flush the buffer, then break the sentence
            // at word boundaries.
            if !buffer.is_empty() {
                contents.push(std::mem::take(&mut buffer));
                buffer_chars = 0;
            }
            split_long_sentence(sentence, config, &mut contents);
        } else if !buffer.is_empty() && buffer_chars + 1 + sentence_chars > config.max_size {
            contents.push(std::mem::take(&mut buffer));
            buffer.push_str(sentence);
            buffer_chars = sentence_chars;
        } else {
            if !buffer.is_empty() {
                buffer.push(' ');
                buffer_chars += 1;
            }
            buffer.push_str(sentence);
            buffer_chars += sentence_chars;
        }
    }

    if !buffer.is_empty() {
        contents.push(buffer);
    }

    Ok(contents
        .into_iter()
        .enumerate()
        .map(|(index, content)| TextChunk { index, content })
        .collect())
}

/// Splits text into sentences at `.`, `!`, `?` runs followed by whitespace
/// or end of input. A trailing fragment without a terminator is kept as its
/// own sentence so no content is lost.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            // Consume the full terminator run
            while i + 1 < bytes.len() && matches!(bytes[i + 1], b'.' | b'!' | b'?') {
                i += 1;
            }
            let boundary = i + 1 == bytes.len() || bytes[i + 1] == b' ';
            if boundary {
                sentences.push(&text[start..=i]);
                start = i + 1;
            }
        }
        i += 1;
    }

    if start < bytes.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Breaks a sentence longer than `max_size` into word-bounded parts.
///
/// Each break point is the last space at or before `max_size` characters
/// from the cursor, provided it leaves more than `min_size` characters in
/// the part. A word longer than `max_size` is split mid-word.
fn split_long_sentence(sentence: &str, config: &ChunkerConfig, out: &mut Vec<String>) {
    let chars: Vec<char> = sentence.chars().collect();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + config.max_size).min(chars.len());
        if end < chars.len() {
            if let Some(space) = (start..end).rev().find(|&i| chars[i] == ' ') {
                if space > start + config.min_size {
                    end = space;
                }
            }
        }

        let part: String = chars[start..end].iter().collect();
        let part = part.trim();
        if !part.is_empty() {
            out.push(part.to_string());
        }

        start = end;
        while start < chars.len() && chars[start] == ' ' {
            start += 1;
        }
    }
}
