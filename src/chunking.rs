//! Word-budget chunking for long documents.
//!
//! Provider context windows cap how much text a single summarization request
//! may carry, so documents are split into chunks before anything touches the
//! network. The splitter works on whitespace-delimited words and charges each
//! word a flat token estimate of `ceil(byte_length / 3)`; no tokenizer is
//! consulted, which keeps the budget provider-independent. Chunks partition
//! the document's words in order, with no gaps and no overlap.

/// A contiguous run of words cut from a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Zero-based position of the chunk within the document.
    pub index: usize,
    /// The chunk text, words joined by single spaces.
    pub text: String,
}

/// Estimate the token cost of a single word.
///
/// The estimate is `ceil(len / 3)` over the word's UTF-8 byte length. It is
/// deliberately coarse; the goal is a stable request budget, not a faithful
/// token count for any particular model.
pub fn estimate_tokens(word: &str) -> usize {
    word.len().div_ceil(3)
}

/// Split `text` into budget-bounded chunks.
///
/// The returned iterator is lazy and yields chunks in document order. A chunk
/// is closed as soon as admitting the next word would push its running
/// estimate past `max_tokens`, so every chunk holds at least one word even
/// when that single word alone exceeds the budget. A `max_tokens` of zero or
/// an all-whitespace input yields no chunks.
pub fn chunk_words(text: &str, max_tokens: usize) -> WordChunks<'_> {
    WordChunks {
        words: text.split_whitespace(),
        carry: None,
        max_tokens,
        next_index: 0,
    }
}

/// Lazy iterator produced by [`chunk_words`].
#[derive(Debug)]
pub struct WordChunks<'a> {
    words: std::str::SplitWhitespace<'a>,
    carry: Option<&'a str>,
    max_tokens: usize,
    next_index: usize,
}

impl Iterator for WordChunks<'_> {
    type Item = TextChunk;

    fn next(&mut self) -> Option<TextChunk> {
        if self.max_tokens == 0 {
            return None;
        }

        let mut text = String::new();
        let mut used = 0usize;

        loop {
            let Some(word) = self.carry.take().or_else(|| self.words.next()) else {
                break;
            };
            let cost = estimate_tokens(word);
            if !text.is_empty() && used + cost > self.max_tokens {
                // The word that overflowed opens the next chunk.
                self.carry = Some(word);
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
            used += cost;
        }

        if text.is_empty() {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;
        Some(TextChunk { index, text })
    }
}
