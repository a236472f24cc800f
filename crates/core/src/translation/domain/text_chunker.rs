/// Default chunk budget, in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 3000;

/// Splits text into word-aligned chunks bounded by a character budget.
///
/// Lengths are counted in `char`s. A word is appended to the open chunk while
/// `chunk_len + word_len < max_chars`; the trailing separator space is not
/// part of that check, so a chunk may overshoot the budget by a character.
/// Words are never split, so a single word longer than the budget becomes a
/// chunk of its own.
#[derive(Clone, Copy, Debug)]
pub struct TextChunker {
    max_chars: usize,
}

impl TextChunker {
    pub fn new(max_chars: usize) -> Result<Self, &'static str> {
        if max_chars == 0 {
            return Err("max_chars must be > 0");
        }
        Ok(Self { max_chars })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// True when `text` is longer than the budget and must be split
    /// before translation.
    pub fn needs_split(&self, text: &str) -> bool {
        text.chars().count() > self.max_chars
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            if current_len + word_len >= self.max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push_str(word);
            current.push(' ');
            current_len += word_len + 1;
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }
}
