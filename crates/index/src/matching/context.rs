//! Tokenizer and match-context construction.
//!
//! Context building is pure: nothing here touches the caches. Only the
//! matcher chain and the cache writers mutate global state.

use crate::matching::patterns;
use crate::types::{FileKey, Word};
use regex::Regex;

/// Extract the maximal word tokens of a line, left to right.
pub fn get_words(line_text: &str, word_pattern: &Regex) -> Vec<Word> {
    word_pattern
        .find_iter(line_text)
        .enumerate()
        .map(|(index, found)| Word {
            value: found.as_str().to_string(),
            start: found.start() as u32,
            end: (found.end() - 1) as u32,
            index: index as u32,
        })
        .collect()
}

/// Find the word covering a character offset, if any.
pub fn word_at(words: &[Word], col: u32) -> Option<&Word> {
    let mut covering = None;
    for word in words.iter().rev() {
        if col <= word.end {
            covering = Some(word);
        } else {
            break;
        }
    }
    covering.filter(|word| word.start <= col && col <= word.end)
}

/// Per-line context shared by every word match on that line.
#[derive(Debug, Clone)]
pub struct LineContext {
    pub words: Vec<Word>,
    /// Line text with any trailing comment stripped.
    pub text: String,
    pub line: u32,
    /// The owning file's workspace key (its path).
    pub file_key: FileKey,
    /// File name without extension.
    pub file_name: String,
    /// Dialect-determining file extension.
    pub file_type: String,
}

/// Context for one word under examination. Immutable: matchers report any
/// word rewriting through the returned annotations instead.
#[derive(Debug, Clone, Copy)]
pub struct WordContext<'a> {
    pub line: &'a LineContext,
    pub word: &'a Word,
    /// The character offset the match was requested at.
    pub cursor: u32,
    pub prev_word: Option<&'a Word>,
    /// Character immediately before the word.
    pub prev_char: Option<char>,
    /// Character immediately after the word.
    pub next_char: Option<char>,
}

impl LineContext {
    pub fn build(line_text: &str, line: u32, file_key: &str) -> LineContext {
        // Ignore anything after a comment.
        let text = line_text.split("//").next().unwrap_or("");
        let (file_name, file_type) = split_file_key(file_key);
        LineContext {
            words: get_words(text, &patterns::WORD),
            text: text.to_string(),
            line,
            file_key: file_key.to_string(),
            file_name,
            file_type,
        }
    }

    /// Context for the word at `index` within this line's word list.
    pub fn word_context(&self, index: usize, cursor: u32) -> WordContext<'_> {
        let word = &self.words[index];
        WordContext {
            line: self,
            word,
            cursor,
            prev_word: index.checked_sub(1).map(|prev| &self.words[prev]),
            prev_char: char_at(&self.text, word.start.checked_sub(1)),
            next_char: char_at(&self.text, Some(word.end + 1)),
        }
    }
}

fn char_at(text: &str, at: Option<u32>) -> Option<char> {
    let at = at? as usize;
    text.as_bytes().get(at).map(|byte| *byte as char)
}

/// Split a file key into the file's base name and extension.
pub fn split_file_key(file_key: &str) -> (String, String) {
    let file = file_key
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_key);
    let mut parts = file.split('.');
    let name = parts.next().unwrap_or("").to_string();
    let file_type = parts.next().unwrap_or("").to_string();
    (name, file_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_carry_offsets_and_indices() {
        let words = get_words("def_int $total = 0;", &patterns::WORD);
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].value, "def_int");
        assert_eq!((words[0].start, words[0].end), (0, 6));
        assert_eq!(words[1].value, "total");
        assert_eq!((words[1].start, words[1].end), (8, 12));
        assert_eq!(words[2].index, 2);
    }

    #[test]
    fn word_at_finds_covering_word_only() {
        let words = get_words("foo bar", &patterns::WORD);
        assert_eq!(word_at(&words, 1).unwrap().value, "foo");
        assert_eq!(word_at(&words, 4).unwrap().value, "bar");
        assert!(word_at(&words, 3).is_none());
        assert!(word_at(&words, 99).is_none());
    }

    #[test]
    fn base_context_strips_comments_and_splits_file() {
        let ctx = LineContext::build("%varp = 1; // set it", 3, "scripts/engine.rs2");
        assert_eq!(ctx.text, "%varp = 1; ");
        assert_eq!(ctx.file_name, "engine");
        assert_eq!(ctx.file_type, "rs2");
        assert_eq!(ctx.words[0].value, "varp");
    }

    #[test]
    fn word_context_carries_neighbors() {
        let ctx = LineContext::build("~do_thing(1)", 0, "a.rs2");
        let word_ctx = ctx.word_context(0, 2);
        assert_eq!(word_ctx.word.value, "do_thing");
        assert_eq!(word_ctx.prev_char, Some('~'));
        assert_eq!(word_ctx.next_char, Some('('));
        assert!(word_ctx.prev_word.is_none());
    }
}
