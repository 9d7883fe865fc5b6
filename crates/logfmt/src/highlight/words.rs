//! Word tokenizer.
//!
//! Splits text at every boundary between a word character and a non-word
//! character, the way `\b` does in Perl. A word character is any code point
//! in the Unicode general categories L, N, M or Pc.

use once_cell::sync::Lazy;
use regex::Regex;

const WORD_CATEGORIES: &str = r"\p{L}\p{N}\p{M}\p{Pc}";

static WORD_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^[{WORD_CATEGORIES}]$")).unwrap());

/// Either a maximal run of word characters or a maximal run of anything else.
static RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{WORD_CATEGORIES}]+|[^{WORD_CATEGORIES}]+")).unwrap());

pub fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    WORD_CHAR.is_match(c.encode_utf8(&mut buf))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub is_word: bool,
}

/// Tokenize `text`. The iterator is lazy and `Clone`, so a copy taken
/// before iteration replays the same tokens.
pub fn words(text: &str) -> Words<'_> {
    Words { text, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Words<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        // Every code point falls in one of the two alternatives, so the run
        // always starts at `pos`.
        let run = RUN.find_at(self.text, self.pos)?;
        self.pos = run.end();

        let text = run.as_str();
        let is_word = text.chars().next().is_some_and(is_word_char);
        Some(Token { text, is_word })
    }
}
