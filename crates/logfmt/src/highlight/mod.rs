//! Worry-word highlighting: tokenizer, lexicon and the highlighter that
//! combines them.

pub mod words;
pub mod lexicon;
pub mod highlighter;

pub use words::{is_word_char, words, Token, Words};
pub use lexicon::{WorryLexicon, WorrySeverity};
pub use highlighter::WorryHighlighter;
