use crate::parser::ansi::{segments, Segment};
use crate::render::color::Colorizer;

use super::lexicon::{WorryLexicon, WorrySeverity};
use super::words::words;

/// Paints worry words inside free text.
///
/// Escape sequences already present in the text are copied through and never
/// tokenized. A word that is already wrapped in exactly the emphasis this
/// highlighter would give it is left alone, so running the highlighter over
/// its own output changes nothing.
pub struct WorryHighlighter<'a> {
    lexicon: &'a WorryLexicon,
    colorizer: &'a Colorizer,
}

impl<'a> WorryHighlighter<'a> {
    pub fn new(lexicon: &'a WorryLexicon, colorizer: &'a Colorizer) -> Self {
        Self { lexicon, colorizer }
    }

    pub fn highlight(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let parts: Vec<Segment<'_>> = segments(text).collect();

        let mut i = 0;
        while i < parts.len() {
            if let Some(painted) = self.already_painted(&parts[i..]) {
                out.push_str(&painted);
                i += 3;
                continue;
            }
            match parts[i] {
                Segment::Escape(escape) => out.push_str(escape),
                Segment::Text(plain) => self.highlight_plain(plain, &mut out),
            }
            i += 1;
        }

        out
    }

    /// `escape, word, escape` that is exactly our own emphasis of `word`.
    fn already_painted(&self, parts: &[Segment<'_>]) -> Option<String> {
        let [Segment::Escape(open), Segment::Text(word), Segment::Escape(close), ..] = parts else {
            return None;
        };
        let severity = self.worry(word)?;

        let painted = self.colorizer.paint(severity.color(), word);
        let candidate_len = open.len() + word.len() + close.len();
        let matches = painted.len() == candidate_len
            && painted.starts_with(open)
            && painted[open.len()..].starts_with(word)
            && painted.ends_with(close);
        matches.then_some(painted)
    }

    fn highlight_plain(&self, text: &str, out: &mut String) {
        for token in words(text) {
            match token.is_word.then(|| self.worry(token.text)).flatten() {
                Some(severity) => out.push_str(&self.colorizer.paint(severity.color(), token.text)),
                None => out.push_str(token.text),
            }
        }
    }

    /// Severity of a word worth painting. `None` severity words are skipped.
    fn worry(&self, word: &str) -> Option<WorrySeverity> {
        self.lexicon
            .severity(word)
            .filter(|severity| *severity > WorrySeverity::None)
    }
}
