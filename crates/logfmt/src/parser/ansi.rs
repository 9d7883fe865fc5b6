/// ANSI escape handling
///
/// Console encoders often colour their level token, which would otherwise
/// stop the console grammar from matching; input lines are stripped before
/// parsing. The highlighter also needs to walk text that already carries
/// escapes without tokenizing them, which is what [`segments`] is for.
use std::borrow::Cow;

const ESC: u8 = 0x1b;

/// Strip ANSI escape codes from bytes
///
/// Handles CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`)
/// and two-byte Fe sequences. A lone trailing ESC is dropped.
///
/// Returns `Cow::Borrowed` when there was nothing to strip.
pub fn strip_ansi_codes(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&ESC) {
        return Cow::Borrowed(input);
    }

    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == ESC {
            i += escape_len(&input[i..]);
            continue;
        }
        output.push(input[i]);
        i += 1;
    }

    Cow::Owned(output)
}

/// Length of the escape sequence at the start of `bytes` (which begins with ESC).
fn escape_len(bytes: &[u8]) -> usize {
    let Some(&kind) = bytes.get(1) else {
        return 1;
    };

    match kind {
        // CSI: parameters then a final byte in 0x40..=0x7E
        b'[' => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |p| p + 3),
        // OSC: terminated by BEL or ST (ESC \)
        b']' => {
            let mut j = 2;
            while j < bytes.len() {
                if bytes[j] == 0x07 {
                    return j + 1;
                }
                if bytes[j] == ESC && bytes.get(j + 1) == Some(&b'\\') {
                    return j + 2;
                }
                j += 1;
            }
            bytes.len()
        }
        0x40..=0x5f => 2,
        _ => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete escape sequence
    Escape(&'a str),
    /// Text between escape sequences
    Text(&'a str),
}

/// Split text into escape sequences and the plain runs between them.
///
/// Concatenating the segments gives back the input.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let bytes = rest.as_bytes();
        // Escape sequences end on ASCII bytes, so every cut is a char boundary.
        let (len, segment_of): (usize, fn(&'a str) -> Segment<'a>) = if bytes[0] == ESC {
            (escape_len(bytes), Segment::Escape)
        } else {
            (bytes.iter().position(|&b| b == ESC).unwrap_or(bytes.len()), Segment::Text)
        };

        self.pos += len;
        Some(segment_of(&rest[..len]))
    }
}
