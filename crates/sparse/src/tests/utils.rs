use alloc::{string::String, vec::Vec};

use crate::{Event, EventLog, Parser, ParserOptions};

/// Feeds `chunks` until the parser closes, then finishes it if still open.
pub(crate) fn run_chunks<'a, I>(options: ParserOptions, chunks: I) -> Vec<Event>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = Parser::new(options, EventLog::new());
    for chunk in chunks {
        if parser.feed(chunk).is_err() {
            break;
        }
    }
    if parser.is_open() {
        let _ = parser.finish();
    }
    parser.into_sink().unwrap().into_events()
}

/// Byte-level counterpart of [`run_chunks`].
pub(crate) fn run_byte_chunks<'a, I>(options: ParserOptions, chunks: I) -> Vec<Event>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut parser = Parser::new(options, EventLog::new());
    for chunk in chunks {
        if parser.feed_bytes(chunk).is_err() {
            break;
        }
    }
    if parser.is_open() {
        let _ = parser.finish();
    }
    parser.into_sink().unwrap().into_events()
}

/// Splits `text` into pieces whose sizes (in characters) are derived from
/// `splits`. Every piece is non-empty and the pieces concatenate to `text`.
pub(crate) fn split_chars(text: &str, splits: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut idx = 0;
    for s in splits {
        let remaining = chars.len() - idx;
        if remaining == 0 {
            break;
        }
        let size = 1 + (s % remaining);
        pieces.push(chars[idx..idx + size].iter().collect());
        idx += size;
    }
    if idx < chars.len() {
        pieces.push(chars[idx..].iter().collect());
    }
    pieces
}

/// Splits `bytes` at arbitrary byte offsets derived from `splits`.
pub(crate) fn split_bytes<'a>(bytes: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    let mut rest = bytes;
    for s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(1 + (s % rest.len()));
        pieces.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

#[test]
fn split_helpers_cover_the_input() {
    let text = "a👍 {b}";
    let pieces = split_chars(text, &[0, 5, 1]);
    assert_eq!(pieces, ["a", "👍", " {", "b}"]);
    assert_eq!(pieces.concat(), text);

    let bytes = split_bytes(text.as_bytes(), &[2, 0]);
    assert_eq!(bytes[0], &text.as_bytes()[..3]);
    assert_eq!(bytes.concat(), text.as_bytes());
}
