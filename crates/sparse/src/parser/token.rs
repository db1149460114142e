use alloc::string::String;

/// Maps the character following a `\` to the character it stands for.
#[inline]
pub(crate) fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        't' => '\t',
        '0' => '\0',
        other => other,
    }
}

#[inline]
pub(crate) fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Accumulates the characters of the token being read.
///
/// Tracks the length of the trailing run of unescaped spaces and tabs so the
/// run can be dropped when the token is taken.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenBuffer {
    text: String,
    trailing_blanks: usize,
}

impl TokenBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a blank that may later be trimmed.
    pub(crate) fn push_blank(&mut self, ch: char) {
        debug_assert!(is_blank(ch));
        self.text.push(ch);
        self.trailing_blanks += 1;
    }

    /// Appends a character that ends any trailing blank run. Escaped
    /// characters always go through here.
    pub(crate) fn push_literal(&mut self, ch: char) {
        self.text.push(ch);
        self.trailing_blanks = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The buffered text, without the trailing blank run when `trim` is set.
    /// The buffer keeps its contents until [`TokenBuffer::clear`].
    pub(crate) fn as_str(&self, trim: bool) -> &str {
        if trim {
            // Blanks are single-byte, so this is always a char boundary.
            &self.text[..self.text.len() - self.trailing_blanks]
        } else {
            &self.text
        }
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.trailing_blanks = 0;
    }
}
