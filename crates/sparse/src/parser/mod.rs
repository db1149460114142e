//! The incremental sparse tokenizer.
//!
//! Overview
//! - Input is processed one character at a time by a small state machine
//!   (`Mode`). Every completed token is reported to the sink before the next
//!   character is looked at, so the parser never holds finished events.
//! - All progress lives in the [`Parser`] value: the mode, the pending escape,
//!   the token being read and the stack of open nodes. Splitting the input at
//!   any point, even between a `\` and the character it escapes, produces the
//!   same events.
//! - Byte input goes through `Utf8Carry`, which holds a UTF-8 sequence
//!   split between two `feed_bytes` calls.
//!
//! Errors
//! - Malformed input produces one [`EventKind::Error`] event and closes the
//!   parser. There is no recovery; clone the parser beforehand to retry from a
//!   checkpoint.
//! - Feeding or finishing a closed parser is a bug in the caller and panics.

mod nesting;
mod token;
mod utf8;


use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::ops::ControlFlow;

use nesting::Openings;
use token::{TokenBuffer, is_blank, unescape};
use tracing::{debug, trace};
use utf8::{REPLACEMENT, Utf8Carry};

use crate::{
    Event, EventKind, EventLog, EventSink, ParserError, ParserOptions, Position, SyntaxError,
};

/// What the next character means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between pairs, waiting for a name.
    FindName,
    /// After a name, waiting for its value.
    FindValue,
    /// Inside a name token.
    ReadName,
    /// Inside a value token.
    ReadValue,
    /// Inside a `#` comment, until the end of the line.
    ReadComment,
}

impl Mode {
    /// The mode a token moves to once its first character is seen.
    fn reading(self) -> Self {
        match self {
            Mode::FindName => Mode::ReadName,
            Mode::FindValue => Mode::ReadValue,
            other => other,
        }
    }

    fn is_between_tokens(self) -> bool {
        matches!(self, Mode::FindName | Mode::FindValue)
    }
}

/// The incremental sparse tokenizer.
///
/// A `Parser` is fed text in chunks of any size with [`Parser::feed`] (or
/// [`Parser::feed_bytes`]) and closed with [`Parser::finish`]. Each completed
/// token is passed to the sink `S` immediately, in input order.
///
/// Cloning a parser (when the sink is `Clone`) produces an independent copy
/// with the same progress, which can serve as a checkpoint.
///
/// # Panics
///
/// `feed`, `feed_bytes` and `finish` panic when the parser is closed, that is
/// after a syntax error, after `finish`, or when it was built without a sink.
///
/// # Examples
///
/// ```rust
/// use sparse::{EventKind, Parser, ParserOptions};
///
/// let mut names = Vec::new();
/// let mut parser = Parser::from_fn(ParserOptions::default(), |kind, text, _pos| {
///     if kind == EventKind::Name {
///         names.push(text.to_owned());
///     }
/// });
/// parser.feed("width 10\nheight 20\n").unwrap();
/// parser.finish().unwrap();
/// drop(parser);
/// assert_eq!(names, ["width", "height"]);
/// ```
#[derive(Debug, Clone)]
pub struct Parser<S> {
    sink: Option<S>,
    options: ParserOptions,

    closed: bool,
    error: Option<ParserError>,

    /// Position of the next character.
    pos: Position,
    /// Position of the first character of the token being read.
    start: Position,

    mode: Mode,
    /// The previous character was an unconsumed `\`.
    escaped: bool,
    last_char: Option<char>,

    buffer: TokenBuffer,
    openings: Openings,
    carry: Utf8Carry,
}

impl<S: EventSink> Parser<S> {
    /// Creates a parser that reports events to `sink`.
    #[must_use]
    pub fn new(options: ParserOptions, sink: S) -> Self {
        Self::with_optional_sink(options, Some(sink))
    }

    /// Creates a parser from a sink that may be missing.
    ///
    /// Without a sink the parser starts out closed with
    /// [`SyntaxError::MissingSink`]; any later `feed` or `finish` panics.
    #[must_use]
    pub fn with_optional_sink(options: ParserOptions, sink: Option<S>) -> Self {
        let error = match sink {
            Some(_) => None,
            None => Some(ParserError::new(SyntaxError::MissingSink, Position::START)),
        };
        Self {
            closed: error.is_some(),
            error,
            sink,
            options,
            pos: Position::START,
            start: Position::START,
            mode: Mode::FindName,
            escaped: false,
            last_char: None,
            buffer: TokenBuffer::new(),
            openings: Openings::new(),
            carry: Utf8Carry::new(),
        }
    }

    /// Consumes a chunk of input.
    ///
    /// # Errors
    ///
    /// Returns the syntax error if this chunk contains one. The error has
    /// already been reported to the sink and the parser is closed.
    ///
    /// # Panics
    ///
    /// Panics if the parser is closed.
    #[track_caller]
    pub fn feed(&mut self, text: &str) -> Result<(), ParserError> {
        self.assert_open("feed");
        if self.carry.take_truncated() {
            self.consume(REPLACEMENT)?;
        }
        for ch in text.chars() {
            self.consume(ch)?;
        }
        Ok(())
    }

    /// Consumes a chunk of UTF-8 bytes. A multi-byte character may be split
    /// across calls; invalid bytes are read as U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns the syntax error if this chunk contains one.
    ///
    /// # Panics
    ///
    /// Panics if the parser is closed.
    #[track_caller]
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        self.assert_open("feed_bytes");
        let mut carry = core::mem::take(&mut self.carry);
        let mut failure = None;
        let _ = carry.decode(bytes, |ch| match self.step(ch) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                failure = Some(err);
                ControlFlow::Break(())
            }
        });
        self.carry = carry;
        match failure {
            Some(err) => Err(self.fail(err)),
            None => Ok(()),
        }
    }

    /// Ends the input.
    ///
    /// Flushes the token being read, checks that every node is closed and
    /// emits [`EventKind::Done`]. The parser is closed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnterminatedNode`] when a node is still open.
    ///
    /// # Panics
    ///
    /// Panics if the parser is already closed.
    #[track_caller]
    pub fn finish(&mut self) -> Result<(), ParserError> {
        self.assert_open("finish");
        if self.carry.take_truncated() {
            self.consume(REPLACEMENT)?;
        }
        self.flush_pending();
        if let Some(opening) = self.openings.innermost() {
            return Err(self.fail(SyntaxError::UnterminatedNode { opening }));
        }
        self.buffer.clear();
        self.escaped = false;
        self.closed = true;
        self.emit(EventKind::Done, "", self.pos);
        Ok(())
    }

    fn consume(&mut self, ch: char) -> Result<(), ParserError> {
        self.step(ch).map_err(|err| self.fail(err))
    }

    fn step(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.dispatch(ch)?;
        self.pos.advance(ch);
        self.last_char = Some(ch);
        Ok(())
    }

    fn dispatch(&mut self, ch: char) -> Result<(), SyntaxError> {
        if self.mode == Mode::ReadComment {
            if ch == '\n' {
                self.mode = Mode::FindName;
            }
            return Ok(());
        }

        if self.escaped {
            self.escaped = false;
            self.buffer.push_literal(unescape(ch));
            return Ok(());
        }

        match ch {
            ' ' | '\t' => self.blank(ch),
            '{' => self.open_node()?,
            '}' | '\n' | ';' | '#' => self.terminate(ch)?,
            '\\' => {
                self.begin_token();
                self.escaped = true;
            }
            _ => {
                self.begin_token();
                self.buffer.push_literal(ch);
            }
        }
        Ok(())
    }

    fn begin_token(&mut self) {
        if self.mode.is_between_tokens() {
            self.mode = self.mode.reading();
            self.start = self.pos;
        }
    }

    fn blank(&mut self, ch: char) {
        debug_assert!(is_blank(ch));
        if self.options.consume_whitespace && self.last_char == Some(ch) {
            return;
        }
        match self.mode {
            Mode::ReadName => {
                self.flush(EventKind::Name);
                self.mode = Mode::FindValue;
            }
            Mode::ReadValue => self.buffer.push_blank(ch),
            Mode::FindName | Mode::FindValue | Mode::ReadComment => {}
        }
    }

    fn open_node(&mut self) -> Result<(), SyntaxError> {
        let named = match self.mode {
            Mode::ReadName => {
                self.flush(EventKind::Name);
                true
            }
            Mode::FindValue => true,
            Mode::ReadValue => {
                self.flush(EventKind::Value);
                false
            }
            Mode::FindName | Mode::ReadComment => false,
        };

        if !named {
            if !self.options.allows_nameless_at(self.openings.depth()) {
                return Err(SyntaxError::ExpectedName);
            }
            self.emit(EventKind::Name, "", self.pos);
        }

        self.openings.push(self.pos);
        self.emit(EventKind::OpenNode, "{", self.pos);
        self.mode = Mode::FindName;
        Ok(())
    }

    fn terminate(&mut self, ch: char) -> Result<(), SyntaxError> {
        self.flush_pending();
        if ch == '}' {
            if self.openings.pop().is_none() {
                return Err(SyntaxError::UnexpectedClose);
            }
            self.emit(EventKind::CloseNode, "}", self.pos);
        }
        self.mode = if ch == '#' {
            Mode::ReadComment
        } else {
            Mode::FindName
        };
        Ok(())
    }

    /// Reports the token in progress, as at the end of a pair.
    fn flush_pending(&mut self) {
        match self.mode {
            Mode::ReadName => self.flush(EventKind::Name),
            Mode::FindValue => self.emit(EventKind::Value, "", self.pos),
            Mode::ReadValue => self.flush(EventKind::Value),
            Mode::FindName | Mode::ReadComment => {}
        }
    }

    fn flush(&mut self, kind: EventKind) {
        let text = self.buffer.as_str(self.options.trim_trailing_spaces);
        dispatch_event(&mut self.sink, kind, text, self.start);
        self.buffer.clear();
    }

    fn emit(&mut self, kind: EventKind, text: &str, position: Position) {
        dispatch_event(&mut self.sink, kind, text, position);
    }

    fn fail(&mut self, source: SyntaxError) -> ParserError {
        let err = ParserError::new(source, self.pos);
        debug!(error = %err, "sparse parser closed by syntax error");
        self.closed = true;
        self.buffer.clear();
        let message = source.to_string();
        self.emit(EventKind::Error, &message, self.pos);
        self.error = Some(err.clone());
        err
    }

    #[track_caller]
    fn assert_open(&self, operation: &str) {
        if let Some(err) = &self.error {
            panic!("`{operation}` called on a sparse parser that failed: {err}");
        }
        assert!(
            !self.closed,
            "`{operation}` called on a sparse parser that already finished"
        );
    }
}

impl<F> Parser<F>
where
    F: FnMut(EventKind, &str, Position),
{
    /// Creates a parser that reports events to a closure.
    #[must_use]
    pub fn from_fn(options: ParserOptions, f: F) -> Self {
        Self::new(options, f)
    }
}

impl<S> Parser<S> {
    /// Whether a syntax error has been reported.
    #[must_use]
    pub fn have_error(&self) -> bool {
        self.error.is_some()
    }

    /// The message of the reported syntax error, or an empty string.
    #[must_use]
    pub fn error(&self) -> String {
        self.error
            .as_ref()
            .map(|err| err.kind().to_string())
            .unwrap_or_default()
    }

    /// The reported syntax error, if any.
    #[must_use]
    pub fn syntax_error(&self) -> Option<&ParserError> {
        self.error.as_ref()
    }

    /// Whether the parser still accepts input.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Position of the next character.
    #[must_use]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Number of currently open nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.openings.depth()
    }

    /// The options the parser was built with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The sink, unless the parser was built without one.
    #[must_use]
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    /// Consumes the parser, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> Option<S> {
        self.sink
    }
}

fn dispatch_event<S: EventSink>(
    sink: &mut Option<S>,
    kind: EventKind,
    text: &str,
    position: Position,
) {
    trace!(?kind, text, %position, "sparse event");
    if let Some(sink) = sink {
        sink.event(kind, text, position);
    }
}

/// Tokenizes a complete document, collecting every event.
///
/// # Errors
///
/// Returns the first syntax error in `text`.
///
/// # Examples
///
/// ```rust
/// use sparse::{EventKind, ParserOptions, parse_str};
///
/// let events = parse_str("a 1; b 2", ParserOptions::default()).unwrap();
/// let values: Vec<_> = events
///     .iter()
///     .filter(|e| e.kind == EventKind::Value)
///     .map(|e| e.text.as_str())
///     .collect();
/// assert_eq!(values, ["1", "2"]);
///
/// assert!(parse_str("a }", ParserOptions::default()).is_err());
/// ```
pub fn parse_str(text: &str, options: ParserOptions) -> Result<Vec<Event>, ParserError> {
    let mut parser = Parser::new(options, EventLog::new());
    parser.feed(text)?;
    parser.finish()?;
    Ok(parser.into_sink().map(EventLog::into_events).unwrap_or_default())
}
