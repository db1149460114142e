//! Events emitted by the tokenizer and the sinks that receive them.

use alloc::{string::String, vec::Vec};
use core::fmt;

use crate::Position;

/// The kind of a tokenizer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A `{` opened a node. The text is `"{"`.
    OpenNode,
    /// A `}` closed the innermost open node. The text is `"}"`.
    CloseNode,
    /// A name token. Empty for a nameless node.
    Name,
    /// A value token. Empty when a name is followed by no value.
    Value,
    /// A syntax error. The text is the error message; no events follow.
    Error,
    /// End of a well-formed document. The text is empty; no events follow.
    Done,
}

/// Receives events from a [`Parser`](crate::Parser).
///
/// The sink is called synchronously from `feed` and `finish`, once per event
/// and in input order. It cannot call back into the parser that drives it.
///
/// Any `FnMut(EventKind, &str, Position)` closure is a sink.
pub trait EventSink {
    /// Handles one event. `text` is only valid for the duration of the call.
    fn event(&mut self, kind: EventKind, text: &str, position: Position);
}

impl<F> EventSink for F
where
    F: FnMut(EventKind, &str, Position),
{
    #[inline]
    fn event(&mut self, kind: EventKind, text: &str, position: Position) {
        self(kind, text, position);
    }
}

/// An owned copy of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// The token text, or the error message for [`EventKind::Error`].
    pub text: String,
    /// Where the token starts, or where the event was detected.
    pub position: Position,
}

impl Event {
    /// Creates an event.
    pub fn new(kind: EventKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} {}", self.kind, self.text, self.position)
    }
}

/// A sink that records every event it receives.
///
/// ```rust
/// use sparse::{Event, EventKind, EventLog, Parser, ParserOptions, Position};
///
/// let mut parser = Parser::new(ParserOptions::default(), EventLog::new());
/// parser.feed("key value").unwrap();
/// parser.finish().unwrap();
///
/// let log = parser.into_sink().unwrap();
/// assert_eq!(
///     log.events()[1],
///     Event::new(EventKind::Value, "value", Position::new(1, 5))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterates over the recorded events.
    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the log, returning the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for EventLog {
    fn event(&mut self, kind: EventKind, text: &str, position: Position) {
        self.events.push(Event::new(kind, text, position));
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for EventLog {
    type Item = Event;
    type IntoIter = alloc::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
