//! An incremental, callback-driven tokenizer for sparse notation.
//!
//! Sparse notation is a small hierarchical text format: nested `{ }` nodes,
//! each optionally preceded by a name, holding whitespace-separated name/value
//! pairs. Pairs end at a newline or `;`, `#` starts a line comment and `\`
//! escapes the next character.
//!
//! ```text
//! window {
//!     title   Main window   # trailing spaces are trimmed
//!     size    640x480; visible yes
//! }
//! ```
//!
//! The [`Parser`] accepts input in arbitrary chunks and reports every token to
//! an [`EventSink`] as soon as it is complete. It does not build a tree; that is
//! left to the caller.
//!
//! ```rust
//! use sparse::{EventKind, EventLog, Parser, ParserOptions};
//!
//! let mut parser = Parser::new(ParserOptions::default(), EventLog::new());
//! parser.feed("node { child va").unwrap();
//! parser.feed("lue }").unwrap();
//! parser.finish().unwrap();
//!
//! let kinds: Vec<_> = parser.sink().unwrap().iter().map(|e| e.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         EventKind::Name,
//!         EventKind::OpenNode,
//!         EventKind::Name,
//!         EventKind::Value,
//!         EventKind::CloseNode,
//!         EventKind::Done,
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod event;
mod options;
mod parser;
mod position;

#[cfg(test)]
mod tests;

pub use error::{ParserError, SyntaxError};
pub use event::{Event, EventKind, EventLog, EventSink};
pub use options::ParserOptions;
pub use parser::{Parser, parse_str};
pub use position::Position;
