use thiserror::Error;

use crate::Position;

/// A syntax error together with the position at which it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at {position}")]
pub struct ParserError {
    pub(crate) source: SyntaxError,
    pub(crate) position: Position,
}

impl ParserError {
    pub(crate) fn new(source: SyntaxError, position: Position) -> Self {
        Self { source, position }
    }

    /// The kind of syntax error.
    #[must_use]
    pub fn kind(&self) -> &SyntaxError {
        &self.source
    }

    /// Where the error was detected.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// Malformed input detected by the tokenizer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// The parser was constructed without an event sink.
    #[error("Invalid parser function")]
    MissingSink,
    /// A `}` with no open node.
    #[error("Unexpected '}}', no matching '{{'")]
    UnexpectedClose,
    /// A nameless `{` where the options require a name.
    #[error("Invalid character '{{', expected name")]
    ExpectedName,
    /// End of input with at least one node still open.
    #[error("Unexpected end of document, expected '}}' to match '{{' at {opening}")]
    UnterminatedNode {
        /// Position of the innermost unmatched `{`.
        opening: Position,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ParserError, SyntaxError};
    use crate::Position;

    #[test]
    fn messages() {
        assert_eq!(
            SyntaxError::UnexpectedClose.to_string(),
            "Unexpected '}', no matching '{'"
        );
        assert_eq!(
            SyntaxError::UnterminatedNode {
                opening: Position::new(3, 7)
            }
            .to_string(),
            "Unexpected end of document, expected '}' to match '{' at (3,7)"
        );
    }

    #[test]
    fn display_includes_position() {
        let err = ParserError::new(SyntaxError::ExpectedName, Position::new(2, 4));
        assert_eq!(
            err.to_string(),
            "Invalid character '{', expected name at (2,4)"
        );
    }
}
