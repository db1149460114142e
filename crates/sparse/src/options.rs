#![allow(clippy::struct_excessive_bools)]

/// Lexical policy for the sparse tokenizer.
///
/// Options are fixed when the parser is constructed.
///
/// # Examples
///
/// ```rust
/// use sparse::{EventLog, Parser, ParserOptions};
///
/// let options = ParserOptions {
///     trim_trailing_spaces: false,
///     ..Default::default()
/// };
/// let parser = Parser::new(options, EventLog::new());
/// ```
///
/// # Default
///
/// All options default to `true`. See [`ParserOptions::strict`] for the
/// opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserOptions {
    /// Whether to collapse runs of a repeated space or tab character.
    ///
    /// Inside a value, `a   b` is read as `a b`. Whitespace between tokens is
    /// skipped regardless of this option.
    ///
    /// # Default
    ///
    /// `true`
    pub consume_whitespace: bool,

    /// Whether to strip trailing spaces and tabs from a token before it is
    /// emitted.
    ///
    /// Escaped whitespace (`\ `, `\t`) is never stripped.
    ///
    /// # Default
    ///
    /// `true`
    pub trim_trailing_spaces: bool,

    /// Whether a node may be opened without a name at the top level.
    ///
    /// ```text
    /// { a b }
    /// ```
    ///
    /// # Default
    ///
    /// `true`
    pub nameless_root_nodes: bool,

    /// Whether a node may be opened without a name at any depth. Implies
    /// `nameless_root_nodes`.
    ///
    /// ```text
    /// outer { { a b } }
    /// ```
    ///
    /// # Default
    ///
    /// `true`
    pub nameless_nodes: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            consume_whitespace: true,
            trim_trailing_spaces: true,
            nameless_root_nodes: true,
            nameless_nodes: true,
        }
    }
}

impl ParserOptions {
    /// Options with every flag disabled: whitespace is kept verbatim and every
    /// node needs a name.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            consume_whitespace: false,
            trim_trailing_spaces: false,
            nameless_root_nodes: false,
            nameless_nodes: false,
        }
    }

    /// Whether a nameless node may be opened when `depth` nodes are already
    /// open.
    #[must_use]
    pub const fn allows_nameless_at(&self, depth: usize) -> bool {
        self.nameless_nodes || (self.nameless_root_nodes && depth == 0)
    }
}
