use alloc::vec::Vec;

use crate::Position;

/// Positions of the currently open, unmatched `{`, innermost last.
#[derive(Debug, Clone, Default)]
pub(crate) struct Openings {
    stack: Vec<Position>,
}

impl Openings {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
        }
    }

    pub(crate) fn push(&mut self, pos: Position) {
        self.stack.push(pos);
    }

    pub(crate) fn pop(&mut self) -> Option<Position> {
        self.stack.pop()
    }

    /// The innermost open node.
    pub(crate) fn innermost(&self) -> Option<Position> {
        self.stack.last().copied()
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
