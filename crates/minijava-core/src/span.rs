//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where nodes and errors occur in source code.

use std::fmt;

/// A position in source code.
///
/// The external parser records the line:column where each node starts.
/// Diagnostics only ever report the line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
}

impl Span {
    /// Create a new span from a line and column.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Create a span at the start of a line.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 1 }
    }

    /// Whether this span was never set by the parser.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
