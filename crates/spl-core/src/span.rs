//! Source location tracking for diagnostics.
//!
//! Provides [`Span`] to track where tokens, nodes and errors occur in SPL source.

use std::fmt;

/// A span of source code, represented by its starting position.
///
/// Nodes built by hand (without a parser) carry `Span::default()`, which
/// renders as `0:0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Extend this span so that it also covers `other`.
    ///
    /// Spans on different lines keep the start of `self` and only sum lengths.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        if self.line == other.line {
            let start = self.col.min(other.col);
            let end = (self.col + self.len).max(other.col + other.len);
            Span::new(self.line, start, end - start)
        } else {
            Span::new(self.line, self.col, self.len + other.len)
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display() {
        assert_eq!(Span::new(3, 15, 5).to_string(), "3:15");
        assert_eq!(Span::default().to_string(), "0:0");
    }

    #[test]
    fn span_to_same_line() {
        let merged = Span::new(1, 5, 3).to(Span::new(1, 10, 3));
        assert_eq!(merged, Span::new(1, 5, 8));
    }

    #[test]
    fn span_to_other_line() {
        let merged = Span::new(1, 5, 3).to(Span::new(4, 1, 2));
        assert_eq!(merged, Span::new(1, 5, 5));
    }

    #[test]
    fn point_is_empty() {
        assert!(Span::point(2, 2).is_empty());
        assert!(!Span::new(2, 2, 1).is_empty());
    }
}
