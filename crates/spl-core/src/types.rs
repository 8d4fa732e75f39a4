//! The SPL type lattice.

use std::fmt;

/// Type of an SPL term.
///
/// SPL has two value types. `Comparison` is the intermediate class of an
/// `eq`/`>` term: it is only ever consumed by the enclosing term, where it
/// counts as `Boolean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Numeric,
    Boolean,
    Comparison,
}

impl Type {
    /// The type a term has when seen from its enclosing construct.
    #[inline]
    pub fn settle(self) -> Type {
        match self {
            Type::Comparison => Type::Boolean,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Type::Numeric => "numeric",
            Type::Boolean => "boolean",
            Type::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
