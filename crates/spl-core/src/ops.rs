//! SPL operators.
//!
//! Operators are spelled as words in SPL source (`plus`, `neg`, ...), except
//! for `>`. The BASIC spellings used by the code generator are exposed here
//! too so every phase agrees on them.

use std::fmt;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Numeric negation: `neg`
    Neg,
    /// Logical negation: `not`
    Not,
}

impl UnaryOp {
    /// The SPL spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
        }
    }

    /// Parse an SPL operator keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "neg" => Some(UnaryOp::Neg),
            "not" => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Equality comparison: `eq`
    Eq,
    /// Greater-than comparison: `>`
    Gt,
    /// Logical or: `or`
    Or,
    /// Logical and: `and`
    And,
    /// Addition: `plus`
    Plus,
    /// Subtraction: `minus`
    Minus,
    /// Multiplication: `mult`
    Mult,
    /// Division: `div`
    Div,
}

impl BinaryOp {
    /// The SPL spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "eq",
            BinaryOp::Gt => ">",
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Plus => "plus",
            BinaryOp::Minus => "minus",
            BinaryOp::Mult => "mult",
            BinaryOp::Div => "div",
        }
    }

    /// Parse an SPL operator spelling.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "eq" => Some(BinaryOp::Eq),
            ">" => Some(BinaryOp::Gt),
            "or" => Some(BinaryOp::Or),
            "and" => Some(BinaryOp::And),
            "plus" => Some(BinaryOp::Plus),
            "minus" => Some(BinaryOp::Minus),
            "mult" => Some(BinaryOp::Mult),
            "div" => Some(BinaryOp::Div),
            _ => None,
        }
    }

    /// `eq` and `>`.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Gt)
    }

    /// `or` and `and`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }

    /// `plus`, `minus`, `mult` and `div`.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mult | BinaryOp::Div
        )
    }

    /// The BASIC spelling, for operators that survive into generated code.
    ///
    /// Logical operators are lowered to jumps and have no BASIC spelling.
    pub fn basic_symbol(self) -> Option<&'static str> {
        match self {
            BinaryOp::Eq => Some("="),
            BinaryOp::Gt => Some(">"),
            BinaryOp::Plus => Some("+"),
            BinaryOp::Minus => Some("-"),
            BinaryOp::Mult => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::Or | BinaryOp::And => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BinaryOp; 8] = [
        BinaryOp::Eq,
        BinaryOp::Gt,
        BinaryOp::Or,
        BinaryOp::And,
        BinaryOp::Plus,
        BinaryOp::Minus,
        BinaryOp::Mult,
        BinaryOp::Div,
    ];

    #[test]
    fn every_binary_op_has_exactly_one_class() {
        for op in ALL {
            let classes = [op.is_comparison(), op.is_logical(), op.is_arithmetic()];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{op}");
        }
    }

    #[test]
    fn keywords_match_spelling() {
        for op in ALL {
            assert_eq!(BinaryOp::from_keyword(op.as_str()), Some(op));
        }
        assert_eq!(UnaryOp::from_keyword("neg"), Some(UnaryOp::Neg));
        assert_eq!(UnaryOp::from_keyword("not"), Some(UnaryOp::Not));
        assert_eq!(BinaryOp::from_keyword("times"), None);
    }

    #[test]
    fn basic_symbols() {
        assert_eq!(BinaryOp::Eq.basic_symbol(), Some("="));
        assert_eq!(BinaryOp::Gt.basic_symbol(), Some(">"));
        assert_eq!(BinaryOp::Mult.basic_symbol(), Some("*"));
        assert_eq!(BinaryOp::And.basic_symbol(), None);
        assert_eq!(BinaryOp::Or.basic_symbol(), None);
    }
}
