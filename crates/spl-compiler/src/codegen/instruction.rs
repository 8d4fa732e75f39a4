//! Intermediate instructions.
//!
//! The generator emits a flat sequence of these. Jumps still name symbolic
//! [`Label`]s; `REM` lines mark where each label lives. The backend later
//! turns labels into line numbers.
//!
//! Text form, as printed by `Display`:
//!
//! ```text
//! REM l0
//! PRINT v1
//! STOP
//! aa = v1
//! ab = -aa
//! ac = aa + ab
//! IF aa > ab THEN l1
//! GOTO l0
//! ```

use std::fmt;

use spl_core::BinaryOp;

use super::labels::Label;

// ============================================================================
// Operands and operators
// ============================================================================

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A place or a variable's unique id.
    Ident(String),
    /// A numeric literal, as written.
    Number(String),
    /// A string literal, without quotes. Only ever printed.
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Ident(s) | Operand::Number(s) => f.write_str(s),
            Operand::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Arithmetic operator of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Plus => Some(ArithOp::Add),
            BinaryOp::Minus => Some(ArithOp::Sub),
            BinaryOp::Mult => Some(ArithOp::Mul),
            BinaryOp::Div => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Comparison operator of a conditional jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
}

impl CompareOp {
    pub fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Eq => Some(CompareOp::Eq),
            BinaryOp::Gt => Some(CompareOp::Gt),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
        }
    }
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Operand(Operand),
    /// `-place`
    Negate(String),
    /// `lhs op rhs`
    Arith {
        lhs: String,
        op: ArithOp,
        rhs: String,
    },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Operand(operand) => operand.fmt(f),
            Value::Negate(place) => write!(f, "-{place}"),
            Value::Arith { lhs, op, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
        }
    }
}

// ============================================================================
// Instruction
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Marks the position of a label.
    Rem(Label),
    Print(Operand),
    Stop,
    Assign {
        target: String,
        value: Value,
    },
    /// `IF lhs op rhs THEN target`
    IfThen {
        lhs: String,
        op: CompareOp,
        rhs: String,
        target: Label,
    },
    Goto(Label),
}

impl Instruction {
    /// Shorthand for `target = operand`.
    pub fn copy(target: impl Into<String>, operand: Operand) -> Self {
        Instruction::Assign {
            target: target.into(),
            value: Value::Operand(operand),
        }
    }

    /// The label this instruction marks, if it is a `REM`.
    pub fn marker(&self) -> Option<Label> {
        match self {
            Instruction::Rem(label) => Some(*label),
            _ => None,
        }
    }

    /// The label this instruction jumps to, if any.
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Instruction::Goto(label) | Instruction::IfThen { target: label, .. } => Some(*label),
            _ => None,
        }
    }

    /// Display this instruction with its jump target written as `line`.
    pub fn with_line_target(&self, line: u32) -> impl fmt::Display + '_ {
        Resolved { instr: self, line }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, jump: &dyn fmt::Display) -> fmt::Result {
        match self {
            Instruction::Rem(label) => write!(f, "REM {label}"),
            Instruction::Print(operand) => write!(f, "PRINT {operand}"),
            Instruction::Stop => f.write_str("STOP"),
            Instruction::Assign { target, value } => write!(f, "{target} = {value}"),
            Instruction::IfThen { lhs, op, rhs, .. } => {
                write!(f, "IF {lhs} {} {rhs} THEN {jump}", op.symbol())
            }
            Instruction::Goto(_) => write!(f, "GOTO {jump}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.jump_target() {
            Some(label) => self.write(f, &label),
            None => self.write(f, &""),
        }
    }
}

struct Resolved<'a> {
    instr: &'a Instruction,
    line: u32,
}

impl fmt::Display for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.instr.write(f, &self.line)
    }
}
