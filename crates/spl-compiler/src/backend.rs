//! Translation of intermediate instructions into numbered BASIC lines.
//!
//! Two passes over the instruction sequence:
//!
//! 1. Number every line `(index + 1) * step` and record the line of each
//!    `REM` marker by label.
//! 2. Write each line, replacing `GOTO` and `THEN` targets with the line
//!    number of their marker.
//!
//! The output is a [`BasicProgram`], which has no labels left, so a program
//! cannot be translated twice.

use std::fmt;

use rustc_hash::FxHashMap;
use spl_core::CompilationError;

use crate::codegen::{Instruction, Label};

/// Line number increment used when none is configured.
pub const DEFAULT_LINE_STEP: u32 = 10;

// ============================================================================
// Output
// ============================================================================

/// One numbered BASIC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLine {
    pub number: u32,
    pub text: String,
}

impl fmt::Display for BasicLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<3} {}", self.number, self.text)
    }
}

/// A complete numbered BASIC program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicProgram {
    lines: Vec<BasicLine>,
}

impl BasicProgram {
    pub fn lines(&self) -> &[BasicLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line with the given number.
    pub fn line(&self, number: u32) -> Option<&BasicLine> {
        self.lines.iter().find(|line| line.number == number)
    }
}

impl fmt::Display for BasicProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            line.fmt(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Translator
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct BackendTranslator {
    line_step: u32,
}

impl Default for BackendTranslator {
    fn default() -> Self {
        Self {
            line_step: DEFAULT_LINE_STEP,
        }
    }
}

impl BackendTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `step` between line numbers. Zero falls back to the default.
    pub fn with_line_step(step: u32) -> Self {
        Self {
            line_step: if step == 0 { DEFAULT_LINE_STEP } else { step },
        }
    }

    pub fn line_step(&self) -> u32 {
        self.line_step
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn translate(&self, code: &[Instruction]) -> Result<BasicProgram, CompilationError> {
        let markers = self.collect_markers(code)?;

        let lines = code
            .iter()
            .enumerate()
            .map(|(i, instr)| {
                let text = match instr.jump_target() {
                    Some(label) => {
                        let line = markers.get(&label).copied().ok_or_else(|| {
                            CompilationError::UndefinedLabel {
                                label: label.to_string(),
                            }
                        })?;
                        instr.with_line_target(line).to_string()
                    }
                    None => instr.to_string(),
                };
                Ok(BasicLine {
                    number: self.line_number(i)?,
                    text,
                })
            })
            .collect::<Result<Vec<_>, CompilationError>>()?;

        Ok(BasicProgram { lines })
    }

    fn collect_markers(
        &self,
        code: &[Instruction],
    ) -> Result<FxHashMap<Label, u32>, CompilationError> {
        let mut markers = FxHashMap::default();
        for (i, instr) in code.iter().enumerate() {
            let Some(label) = instr.marker() else {
                continue;
            };
            if markers.insert(label, self.line_number(i)?).is_some() {
                return Err(CompilationError::DuplicateLabel {
                    label: label.to_string(),
                });
            }
        }
        Ok(markers)
    }

    fn line_number(&self, index: usize) -> Result<u32, CompilationError> {
        let line = index + 1;
        u32::try_from(line)
            .ok()
            .and_then(|line| line.checked_mul(self.line_step))
            .ok_or(CompilationError::LineOverflow {
                line,
                line_step: self.line_step,
            })
    }
}
