//! Two-letter place names for generated temporaries.

use spl_core::CompilationError;

/// Two-letter names that BASIC reads as keywords.
pub const RESERVED: [&str; 10] = ["at", "or", "if", "to", "on", "go", "as", "is", "do", "in"];

const LETTERS: u8 = 26;

/// Hands out `aa`, `ab`, ..., `zz`, skipping [`RESERVED`] names.
///
/// The second letter advances on every candidate and carries into the first.
/// Once the first letter runs past `z` every further request fails.
#[derive(Debug, Default)]
pub struct PlaceAllocator {
    first: u8,
    second: u8,
    allocated: usize,
}

impl PlaceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused place name.
    pub fn fresh(&mut self) -> Result<String, CompilationError> {
        loop {
            if self.first >= LETTERS {
                return Err(CompilationError::NamespaceExhausted {
                    allocated: self.allocated,
                });
            }
            let candidate: String = [b'a' + self.first, b'a' + self.second]
                .iter()
                .map(|&b| b as char)
                .collect();

            self.second += 1;
            if self.second == LETTERS {
                self.second = 0;
                self.first += 1;
            }

            if !RESERVED.contains(&candidate.as_str()) {
                self.allocated += 1;
                return Ok(candidate);
            }
        }
    }

    /// Number of names handed out so far.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
