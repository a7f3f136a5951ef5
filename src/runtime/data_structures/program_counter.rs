use crate::runtime::{
    data_structures::word::{Cell, WordRef},
    error::{self, MachineError},
};
use std::fmt::{self, Display, Formatter};

/// A cursor into a composite word's thread.  `index` is the next cell to fetch, and an index equal
/// to the thread's length means the thread has run out and must return.
#[derive(Clone, Debug)]
pub struct Pc {
    word: WordRef,
    index: usize,
}

impl Display for Pc {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}+{}", self.word.name(), self.index)
    }
}

impl Pc {
    /// Start at the first cell of the word's thread.
    pub fn new(word: WordRef) -> Pc {
        Pc { word, index: 0 }
    }

    pub fn word(&self) -> &WordRef {
        &self.word
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.word.len()
    }

    /// Return the current cell and move past it.
    pub fn fetch_and_advance(&mut self) -> error::Result<Cell> {
        let cell = self
            .word
            .cell(self.index)
            .ok_or(MachineError::ThreadExhausted)?;

        self.index += 1;
        Ok(cell)
    }

    /// Move the cursor by a signed number of cells.  The target may be the end of the thread, but
    /// not beyond it.  Offsets too large to add saturate, so they land out of range.
    pub fn jump(&mut self, offset: i64) -> error::Result<()> {
        let target = (self.index as i64).saturating_add(offset);

        if target < 0 || target > self.word.len() as i64 {
            return Err(MachineError::InvalidBranch {
                word: self.word.name().clone(),
                target,
            });
        }

        self.index = target as usize;
        Ok(())
    }
}
