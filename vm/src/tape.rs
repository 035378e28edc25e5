//! Brainfuck tape machine
//!
//! Ook! and Spoon sources are translated into Brainfuck by
//! `esolang::translate` and end up here as well.

use {
    crate::host::HostIo,
    alloc::{vec, vec::Vec},
    derive_more::Display,
};

/// Number of cells on the tape
pub const TAPE_LEN: usize = 32767;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum TapeError {
    #[display(fmt = "unbalanced bracket at {}", offset)]
    UnbalancedBracket { offset: usize },

    #[display(fmt = "pointer moved off the tape at {}", offset)]
    PointerOutOfBounds { offset: usize },
}

impl core::error::Error for TapeError {}

pub struct Brainfuck<'a> {
    code: &'a [u8],
    /// Offset of the matching bracket for every bracket in `code`
    pairs: Vec<usize>,
    pub cells: Vec<u16>,
    pub pointer: usize,
    pc: usize,
}

impl<'a> Brainfuck<'a> {
    pub fn new(source: &'a str) -> Result<Self, TapeError> {
        let code = source.as_bytes();
        let mut pairs = vec![0; code.len()];
        let mut open = Vec::new();
        for (i, &b) in code.iter().enumerate() {
            match b {
                b'[' => open.push(i),
                b']' => {
                    let start = open.pop().ok_or(TapeError::UnbalancedBracket { offset: i })?;
                    pairs[start] = i;
                    pairs[i] = start;
                }
                _ => {}
            }
        }

        if let Some(&offset) = open.last() {
            return Err(TapeError::UnbalancedBracket { offset });
        }

        Ok(Self { code, pairs, cells: vec![0; TAPE_LEN], pointer: 0, pc: 0 })
    }

    /// Run until the end of the code or a `\0`
    pub fn run(&mut self, host: &mut impl HostIo) -> Result<(), TapeError> {
        while let Some(&b) = self.code.get(self.pc) {
            let cell = &mut self.cells[self.pointer];
            match b {
                b'>' | b'<' => {
                    self.pointer = match b {
                        b'>' => self.pointer + 1,
                        _ => self.pointer.wrapping_sub(1),
                    };
                    if self.pointer >= TAPE_LEN {
                        return Err(TapeError::PointerOutOfBounds { offset: self.pc });
                    }
                }
                b'+' => *cell = cell.wrapping_add(1),
                b'-' => *cell = cell.wrapping_sub(1),
                b'.' => host.emit_char(
                    char::from_u32(u32::from(*cell)).unwrap_or(char::REPLACEMENT_CHARACTER),
                ),
                b',' => {
                    if let Some(c) = host.read_char() {
                        *cell = c as u16;
                    }
                }
                b'[' if *cell == 0 => self.pc = self.pairs[self.pc],
                b']' if *cell != 0 => self.pc = self.pairs[self.pc],
                b'\0' => break,
                _ => {}
            }
            self.pc += 1;
        }

        log::debug!("brainfuck halted at {}, pointer {}", self.pc, self.pointer);
        Ok(())
    }
}
