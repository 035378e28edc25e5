//! Esoteric language front end
//!
//! Whitespace tokenizer, parameter decoding and label resolution shared by
//! the VM, listings (disassembly and its inverse) and the source-to-source
//! translators of the Brainfuck family.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(feature = "disasm")]
pub mod asm;
#[cfg(feature = "disasm")]
pub mod disasm;
pub mod labels;
pub mod lexer;
pub mod param;
pub mod translate;

pub use {
    labels::Labels,
    lexer::{Lexer, Token},
    param::{Label, Param},
};
