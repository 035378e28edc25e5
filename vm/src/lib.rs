//! Esoteric language virtual machines
//!
//! The centerpiece is the Whitespace [`Vm`]: a fused tokenize-then-execute
//! stepper over the raw source text. Peer interpreters for the other
//! supported languages live in their own modules and share the
//! [`host::HostIo`] boundary.
//!
//! # Std feature
//! - Enabled by default
//! - Provides [`host::StdHost`] over any `BufRead` + `Write` pair

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod befunge;
pub mod byter;
pub mod host;
pub mod lang;
pub mod rand;
pub mod tape;

mod vmrun;

#[cfg(test)]
mod tests;

pub use {
    host::{BufferHost, HostIo},
    lang::{Language, RunError},
};

use {
    alloc::vec::Vec,
    derive_more::Display,
    esolang::{labels::UndefinedLabel, lexer, Label, Labels, Lexer},
    hashbrown::HashMap,
};

/// Whitespace virtual machine
pub struct Vm<'a, H, const TIMER_QUOTIENT: usize> {
    /// Operand stack, top is the last element
    pub stack: Vec<i64>,

    /// Return offsets of active calls
    pub call_stack: Vec<usize>,

    /// Sparse heap, absent keys are undefined
    pub heap: HashMap<i64, i64>,

    /// Host I/O implementation
    pub host: H,

    /// Program cursor
    lexer: Lexer<'a>,

    labels: Labels,

    /// Program timer
    timer: usize,
}

impl<'a, H: HostIo, const TIMER_QUOTIENT: usize> Vm<'a, H, TIMER_QUOTIENT> {
    /// Prepare a run, the label pre-pass happens here
    ///
    /// An incomplete or unknown command anywhere in the source fails before
    /// anything is executed.
    pub fn new(source: &'a str, host: H) -> Result<Self, VmRunError> {
        Ok(Self {
            stack: Vec::new(),
            call_stack: Vec::new(),
            heap: HashMap::new(),
            host,
            lexer: Lexer::new(source),
            labels: Labels::scan(source)?,
            timer: 0,
        })
    }
}

/// Run a Whitespace program to completion
pub fn run(source: &str, host: impl HostIo) -> Result<(), VmRunError> {
    Vm::<_, 0>::new(source, host)?.run().map(|_| ())
}

/// Virtual machine halt error
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum VmRunError {
    /// Incomplete command, unknown command or a jump into the middle of one
    #[display(fmt = "malformed instruction at {}", offset)]
    MalformedInstruction { offset: usize },

    #[display(fmt = "undefined label {}", _0)]
    UndefinedLabel(Label),

    #[display(fmt = "stack underflow")]
    StackUnderflow,

    #[display(fmt = "return outside of a call")]
    CallStackUnderflow,

    #[display(fmt = "undefined heap address {}", _0)]
    UndefinedHeapAddress(i64),

    #[display(fmt = "division by zero")]
    DivideByZero,

    #[display(fmt = "input is not a number")]
    InvalidNumericInput,

    /// Value printed as a character is not a Unicode scalar
    #[display(fmt = "{} is not a character", _0)]
    InvalidCharacter(i64),

    #[display(fmt = "unexpected end of input")]
    EndOfInput,
}

impl core::error::Error for VmRunError {}

impl From<lexer::Error> for VmRunError {
    fn from(value: lexer::Error) -> Self {
        Self::MalformedInstruction { offset: value.offset }
    }
}

impl From<UndefinedLabel> for VmRunError {
    fn from(value: UndefinedLabel) -> Self {
        Self::UndefinedLabel(value.0)
    }
}

/// Virtual machine halt ok
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VmRunOk {
    /// Program has reached the end of its source
    End,

    /// Exit instruction was executed
    Exit,

    /// Program was interrupted by a timer
    Timer,
}
