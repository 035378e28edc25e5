//! Source-to-source translators of the Brainfuck family
//!
//! Both produce plain Brainfuck text, the tape machine runs the result.

use {
    alloc::{string::String, vec::Vec},
    core::fmt,
    esobytecode::prefix::{self, Match},
};

/// Punctuation pairs to Brainfuck, any other pair is dropped
pub fn ook(source: &str) -> String {
    let mut out = String::new();
    let mut pending = None;
    for c in source.chars().filter(|c| matches!(c, '.' | '?' | '!')) {
        let Some(first) = pending.take() else {
            pending = Some(c);
            continue;
        };

        out.extend(match (first, c) {
            ('.', '?') => Some('>'),
            ('?', '.') => Some('<'),
            ('.', '.') => Some('+'),
            ('!', '!') => Some('-'),
            ('!', '.') => Some('.'),
            ('.', '!') => Some(','),
            ('!', '?') => Some('['),
            ('?', '!') => Some(']'),
            _ => None,
        });
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslateError {
    /// Bit run starting at `offset` matches no Spoon code
    InvalidCode { offset: usize },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode { offset } => write!(f, "invalid spoon code at {offset}"),
        }
    }
}

impl core::error::Error for TranslateError {}

pub const SPOON: &[(&[u8], char)] = &[
    (b"1", '+'),
    (b"000", '-'),
    (b"010", '>'),
    (b"011", '<'),
    (b"0011", ']'),
    (b"00100", '['),
    (b"001010", '.'),
    (b"0010110", ','),
    (b"00101111", '\0'),
];

/// Binary prefix code to Brainfuck, characters other than `0`/`1` are
/// ignored and an unfinished trailing run is dropped
pub fn spoon(source: &str) -> Result<String, TranslateError> {
    let mut out = String::new();
    let mut run = Vec::new();
    let mut start = 0;
    for (offset, b) in source.bytes().enumerate().filter(|(_, b)| matches!(b, b'0' | b'1')) {
        if run.is_empty() {
            start = offset;
        }
        run.push(b);
        match prefix::lookup(SPOON, &run) {
            Match::Found(c) => {
                out.push(c);
                run.clear();
            }
            Match::Prefix => {}
            Match::Invalid => return Err(TranslateError::InvalidCode { offset: start }),
        }
    }

    if !run.is_empty() {
        log::debug!("spoon: dropping {} trailing bits", run.len());
    }
    Ok(out)
}
