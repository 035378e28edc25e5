//! Listing assembler, inverse of [`crate::disasm`]

use {
    crate::param::{self, Label},
    alloc::{string::String, vec::Vec},
    core::fmt::{Display, Formatter},
    esobytecode::{symbol, Op, ParamKind},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownMnemonic,
    MissingOperand,
    UnexpectedOperand,
    InvalidNumber,
    InvalidLabel,
    /// Label was cut by the listing and cannot be restored
    TruncatedLabel,
    InvalidOffset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    /// One-based listing line
    pub line: usize,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Error {:?} at line {}", self.kind, self.line)
    }
}

impl core::error::Error for Error {}

/// Re-encode a listing as Whitespace source in canonical form
pub fn assemble(listing: &str) -> Result<String, Error> {
    let mut buf = Vec::new();
    for (i, line) in listing.lines().enumerate() {
        instruction(line, &mut buf).map_err(|kind| Error { kind, line: i + 1 })?;
    }

    // Only `[S]`, `[T]` and `[LF]` are ever pushed
    Ok(buf.into_iter().map(char::from).collect())
}

fn instruction(line: &str, buf: &mut Vec<u8>) -> Result<(), ErrorKind> {
    let line = match line.split_once(';') {
        Some((code, _)) => code,
        None => line,
    }
    .trim();

    let line = match line.strip_prefix('[') {
        Some(rest) => {
            let (offset, rest) = rest.split_once(']').ok_or(ErrorKind::InvalidOffset)?;
            if offset.is_empty() || !offset.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ErrorKind::InvalidOffset);
            }
            rest.trim_start()
        }
        None => line,
    };

    let mut words = line.split_whitespace();
    let Some(mnemonic) = words.next() else { return Ok(()) };
    let op = Op::from_mnemonic(mnemonic).ok_or(ErrorKind::UnknownMnemonic)?;
    let operand = words.next();
    if words.next().is_some() {
        return Err(ErrorKind::UnexpectedOperand);
    }

    buf.extend_from_slice(op.code());
    match (op.param(), operand) {
        (ParamKind::None, None) => return Ok(()),
        (ParamKind::None, Some(_)) => return Err(ErrorKind::UnexpectedOperand),
        (ParamKind::Number, None) => return Err(ErrorKind::MissingOperand),
        (ParamKind::Number, Some(n)) => {
            let n = n.parse().map_err(|_| ErrorKind::InvalidNumber)?;
            param::encode_number(n, buf);
        }
        (ParamKind::Label, operand) => buf.extend_from_slice(label(operand.unwrap_or(""))?.symbols()),
    }
    buf.push(symbol::LF);

    Ok(())
}

fn label(text: &str) -> Result<Label, ErrorKind> {
    if text.ends_with("...") {
        return Err(ErrorKind::TruncatedLabel);
    }

    text.bytes()
        .map(|b| match b {
            b'0' => Ok(symbol::SPACE),
            b'1' => Ok(symbol::TAB),
            b'n' => Ok(symbol::LF),
            _ => Err(ErrorKind::InvalidLabel),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Label::new)
}
