//! Instruction parameter decoding
//!
//! A raw parameter is the run of `[S]`/`[T]` symbols preceding the `[LF]`
//! terminator. Numbers read it as sign + binary digits, labels keep it as an
//! opaque key.

use {
    alloc::vec::Vec,
    core::fmt,
    esobytecode::{symbol, ParamKind},
};

/// Jump target identifier, the raw symbol run of a label parameter
#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Label(Vec<u8>);

impl Label {
    /// Symbols shown by listings before truncation
    pub const MAX_SHOWN: usize = 60;

    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self(raw.into())
    }

    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Printable form: `[S]` → `0`, `[T]` → `1`, `[LF]` → `n`, cut after
    /// [`Self::MAX_SHOWN`] symbols with `...`
    pub fn sanitized(&self) -> Sanitized<'_> {
        Sanitized(&self.0)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.sanitized())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.sanitized(), f)
    }
}

pub struct Sanitized<'a>(&'a [u8]);

impl fmt::Display for Sanitized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &b in self.0.iter().take(Label::MAX_SHOWN) {
            f.write_char(match b {
                symbol::SPACE => '0',
                symbol::TAB => '1',
                _ => 'n',
            })?;
        }
        if self.0.len() > Label::MAX_SHOWN {
            f.write_str("...")?;
        }
        Ok(())
    }
}

/// Decoded parameter, the variant is fixed by the instruction table
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Param {
    #[default]
    None,
    Number(i64),
    Label(Label),
}

pub fn decode(kind: ParamKind, raw: &[u8]) -> Param {
    match kind {
        ParamKind::None => Param::None,
        ParamKind::Number => Param::Number(decode_number(raw)),
        ParamKind::Label => Param::Label(Label::new(raw)),
    }
}

/// Sign symbol followed by binary digits, most significant first
///
/// Digits beyond 64 bits wrap around in two's complement. A run without
/// digits (or without even a sign) is zero.
pub fn decode_number(raw: &[u8]) -> i64 {
    let Some((&sign, digits)) = raw.split_first() else {
        return 0;
    };

    let magnitude = digits.iter().fold(0_i64, |acc, &b| acc << 1 | (b == symbol::TAB) as i64);
    match sign {
        symbol::TAB => magnitude.wrapping_neg(),
        _ => magnitude,
    }
}

/// Canonical encoding: sign symbol and the shortest digit run, zero is the
/// sign alone
pub fn encode_number(value: i64, buf: &mut Vec<u8>) {
    buf.push(if value < 0 { symbol::TAB } else { symbol::SPACE });

    let magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return;
    }

    for bit in (0..=magnitude.ilog2()).rev() {
        buf.push(if magnitude >> bit & 1 == 1 { symbol::TAB } else { symbol::SPACE });
    }
}
