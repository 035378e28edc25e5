//! Whitespace instruction set
//!
//! Every instruction is identified by a fixed run of symbols over the
//! `[Space]`, `[Tab]` and `[LF]` alphabet. The table is prefix-free, so a
//! decoder appends one symbol at a time and stops at the first match.

#![no_std]

pub mod prefix;

use prefix::Match;

macro_rules! constmod {
    ($vis:vis $mname:ident($repr:ty) {
        $(#![doc = $mdoc:literal])?
        $($cname:ident = $val:expr $(,$doc:literal)?;)*
    }) => {
        $(#[doc = $mdoc])?
        $vis mod $mname {
            $(
                $(#[doc = $doc])?
                pub const $cname: $repr = $val;
            )*
        }
    };
}

constmod!(pub symbol(u8) {
    //! Instruction alphabet

    SPACE = b' ',  "[S]; sign `+`, binary digit 0";
    TAB   = b'\t', "[T]; sign `-`, binary digit 1";
    LF    = b'\n', "[L]; terminates parameters";
});

/// Is the byte one of the three instruction symbols? Everything else is a
/// comment.
#[inline]
pub fn is_symbol(b: u8) -> bool {
    matches!(b, symbol::SPACE | symbol::TAB | symbol::LF)
}

/// Parameter carried by an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// No parameter
    None,
    /// Signed binary number
    Number,
    /// Raw symbol run used as a jump target key
    Label,
}

/// Invoke macro with instruction definition format
/// # Input syntax
/// ```text
/// macro!(
///     NAME = b"code", "mnemonic", PARAM_KIND, "doc";
///     …
/// );
/// ```
/// - Codes have to stay prefix-free, `prefix_free_table` test guards it
/// - `PARAM_KIND` is a [`ParamKind`] variant name
#[macro_export]
macro_rules! invoke_with_def {
    ($macro:path) => {
        $macro!(
            PUSH     = b"  ",       "push",     Number, "[S][S] n; push n";
            DUP      = b" \n ",     "dup",      None,   "[S][L][S]; duplicate top";
            COPY     = b" \t ",     "copy",     Number, "[S][T][S] n; copy n-th from top (0 = top)";
            SWAP     = b" \n\t",    "swap",     None,   "[S][L][T]; swap top two";
            POP      = b" \n\n",    "pop",      None,   "[S][L][L]; discard top";
            SLIDE    = b" \t\n",    "slide",    Number, "[S][T][L] n; discard n below top";
            ADD      = b"\t   ",    "add",      None,   "[T][S][S][S]; a + b";
            SUB      = b"\t  \t",   "sub",      None,   "[T][S][S][T]; a - b";
            MUL      = b"\t  \n",   "mul",      None,   "[T][S][S][L]; a × b";
            DIV      = b"\t \t ",   "div",      None,   "[T][S][T][S]; a / b";
            MOD      = b"\t \t\t",  "mod",      None,   "[T][S][T][T]; a % b";
            STORE    = b"\t\t ",    "store",    None,   "[T][T][S]; heap[a] ← b";
            RETR     = b"\t\t\t",   "retr",     None,   "[T][T][T]; push heap[a]";
            LABEL    = b"\n  ",     "label",    Label,  "[L][S][S] l; mark l";
            CALL     = b"\n \t",    "call",     Label,  "[L][S][T] l; call l";
            JMP      = b"\n \n",    "jmp",      Label,  "[L][S][L] l; jump to l";
            JZ       = b"\n\t ",    "jz",       Label,  "[L][T][S] l; jump to l if top = 0";
            JN       = b"\n\t\t",   "jn",       Label,  "[L][T][T] l; jump to l if top < 0";
            RET      = b"\n\t\n",   "ret",      None,   "[L][T][L]; return from call";
            EXIT     = b"\n\n\n",   "exit",     None,   "[L][L][L]; end program";
            OUTCHAR  = b"\t\n  ",   "outchar",  None,   "[T][L][S][S]; print top as character";
            OUTNUM   = b"\t\n \t",  "outnum",   None,   "[T][L][S][T]; print top as number";
            READCHAR = b"\t\n\t ",  "readchar", None,   "[T][L][T][S]; heap[top] ← character";
            READNUM  = b"\t\n\t\t", "readnum",  None,   "[T][L][T][T]; heap[top] ← number";
        );
    };
}

macro_rules! gen_instructions {
    ($($name:ident = $code:literal, $mnemonic:literal, $param:ident, $doc:literal;)*) => {
        /// Whitespace instruction
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Op {
            $(
                #[doc = $doc]
                $name,
            )*
        }

        impl Op {
            /// Every instruction in table order
            pub const ALL: &'static [Op] = &[$(Op::$name),*];

            const TABLE: &'static [(&'static [u8], Op)] = &[$(($code, Op::$name)),*];

            /// Symbol run identifying the instruction
            pub fn code(self) -> &'static [u8] {
                match self {
                    $(Op::$name => {
                        let code: &'static [u8] = $code;
                        code
                    })*
                }
            }

            /// Name used by listings
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Op::$name => $mnemonic,)*
                }
            }

            /// Kind of parameter following the code
            pub fn param(self) -> ParamKind {
                match self {
                    $(Op::$name => ParamKind::$param,)*
                }
            }

            pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
                match mnemonic {
                    $($mnemonic => Some(Op::$name),)*
                    _ => None,
                }
            }
        }
    };
}

invoke_with_def!(gen_instructions);

impl Op {
    /// Match an accumulated symbol run against the table
    #[inline]
    pub fn lookup(run: &[u8]) -> Match<Op> {
        prefix::lookup(Self::TABLE, run)
    }

    /// Instruction takes a parameter
    #[inline]
    pub fn has_param(self) -> bool {
        self.param() != ParamKind::None
    }
}

impl core::fmt::Display for Op {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_free_table() {
        assert!(prefix::is_prefix_free(Op::TABLE));
    }

    #[test]
    fn codes_use_alphabet() {
        for op in Op::ALL {
            let code = op.code();
            assert!((2..=4).contains(&code.len()), "{op}");
            assert!(code.iter().all(|&b| is_symbol(b)), "{op}");
        }
    }

    #[test]
    fn mnemonics_round_trip() {
        for &op in Op::ALL {
            assert_eq!(Op::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert_eq!(Op::from_mnemonic("nop"), None);
    }

    #[test]
    fn parameter_kinds() {
        let numbers = Op::ALL.iter().filter(|op| op.param() == ParamKind::Number).count();
        let labels = Op::ALL.iter().filter(|op| op.param() == ParamKind::Label).count();
        assert_eq!((numbers, labels), (3, 5));
    }

    #[test]
    fn lookup_stops_on_first_match() {
        assert_eq!(Op::lookup(b" "), Match::Prefix);
        assert_eq!(Op::lookup(b"  "), Match::Found(Op::PUSH));
        assert_eq!(Op::lookup(b"\t\n"), Match::Prefix);
        assert_eq!(Op::lookup(b"\t\n\t\t"), Match::Found(Op::READNUM));
        assert_eq!(Op::lookup(b" \t\t"), Match::Invalid);
        assert_eq!(Op::lookup(b"\n\n "), Match::Invalid);
    }
}
