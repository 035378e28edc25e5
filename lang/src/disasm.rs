//! Listing output, one line per instruction
//!
//! ```text
//! [0010] push 72 ; ascii: H
//! [0014] outchar
//! [0019] jmp 01n
//! ```

use {
    crate::{
        lexer::{self, Lexer, Token},
        param::Param,
    },
    alloc::string::String,
    core::fmt::{self, Write},
};

/// Printable character a numeric parameter stands for, if any
pub fn ascii(value: i64) -> Option<char> {
    u32::try_from(value).ok().and_then(char::from_u32).filter(|c| !c.is_control())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:04}] {}", self.end, self.op)?;
        match &self.param {
            Param::None => Ok(()),
            Param::Number(n) => {
                write!(f, " {n}")?;
                match ascii(*n) {
                    Some(c) => write!(f, " ; ascii: {c}"),
                    None => Ok(()),
                }
            }
            Param::Label(label) if label.is_empty() => Ok(()),
            Param::Label(label) => write!(f, " {}", label.sanitized()),
        }
    }
}

/// Decode the whole source without executing it
pub fn disassemble(source: &str) -> Result<String, lexer::Error> {
    let mut out = String::new();
    disassemble_into(source, &mut out)?;
    Ok(out)
}

pub fn disassemble_into(source: &str, out: &mut String) -> Result<(), lexer::Error> {
    let mut count = 0usize;
    for token in Lexer::new(source) {
        // Writing into a `String` never fails
        let _ = writeln!(out, "{}", token?);
        count += 1;
    }
    log::debug!("disassembled {count} instructions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::lexer::ErrorKind,
        std::{string::ToString, vec::Vec},
    };

    const HI: &str = "   \t\t \t  \t\n   \t  \t   \n\t\n  \t\n  \n\n\n";

    #[test]
    fn listing_format() {
        assert_eq!(
            disassemble(HI).unwrap(),
            "[0010] push 105 ; ascii: i\n\
             [0021] push 72 ; ascii: H\n\
             [0025] outchar\n\
             [0029] outchar\n\
             [0032] exit\n"
        );
    }

    #[test]
    fn negative_and_control_numbers() {
        // push -4, push 10
        assert_eq!(disassemble("  \t\t  \n   \t \t \n").unwrap(), "[0006] push -4\n[0014] push 10\n");
    }

    #[test]
    fn labels_are_sanitized() {
        assert_eq!(disassemble("\n  \t \n").unwrap(), "[0005] label 10\n");
        assert_eq!(disassemble("\n \n\n").unwrap(), "[0003] jmp\n");
    }

    #[test]
    fn long_labels_are_truncated() {
        let mut source = String::from("\n \t");
        source.extend(core::iter::repeat(' ').take(70));
        source.push('\n');

        let listing = disassemble(&source).unwrap();
        let expected = ["[0073] call ", &"0".repeat(60), "...\n"].concat();
        assert_eq!(listing, expected);
    }

    #[test]
    fn comments_do_not_change_offsets() {
        let listing = disassemble("xx\nx\n\n").unwrap();
        assert_eq!(listing, "[0005] exit\n");
    }

    #[test]
    fn idempotent() {
        assert_eq!(disassemble(HI), disassemble(HI));
    }

    #[test]
    fn agrees_with_lexer() {
        let listing = disassemble(HI).unwrap();
        let tokens = Lexer::new(HI).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(listing.lines().count(), tokens.len());
        for (line, token) in listing.lines().zip(&tokens) {
            assert!(line.starts_with(&std::format!("[{:04}] {}", token.end, token.op)));
        }
    }

    #[test]
    fn stops_on_malformed_source() {
        let err = disassemble("\n\n\n\t\t\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCode);
        assert_eq!(err.offset, 5);
        assert_eq!(err.to_string(), "unknown command at 5");
    }

    #[test]
    fn ascii_annotation() {
        assert_eq!(ascii(72), Some('H'));
        assert_eq!(ascii(10), None);
        assert_eq!(ascii(-1), None);
        assert_eq!(ascii(0xD800), None);
    }
}
