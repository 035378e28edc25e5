use {
    crate::param::{self, Param},
    alloc::vec::Vec,
    esobytecode::{is_symbol, prefix::Match, symbol, Op},
};

/// One decoded instruction occurrence
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub op: Op,
    pub param: Param,
    /// Offset of the symbol that terminated the token
    pub end: usize,
}

impl Token {
    /// Offset scanning resumes at after this token
    #[inline]
    pub fn next(&self) -> usize {
        self.end + 1
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source ended inside a command or parameter
    UnexpectedEnd,
    /// Accumulated run is not a prefix of any command
    InvalidCode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::UnexpectedEnd => write!(f, "unexpected end of source at {}", self.offset),
            ErrorKind::InvalidCode => write!(f, "unknown command at {}", self.offset),
        }
    }
}

impl core::error::Error for Error {}

pub struct Lexer<'a> {
    pos: usize,
    source: &'a [u8],
    run: Vec<u8>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::restore(input, 0)
    }

    pub fn restore(input: &'a str, pos: usize) -> Self {
        Self { pos, source: input.as_bytes(), run: Vec::new() }
    }

    /// Reposition the cursor, the next token starts scanning at `pos`
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Move the cursor past the last symbol, `next_token` yields `Ok(None)`
    #[inline]
    pub fn seek_end(&mut self) {
        self.pos = self.source.len();
    }

    /// Next instruction symbol and its offset, comments are skipped
    fn advance(&mut self) -> Option<(usize, u8)> {
        while let Some(&b) = self.source.get(self.pos) {
            self.pos += 1;
            if is_symbol(b) {
                return Some((self.pos - 1, b));
            }
        }
        None
    }

    fn fail(&mut self, kind: ErrorKind, offset: usize) -> Error {
        self.pos = self.source.len();
        Error { kind, offset }
    }

    /// Scan the next token, `Ok(None)` once the source is exhausted between
    /// tokens
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        self.run.clear();
        let (op, end) = loop {
            let Some((offset, b)) = self.advance() else {
                if self.run.is_empty() {
                    return Ok(None);
                }
                return Err(self.fail(ErrorKind::UnexpectedEnd, self.source.len()));
            };

            self.run.push(b);
            match Op::lookup(&self.run) {
                Match::Found(op) => break (op, offset),
                Match::Prefix => {}
                Match::Invalid => return Err(self.fail(ErrorKind::InvalidCode, offset)),
            }
        };

        if !op.has_param() {
            return Ok(Some(Token { op, param: Param::None, end }));
        }

        self.run.clear();
        let end = loop {
            match self.advance() {
                Some((offset, symbol::LF)) => break offset,
                Some((_, b)) => self.run.push(b),
                None => return Err(self.fail(ErrorKind::UnexpectedEnd, self.source.len())),
            }
        };

        Ok(Some(Token { op, param: param::decode(op.param(), &self.run), end }))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{Error, ErrorKind, Lexer},
        crate::param::{Label, Param},
        esobytecode::Op,
        std::vec::Vec,
    };

    fn lex(input: &str) -> Result<Vec<(Op, Param, usize)>, Error> {
        Lexer::new(input).map(|t| t.map(|t| (t.op, t.param, t.end))).collect()
    }

    #[test]
    fn empty() {
        assert_eq!(lex(""), Ok(Vec::new()));
        assert_eq!(lex("only_comments-here"), Ok(Vec::new()));
    }

    #[test]
    fn push_and_print() {
        assert_eq!(
            lex("   \t  \t   \n\t\n  "),
            Ok(std::vec![(Op::PUSH, Param::Number(72), 10), (Op::OUTCHAR, Param::None, 14)])
        );
    }

    #[test]
    fn comments_are_skipped_but_offsets_kept() {
        let tokens = lex("a \nb c").unwrap();
        assert_eq!(tokens, std::vec![(Op::DUP, Param::None, 4)]);
    }

    #[test]
    fn label_parameter() {
        let tokens = lex("\n  \t \n\n \n\t \n").unwrap();
        let label = Param::Label(Label::new(*b"\t "));
        assert_eq!(
            tokens,
            std::vec![(Op::LABEL, label.clone(), 5), (Op::JMP, label, 11)]
        );
    }

    #[test]
    fn restore_mid_source() {
        let source = "\n\n\n \n ";
        let mut lexer = Lexer::restore(source, 3);
        assert_eq!(lexer.next_token().unwrap().map(|t| t.op), Some(Op::DUP));
        assert_eq!(lexer.next_token(), Ok(None));
    }

    #[test]
    fn unterminated_parameter() {
        assert_eq!(lex("   \t"), Err(Error { kind: ErrorKind::UnexpectedEnd, offset: 4 }));
    }

    #[test]
    fn incomplete_command() {
        assert_eq!(lex("\t\n"), Err(Error { kind: ErrorKind::UnexpectedEnd, offset: 2 }));
    }

    #[test]
    fn invalid_command() {
        assert_eq!(lex(" \t\t"), Err(Error { kind: ErrorKind::InvalidCode, offset: 2 }));
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut lexer = Lexer::new(" \t\t \n ");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn seek_end_exhausts() {
        let mut lexer = Lexer::new("   \t\n\n\n\n");
        lexer.seek_end();
        assert_eq!(lexer.next_token(), Ok(None));
    }
}
