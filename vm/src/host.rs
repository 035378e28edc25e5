//! Host I/O boundary
//!
//! Every interpreter talks to the outside world through [`HostIo`] only.

use alloc::string::String;

pub trait HostIo {
    /// Write one character
    fn emit_char(&mut self, c: char);

    /// Write a full line, the terminator is appended by the host
    fn emit_line(&mut self, line: &str);

    /// `None` once input is exhausted
    fn read_char(&mut self) -> Option<char>;

    /// One line without its terminator, `None` once input is exhausted
    fn read_line(&mut self) -> Option<String>;
}

impl<H: HostIo + ?Sized> HostIo for &mut H {
    fn emit_char(&mut self, c: char) {
        (**self).emit_char(c)
    }

    fn emit_line(&mut self, line: &str) {
        (**self).emit_line(line)
    }

    fn read_char(&mut self) -> Option<char> {
        (**self).read_char()
    }

    fn read_line(&mut self) -> Option<String> {
        (**self).read_line()
    }
}

/// Adapter writing formatted text through [`HostIo::emit_char`]
pub struct Emit<'a, H: ?Sized>(pub &'a mut H);

impl<H: HostIo + ?Sized> core::fmt::Write for Emit<'_, H> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        s.chars().for_each(|c| self.0.emit_char(c));
        Ok(())
    }
}

/// Scripted input and captured output
#[derive(Default, Debug, Clone)]
pub struct BufferHost {
    input: String,
    cursor: usize,
    output: String,
}

impl BufferHost {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into(), ..Default::default() }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Input not consumed yet
    pub fn remaining(&self) -> &str {
        &self.input[self.cursor..]
    }
}

impl HostIo for BufferHost {
    fn emit_char(&mut self, c: char) {
        self.output.push(c);
    }

    fn emit_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn read_char(&mut self) -> Option<char> {
        let c = self.remaining().chars().next()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn read_line(&mut self) -> Option<String> {
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }

        let (line, consumed) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        let line = String::from(line.strip_suffix('\r').unwrap_or(line));
        self.cursor += consumed;
        Some(line)
    }
}

#[cfg(feature = "std")]
pub use std_host::StdHost;

#[cfg(feature = "std")]
mod std_host {
    use {
        super::HostIo,
        alloc::string::String,
        std::io::{BufRead, Write},
    };

    /// Host over a buffered reader and a writer, usually stdin and stdout
    pub struct StdHost<R, W> {
        reader: R,
        writer: W,
        /// Unconsumed part of the last line read
        line: String,
        cursor: usize,
        at_line_start: bool,
    }

    impl<R: BufRead, W: Write> StdHost<R, W> {
        pub fn new(reader: R, writer: W) -> Self {
            Self { reader, writer, line: String::new(), cursor: 0, at_line_start: true }
        }

        /// Nothing was written since the last line feed
        pub fn at_line_start(&self) -> bool {
            self.at_line_start
        }

        /// Terminate a partially written line
        pub fn finish_line(&mut self) {
            if !self.at_line_start {
                self.emit_char('\n');
            }
            self.flush();
        }

        pub fn flush(&mut self) {
            if let Err(e) = self.writer.flush() {
                log::warn!("flushing host output failed: {e}");
            }
        }

        pub fn writer_mut(&mut self) -> &mut W {
            &mut self.writer
        }

        pub fn into_inner(self) -> (R, W) {
            (self.reader, self.writer)
        }

        fn fill(&mut self) -> bool {
            if self.cursor < self.line.len() {
                return true;
            }

            self.flush();
            self.line.clear();
            self.cursor = 0;
            match self.reader.read_line(&mut self.line) {
                Ok(n) => n != 0,
                Err(e) => {
                    log::warn!("reading host input failed: {e}");
                    false
                }
            }
        }

        fn write(&mut self, text: &str) {
            if let Err(e) = self.writer.write_all(text.as_bytes()) {
                log::warn!("writing host output failed: {e}");
            }
            if let Some(last) = text.chars().last() {
                self.at_line_start = last == '\n';
            }
        }
    }

    impl<R: BufRead, W: Write> HostIo for StdHost<R, W> {
        fn emit_char(&mut self, c: char) {
            self.write(c.encode_utf8(&mut [0; 4]));
        }

        fn emit_line(&mut self, line: &str) {
            self.write(line);
            self.write("\n");
        }

        fn read_char(&mut self) -> Option<char> {
            if !self.fill() {
                return None;
            }
            let c = self.line[self.cursor..].chars().next()?;
            self.cursor += c.len_utf8();
            Some(c)
        }

        fn read_line(&mut self) -> Option<String> {
            if !self.fill() {
                return None;
            }
            let rest = &self.line[self.cursor..];
            let line = rest.trim_end_matches(['\n', '\r']).into();
            self.cursor = self.line.len();
            Some(line)
        }
    }
}
