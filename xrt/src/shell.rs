//! Interactive prompt

use {
    crate::mem::Source,
    color_eyre::eyre::{bail, eyre, Result},
    esovm::{host::StdHost, HostIo, Language},
    std::{
        io::{BufRead, Write},
        path::Path,
    },
};

const HELP: &str = include_str!("../shell-help.txt");

/// Run a program file through `host`
pub fn run_file(lang: Language, path: &Path, host: impl HostIo, seed: u64) -> Result<()> {
    let source = Source::load(path)?;
    lang.run(source.text()?, host, seed)?;
    Ok(())
}

/// Listing of a program file
pub fn disasm_file(lang: Language, path: &Path) -> Result<String> {
    if !lang.can_disassemble() {
        bail!("{} has no disassembler", lang.title());
    }

    let source = Source::load(path)?;
    Ok(esolang::disasm::disassemble(source.text()?)?)
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W> {
    host: StdHost<R, W>,
    seed: u64,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(reader: R, writer: W, seed: u64) -> Self {
        Self { host: StdHost::new(reader, writer), seed }
    }

    /// Prompt until `exit` or the end of input
    pub fn run(&mut self) {
        self.host.emit_line(concat!("Interactive esoteric code interpreter v", env!("CARGO_PKG_VERSION")));
        loop {
            if let Err(e) = write!(self.host.writer_mut(), "> ") {
                log::warn!("writing prompt failed: {e}");
            }
            self.host.flush();

            let Some(line) = self.host.read_line() else { break };
            match self.command(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    self.host.finish_line();
                    self.host.emit_line(&format!("Error: {e}"));
                }
            }
        }
        self.host.flush();
    }

    pub fn into_inner(self) -> (R, W) {
        self.host.into_inner()
    }

    fn command(&mut self, line: &str) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { return Ok(Flow::Continue) };
        let mut lang = || -> Result<Language> {
            Ok(words.next().ok_or_else(|| eyre!("missing language, see `help`"))?.parse()?)
        };

        match command {
            "exit" => return Ok(Flow::Exit),
            "load" => {
                let lang = lang()?;
                let path = words.next().ok_or_else(|| eyre!("usage: load <lang> <file>"))?;
                run_file(lang, Path::new(path), &mut self.host, self.seed)?;
                self.host.finish_line();
            }
            "disasm" => {
                let lang = lang()?;
                let path = words.next().ok_or_else(|| eyre!("usage: disasm <lang> <file>"))?;
                let listing = disasm_file(lang, Path::new(path))?;
                self.host.emit_line(listing.trim_end());
            }
            "start" => {
                let lang = lang()?;
                let mut source = String::new();
                while let Some(line) = self.host.read_line() {
                    if line == "end" {
                        break;
                    }
                    source.push_str(&line);
                    source.push('\n');
                }
                lang.run(&source, &mut self.host, self.seed)?;
                self.host.finish_line();
            }
            "help" => self.host.emit_line(HELP.trim_end()),
            "clear" => {
                if let Err(e) = write!(self.host.writer_mut(), "\x1b[2J\x1b[H") {
                    log::warn!("clearing screen failed: {e}");
                }
            }
            _ => self.host.emit_line("Unknown command. See `help` for usage information."),
        }

        Ok(Flow::Continue)
    }
}
