//! Esoteric eXperimental RunTime
mod mem;
mod shell;

use {
    argh::FromArgs,
    color_eyre::{eyre::bail, Result},
    esovm::{host::StdHost, Language},
    std::{
        io::{stdin, stdout},
        path::Path,
    },
};

/// Run or disassemble esoteric programs, without a file an interactive
/// prompt is started
#[derive(FromArgs)]
struct Options {
    /// language code (bf, ook, sp, bt, ws or b93) followed by the program
    /// source
    #[argh(positional)]
    args: Vec<String>,

    /// print the listing instead of running the program
    #[argh(switch, short = 'd')]
    disasm: bool,

    /// seed for Befunge-93's random direction
    #[argh(option, default = "0")]
    seed: u64,

    /// log filter: off, error, warn, info, debug or trace
    #[argh(option, default = "log::LevelFilter::Warn")]
    log: log::LevelFilter,
}

pub struct Logger;

impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", &record.level().as_str()[..1], record.args())
        }
    }

    fn flush(&self) {}
}

/// Language and file to run, `None` starts the prompt
fn target(args: &[String]) -> Result<Option<(Language, &Path)>> {
    match args {
        [] => Ok(None),
        [lang, file] => Ok(Some((lang.parse()?, Path::new(file)))),
        _ => bail!("expected both <lang> and <file>, or neither"),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let opts: Options = argh::from_env();

    _ = log::set_logger(&Logger);
    log::set_max_level(opts.log);

    let Some((lang, file)) = target(&opts.args)? else {
        shell::Shell::new(stdin().lock(), stdout().lock(), opts.seed).run();
        return Ok(());
    };

    if opts.disasm {
        print!("{}", shell::disasm_file(lang, file)?);
    } else {
        let mut host = StdHost::new(stdin().lock(), stdout().lock());
        shell::run_file(lang, file, &mut host, opts.seed)?;
        host.finish_line();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::from_args(&["esoxrt"], args).unwrap()
    }

    #[test]
    fn file_arguments() {
        let opts = parse(&["-d", "ws", "hi.ws", "--seed", "3"]);
        assert!(opts.disasm);
        assert_eq!(opts.seed, 3);
        let (lang, file) = target(&opts.args).unwrap().unwrap();
        assert_eq!(lang, Language::Whitespace);
        assert_eq!(file, Path::new("hi.ws"));
    }

    #[test]
    fn prompt_without_arguments() {
        let opts = parse(&[]);
        assert!(target(&opts.args).unwrap().is_none());
        assert_eq!(opts.log, log::LevelFilter::Warn);
    }

    #[test]
    fn bad_arguments() {
        let err = target(&parse(&["ws"]).args).unwrap_err();
        assert_eq!(err.to_string(), "expected both <lang> and <file>, or neither");
        let err = target(&parse(&["cow", "a.cow"]).args).unwrap_err();
        assert_eq!(err.to_string(), "cow is not supported");
    }
}
