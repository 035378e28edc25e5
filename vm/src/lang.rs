//! Language selection and dispatch

use {
    crate::{
        befunge::{BefungeError, Befunge93},
        byter::{Byter, ByterError},
        host::HostIo,
        rand::Rand,
        tape::{Brainfuck, TapeError},
        VmRunError,
    },
    core::{fmt, str::FromStr},
    derive_more::{Display, From},
    esolang::translate::{self, TranslateError},
};

macro_rules! languages {
    ($($name:ident = $code:literal, $title:literal;)*) => {
        /// Supported language
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Language {
            $(#[doc = $title] $name,)*
        }

        impl Language {
            pub const ALL: &'static [Language] = &[$(Language::$name),*];

            /// Short name used on the command line
            pub fn code(self) -> &'static str {
                match self {
                    $(Language::$name => $code,)*
                }
            }

            pub fn title(self) -> &'static str {
                match self {
                    $(Language::$name => $title,)*
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Language::$name),)*
                    _ => None,
                }
            }
        }
    };
}

languages! {
    Brainfuck  = "bf",  "Brainfuck";
    Ook        = "ook", "Ook!";
    Spoon      = "sp",  "Spoon";
    Byter      = "bt",  "Byter";
    Whitespace = "ws",  "Whitespace";
    Befunge93  = "b93", "Befunge-93";
}

impl Language {
    /// Only Whitespace has a listing format
    pub fn can_disassemble(self) -> bool {
        self == Language::Whitespace
    }

    /// Run `source` to completion, `seed` drives Befunge-93's `?`
    pub fn run(self, source: &str, mut host: impl HostIo, seed: u64) -> Result<(), RunError> {
        log::debug!("running {} program of {} bytes", self.title(), source.len());
        match self {
            Language::Brainfuck => Brainfuck::new(source)?.run(&mut host)?,
            Language::Ook => Brainfuck::new(&translate::ook(source))?.run(&mut host)?,
            Language::Spoon => Brainfuck::new(&translate::spoon(source)?)?.run(&mut host)?,
            Language::Byter => Byter::new(source)?.run(&mut host)?,
            Language::Whitespace => crate::run(source, host)?,
            Language::Befunge93 => Befunge93::new(source, Rand(seed)).run(&mut host)?,
        }
        Ok(())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "{} is not supported", _0)]
pub struct UnknownLanguage(pub alloc::string::String);

impl core::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownLanguage(s.into()))
    }
}

/// Failure of any interpreter
#[derive(Clone, Debug, Display, From, PartialEq, Eq)]
pub enum RunError {
    Whitespace(VmRunError),
    Tape(TapeError),
    Translate(TranslateError),
    Byter(ByterError),
    Befunge(BefungeError),
}

impl core::error::Error for RunError {}
