//! Label resolution
//!
//! Jump targets may be defined after their use, so a full pre-pass over the
//! token stream records where every label lives before execution starts.

use {
    crate::{
        lexer::{self, Lexer},
        param::{Label, Param},
    },
    alloc::vec::Vec,
    core::fmt,
    esobytecode::Op,
    hashbrown::HashMap,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedLabel(pub Label);

impl fmt::Display for UndefinedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undefined label {}", self.0.sanitized())
    }
}

impl core::error::Error for UndefinedLabel {}

/// Label table and the set of token boundaries of one program
#[derive(Default, Debug)]
pub struct Labels {
    targets: HashMap<Label, usize>,
    /// End offsets of every token, ascending
    boundaries: Vec<usize>,
}

impl Labels {
    /// Tokenize the whole program once, nothing is executed
    pub fn scan(source: &str) -> Result<Self, lexer::Error> {
        let mut labels = Self::default();
        for token in Lexer::new(source) {
            let token = token?;
            labels.boundaries.push(token.end);
            if let (Op::LABEL, Param::Label(label)) = (token.op, token.param) {
                labels.register(label, token.end);
            }
        }

        log::debug!(
            "label scan: {} tokens, {} labels",
            labels.boundaries.len(),
            labels.targets.len()
        );
        Ok(labels)
    }

    /// Record a definition, the last one wins
    pub fn register(&mut self, label: Label, offset: usize) {
        log::trace!("label {} at {offset}", label.sanitized());
        if let Some(previous) = self.targets.insert(label, offset) {
            if previous != offset {
                log::debug!("label redefined, {previous} replaced by {offset}");
            }
        }
    }

    pub fn resolve(&self, label: &Label) -> Result<usize, UndefinedLabel> {
        self.targets.get(label).copied().ok_or_else(|| UndefinedLabel(label.clone()))
    }

    /// Offset is the end of a token seen by [`Self::scan`]
    pub fn is_boundary(&self, offset: usize) -> bool {
        self.boundaries.binary_search(&offset).is_ok()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
