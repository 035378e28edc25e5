//! Prefix code matching
//!
//! Shared by every decoder that reads self-delimiting codes one symbol at a
//! time (Whitespace commands, Spoon bit strings).

/// Result of matching an accumulated run against a code table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match<T> {
    /// Run equals a code
    Found(T),
    /// Run is a proper prefix of at least one code, keep reading
    Prefix,
    /// No code starts with this run
    Invalid,
}

/// Look the run up in the table
///
/// With a prefix-free table at most one entry can be [`Match::Found`] and
/// the first one wins.
pub fn lookup<T: Copy>(table: &[(&[u8], T)], run: &[u8]) -> Match<T> {
    let mut prefix = false;
    for &(code, item) in table {
        if code == run {
            return Match::Found(item);
        }
        prefix |= code.starts_with(run);
    }

    if prefix {
        Match::Prefix
    } else {
        Match::Invalid
    }
}

/// No code in the table is a prefix of another one
pub fn is_prefix_free<T>(table: &[(&[u8], T)]) -> bool {
    table.iter().enumerate().all(|(i, (a, _))| {
        table.iter().enumerate().all(|(j, (b, _))| i == j || !b.starts_with(a))
    })
}
