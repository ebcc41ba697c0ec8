//! Formatter errors.

use std::io;

use thiserror::Error;

/// Source text that could not be formatted.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: unterminated {what}")]
    Unterminated { line: usize, what: &'static str },
    #[error("line {line}: expected '{expected}', found '{found}'")]
    Unbalanced {
        line: usize,
        expected: char,
        found: char,
    },
    #[error("line {line}: unexpected '{found}'")]
    Unexpected { line: usize, found: char },
    #[error("line {line}: '{open}' is never closed")]
    Unclosed { line: usize, open: char },
    #[error("can't run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} rejected the source: {stderr}")]
    External { program: String, stderr: String },
    #[error("I/O error while formatting")]
    Io(#[from] io::Error),
}
