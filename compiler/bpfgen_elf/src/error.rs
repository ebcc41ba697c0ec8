//! Loader errors.

use thiserror::Error;

/// Failure to describe an object file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not an ELF object (bad magic)")]
    NotElf,
    #[error("can't parse ELF object")]
    Parse(#[source] object::Error),
    #[error("ELF object is {kind}, expected a relocatable object")]
    NotRelocatable { kind: String },
    #[error("malformed {what}")]
    Malformed {
        what: String,
        #[source]
        source: object::Error,
    },
    #[error("symbol {name:?}: {reason}")]
    Symbol { name: String, reason: String },
    #[error("map {name:?}: {reason}")]
    MapDefinition { name: String, reason: String },
    #[error("program {name:?}: {len} bytes is not a whole number of instructions")]
    Instructions { name: String, len: usize },
    #[error("duplicate program {0:?}")]
    DuplicateProgram(String),
    #[error("duplicate map {0:?}")]
    DuplicateMap(String),
}

impl LoadError {
    pub(crate) fn malformed(what: impl Into<String>) -> impl FnOnce(object::Error) -> LoadError {
        let what = what.into();
        move |source| LoadError::Malformed { what, source }
    }
}
