//! Errors of the generation pipeline.

use std::fmt;
use std::io;

use bpfgen_elf::LoadError;
use bpfgen_fmt::FormatError;
use bpfgen_ir::ContextError;
use bpfgen_render::RenderError;
use thiserror::Error;

/// The I/O step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoStage {
    ReadObject,
    WriteOutput,
}

impl fmt::Display for IoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoStage::ReadObject => "read object file",
            IoStage::WriteOutput => "write output",
        })
    }
}

/// A failed generation, tagged with the stage that failed.
///
/// Messages name the stage only; the underlying error is the `source()`.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("can't load BPF from ELF")]
    Load(#[from] LoadError),
    #[error("can't build generation context")]
    Context(#[from] ContextError),
    #[error("can't generate types")]
    Render(#[from] RenderError),
    #[error("can't format source")]
    Format(#[from] FormatError),
    #[error("can't {stage}")]
    Io {
        stage: IoStage,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// Wrap an `io::Error` from `stage`, for use with `map_err`.
    pub fn io(stage: IoStage) -> impl FnOnce(io::Error) -> Self {
        move |source| GenerateError::Io { stage, source }
    }
}
