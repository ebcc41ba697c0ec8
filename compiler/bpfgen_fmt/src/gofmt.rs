//! External `gofmt`
//!
//! Pipes source text through the Go toolchain's formatter. Use this when the
//! output must match `gofmt` byte for byte; the built-in
//! [`CanonicalFormatter`](crate::CanonicalFormatter) needs no Go toolchain.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use crate::error::FormatError;
use crate::SourceFormatter;

/// Program name looked up on `PATH` by default.
pub const GOFMT: &str = "gofmt";

/// Formats by running an external `gofmt` executable.
#[derive(Clone, Debug)]
pub struct GoFmt {
    program: PathBuf,
}

impl Default for GoFmt {
    fn default() -> Self {
        GoFmt {
            program: PathBuf::from(GOFMT),
        }
    }
}

impl GoFmt {
    /// Run `gofmt` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a specific executable instead of `gofmt` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        GoFmt {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SourceFormatter for GoFmt {
    #[tracing::instrument(level = "debug", skip_all, fields(program = %self.program.display()))]
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let program = self.program.display().to_string();
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FormatError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a full stdout pipe can't
        // deadlock the child.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("child stdin was not captured"))?;
        let input = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| io::Error::other("stdin writer panicked"))?;

        if !output.status.success() {
            return Err(FormatError::External {
                program,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        written?;

        String::from_utf8(output.stdout)
            .map_err(|err| FormatError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
    }
}
