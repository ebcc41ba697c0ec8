//! bpfgen Formatter
//!
//! Canonical layout for the Go source bpfgen generates.
//!
//! # Architecture
//!
//! Formatting is a single scan over the text followed by a layout pass:
//!
//! 1. **Scan**: Track strings, comments and bracket nesting line by line,
//!    rejecting text that is not lexically well-formed.
//! 2. **Layout**: Re-indent with tabs by nesting depth, normalize blank
//!    lines, and align field and key/value columns the way `gofmt` does.
//!
//! The formatter is not a Go parser. It checks what a broken template can
//! actually produce (unbalanced delimiters, unterminated literals) and
//! lays out the constructs bpfgen emits. For byte-exact `gofmt` output use
//! [`GoFmt`], which runs the real tool.
//!
//! # Modules
//!
//! - [`emitter`]: Output abstraction
//! - [`layout`]: The scan and the line layout
//! - [`align`]: Column alignment of field and key/value runs
//! - [`gofmt`]: External `gofmt` adapter

pub mod align;
pub mod emitter;
pub mod gofmt;
pub mod layout;

mod error;

pub use emitter::{Emitter, StringEmitter};
pub use error::FormatError;
pub use gofmt::GoFmt;
pub use layout::CanonicalFormatter;

/// Turns rendered source text into canonical source text.
pub trait SourceFormatter {
    /// Format `source`, rejecting text that is not well-formed.
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

impl<F: SourceFormatter + ?Sized> SourceFormatter for &F {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        (**self).format(source)
    }
}

impl<F: SourceFormatter + ?Sized> SourceFormatter for Box<F> {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        (**self).format(source)
    }
}

/// Format `source` with the built-in [`CanonicalFormatter`].
///
/// # Example
///
/// ```
/// let src = "package bpf\n\n\n\ntype T struct {\nA int `x:\"a\"`\nLonger string\n}\n";
/// let out = bpfgen_fmt::format_source(src).unwrap();
/// assert_eq!(out, "package bpf\n\ntype T struct {\n\tA      int `x:\"a\"`\n\tLonger string\n}\n");
/// ```
pub fn format_source(source: &str) -> Result<String, FormatError> {
    CanonicalFormatter::new().format(source)
}
