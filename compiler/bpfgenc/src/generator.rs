//! The generation pipeline.
//!
//! ```text
//! object bytes ──► SpecLoader ──► GenerationContext ──► render ──► SourceFormatter
//! ```
//!
//! Each stage either hands its result to the next or stops the pipeline with
//! its own error. Nothing is written until the formatter accepted the text.

use std::io::{Read, Write};

use bpfgen_elf::{ElfSpecLoader, SpecLoader};
use bpfgen_fmt::{CanonicalFormatter, SourceFormatter};
use bpfgen_ir::GenerationContext;
use bpfgen_render::{render, TemplateFuncs};

use crate::error::{GenerateError, IoStage};
use crate::options::Options;

/// Generates Go bindings with a fixed loader and formatter.
///
/// Holds no mutable state; one generator can serve any number of calls.
#[derive(Clone, Debug, Default)]
pub struct Generator<L = ElfSpecLoader, F = CanonicalFormatter> {
    loader: L,
    formatter: F,
    funcs: TemplateFuncs,
}

impl Generator {
    /// ELF loading and the built-in formatter.
    pub fn new() -> Self {
        Generator::default()
    }
}

impl<L: SpecLoader, F: SourceFormatter> Generator<L, F> {
    pub fn with_parts(loader: L, formatter: F) -> Self {
        Generator {
            loader,
            formatter,
            funcs: TemplateFuncs::standard(),
        }
    }

    #[must_use]
    pub fn with_funcs(mut self, funcs: TemplateFuncs) -> Self {
        self.funcs = funcs;
        self
    }

    /// Produce the formatted Go source for `object`.
    #[tracing::instrument(level = "debug", skip_all, fields(ident = %options.ident, len = object.len()))]
    pub fn generate(&self, object: &[u8], options: &Options) -> Result<String, GenerateError> {
        let spec = self.loader.load(object)?;
        tracing::debug!(
            programs = spec.programs.len(),
            maps = spec.maps.len(),
            "loaded collection"
        );

        let ctx = GenerationContext::new(
            &options.package,
            &options.tags,
            &options.ident,
            &spec,
            object,
        )?;
        let source = render(&ctx, &self.funcs)?;
        let formatted = self.formatter.format(&source)?;

        tracing::debug!(len = formatted.len(), "generated");
        Ok(formatted)
    }

    /// Read the object from `input` and write the bindings to `output`.
    ///
    /// `output` sees no bytes unless generation succeeded.
    pub fn write<R: Read, W: Write>(
        &self,
        mut input: R,
        mut output: W,
        options: &Options,
    ) -> Result<(), GenerateError> {
        let mut object = Vec::new();
        input
            .read_to_end(&mut object)
            .map_err(GenerateError::io(IoStage::ReadObject))?;

        let source = self.generate(&object, options)?;

        output
            .write_all(source.as_bytes())
            .and_then(|()| output.flush())
            .map_err(GenerateError::io(IoStage::WriteOutput))
    }
}
