//! bpfgen Renderer
//!
//! Turns a [`GenerationContext`] into Go source that embeds the object file
//! and binds its programs and maps to typed struct fields.
//!
//! The generated file contains, in order: the header and build tags, the
//! package clause and imports, the specs container with its constructor,
//! `CollectionSpec()`, `Load()` and `Copy()` methods, the objects container
//! with `Close()`, and the embedded byte literal.
//!
//! Rendering is pure. The same context and helpers always produce the same
//! text. It fails when the helpers map two names to one field, or when the
//! destination refuses a write.

use std::fmt;

use bpfgen_ir::{ContextError, GenerationContext};
use thiserror::Error;

mod funcs;
mod quote;
mod template;

pub use funcs::{TemplateFn, TemplateFuncs};
pub use quote::{go_quote, struct_tag};
pub use template::{EBPF_MODULE, HEADER};

use template::Template;

/// Rendering failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The identifier helper maps two names to the same field.
    #[error("can't name generated fields")]
    Fields(#[source] ContextError),
    #[error("can't write generated source")]
    Write(#[from] fmt::Error),
}

/// Render the Go bindings for `ctx` into a new string.
pub fn render(ctx: &GenerationContext, funcs: &TemplateFuncs) -> Result<String, RenderError> {
    let mut out = String::with_capacity(ctx.bytes().len() + 4096);
    render_to(&mut out, ctx, funcs)?;
    Ok(out)
}

/// Render the Go bindings for `ctx` into `out`.
#[tracing::instrument(level = "debug", skip_all, fields(base = ctx.name().base()))]
pub fn render_to<W: fmt::Write>(
    out: &mut W,
    ctx: &GenerationContext,
    funcs: &TemplateFuncs,
) -> Result<(), RenderError> {
    ctx.check_collisions(|name| funcs.identifier(name))
        .map_err(RenderError::Fields)?;
    let template = Template::new(out, ctx, funcs);
    tracing::debug!(
        fields = template.field_count(),
        tags = ctx.tags().len(),
        "rendering bindings"
    );
    template.write()?;
    Ok(())
}
