//! Template Functions
//!
//! The named helpers the template calls. A [`TemplateFuncs`] value is built
//! by the caller and handed to [`render`](crate::render); nothing is
//! registered globally.

use bpfgen_ir::sanitize;

use crate::quote::struct_tag;

/// A pure string transformation used by the template.
pub type TemplateFn = fn(&str) -> String;

/// The helpers available to the template.
#[derive(Clone, Copy, Debug)]
pub struct TemplateFuncs {
    identifier: TemplateFn,
    tag: TemplateFn,
}

impl TemplateFuncs {
    pub fn new(identifier: TemplateFn, tag: TemplateFn) -> Self {
        TemplateFuncs { identifier, tag }
    }

    /// `identifier` sanitizes in unexported mode, `tag` builds the
    /// `ebpf:"<name>"` struct tag.
    pub fn standard() -> Self {
        TemplateFuncs::new(identifier, struct_tag)
    }

    /// The field identifier suffix for an object-file name.
    pub fn identifier(&self, name: &str) -> String {
        (self.identifier)(name)
    }

    /// The struct tag for an object-file name.
    pub fn tag(&self, name: &str) -> String {
        (self.tag)(name)
    }
}

impl Default for TemplateFuncs {
    fn default() -> Self {
        TemplateFuncs::standard()
    }
}

fn identifier(name: &str) -> String {
    sanitize(name, false)
}
