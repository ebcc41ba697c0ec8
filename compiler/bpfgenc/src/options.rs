//! Generation options.

/// Package clause used when none is given.
pub const DEFAULT_PACKAGE: &str = "main";

/// What to call the generated code and where to put it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Go package of the generated file.
    pub package: String,
    /// Base identifier the container and function names derive from.
    pub ident: String,
    /// Build constraints, one `// +build` line each, in order.
    pub tags: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            package: DEFAULT_PACKAGE.to_owned(),
            ident: String::new(),
            tags: Vec::new(),
        }
    }
}

impl Options {
    pub fn new(ident: impl Into<String>) -> Self {
        Options {
            ident: ident.into(),
            ..Options::default()
        }
    }

    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
