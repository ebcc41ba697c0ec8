//! Derived Names
//!
//! Every Go symbol bpfgen emits is derived from one base identifier. The
//! derivation happens once, so the casing decision can't drift between
//! symbols.

use thiserror::Error;

use crate::ident::{is_exported, is_identifier, sanitize, upper_first};

/// Whether derived symbols are exported from the generated package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Casing {
    Exported,
    Unexported,
}

impl Casing {
    /// Apply the casing to a derived symbol.
    fn apply(self, symbol: String) -> String {
        match self {
            Casing::Exported => upper_first(&symbol),
            Casing::Unexported => symbol,
        }
    }
}

/// Error deriving names from a base identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("base identifier is empty")]
    EmptyBase,
    #[error("base identifier {0:?} is not a valid Go identifier")]
    InvalidBase(String),
}

/// The base identifier and every symbol name derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedName {
    base: String,
    casing: Casing,
    specs: String,
    objects: String,
    new_specs: String,
    bytes: String,
}

impl DerivedName {
    /// Derive all names from `base`.
    ///
    /// `base` must be a Go identifier that keeps at least one character
    /// through [`sanitize`].
    ///
    /// # Example
    ///
    /// ```
    /// use bpfgen_ir::DerivedName;
    ///
    /// let name = DerivedName::new("Filter").unwrap();
    /// assert_eq!(name.specs(), "FilterSpecs");
    /// assert_eq!(name.new_specs(), "NewFilterSpecs");
    /// assert_eq!(name.bytes(), "_FilterBytes");
    /// ```
    pub fn new(base: &str) -> Result<Self, NameError> {
        if base.is_empty() {
            return Err(NameError::EmptyBase);
        }
        if !is_identifier(base) || sanitize(base, false).is_empty() {
            return Err(NameError::InvalidBase(base.to_owned()));
        }

        let casing = if is_exported(base) {
            Casing::Exported
        } else {
            Casing::Unexported
        };
        let upper = upper_first(base);

        Ok(DerivedName {
            base: base.to_owned(),
            casing,
            specs: casing.apply(format!("{base}Specs")),
            objects: casing.apply(format!("{base}Objects")),
            new_specs: casing.apply(format!("new{upper}Specs")),
            // Always private, whatever the casing.
            bytes: format!("_{upper}Bytes"),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn casing(&self) -> Casing {
        self.casing
    }

    /// Name of the specs container type.
    pub fn specs(&self) -> &str {
        &self.specs
    }

    /// Name of the objects container type.
    pub fn objects(&self) -> &str {
        &self.objects
    }

    /// Name of the specs constructor.
    pub fn new_specs(&self) -> &str {
        &self.new_specs
    }

    /// Name of the private byte-literal variable.
    pub fn bytes(&self) -> &str {
        &self.bytes
    }
}
