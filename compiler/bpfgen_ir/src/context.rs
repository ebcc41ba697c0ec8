//! Generation Context
//!
//! The immutable value the renderer works from. It is assembled once per
//! invocation, and every invariant the renderer relies on is checked here,
//! so a context that exists always renders to well-formed Go.
//!
//! Descriptor tables are re-keyed into `BTreeMap`s, which fixes emission
//! order to lexicographic by name regardless of the loader's hash order.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::classify::{classify_map, ClassifiedName, NameClass};
use crate::ident::{is_identifier, sanitize};
use crate::literal::encode;
use crate::names::{DerivedName, NameError};
use crate::spec::{CollectionSpec, MapSpec, ProgramSpec};

/// Go keywords, which can't name a package.
const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// A context invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("package name {0:?} is not a valid Go package name")]
    InvalidPackage(String),
    #[error("build tag {0:?} must be a single non-empty line")]
    InvalidTag(String),
    #[error("{class} names {first:?} and {second:?} both map to field {ident}")]
    Collision {
        class: NameClass,
        first: String,
        second: String,
        ident: String,
    },
}

/// Everything the renderer needs, validated.
#[derive(Clone, Debug)]
pub struct GenerationContext {
    package: String,
    tags: Vec<String>,
    name: DerivedName,
    programs: BTreeMap<String, ProgramSpec>,
    maps: BTreeMap<String, MapSpec>,
    sections: BTreeMap<String, MapSpec>,
    bytes: String,
}

impl GenerationContext {
    /// Assemble a context for `spec`, loaded from `object`.
    ///
    /// `tags` keep their order. Map names are split into plain maps and
    /// sections by [`classify_map`].
    pub fn new(
        package: &str,
        tags: &[String],
        base: &str,
        spec: &CollectionSpec,
        object: &[u8],
    ) -> Result<Self, ContextError> {
        if !is_identifier(package) || package == "_" || GO_KEYWORDS.contains(&package) {
            return Err(ContextError::InvalidPackage(package.to_owned()));
        }
        if let Some(bad) = tags
            .iter()
            .find(|tag| tag.trim().is_empty() || tag.contains(['\n', '\r']))
        {
            return Err(ContextError::InvalidTag(bad.clone()));
        }
        let name = DerivedName::new(base)?;

        let mut maps = BTreeMap::new();
        let mut sections = BTreeMap::new();
        for (map_name, map) in &spec.maps {
            let bucket = match classify_map(map_name) {
                NameClass::Section => &mut sections,
                NameClass::Map | NameClass::Program => &mut maps,
            };
            bucket.insert(map_name.clone(), map.clone());
        }

        let ctx = GenerationContext {
            package: package.to_owned(),
            tags: tags.to_vec(),
            name,
            programs: sorted(&spec.programs),
            maps,
            sections,
            bytes: encode(object),
        };
        ctx.check_collisions(|name| sanitize(name, false))?;
        Ok(ctx)
    }

    /// Reject two names that `identifier` maps to the same field.
    ///
    /// The constructor checks with the standard sanitizer. A renderer using
    /// a different identifier function must check again with its own.
    pub fn check_collisions<F>(&self, identifier: F) -> Result<(), ContextError>
    where
        F: Fn(&str) -> String,
    {
        let mut seen: FxHashMap<String, &str> = FxHashMap::default();
        for field in self.fields() {
            let ident = format!("{}{}", field.class.field_prefix(), identifier(field.name));
            if let Some(first) = seen.insert(ident.clone(), field.name) {
                return Err(ContextError::Collision {
                    class: field.class,
                    first: first.to_owned(),
                    second: field.name.to_owned(),
                    ident,
                });
            }
        }
        Ok(())
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn name(&self) -> &DerivedName {
        &self.name
    }

    pub fn programs(&self) -> &BTreeMap<String, ProgramSpec> {
        &self.programs
    }

    pub fn maps(&self) -> &BTreeMap<String, MapSpec> {
        &self.maps
    }

    pub fn sections(&self) -> &BTreeMap<String, MapSpec> {
        &self.sections
    }

    /// The encoded object file, ready to splice into a string literal.
    pub fn bytes(&self) -> &str {
        &self.bytes
    }

    /// Every field of the generated containers, in emission order:
    /// programs, then maps, then sections, each sorted by name.
    pub fn fields(&self) -> impl Iterator<Item = ClassifiedName<'_>> {
        self.fields_of(NameClass::Program)
            .chain(self.fields_of(NameClass::Map))
            .chain(self.fields_of(NameClass::Section))
    }

    /// The fields of one class, sorted by name.
    pub fn fields_of(&self, class: NameClass) -> Box<dyn Iterator<Item = ClassifiedName<'_>> + '_> {
        match class {
            NameClass::Program => Box::new(self.programs.keys().map(|n| ClassifiedName::program(n))),
            NameClass::Map => Box::new(self.maps.keys().map(|n| ClassifiedName::map(n))),
            NameClass::Section => Box::new(self.sections.keys().map(|n| ClassifiedName::map(n))),
        }
    }
}

fn sorted<V: Clone>(table: &FxHashMap<String, V>) -> BTreeMap<String, V> {
    table.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
