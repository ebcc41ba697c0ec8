//! Name Classification
//!
//! Splits the loader's map table into plain maps and section maps. A section
//! map is a synthetic map the loader made from an ELF data section such as
//! `.rodata`; its name always starts with [`SECTION_MARKER`].
//!
//! The rule is purely syntactic and total: every name lands in exactly one
//! bucket.

use std::collections::BTreeSet;
use std::fmt;

/// Leading character that marks a map name as a section.
pub const SECTION_MARKER: char = '.';

/// The bucket a symbol name belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameClass {
    Program,
    Map,
    Section,
}

impl NameClass {
    /// All classes, in emission order.
    pub const ALL: [NameClass; 3] = [NameClass::Program, NameClass::Map, NameClass::Section];

    /// Prefix of the generated field name.
    pub fn field_prefix(self) -> &'static str {
        match self {
            NameClass::Program => "Program",
            NameClass::Map => "Map",
            NameClass::Section => "Section",
        }
    }
}

impl fmt::Display for NameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameClass::Program => "program",
            NameClass::Map => "map",
            NameClass::Section => "section",
        })
    }
}

/// A symbol name tagged with its class.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassifiedName<'a> {
    pub class: NameClass,
    pub name: &'a str,
}

impl<'a> ClassifiedName<'a> {
    pub fn program(name: &'a str) -> Self {
        ClassifiedName {
            class: NameClass::Program,
            name,
        }
    }

    /// Classify a map-like name.
    pub fn map(name: &'a str) -> Self {
        ClassifiedName {
            class: classify_map(name),
            name,
        }
    }
}

/// Classify a single map-like name.
#[inline]
pub fn classify_map(name: &str) -> NameClass {
    if name.starts_with(SECTION_MARKER) {
        NameClass::Section
    } else {
        NameClass::Map
    }
}

/// The partition produced by [`classify`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedMaps {
    pub maps: BTreeSet<String>,
    pub sections: BTreeSet<String>,
}

/// Partition map names into plain maps and sections.
pub fn classify<I, S>(map_names: I) -> ClassifiedMaps
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = ClassifiedMaps::default();
    for name in map_names {
        let name = name.into();
        match classify_map(&name) {
            NameClass::Section => out.sections.insert(name),
            NameClass::Map | NameClass::Program => out.maps.insert(name),
        };
    }
    out
}
