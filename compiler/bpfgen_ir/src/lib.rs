//! bpfgen IR
//!
//! Shared data model for the bpfgen generator.
//!
//! # Modules
//!
//! - [`ident`]: Go identifier sanitizing for arbitrary symbol names
//! - [`literal`]: Byte-literal encoding for embedding the object file
//! - [`classify`]: Program / map / section classification
//! - [`names`]: Names derived once from the user-supplied base identifier
//! - [`spec`]: Program and map descriptors produced by a spec loader
//! - [`context`]: The immutable value handed to the renderer

pub mod classify;
pub mod context;
pub mod ident;
pub mod literal;
pub mod names;
pub mod spec;

pub use classify::{classify, classify_map, ClassifiedMaps, ClassifiedName, NameClass, SECTION_MARKER};
pub use context::{ContextError, GenerationContext};
pub use ident::{is_exported, is_identifier, sanitize, upper_first};
pub use literal::{decode, encode, LiteralError};
pub use names::{Casing, DerivedName, NameError};
pub use spec::{CollectionSpec, MapFlags, MapSpec, MapType, ProgramSpec, ProgramType};
