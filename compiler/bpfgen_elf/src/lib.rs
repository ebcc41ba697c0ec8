//! bpfgen ELF Loader
//!
//! Reads a compiled eBPF object file into a [`CollectionSpec`]: one
//! descriptor per program and per map. Nothing is relocated, verified or
//! loaded into a kernel; the loader only describes what the object contains.
//!
//! # What counts as what
//!
//! - **Programs**: function symbols in executable sections other than `.text`.
//!   The section name selects the program type (`xdp`, `kprobe/...`).
//! - **Maps**: symbols in the legacy `maps` section (with a `bpf_map_def`
//!   header) and in the BTF `.maps` section.
//! - **Section maps**: non-empty `.data`, `.rodata` and `.bss` sections,
//!   exposed as single-entry array maps named after the section.

mod error;
mod loader;
mod sections;

pub use error::LoadError;
pub use loader::ElfSpecLoader;
pub use sections::program_type;

use bpfgen_ir::CollectionSpec;

/// Source of collection descriptors.
///
/// The generator only depends on this seam, so tests and embedders can
/// substitute their own loader.
pub trait SpecLoader {
    /// Describe every program and map in `object`.
    fn load(&self, object: &[u8]) -> Result<CollectionSpec, LoadError>;
}

impl<L: SpecLoader + ?Sized> SpecLoader for &L {
    fn load(&self, object: &[u8]) -> Result<CollectionSpec, LoadError> {
        (**self).load(object)
    }
}
