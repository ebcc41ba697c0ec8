//! Shared fixtures: small relocatable ELF objects shaped like clang's BPF
//! output.

#![allow(dead_code, reason = "Not every test binary uses every fixture")]

use std::collections::HashMap;

use object::write::{Object, SectionId, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};

pub struct ElfBuilder {
    obj: Object<'static>,
    sections: HashMap<String, SectionId>,
}

impl ElfBuilder {
    pub fn new() -> Self {
        ElfBuilder {
            obj: Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little),
            sections: HashMap::new(),
        }
    }

    fn section(&mut self, name: &str, kind: SectionKind) -> SectionId {
        if let Some(&id) = self.sections.get(name) {
            return id;
        }
        let id = self.obj.add_section(Vec::new(), name.as_bytes().to_vec(), kind);
        self.sections.insert(name.to_owned(), id);
        id
    }

    fn symbol(&mut self, section: SectionId, name: &str, kind: SymbolKind, value: u64, size: u64) {
        self.obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value,
            size,
            kind,
            scope: SymbolScope::Dynamic,
            weak: false,
            section: SymbolSection::Section(section),
            flags: SymbolFlags::None,
        });
    }

    /// A program of `instructions` exit instructions.
    pub fn program(mut self, section: &str, name: &str, instructions: usize) -> Self {
        let id = self.section(section, SectionKind::Text);
        let mut code = Vec::new();
        for _ in 0..instructions {
            code.extend_from_slice(&[0x95, 0, 0, 0, 0, 0, 0, 0]);
        }
        let offset = self.obj.append_section_data(id, &code, 8);
        self.symbol(id, name, SymbolKind::Text, offset, code.len() as u64);
        self
    }

    /// A legacy `bpf_map_def`: type, key size, value size, max entries, flags.
    pub fn map(mut self, name: &str, def: [u32; 5]) -> Self {
        let id = self.section("maps", SectionKind::Data);
        let bytes: Vec<u8> = def.iter().flat_map(|v| v.to_le_bytes()).collect();
        let offset = self.obj.append_section_data(id, &bytes, 4);
        self.symbol(id, name, SymbolKind::Data, offset, bytes.len() as u64);
        self
    }

    pub fn rodata(mut self, bytes: &[u8]) -> Self {
        let id = self.section(".rodata", SectionKind::ReadOnlyData);
        self.obj.append_section_data(id, bytes, 1);
        self
    }

    pub fn license(mut self, license: &str) -> Self {
        let id = self.section("license", SectionKind::Data);
        let mut bytes = license.as_bytes().to_vec();
        bytes.push(0);
        self.obj.append_section_data(id, &bytes, 1);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.obj.write().expect("write ELF")
    }
}

/// The object from the `Filter` example: one XDP program, one hash map and
/// a read-only data section.
pub fn filter_object() -> Vec<u8> {
    ElfBuilder::new()
        .program("xdp", "xdp_prog", 2)
        .map("counters", [1, 4, 8, 1024, 0])
        .rodata(b"config\0")
        .license("GPL")
        .build()
}
