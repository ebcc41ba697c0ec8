//! ELF walking.

use bpfgen_ir::{CollectionSpec, MapFlags, MapSpec, MapType, ProgramSpec};
use object::{Object, ObjectKind, ObjectSection, ObjectSymbol, SectionKind, SymbolKind};

use crate::error::LoadError;
use crate::sections::program_type;
use crate::SpecLoader;

const ELF_MAGIC: &[u8] = b"\x7fELF";

/// Section holding `struct bpf_map_def` map declarations.
const LEGACY_MAPS_SECTION: &str = "maps";
/// Section holding BTF-style map declarations.
const BTF_MAPS_SECTION: &str = ".maps";
const LICENSE_SECTION: &str = "license";
/// Shared section for sub-programs; never a program entry point.
const TEXT_SECTION: &str = ".text";

/// Size of the `bpf_map_def` fields we read: type, key_size, value_size,
/// max_entries and map_flags, all `u32`.
const MAP_DEF_SIZE: usize = 20;

/// Data sections that become section maps, with their `.name.*` variants.
const DATA_SECTIONS: [&str; 3] = [".data", ".rodata", ".bss"];

/// Loads collection descriptors from ELF relocatable objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElfSpecLoader;

impl ElfSpecLoader {
    pub fn new() -> Self {
        ElfSpecLoader
    }
}

impl SpecLoader for ElfSpecLoader {
    #[tracing::instrument(level = "debug", skip_all, fields(len = object.len()))]
    fn load(&self, object: &[u8]) -> Result<CollectionSpec, LoadError> {
        if !object.starts_with(ELF_MAGIC) {
            return Err(LoadError::NotElf);
        }
        let file = object::File::parse(object).map_err(LoadError::Parse)?;
        if file.kind() != ObjectKind::Relocatable {
            return Err(LoadError::NotRelocatable {
                kind: format!("{:?}", file.kind()),
            });
        }

        let reader = Reader {
            license: read_license(&file)?,
            little_endian: file.is_little_endian(),
            file,
        };
        let mut spec = CollectionSpec::new();
        reader.load_programs(&mut spec)?;
        reader.load_maps(&mut spec)?;
        reader.load_data_sections(&mut spec)?;

        tracing::debug!(
            programs = spec.programs.len(),
            maps = spec.maps.len(),
            "loaded collection spec"
        );
        Ok(spec)
    }
}

struct Reader<'data> {
    file: object::File<'data>,
    license: String,
    little_endian: bool,
}

impl<'data> Reader<'data> {
    fn load_programs(&self, spec: &mut CollectionSpec) -> Result<(), LoadError> {
        for symbol in self.file.symbols() {
            if symbol.kind() != SymbolKind::Text || !symbol.is_definition() {
                continue;
            }
            let Some(index) = symbol.section_index() else {
                continue;
            };
            let section = self
                .file
                .section_by_index(index)
                .map_err(LoadError::malformed("symbol section index"))?;
            let section_name = section
                .name()
                .map_err(LoadError::malformed("section name"))?;
            if section.kind() != SectionKind::Text || section_name == TEXT_SECTION {
                continue;
            }
            let name = symbol_name(&symbol)?;
            if name.is_empty() {
                continue;
            }

            let data = section
                .data()
                .map_err(LoadError::malformed(format!("section {section_name}")))?;
            let instructions = symbol_bytes(name, data, symbol.address(), symbol.size())?;
            if instructions.len() % ProgramSpec::INSTRUCTION_SIZE != 0 {
                return Err(LoadError::Instructions {
                    name: name.to_owned(),
                    len: instructions.len(),
                });
            }

            let (program_type, attach_to) = program_type(section_name);
            tracing::trace!(name, section = section_name, ?program_type, "program");
            let program = ProgramSpec {
                name: name.to_owned(),
                section: section_name.to_owned(),
                program_type,
                attach_to: attach_to.to_owned(),
                license: self.license.clone(),
                instructions: instructions.to_vec(),
            };
            if spec.insert_program(program).is_some() {
                return Err(LoadError::DuplicateProgram(name.to_owned()));
            }
        }
        Ok(())
    }

    fn load_maps(&self, spec: &mut CollectionSpec) -> Result<(), LoadError> {
        let legacy = self.file.section_by_name(LEGACY_MAPS_SECTION);
        let btf = self.file.section_by_name(BTF_MAPS_SECTION);
        let legacy_index = legacy.as_ref().map(|s| s.index());
        let btf_index = btf.as_ref().map(|s| s.index());
        if legacy_index.is_none() && btf_index.is_none() {
            return Ok(());
        }

        let legacy_data: &[u8] = match &legacy {
            Some(section) => section
                .data()
                .map_err(LoadError::malformed(format!("section {LEGACY_MAPS_SECTION}")))?,
            None => &[],
        };

        for symbol in self.file.symbols() {
            if !matches!(symbol.kind(), SymbolKind::Data | SymbolKind::Unknown)
                || !symbol.is_definition()
            {
                continue;
            }
            let index = symbol.section_index();
            let map = if index.is_some() && index == legacy_index {
                let name = symbol_name(&symbol)?;
                if name.is_empty() {
                    continue;
                }
                self.legacy_map(name, legacy_data, symbol.address())?
            } else if index.is_some() && index == btf_index {
                let name = symbol_name(&symbol)?;
                if name.is_empty() {
                    continue;
                }
                // Attributes live in BTF, which is not decoded.
                MapSpec {
                    name: name.to_owned(),
                    ..MapSpec::default()
                }
            } else {
                continue;
            };

            tracing::trace!(name = %map.name, map_type = ?map.map_type, "map");
            let name = map.name.clone();
            if spec.insert_map(map).is_some() {
                return Err(LoadError::DuplicateMap(name));
            }
        }
        Ok(())
    }

    fn legacy_map(&self, name: &str, data: &[u8], offset: u64) -> Result<MapSpec, LoadError> {
        let def = usize::try_from(offset)
            .ok()
            .and_then(|start| data.get(start..start.checked_add(MAP_DEF_SIZE)?))
            .ok_or_else(|| LoadError::MapDefinition {
                name: name.to_owned(),
                reason: format!("bpf_map_def at offset {offset} runs past the section end"),
            })?;

        let field = |i: usize| {
            let raw = [def[i * 4], def[i * 4 + 1], def[i * 4 + 2], def[i * 4 + 3]];
            if self.little_endian {
                u32::from_le_bytes(raw)
            } else {
                u32::from_be_bytes(raw)
            }
        };

        Ok(MapSpec {
            name: name.to_owned(),
            map_type: MapType::from(field(0)),
            key_size: field(1),
            value_size: field(2),
            max_entries: field(3),
            flags: MapFlags::from_bits_retain(field(4)),
            contents: None,
        })
    }

    fn load_data_sections(&self, spec: &mut CollectionSpec) -> Result<(), LoadError> {
        for section in self.file.sections() {
            let name = section.name().map_err(LoadError::malformed("section name"))?;
            if !is_data_section(name) || section.size() == 0 {
                continue;
            }

            let size = u32::try_from(section.size()).map_err(|_| LoadError::MapDefinition {
                name: name.to_owned(),
                reason: format!("section size {} exceeds the map value limit", section.size()),
            })?;
            // Uninitialized sections have no file bytes; `value_size` is their length.
            let contents = if section.kind() == SectionKind::UninitializedData {
                None
            } else {
                let data = section
                    .data()
                    .map_err(LoadError::malformed(format!("section {name}")))?;
                Some(data.to_vec())
            };
            let flags = if name.starts_with(".rodata") {
                MapFlags::RDONLY_PROG
            } else {
                MapFlags::empty()
            };

            tracing::trace!(name, size, "section map");
            let map = MapSpec {
                name: name.to_owned(),
                map_type: MapType::Array,
                key_size: 4,
                value_size: size,
                max_entries: 1,
                flags,
                contents,
            };
            if spec.insert_map(map).is_some() {
                return Err(LoadError::DuplicateMap(name.to_owned()));
            }
        }
        Ok(())
    }
}

fn read_license(file: &object::File<'_>) -> Result<String, LoadError> {
    let Some(section) = file.section_by_name(LICENSE_SECTION) else {
        return Ok(String::new());
    };
    let data = section
        .data()
        .map_err(LoadError::malformed(format!("section {LICENSE_SECTION}")))?;
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    Ok(String::from_utf8_lossy(&data[..end]).into_owned())
}

fn is_data_section(name: &str) -> bool {
    DATA_SECTIONS.iter().any(|base| {
        name.strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

fn symbol_name<'data>(symbol: &impl ObjectSymbol<'data>) -> Result<&'data str, LoadError> {
    symbol.name().map_err(LoadError::malformed("symbol name"))
}

/// The bytes a symbol covers; a zero size means "to the end of the section".
fn symbol_bytes<'a>(name: &str, data: &'a [u8], address: u64, size: u64) -> Result<&'a [u8], LoadError> {
    let out_of_bounds = || LoadError::Symbol {
        name: name.to_owned(),
        reason: format!("range {address}+{size} is outside its section"),
    };
    let start = usize::try_from(address).map_err(|_| out_of_bounds())?;
    let end = if size == 0 {
        data.len()
    } else {
        usize::try_from(size)
            .ok()
            .and_then(|size| start.checked_add(size))
            .ok_or_else(out_of_bounds)?
    };
    data.get(start..end).ok_or_else(out_of_bounds)
}
