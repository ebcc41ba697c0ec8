//! Collection Descriptors
//!
//! In-memory descriptions of the programs and maps found in an object file,
//! as produced by a spec loader and before anything touches a kernel.
//!
//! Descriptors are plain values: copying one is `Clone`, which yields a
//! fully independent duplicate.

use rustc_hash::FxHashMap;

/// Every program and map found in one object file.
///
/// The tables are unordered. Anything that emits code from them must sort
/// the keys first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionSpec {
    pub programs: FxHashMap<String, ProgramSpec>,
    pub maps: FxHashMap<String, MapSpec>,
}

impl CollectionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program, keyed by its name.
    ///
    /// Returns the previous descriptor with the same name, if any.
    pub fn insert_program(&mut self, spec: ProgramSpec) -> Option<ProgramSpec> {
        self.programs.insert(spec.name.clone(), spec)
    }

    /// Add a map, keyed by its name.
    ///
    /// Returns the previous descriptor with the same name, if any.
    pub fn insert_map(&mut self, spec: MapSpec) -> Option<MapSpec> {
        self.maps.insert(spec.name.clone(), spec)
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() && self.maps.is_empty()
    }
}

/// A program found in an executable section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramSpec {
    /// Symbol name of the program's entry point.
    pub name: String,
    /// ELF section the program lives in.
    pub section: String,
    pub program_type: ProgramType,
    /// Attach target encoded in the section name (`kprobe/<attach_to>`).
    pub attach_to: String,
    pub license: String,
    /// Raw instruction stream, eight bytes per instruction.
    pub instructions: Vec<u8>,
}

impl ProgramSpec {
    /// Size of one instruction in bytes.
    pub const INSTRUCTION_SIZE: usize = 8;

    pub fn instruction_count(&self) -> usize {
        self.instructions.len() / Self::INSTRUCTION_SIZE
    }
}

/// A map, either declared by the program or synthesized from a data section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapSpec {
    pub name: String,
    pub map_type: MapType,
    pub key_size: u32,
    pub value_size: u32,
    pub max_entries: u32,
    pub flags: MapFlags,
    /// Initial value contents, for maps backed by an initialized data
    /// section. `None` for `.bss`, which starts zeroed.
    pub contents: Option<Vec<u8>>,
}

bitflags::bitflags! {
    /// `BPF_F_*` map creation flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MapFlags: u32 {
        const NO_PREALLOC = 1 << 0;
        const NO_COMMON_LRU = 1 << 1;
        const NUMA_NODE = 1 << 2;
        const RDONLY = 1 << 3;
        const WRONLY = 1 << 4;
        const STACK_BUILD_ID = 1 << 5;
        const ZERO_SEED = 1 << 6;
        const RDONLY_PROG = 1 << 7;
        const WRONLY_PROG = 1 << 8;
        const CLONE = 1 << 9;
        const MMAPABLE = 1 << 10;
    }
}

/// Kernel map types (`enum bpf_map_type`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapType {
    #[default]
    Unspecified,
    Hash,
    Array,
    ProgramArray,
    PerfEventArray,
    PerCpuHash,
    PerCpuArray,
    StackTrace,
    CgroupArray,
    LruHash,
    LruPerCpuHash,
    LpmTrie,
    ArrayOfMaps,
    HashOfMaps,
    DevMap,
    SockMap,
    CpuMap,
    XskMap,
    SockHash,
    RingBuf,
    /// A type this crate has no name for.
    Other(u32),
}

impl From<u32> for MapType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => MapType::Unspecified,
            1 => MapType::Hash,
            2 => MapType::Array,
            3 => MapType::ProgramArray,
            4 => MapType::PerfEventArray,
            5 => MapType::PerCpuHash,
            6 => MapType::PerCpuArray,
            7 => MapType::StackTrace,
            8 => MapType::CgroupArray,
            9 => MapType::LruHash,
            10 => MapType::LruPerCpuHash,
            11 => MapType::LpmTrie,
            12 => MapType::ArrayOfMaps,
            13 => MapType::HashOfMaps,
            14 => MapType::DevMap,
            15 => MapType::SockMap,
            16 => MapType::CpuMap,
            17 => MapType::XskMap,
            18 => MapType::SockHash,
            27 => MapType::RingBuf,
            other => MapType::Other(other),
        }
    }
}

/// Kernel program types (`enum bpf_prog_type`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProgramType {
    #[default]
    Unspecified,
    SocketFilter,
    Kprobe,
    SchedCls,
    SchedAct,
    TracePoint,
    Xdp,
    PerfEvent,
    CgroupSkb,
    CgroupSock,
    LwtIn,
    LwtOut,
    LwtXmit,
    SockOps,
    SkSkb,
    CgroupDevice,
    SkMsg,
    RawTracepoint,
}

#[cfg(test)]
mod tests;
