use super::*;
use pretty_assertions::assert_eq;

fn counters() -> MapSpec {
    MapSpec {
        name: "counters".to_owned(),
        map_type: MapType::Hash,
        key_size: 4,
        value_size: 8,
        max_entries: 1024,
        flags: MapFlags::NO_PREALLOC,
        contents: None,
    }
}

#[test]
fn map_type_from_raw() {
    assert_eq!(MapType::from(1), MapType::Hash);
    assert_eq!(MapType::from(2), MapType::Array);
    assert_eq!(MapType::from(27), MapType::RingBuf);
    assert_eq!(MapType::from(99), MapType::Other(99));
}

#[test]
fn map_flags_keep_unknown_bits() {
    let flags = MapFlags::from_bits_retain(0x8000_0080);
    assert!(flags.contains(MapFlags::RDONLY_PROG));
    assert_eq!(flags.bits(), 0x8000_0080);
}

#[test]
fn clone_is_independent() {
    let original = counters();
    let mut copy = original.clone();
    copy.max_entries = 1;
    copy.contents = Some(vec![1, 2, 3]);
    assert_eq!(original, counters());
}

#[test]
fn insert_replaces_by_name() {
    let mut spec = CollectionSpec::new();
    assert!(spec.is_empty());
    assert_eq!(spec.insert_map(counters()), None);
    assert_eq!(spec.insert_map(counters()), Some(counters()));
    assert_eq!(spec.maps.len(), 1);
    assert!(!spec.is_empty());
}

#[test]
fn instruction_count() {
    let prog = ProgramSpec {
        name: "xdp_prog".to_owned(),
        instructions: vec![0; 24],
        ..ProgramSpec::default()
    };
    assert_eq!(prog.instruction_count(), 3);
}
