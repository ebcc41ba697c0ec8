//! End-to-end generation from ELF objects.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use bpfgen_elf::LoadError;
use bpfgen_fmt::{CanonicalFormatter, FormatError, SourceFormatter};
use bpfgen_ir::{decode, ContextError};
use bpfgenc::{generate, GenerateError, Generator, Options};
use pretty_assertions::assert_eq;

use common::{filter_object, ElfBuilder};

const FILTER_GO: &str = r#"// Code generated by bpfgen; DO NOT EDIT.

package bpf

import (
	"bytes"
	"fmt"
	"io"

	"github.com/cilium/ebpf"
)

type FilterSpecs struct {
	ProgramXdpProg *ebpf.ProgramSpec `ebpf:"xdp_prog"`
	MapCounters    *ebpf.MapSpec     `ebpf:"counters"`
	SectionRodata  *ebpf.MapSpec     `ebpf:".rodata"`
}

func NewFilterSpecs() (*FilterSpecs, error) {
	reader := bytes.NewReader(_FilterBytes)
	spec, err := ebpf.LoadCollectionSpecFromReader(reader)
	if err != nil {
		return nil, fmt.Errorf("can't load Filter: %w", err)
	}

	specs := new(FilterSpecs)
	if err := spec.LoadAndAssign(specs, nil); err != nil {
		return nil, fmt.Errorf("can't assign Filter: %w", err)
	}

	return specs, nil
}

func (s *FilterSpecs) CollectionSpec() *ebpf.CollectionSpec {
	return &ebpf.CollectionSpec{
		Programs: map[string]*ebpf.ProgramSpec{
			"xdp_prog": s.ProgramXdpProg,
		},
		Maps: map[string]*ebpf.MapSpec{
			"counters": s.MapCounters,
			".rodata":  s.SectionRodata,
		},
	}
}

func (s *FilterSpecs) Load(opts *ebpf.CollectionOptions) (*FilterObjects, error) {
	var objs FilterObjects
	if err := s.CollectionSpec().LoadAndAssign(&objs, opts); err != nil {
		return nil, err
	}
	return &objs, nil
}

func (s *FilterSpecs) Copy() *FilterSpecs {
	return &FilterSpecs{
		ProgramXdpProg: s.ProgramXdpProg.Copy(),
		MapCounters:    s.MapCounters.Copy(),
		SectionRodata:  s.SectionRodata.Copy(),
	}
}

type FilterObjects struct {
	ProgramXdpProg *ebpf.Program `ebpf:"xdp_prog"`
	MapCounters    *ebpf.Map     `ebpf:"counters"`
	SectionRodata  *ebpf.Map     `ebpf:".rodata"`
}

func (o *FilterObjects) Close() error {
	for _, closer := range []io.Closer{
		o.ProgramXdpProg,
		o.MapCounters,
		o.SectionRodata,
	} {
		if err := closer.Close(); err != nil {
			return err
		}
	}
	return nil
}

// Do not access this directly.
"#;

/// Split the generated file into everything before the byte literal and
/// the decoded literal.
fn split_literal(source: &str) -> (&str, Vec<u8>) {
    let start = source.rfind("var _").expect("byte literal variable");
    let line = &source[start..];
    let open = line.find("[]byte(\"").expect("literal start") + "[]byte(\"".len();
    let close = line.rfind("\")").expect("literal end");
    (&source[..start], decode(&line[open..close]).unwrap())
}

#[test]
fn filter_end_to_end() {
    let elf = filter_object();
    let out = generate(&elf, &Options::new("Filter").with_package("bpf")).unwrap();

    let (head, embedded) = split_literal(&out);
    assert_eq!(head, FILTER_GO);
    assert_eq!(embedded, elf);
    assert!(out.ends_with("\")\n"));
    assert!(out[head.len()..].starts_with("var _FilterBytes = []byte(\"\\x7f\\x45\\x4c\\x46"));
    // The embedded bytes are private and named apart from every exported symbol.
    for exported in ["FilterSpecs", "NewFilterSpecs", "FilterObjects"] {
        assert!(!out.contains(&format!("_{exported}")));
    }
}

#[test]
fn output_is_deterministic() {
    let elf = ElfBuilder::new()
        .program("xdp", "xdp_b", 1)
        .program("xdp", "xdp_a", 1)
        .program("classifier", "tc_c", 3)
        .map("m3", [2, 4, 4, 1, 0])
        .map("m1", [1, 4, 8, 16, 0])
        .rodata(b"ro")
        .license("Dual MIT/GPL")
        .build();
    let options = Options::new("multi").with_package("bpf").with_tag("linux");

    let first = generate(&elf, &options).unwrap();
    for _ in 0..5 {
        assert_eq!(generate(&elf, &options).unwrap(), first);
    }
}

#[test]
fn unexported_base_keeps_names_private() {
    let out = generate(&filter_object(), &Options::new("filter").with_package("filter")).unwrap();
    assert!(out.contains("package filter\n"));
    assert!(out.contains("type filterSpecs struct {\n"));
    assert!(out.contains("func newFilterSpecs() (*filterSpecs, error) {\n"));
    assert!(out.contains("type filterObjects struct {\n"));
    assert!(out.contains("var _FilterBytes = []byte(\""));
}

#[test]
fn build_tags_lead_the_file() {
    let options = Options::new("Filter").with_tag("linux").with_tag("amd64");
    let out = generate(&filter_object(), &options).unwrap();
    assert!(out.starts_with(
        "// Code generated by bpfgen; DO NOT EDIT.\n// +build linux\n// +build amd64\n\npackage main\n"
    ));
}

#[test]
fn output_is_a_formatter_fixed_point() {
    let out = generate(&filter_object(), &Options::new("Filter")).unwrap();
    assert_eq!(CanonicalFormatter::new().format(&out).unwrap(), out);
}

#[test]
fn garbage_input_is_a_load_error() {
    let err = generate(b"definitely not an object file", &Options::new("Filter")).unwrap_err();
    assert!(matches!(err, GenerateError::Load(LoadError::NotElf)));
    assert_eq!(err.to_string(), "can't load BPF from ELF");
}

#[test]
fn invalid_base_is_a_context_error() {
    let err = generate(&filter_object(), &Options::new("9lives")).unwrap_err();
    assert!(matches!(err, GenerateError::Context(ContextError::Name(_))));
}

#[test]
fn colliding_fields_are_a_context_error() {
    let elf = ElfBuilder::new()
        .map("foo_bar", [1, 4, 4, 1, 0])
        .map("fooBar", [1, 4, 4, 1, 0])
        .build();
    let err = generate(&elf, &Options::new("Filter")).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Context(ContextError::Collision { .. })
    ));
}

#[test]
fn non_identifier_characters_stay_out_of_field_names() {
    let elf = ElfBuilder::new()
        .map("cnt²", [1, 4, 4, 1, 0])
        .map("r\u{2169}", [1, 4, 4, 1, 0])
        .build();
    let out = generate(&elf, &Options::new("Filter")).unwrap();
    assert!(out.contains("\tMapCnt *ebpf.MapSpec `ebpf:\"cnt²\"`\n"));
    assert!(out.contains("\tMapR   *ebpf.MapSpec `ebpf:\"r\u{2169}\"`\n"));
    assert!(out.contains("\t\to.MapCnt,\n"));
    assert!(!out.contains("Cnt²"));
    assert!(!out.contains("MapR\u{2169}"));
}

#[test]
fn failing_formatter_is_a_format_error() {
    struct Broken;

    impl SourceFormatter for Broken {
        fn format(&self, _: &str) -> Result<String, FormatError> {
            Err(FormatError::Unbalanced {
                line: 7,
                expected: ')',
                found: '}',
            })
        }
    }

    let generator = Generator::with_parts(bpfgen_elf::ElfSpecLoader::new(), Broken);
    let mut out = Vec::new();
    let err = generator
        .write(filter_object().as_slice(), &mut out, &Options::new("Filter"))
        .unwrap_err();
    assert!(matches!(err, GenerateError::Format(FormatError::Unbalanced { line: 7, .. })));
    assert!(out.is_empty());
}

#[test]
fn write_streams_the_same_text() {
    let elf = filter_object();
    let options = Options::new("Filter");
    let mut out = Vec::new();
    Generator::new().write(elf.as_slice(), &mut out, &options).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), generate(&elf, &options).unwrap());
}
