//! Runs the `bpfgen` binary.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use bpfgenc::{generate, Options};
use pretty_assertions::assert_eq;

use common::filter_object;

fn bpfgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bpfgen"))
        .args(args)
        .env_remove("BPFGEN_LOG")
        .output()
        .expect("run bpfgen")
}

fn object_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&filter_object()).unwrap();
    file
}

#[test]
fn writes_to_stdout() {
    let object = object_file();
    let out = bpfgen(&["--package", "filter", "Filter", object.path().to_str().unwrap()]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let expected = generate(&filter_object(), &Options::new("Filter").with_package("filter")).unwrap();
    assert_eq!(String::from_utf8(out.stdout).unwrap(), expected);
}

#[test]
fn writes_to_a_file() {
    let object = object_file();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("filter_bpf.go");

    let out = bpfgen(&[
        "--tags",
        "linux",
        "-o",
        target.to_str().unwrap(),
        "Filter",
        object.path().to_str().unwrap(),
    ]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
    let expected = generate(&filter_object(), &Options::new("Filter").with_tag("linux")).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), expected);
}

#[test]
fn reads_the_object_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bpfgen"))
        .args(["Filter", "-"])
        .env_remove("BPFGEN_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&filter_object())
        .unwrap();
    let out = child.wait_with_output().unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let expected = generate(&filter_object(), &Options::new("Filter")).unwrap();
    assert_eq!(String::from_utf8(out.stdout).unwrap(), expected);
}

#[test]
fn failed_generation_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("garbage.o");
    fs::write(&garbage, b"not an object").unwrap();
    let target = dir.path().join("out.go");

    let out = bpfgen(&["-o", target.to_str().unwrap(), "Filter", garbage.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!target.exists());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: can't load BPF from ELF\n"), "{stderr}");
    assert!(stderr.contains("caused by:"), "{stderr}");
}

#[test]
fn missing_object_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.o");
    let out = bpfgen(&["Filter", missing.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: can't read object file\n"), "{stderr}");
}

#[test]
fn usage_errors_exit_with_one() {
    let out = bpfgen(&["Filter"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: missing <object.o>\n"), "{stderr}");
    assert!(stderr.contains("Usage: bpfgen"), "{stderr}");
}

#[test]
fn help_goes_to_stdout() {
    let out = bpfgen(&["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().starts_with("Usage: bpfgen"));
}
