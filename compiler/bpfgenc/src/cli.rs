//! Command-line arguments of the `bpfgen` binary.
//!
//! ```text
//! bpfgen [--package <name>] [--tags <tag>]... [-o <path>] [--gofmt[=<path>]] [-v] <ident> <object.o>
//! ```

use std::path::PathBuf;

use bpfgen_fmt::gofmt::GOFMT;
use thiserror::Error;

use crate::options::Options;

pub const USAGE: &str = "\
Usage: bpfgen [options] <ident> <object.o>

Generate Go bindings that embed a compiled BPF object file.

Arguments:
  <ident>              Base identifier of the generated types
  <object.o>           BPF ELF object file, or - for stdin

Options:
  --package <name>     Go package of the generated file (default: main)
  --tags <tag>         Add a build constraint line (repeatable)
  -o <path>            Output file (default: stdout)
  --gofmt[=<path>]     Format with an external gofmt instead of the built-in formatter
  -v, --verbose        Log pipeline stages to stderr
  -h, --help           Show this help

Logging filters are read from BPFGEN_LOG.";

/// Parsed arguments for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub options: Options,
    pub object: PathBuf,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    /// External formatter, if requested.
    pub gofmt: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Generate(CliArgs),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
}

/// Parse the arguments that follow the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, UsageError> {
    let mut options = Options::default();
    let mut output = None;
    let mut gofmt = None;
    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        i += 1;

        if arg == "--" {
            positional.extend(args[i..].iter().map(|a| a.as_ref()));
            break;
        }

        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--verbose" => verbose = true,
            "--gofmt" => gofmt = Some(PathBuf::from(GOFMT)),
            "--package" | "--tags" | "-o" => {
                let value = args
                    .get(i)
                    .map(|a| a.as_ref())
                    .ok_or(UsageError::MissingValue(flag_name(arg)))?;
                i += 1;
                apply_value(arg, value, &mut options, &mut output);
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--gofmt=") {
                    gofmt = Some(PathBuf::from(path));
                } else if let Some(value) = arg.strip_prefix("--package=") {
                    options.package = value.to_owned();
                } else if let Some(value) = arg.strip_prefix("--tags=") {
                    options.tags.push(value.to_owned());
                } else if arg.starts_with('-') && arg != "-" {
                    return Err(UsageError::UnknownOption(arg.to_owned()));
                } else {
                    positional.push(arg);
                }
            }
        }
    }

    let mut positional = positional.into_iter();
    options.ident = positional
        .next()
        .ok_or(UsageError::MissingArgument("<ident>"))?
        .to_owned();
    let object = positional
        .next()
        .map(PathBuf::from)
        .ok_or(UsageError::MissingArgument("<object.o>"))?;
    if let Some(extra) = positional.next() {
        return Err(UsageError::UnexpectedArgument(extra.to_owned()));
    }

    Ok(Command::Generate(CliArgs {
        options,
        object,
        output,
        gofmt,
        verbose,
    }))
}

fn flag_name(flag: &str) -> &'static str {
    match flag {
        "--package" => "--package",
        "--tags" => "--tags",
        _ => "-o",
    }
}

fn apply_value(flag: &str, value: &str, options: &mut Options, output: &mut Option<PathBuf>) {
    match flag {
        "--package" => options.package = value.to_owned(),
        "--tags" => options.tags.push(value.to_owned()),
        _ => *output = Some(PathBuf::from(value)),
    }
}
