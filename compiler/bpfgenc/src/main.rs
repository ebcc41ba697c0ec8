//! bpfgen CLI
//!
//! Embeds a BPF object file in generated Go bindings.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use bpfgen_elf::ElfSpecLoader;
use bpfgen_fmt::{CanonicalFormatter, GoFmt, SourceFormatter};
use bpfgenc::cli::{parse_args, CliArgs, Command, USAGE};
use bpfgenc::{init_tracing, GenerateError, Generator, IoStage};

/// Object path that reads from stdin.
const STDIN: &str = "-";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Command::Generate(cli)) => cli,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        report(&err);
        std::process::exit(1);
    }
}

fn run(cli: &CliArgs) -> Result<(), GenerateError> {
    let formatter: Box<dyn SourceFormatter> = match &cli.gofmt {
        Some(program) => Box::new(GoFmt::with_program(program)),
        None => Box::new(CanonicalFormatter::new()),
    };
    let generator = Generator::with_parts(ElfSpecLoader::new(), formatter);

    let object = read_object(&cli.object).map_err(GenerateError::io(IoStage::ReadObject))?;

    match &cli.output {
        // The output file is only created once generation succeeded.
        Some(path) => {
            let source = generator.generate(&object, &cli.options)?;
            fs::write(path, source).map_err(GenerateError::io(IoStage::WriteOutput))
        }
        None => generator.write(object.as_slice(), io::stdout().lock(), &cli.options),
    }
}

fn read_object(path: &Path) -> io::Result<Vec<u8>> {
    if path == Path::new(STDIN) {
        let mut object = Vec::new();
        io::stdin().lock().read_to_end(&mut object)?;
        Ok(object)
    } else {
        fs::read(path)
    }
}

/// Print `err` and its chain of causes.
fn report(err: &dyn Error) {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
