//! bpfgen Driver
//!
//! Generates Go bindings for a compiled BPF object: typed containers for its
//! programs and maps, load helpers for `github.com/cilium/ebpf`, and the
//! object itself embedded as a byte literal.
//!
//! # Example
//!
//! ```no_run
//! use bpfgenc::{generate, Options};
//!
//! let object = std::fs::read("filter.o")?;
//! let source = generate(&object, &Options::new("Filter").with_package("filter"))?;
//! std::fs::write("filter_bpf.go", source)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Once;

pub mod cli;
mod error;
mod generator;
mod options;

pub use error::{GenerateError, IoStage};
pub use generator::Generator;
pub use options::{Options, DEFAULT_PACKAGE};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "BPFGEN_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Filters come from `BPFGEN_LOG`; without it, `verbose` enables debug
/// output and otherwise nothing is installed. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = match std::env::var(LOG_ENV) {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) if verbose => EnvFilter::new("debug"),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
            .with(filter)
            .init();
    });
}

/// Generate Go bindings for `object` with the ELF loader and the built-in
/// formatter.
pub fn generate(object: &[u8], options: &Options) -> Result<String, GenerateError> {
    Generator::new().generate(object, options)
}
