//! Command-line front end for the DUT test harness.
//!
//! Runs one program image on the reference core and reports pass or fail:
//! 1. **Image selection:** The positional argument, else `$IMG`, else the
//!    configured default path.
//! 2. **Run:** Load, reset, clock until halt or fault.
//! 3. **Exit status:** 0 when the result register is zero at halt, 1 for a bad
//!    trap, a memory fault, or an image that cannot be opened.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, process};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use dutbench_core::common::HarnessError;
use dutbench_core::common::constants::{EXIT_FAIL, IMAGE_ENV_VAR};
use dutbench_core::sim::loader;
use dutbench_core::{AddressSpace, Harness, HarnessConfig, RefCore};

#[derive(Parser, Debug)]
#[command(
    name = "dutbench",
    author,
    version,
    about = "Run a program image on an RV32 core and report HIT GOOD TRAP or HIT BAD TRAP",
    long_about = "Loads a raw little-endian image at the memory base, resets the core and \
                  clocks it until it halts or faults.\n\nThe image path is taken from the \
                  first argument, then $IMG, then the configured default.\n\nExamples:\n  \
                  dutbench build/dummy-minirv-npc.bin\n  IMG=prog.bin dutbench\n  \
                  dutbench --config harness.json prog.bin"
)]
struct Cli {
    /// Program image to load; an empty value falls through to `$IMG`.
    image: Option<OsString>,

    /// JSON harness configuration; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the instruction trace ring.
    #[arg(long)]
    no_itrace: bool,

    /// Log every executed instruction at `trace` level.
    #[arg(long)]
    trace_instructions: bool,

    /// Print run statistics to stderr at the end.
    #[arg(long)]
    stats: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            EXIT_FAIL
        }
    };
    process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Picks the image path: a non-empty argument, else a non-empty `IMG`, else
/// the configured default.
fn resolve_image(arg: Option<&OsStr>, env_value: Option<OsString>, default: &str) -> PathBuf {
    if let Some(path) = arg.filter(|a| !a.is_empty()) {
        return PathBuf::from(path);
    }
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(default),
    }
}

fn load_config(cli: &Cli) -> Result<HarnessConfig, HarnessError> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };
    if cli.no_itrace {
        config.general.itrace = false;
    }
    if cli.trace_instructions {
        config.general.trace_instructions = true;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<i32, HarnessError> {
    let config = load_config(cli)?;
    let image = resolve_image(
        cli.image.as_deref(),
        env::var_os(IMAGE_ENV_VAR),
        &config.general.default_image,
    );

    let mut mem = AddressSpace::new(&config);
    let report = loader::load_image(&image, &mut mem)?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut diag = stderr.lock();
    writeln!(out, "{report}")?;

    let mut harness = Harness::checked(&config, mem, RefCore::from_config(&config))?;
    let after = harness.reset();
    writeln!(
        out,
        "After reset: pc={:#010x} instr={:#010x}",
        after.pc, after.instr
    )?;
    out.flush()?;
    drop(out);

    let outcome = harness.run();

    let mut out = stdout.lock();
    harness.report(&outcome, &mut out, &mut diag)?;
    if !outcome.is_pass() {
        harness.dut().regs().dump(&mut diag)?;
    }
    if cli.stats {
        let mem = harness.mem();
        harness
            .stats()
            .print(&mem.stats(), mem.serial().bytes_written(), &mut diag)?;
    }
    Ok(outcome.exit_code())
}
