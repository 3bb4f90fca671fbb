//! Tomasulo RV32I simulator CLI.
//!
//! This binary runs one program image to halt. It performs:
//! 1. **Loading:** Reads a hex image from a file, or standard input when the path is `-`.
//! 2. **Configuration:** Built-in defaults, an optional JSON config file, and flag overrides.
//! 3. **Run:** Steps the core until the halt instruction commits and prints the low byte of `a0`.
//! 4. **Reporting:** Optional statistics (text or JSON) and committed-PC trace files.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tomasim_core::{Config, SimResult, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    author,
    version,
    about = "Cycle-accurate Tomasulo RV32I simulator",
    long_about = "Run a hex program image on an out-of-order RV32I core until the halt \
                  instruction (0x0ff00513) commits, then print the low byte of a0.\n\n\
                  Examples:\n  tomasim program.data\n  tomasim - < program.data\n  \
                  tomasim program.data --stats --trace-pc pcs.txt"
)]
struct Cli {
    /// Program image (`@addr` lines and hex bytes); `-` reads standard input.
    image: PathBuf,

    /// JSON configuration file; omitted fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Abort if the program has not halted after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Write every committed PC to this file.
    #[arg(long)]
    trace_pc: Option<PathBuf>,

    /// Write every committed PC with its commit cycle to this file.
    #[arg(long)]
    trace_pc_cycle: Option<PathBuf>,

    /// Print run statistics to standard error.
    #[arg(
        long,
        value_enum,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "text"
    )]
    stats: Option<StatsFormat>,

    /// Increase log verbosity (-v debug, -vv trace); `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StatsFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the fmt subscriber, honouring `RUST_LOG` before `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the configuration, runs the image and writes the requested reports.
fn run(cli: &Cli) -> SimResult<u8> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if cli.max_cycles.is_some() {
        config.general.max_cycles = cli.max_cycles;
    }
    if cli.trace_pc.is_some() || cli.trace_pc_cycle.is_some() {
        config.general.trace_commits = true;
    }
    debug!(?config, "configuration");

    let mut sim = Simulator::new(&config)?;
    if cli.image.as_os_str() == "-" {
        sim.load_reader(io::stdin().lock())?;
    } else {
        sim.load_image_file(&cli.image)?;
    }

    let result = sim.run()?;

    if let Some(path) = &cli.trace_pc {
        sim.write_pc_trace(BufWriter::new(File::create(path)?), false)?;
    }
    if let Some(path) = &cli.trace_pc_cycle {
        sim.write_pc_trace(BufWriter::new(File::create(path)?), true)?;
    }
    match cli.stats {
        Some(StatsFormat::Text) => eprintln!("{}", sim.stats()),
        Some(StatsFormat::Json) => eprintln!("{}", serde_json::to_string_pretty(&sim.stats())?),
        None => {}
    }
    Ok(result)
}
