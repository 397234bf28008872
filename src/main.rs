//! Linspice - Linear Circuit Solver
//!
//! Solves a netlist at DC or over an AC sweep and prints the probed values.
//!
//! # Usage
//!
//! ```bash
//! linspice filter.cir
//! cat divider.txt | linspice --legacy -o report.txt
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{debug, warn};
use linspice_core::{
    analysis::SweepPolicy,
    error::{Result, SpiceError},
    netlist, report,
};

/// Linear DC/AC circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file (reads stdin when omitted or `-`)
    #[arg(value_name = "NETLIST")]
    netlist: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Read the legacy `<T> <n1> <n2> <value>` format and print the full report
    #[arg(long)]
    legacy: bool,

    /// Keep sweeping after a frequency point fails
    #[arg(long)]
    keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => netlist::read_file(path),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| SpiceError::FileReadError {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let text = read_input(args.netlist.as_ref())?;

    if args.legacy {
        let circuit = netlist::parse_legacy(&text)?;
        debug!("Legacy netlist: {} elements", circuit.len());
        return report::run_legacy(out, circuit);
    }

    let netlist = netlist::parse(&text)?;
    debug!(
        "Netlist '{}': {} elements, {} probes",
        netlist.title,
        netlist.circuit.len(),
        netlist.probes.len()
    );
    if netlist.probes.is_empty() {
        warn!("No .print probes; nothing will be reported");
    }

    let policy = if args.keep_going {
        SweepPolicy::Continue
    } else {
        SweepPolicy::Abort
    };
    report::run_netlist(out, netlist, policy)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| SpiceError::OutputError { source })?;
            let mut out = BufWriter::new(file);
            run(&args, &mut out)?;
            out.flush().map_err(|source| SpiceError::OutputError { source })
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            run(&args, &mut out)?;
            out.flush().map_err(|source| SpiceError::OutputError { source })
        }
    }
}
