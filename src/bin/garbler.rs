//! Garbler (party A) command line driver.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::rngs::OsRng;
use tracing::{info, Level};

use yao_gc::circuits::{load_assignment, load_circuit_file};
use yao_gc::protocol::{Garbler, Round1Message};
use yao_gc::transport::{connect_with_retry, read_message, send_message};

/// Garble a shared circuit under a private input assignment and run one
/// protocol exchange with a listening evaluator.
#[derive(Debug, Parser)]
#[command(name = "garbler")]
struct Args {
    /// Host the evaluator is listening on
    peer_host: String,
    /// Port the evaluator is listening on
    peer_port: u16,
    /// Shared circuit description file
    circuit_file: PathBuf,
    /// This party's input assignment file
    assignment_file: PathBuf,
    /// Emit timestamped protocol diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file = load_circuit_file(&args.circuit_file)?;
    let assignment = load_assignment(&args.assignment_file, &file.garbler_terminals)?;
    info!(
        terminals = file.circuit.terminals.len(),
        assigned = assignment.len(),
        "loaded circuit and assignment"
    );

    let garbler = Garbler::new(file, assignment)?;
    let mut stream = connect_with_retry(
        &args.peer_host,
        args.peer_port,
        20,
        Duration::from_secs(5),
    )?;

    // Round 1: evaluator's OT public keys.
    let round1: Round1Message = read_message(&mut stream)?;

    // Round 2: OT ciphertexts plus the garbled circuit.
    let round2 = garbler.round2(&round1, &mut OsRng)?;
    send_message(&mut stream, &round2)?;
    info!("garbled circuit sent, session complete");

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}
