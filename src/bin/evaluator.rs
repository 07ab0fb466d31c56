//! Evaluator (party B) command line driver.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::OsRng;
use tracing::{info, Level};

use yao_gc::circuits::{load_assignment, load_circuit_file};
use yao_gc::protocol::{Evaluator, Round2Message};
use yao_gc::transport::{listen_once, read_message, send_message};

/// Receive input labels by oblivious transfer, evaluate the garbled
/// circuit, and print the output bit.
#[derive(Debug, Parser)]
#[command(name = "evaluator")]
struct Args {
    /// Port to listen on for the garbler
    listen_port: u16,
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
    let assignment = load_assignment(&args.assignment_file, &file.evaluator_terminals)?;
    info!(
        terminals = file.circuit.terminals.len(),
        assigned = assignment.len(),
        "loaded circuit and assignment"
    );

    let evaluator = Evaluator::new(file, assignment)?;
    let mut stream = listen_once(args.listen_port)?;

    // Round 1: send OT public keys for every evaluator terminal.
    let (round1, state) = evaluator.round1(&mut OsRng)?;
    send_message(&mut stream, &round1)?;

    // Round 2: recover labels and evaluate.
    let round2: Round2Message = read_message(&mut stream)?;
    let output = evaluator.finalize(&state, &round2)?;

    info!(output, "session complete");
    println!("output: {}", output);

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}
