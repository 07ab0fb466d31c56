//! Line-oriented parsing for circuit, partition and assignment files

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use super::circuit::{Circuit, Gate, NodeId};
use super::elements::{GateKind, Terminal};
use crate::{GcError, Result};

/// Parsed circuit file: the circuit plus the two-party input partition.
#[derive(Debug, Clone)]
pub struct CircuitFile {
    pub circuit: Circuit,
    /// Terminals owned by the garbler (A), lexicographically sorted.
    pub garbler_terminals: Vec<Terminal>,
    /// Terminals owned by the evaluator (B), lexicographically sorted.
    pub evaluator_terminals: Vec<Terminal>,
}

/// Lines that carry content: not blank, not `#` comments.
fn meaningful_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Parse the circuit description part of a file.
///
/// The description is a sequence of `term`/gate lines closed by an
/// `output <identifier>` line; everything after the output line is ignored.
pub fn parse_circuit(text: &str) -> Result<Circuit> {
    parse_description(&mut meaningful_lines(text))
}

/// Parse a complete circuit file: description plus the two partition lines
/// (garbler terminals first, then evaluator terminals).
pub fn parse_circuit_file(text: &str) -> Result<CircuitFile> {
    let mut lines = meaningful_lines(text);
    let circuit = parse_description(&mut lines)?;

    let garbler_line = lines
        .next()
        .ok_or_else(|| GcError::PartitionError("missing garbler terminal list".to_string()))?;
    let evaluator_line = lines
        .next()
        .ok_or_else(|| GcError::PartitionError("missing evaluator terminal list".to_string()))?;

    let garbler_terminals = parse_partition_line(garbler_line, &circuit)?;
    let evaluator_terminals = parse_partition_line(evaluator_line, &circuit)?;

    // Every terminal must be owned by exactly one party.
    let mut seen = BTreeSet::new();
    for terminal in garbler_terminals.iter().chain(evaluator_terminals.iter()) {
        if !seen.insert(terminal.clone()) {
            return Err(GcError::PartitionError(format!(
                "terminal {} assigned to both parties",
                terminal
            )));
        }
    }
    for terminal in &circuit.terminals {
        if !seen.contains(terminal) {
            return Err(GcError::PartitionError(format!(
                "terminal {} not assigned to either party",
                terminal
            )));
        }
    }

    Ok(CircuitFile {
        circuit,
        garbler_terminals,
        evaluator_terminals,
    })
}

fn parse_description<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Result<Circuit> {
    let mut mapper: HashMap<String, NodeId> = HashMap::new();
    let mut terminals = Vec::new();
    let mut gates = Vec::new();
    let mut output = None;

    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "term" => {
                if tokens.len() != 2 {
                    return Err(GcError::ParseError(format!(
                        "invalid terminal line: {}",
                        line
                    )));
                }
                let name = tokens[1];
                if mapper.contains_key(name) {
                    return Err(GcError::ParseError(format!("duplicate identifier: {}", name)));
                }
                mapper.insert(name.to_string(), NodeId::Terminal(terminals.len()));
                terminals.push(Terminal::new(name));
            }
            "output" => {
                if tokens.len() != 2 {
                    return Err(GcError::ParseError(format!("invalid output line: {}", line)));
                }
                let node = mapper.get(tokens[1]).ok_or_else(|| {
                    GcError::ParseError(format!("output identifier not found: {}", tokens[1]))
                })?;
                output = Some(*node);
                break;
            }
            gate_type => {
                let kind = match gate_type.to_ascii_lowercase().as_str() {
                    "and" => GateKind::And,
                    "or" => GateKind::Or,
                    "not" => GateKind::Not,
                    other => {
                        return Err(GcError::ParseError(format!("unknown gate type: {}", other)))
                    }
                };
                // <type> <in1> [<in2>] <identifier>
                if tokens.len() != kind.arity() + 2 {
                    return Err(GcError::ParseError(format!(
                        "{} gate requires exactly {} inputs: {}",
                        gate_type,
                        kind.arity(),
                        line
                    )));
                }
                let identifier = tokens[tokens.len() - 1];
                if mapper.contains_key(identifier) {
                    return Err(GcError::ParseError(format!(
                        "duplicate identifier: {}",
                        identifier
                    )));
                }
                let mut inputs = Vec::with_capacity(kind.arity());
                for token in &tokens[1..tokens.len() - 1] {
                    let node = mapper.get(*token).ok_or_else(|| {
                        GcError::ParseError(format!("input identifier not found: {}", token))
                    })?;
                    inputs.push(*node);
                }
                mapper.insert(identifier.to_string(), NodeId::Gate(gates.len()));
                gates.push(Gate { kind, inputs });
            }
        }
    }

    let output = output.ok_or_else(|| GcError::ParseError("missing output line".to_string()))?;
    Circuit::new(terminals, gates, output)
}

fn parse_partition_line(line: &str, circuit: &Circuit) -> Result<Vec<Terminal>> {
    let mut terminals = Vec::new();
    for name in line.split_whitespace() {
        let terminal = circuit.terminal(name).ok_or_else(|| {
            GcError::PartitionError(format!("unknown terminal in partition: {}", name))
        })?;
        terminals.push(terminal.clone());
    }
    terminals.sort();
    Ok(terminals)
}

/// Parse an assignment file against the caller's own partition.
///
/// One `<name> <0|1>` pair per line; every listed name must belong to
/// `allowed` and appear at most once.
pub fn parse_assignment(text: &str, allowed: &[Terminal]) -> Result<BTreeMap<Terminal, bool>> {
    let mut assignment = BTreeMap::new();
    for line in meaningful_lines(text) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(GcError::ParseError(format!(
                "invalid assignment line: {}",
                line
            )));
        }
        let terminal = Terminal::new(tokens[0]);
        if !allowed.contains(&terminal) {
            return Err(GcError::PartitionError(format!(
                "terminal {} does not belong to this party",
                terminal
            )));
        }
        let value = match tokens[1] {
            "0" => false,
            "1" => true,
            other => {
                return Err(GcError::ParseError(format!("invalid assignment: {}", other)))
            }
        };
        if assignment.insert(terminal, value).is_some() {
            return Err(GcError::ParseError(format!(
                "terminal {} already assigned",
                tokens[0]
            )));
        }
    }
    Ok(assignment)
}

/// Load and parse a circuit file from disk.
pub fn load_circuit_file(path: impl AsRef<Path>) -> Result<CircuitFile> {
    let text = fs::read_to_string(path)?;
    parse_circuit_file(&text)
}

/// Load and parse an assignment file from disk.
pub fn load_assignment(
    path: impl AsRef<Path>,
    allowed: &[Terminal],
) -> Result<BTreeMap<Terminal, bool>> {
    let text = fs::read_to_string(path)?;
    parse_assignment(&text, allowed)
}
