//! Garbled circuit construction and evaluation

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::garbled_gate::{GarbledGate, GateOutput};
use super::{generate_label_pair, WireLabel};
use crate::circuits::{Circuit, GateKind, NodeId, Terminal};
use crate::{GcError, Result};

/// Node of a garbled circuit tree.
///
/// `Constant` appears only at the root (constant children of a gate are
/// folded into its reduced table and dropped); `Terminal` leaves are the
/// evaluator-owned input wires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GarbledNode {
    Constant(bool),
    Terminal(Terminal),
    Gate(GarbledGate),
}

/// Garbled circuit: the garbled output node plus the terminals that remain
/// live after the garbler's own inputs were fixed.
///
/// A garbled circuit is single-use. Evaluating the same instance under two
/// different label sets would expose the label-to-bit correspondence, so a
/// fresh garbling is required for every protocol run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledCircuit {
    /// Live terminals, lexicographically sorted.
    pub terminals: Vec<Terminal>,
    pub output: GarbledNode,
}

impl GarbledCircuit {
    /// Garble a circuit under the garbler's partial assignment.
    ///
    /// Terminals in `assignment` become constants folded into the gate
    /// tables; every other terminal must have a label pair in
    /// `input_labels`. The root gate is garbled without output labels so
    /// the evaluator recovers the plaintext output bit. A root that is a
    /// bare live terminal is wrapped in a garbled BUFFER gate for the same
    /// reason, and a root that folds to a constant is carried as one.
    pub fn garble<R: RngCore + CryptoRng>(
        circuit: &Circuit,
        assignment: &BTreeMap<Terminal, bool>,
        input_labels: &BTreeMap<Terminal, [WireLabel; 2]>,
        rng: &mut R,
    ) -> Result<GarbledCircuit> {
        let mut terminals: Vec<Terminal> = circuit
            .terminals
            .iter()
            .filter(|t| !assignment.contains_key(*t))
            .cloned()
            .collect();
        terminals.sort();

        let (node, labels) =
            Self::construct(circuit, circuit.output, assignment, input_labels, true, rng)?;

        let output = match (node, labels) {
            // A bare live terminal at the root: garble a BUFFER over it so
            // the evaluator can map its label back to a bit.
            (leaf @ GarbledNode::Terminal(_), Some(pair)) => GarbledNode::Gate(
                GarbledGate::garble(GateKind::Buffer, vec![leaf], &[Some(pair)], None, rng)?,
            ),
            (node, _) => node,
        };

        Ok(GarbledCircuit { terminals, output })
    }

    /// Post-order garbling walk.
    ///
    /// Returns the garbled node together with its output label pair; the
    /// pair is `None` for constants and for the root gate (plaintext
    /// output). Gates whose inputs all folded to constants fold to a
    /// constant themselves; the short-circuit laws are deliberately not
    /// applied here, so a gate with one constant and one live input keeps
    /// a (reduced) table.
    fn construct<R: RngCore + CryptoRng>(
        circuit: &Circuit,
        node: NodeId,
        assignment: &BTreeMap<Terminal, bool>,
        input_labels: &BTreeMap<Terminal, [WireLabel; 2]>,
        is_root: bool,
        rng: &mut R,
    ) -> Result<(GarbledNode, Option<[WireLabel; 2]>)> {
        match node {
            NodeId::Terminal(i) => {
                let terminal = &circuit.terminals[i];
                if let Some(&value) = assignment.get(terminal) {
                    Ok((GarbledNode::Constant(value), None))
                } else if let Some(&pair) = input_labels.get(terminal) {
                    Ok((GarbledNode::Terminal(terminal.clone()), Some(pair)))
                } else {
                    Err(GcError::MissingTerminal(terminal.name.clone()))
                }
            }
            NodeId::Gate(i) => {
                let gate = &circuit.gates[i];
                let mut children = Vec::with_capacity(gate.inputs.len());
                let mut pins = Vec::with_capacity(gate.inputs.len());
                for input in &gate.inputs {
                    let (child, pair) =
                        Self::construct(circuit, *input, assignment, input_labels, false, rng)?;
                    children.push(child);
                    pins.push(pair);
                }

                // All inputs constant: fold the gate instead of garbling.
                if let Some(index) = constant_index(&children) {
                    let value = gate.kind.truth_table()[index];
                    return Ok((GarbledNode::Constant(value), None));
                }

                let pout = if is_root {
                    None
                } else {
                    Some(generate_label_pair(rng))
                };
                let garbled =
                    GarbledGate::garble(gate.kind, children, &pins, pout.as_ref(), rng)?;
                Ok((GarbledNode::Gate(garbled), pout))
            }
        }
    }

    /// Evaluate with one label per live terminal.
    ///
    /// Walks the tree bottom-up, substituting terminal labels, decrypting
    /// one row per gate, and returning the plaintext bit from the root.
    pub fn evaluate(&self, labels: &BTreeMap<Terminal, WireLabel>) -> Result<bool> {
        match &self.output {
            GarbledNode::Constant(value) => Ok(*value),
            node => match Self::evaluate_node(node, labels)? {
                GateOutput::Bit(value) => Ok(value),
                GateOutput::Label(_) => Err(GcError::ProgrammerError(
                    "root gate produced a label instead of a bit".to_string(),
                )),
            },
        }
    }

    fn evaluate_node(
        node: &GarbledNode,
        labels: &BTreeMap<Terminal, WireLabel>,
    ) -> Result<GateOutput> {
        match node {
            GarbledNode::Constant(_) => Err(GcError::ProgrammerError(
                "constant node below a garbled gate".to_string(),
            )),
            GarbledNode::Terminal(terminal) => labels
                .get(terminal)
                .copied()
                .map(GateOutput::Label)
                .ok_or_else(|| GcError::MissingTerminal(terminal.name.clone())),
            GarbledNode::Gate(gate) => {
                let mut pins = Vec::with_capacity(gate.inputs.len());
                for input in &gate.inputs {
                    match Self::evaluate_node(input, labels)? {
                        GateOutput::Label(label) => pins.push(label),
                        GateOutput::Bit(_) => {
                            return Err(GcError::ProgrammerError(
                                "intermediate gate produced a bit".to_string(),
                            ))
                        }
                    }
                }
                gate.evaluate(&pins)
            }
        }
    }
}

/// Truth-table index formed by all-constant children, or `None` if any
/// child is live.
fn constant_index(children: &[GarbledNode]) -> Option<usize> {
    let mut index = 0;
    for (i, child) in children.iter().enumerate() {
        match child {
            GarbledNode::Constant(true) => index |= 1 << i,
            GarbledNode::Constant(false) => {}
            _ => return None,
        }
    }
    Some(index)
}
