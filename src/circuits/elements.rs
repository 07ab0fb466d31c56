//! Terminals, gate kinds and the simplification laws

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named input terminal of a circuit.
///
/// Two terminals are equal iff their names match; ordering is lexicographic
/// by name, which is the canonical order both parties use to line up OT
/// batches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Terminal {
    pub name: String,
}

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Terminal { name: name.into() }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Gate variants supported by the circuit algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    Not,
    Buffer,
    And,
    Or,
}

impl GateKind {
    /// Number of inputs the gate takes.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Not | GateKind::Buffer => 1,
            GateKind::And | GateKind::Or => 2,
        }
    }

    /// Static truth table of the gate as a list of 2^arity bits.
    ///
    /// The bit at index `m` is the output when input `i` takes the value
    /// `(m >> i) & 1` (bit 0 is the first input).
    pub fn truth_table(&self) -> &'static [bool] {
        match self {
            GateKind::Not => &[true, false],
            GateKind::Buffer => &[false, true],
            GateKind::And => &[false, false, false, true],
            GateKind::Or => &[false, true, true, true],
        }
    }

    /// Apply the constant-folding laws to already-simplified inputs.
    ///
    /// Returns a boolean when the inputs determine the output, the surviving
    /// input for the identity cases, and a structurally new gate otherwise.
    pub fn simplify(self, mut inputs: Vec<Simplified>) -> Simplified {
        match self {
            GateKind::Not => match inputs.remove(0) {
                Simplified::Constant(b) => Simplified::Constant(!b),
                other => Simplified::gate(self, vec![other]),
            },
            GateKind::Buffer => match inputs.remove(0) {
                Simplified::Constant(b) => Simplified::Constant(b),
                other => Simplified::gate(self, vec![other]),
            },
            GateKind::And => {
                let second = inputs.remove(1);
                let first = inputs.remove(0);
                match (first, second) {
                    (Simplified::Constant(a), Simplified::Constant(b)) => {
                        Simplified::Constant(a && b)
                    }
                    (Simplified::Constant(false), _) | (_, Simplified::Constant(false)) => {
                        Simplified::Constant(false)
                    }
                    (Simplified::Constant(true), other) | (other, Simplified::Constant(true)) => {
                        other
                    }
                    (a, b) => Simplified::gate(self, vec![a, b]),
                }
            }
            GateKind::Or => {
                let second = inputs.remove(1);
                let first = inputs.remove(0);
                match (first, second) {
                    (Simplified::Constant(a), Simplified::Constant(b)) => {
                        Simplified::Constant(a || b)
                    }
                    (Simplified::Constant(true), _) | (_, Simplified::Constant(true)) => {
                        Simplified::Constant(true)
                    }
                    (Simplified::Constant(false), other) | (other, Simplified::Constant(false)) => {
                        other
                    }
                    (a, b) => Simplified::gate(self, vec![a, b]),
                }
            }
        }
    }
}

/// Result of partially evaluating a circuit node: a boolean once the inputs
/// determine the output, otherwise a terminal or a residual gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Simplified {
    Constant(bool),
    Terminal(Terminal),
    Gate(Box<SimplifiedGate>),
}

/// Residual gate left over after simplification.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedGate {
    pub kind: GateKind,
    pub inputs: Vec<Simplified>,
}

impl Simplified {
    pub fn gate(kind: GateKind, inputs: Vec<Simplified>) -> Self {
        Simplified::Gate(Box::new(SimplifiedGate { kind, inputs }))
    }
}

impl fmt::Display for Simplified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Simplified::Constant(b) => write!(f, "{}", b),
            Simplified::Terminal(t) => write!(f, "{}", t),
            Simplified::Gate(g) => match g.kind {
                GateKind::Not => write!(f, "~{}", g.inputs[0]),
                GateKind::Buffer => write!(f, "{}", g.inputs[0]),
                GateKind::And => write!(f, "({} & {})", g.inputs[0], g.inputs[1]),
                GateKind::Or => write!(f, "({} | {})", g.inputs[0], g.inputs[1]),
            },
        }
    }
}
