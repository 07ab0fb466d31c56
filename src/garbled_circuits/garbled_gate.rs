//! Garbled gate construction and evaluation

use std::collections::HashMap;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use ctr::Ctr128BE;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::garbled_circuit::GarbledNode;
use super::{row_key, WireLabel, LABEL_LEN};
use crate::circuits::GateKind;
use crate::{GcError, Result};

type Aes256Ctr = Ctr128BE<Aes256>;

/// Per-row AES-CTR nonce length in bytes.
pub const ROW_NONCE_LEN: usize = 16;

/// One encrypted truth-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledRow {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; ROW_NONCE_LEN],
}

/// Encrypted truth table of one gate.
///
/// `inputs` keeps only the live (non-constant) children, in the gate's
/// original input order. The table maps each row key (SHA-256 of the
/// concatenated input labels for that row) to the encrypted row value, so
/// evaluation is a single lookup rather than a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledGate {
    pub inputs: Vec<GarbledNode>,
    pub table: HashMap<[u8; 32], GarbledRow>,
}

/// Plaintext recovered from a garbled-gate row: an output label for
/// intermediate gates, the output bit at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutput {
    Bit(bool),
    Label(WireLabel),
}

/// Project a truth table onto its non-constant inputs.
///
/// `assignments[i]` fixes input i to a constant, or leaves it free with
/// `None`. The reduced table has one entry per combination of the free
/// inputs; entry `m` equals the original table at the index merging the
/// fixed bits with the bits of `m` spread over the free positions.
pub fn reduce_truth_table(
    truth_table: &[bool],
    assignments: &[Option<bool>],
) -> Result<Vec<bool>> {
    let n = assignments.len();
    if truth_table.len() != 1 << n {
        return Err(GcError::ProgrammerError(format!(
            "truth table of length {} does not match {} inputs",
            truth_table.len(),
            n
        )));
    }

    let free_vars: Vec<usize> = (0..n).filter(|&i| assignments[i].is_none()).collect();
    let set_bits: usize = (0..n)
        .filter(|&i| assignments[i] == Some(true))
        .map(|i| 1 << i)
        .sum();

    let k = free_vars.len();
    let mut reduced = Vec::with_capacity(1 << k);
    for mask in 0..1usize << k {
        let mut full_mask = set_bits;
        for (rank, &var) in free_vars.iter().enumerate() {
            if mask & (1 << rank) != 0 {
                full_mask |= 1 << var;
            }
        }
        reduced.push(truth_table[full_mask]);
    }
    Ok(reduced)
}

impl GarbledGate {
    /// Construct a garbled gate.
    ///
    /// - `kind` supplies the truth table.
    /// - `inputs` are the already-garbled children; constant children were
    ///   fixed by the garbler's own assignment and carry no labels.
    /// - `pin[i]` is the `[label_false, label_true]` pair for live child i
    ///   (`None` for constant children).
    /// - `pout` is the output label pair, or `None` at the root where the
    ///   row plaintext is the output bit itself.
    pub fn garble<R: RngCore + CryptoRng>(
        kind: GateKind,
        inputs: Vec<GarbledNode>,
        pin: &[Option<[WireLabel; 2]>],
        pout: Option<&[WireLabel; 2]>,
        rng: &mut R,
    ) -> Result<GarbledGate> {
        if inputs.len() != kind.arity() || pin.len() != inputs.len() {
            return Err(GcError::ProgrammerError(format!(
                "{:?} gate garbled with {} inputs and {} label pairs",
                kind,
                inputs.len(),
                pin.len()
            )));
        }

        let assignments: Vec<Option<bool>> = inputs
            .iter()
            .map(|input| match input {
                GarbledNode::Constant(value) => Some(*value),
                _ => None,
            })
            .collect();
        let reduced = reduce_truth_table(kind.truth_table(), &assignments)?;

        let mut pairs = Vec::new();
        for (i, assignment) in assignments.iter().enumerate() {
            if assignment.is_none() {
                let pair = pin[i].ok_or_else(|| {
                    GcError::ProgrammerError(format!("live input {} has no label pair", i))
                })?;
                pairs.push(pair);
            }
        }

        let k = pairs.len();
        if k == 0 {
            return Err(GcError::ProgrammerError(
                "gate with no live inputs must be folded by the caller".to_string(),
            ));
        }

        let mut table = HashMap::with_capacity(1 << k);
        for mask in 0..1usize << k {
            let row_labels: Vec<WireLabel> = (0..k)
                .map(|rank| pairs[rank][(mask >> rank) & 1])
                .collect();
            let key = row_key(&row_labels);

            let mut value = match pout {
                Some(pair) => pair[reduced[mask] as usize].to_vec(),
                None => vec![reduced[mask] as u8],
            };

            let mut nonce = [0u8; ROW_NONCE_LEN];
            rng.fill_bytes(&mut nonce);
            row_cipher(&key, &nonce).apply_keystream(&mut value);

            table.insert(
                key,
                GarbledRow {
                    ciphertext: value,
                    nonce,
                },
            );
        }

        let live_inputs = inputs
            .into_iter()
            .filter(|input| !matches!(input, GarbledNode::Constant(_)))
            .collect();

        Ok(GarbledGate {
            inputs: live_inputs,
            table,
        })
    }

    /// Evaluate the gate with one label per live input, in input order.
    ///
    /// Fails with `InvalidLabel` when the derived row key is absent, which
    /// means the supplied labels are wrong or the table is corrupt.
    pub fn evaluate(&self, pin: &[WireLabel]) -> Result<GateOutput> {
        if pin.len() != self.inputs.len() {
            return Err(GcError::ProgrammerError(format!(
                "gate with {} live inputs evaluated with {} labels",
                self.inputs.len(),
                pin.len()
            )));
        }

        let key = row_key(pin);
        let row = self.table.get(&key).ok_or(GcError::InvalidLabel)?;

        let mut value = row.ciphertext.clone();
        row_cipher(&key, &row.nonce).apply_keystream(&mut value);

        match value.as_slice() {
            [0] => Ok(GateOutput::Bit(false)),
            [1] => Ok(GateOutput::Bit(true)),
            label if label.len() == LABEL_LEN => {
                let mut out = [0u8; LABEL_LEN];
                out.copy_from_slice(label);
                Ok(GateOutput::Label(out))
            }
            _ => Err(GcError::CryptographicError(
                "garbled row decrypted to an unexpected value".to_string(),
            )),
        }
    }

    /// Number of encrypted rows in the table.
    pub fn rows(&self) -> usize {
        self.table.len()
    }
}

fn row_cipher(key: &[u8; 32], nonce: &[u8; ROW_NONCE_LEN]) -> Aes256Ctr {
    Aes256Ctr::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(nonce),
    )
}
