//! # 协议驱动模块 (Protocol Driver)
//!
//! 本模块把不经意传输与电路混淆组合成完整的两方协议。整个协议只有两条
//! 线上消息：
//!
//! 1. **Round 1 (B→A)**: 求值方对每个自有端子（按名字典序）运行 OT 接收方
//!    第一轮，把公钥列表发给混淆方，私钥与选择比特留在本地。
//! 2. **Round 2 (A→B)**: 混淆方为每个求值方端子生成新鲜标签对，按同样的
//!    字典序逐端子运行 OT 发送方，用自己的赋值混淆电路，把密文与混淆电路
//!    一并发回。
//! 3. **Finalize (B 本地)**: 求值方逐端子恢复恰好一个标签，求值混淆电路，
//!    得到输出比特。
//!
//! 会话状态（密钥对、标签、混淆表）归单次会话所有，会话结束即释放；
//! 混淆电路一次性使用。

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuits::{Circuit, CircuitFile, Terminal};
use crate::elgamal::{ElGamalCiphertext, ElGamalPublicKey, ElGamalSecretKey};
use crate::garbled_circuits::{generate_label_pair, GarbledCircuit, WireLabel};
use crate::oblivious_transfer::ObliviousTransfer;
use crate::{GcError, Result};

/// Round 1, evaluator to garbler: one OT public-key list per evaluator
/// terminal, outer list in lexicographic terminal order, inner length 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round1Message {
    pub keys: Vec<Vec<ElGamalPublicKey>>,
}

/// Round 2, garbler to evaluator: one OT ciphertext pair per evaluator
/// terminal (same order as round 1) plus the garbled circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round2Message {
    pub ciphertexts: Vec<Vec<ElGamalCiphertext>>,
    pub garbled_circuit: GarbledCircuit,
}

/// Party A: holds the circuit and its own partial assignment, builds the
/// garbled circuit and runs the OT sender once per evaluator terminal.
#[derive(Debug)]
pub struct Garbler {
    circuit: Circuit,
    evaluator_terminals: Vec<Terminal>,
    assignment: BTreeMap<Terminal, bool>,
}

impl Garbler {
    pub fn new(file: CircuitFile, assignment: BTreeMap<Terminal, bool>) -> Result<Self> {
        for terminal in assignment.keys() {
            if !file.garbler_terminals.contains(terminal) {
                return Err(GcError::PartitionError(format!(
                    "terminal {} does not belong to the garbler",
                    terminal
                )));
            }
        }
        let mut evaluator_terminals = file.evaluator_terminals;
        evaluator_terminals.sort();
        Ok(Garbler {
            circuit: file.circuit,
            evaluator_terminals,
            assignment,
        })
    }

    /// Consume the evaluator's round-1 keys: generate fresh label pairs,
    /// encrypt them with the OT sender per terminal in canonical order,
    /// garble the circuit, and build the reply message.
    pub fn round2<R: RngCore + CryptoRng>(
        &self,
        round1: &Round1Message,
        rng: &mut R,
    ) -> Result<Round2Message> {
        if round1.keys.len() != self.evaluator_terminals.len() {
            return Err(GcError::SerializationError(format!(
                "round 1 carries {} key lists for {} evaluator terminals",
                round1.keys.len(),
                self.evaluator_terminals.len()
            )));
        }

        let ot = ObliviousTransfer::new(2);
        let mut input_labels = BTreeMap::new();
        let mut ciphertexts = Vec::with_capacity(self.evaluator_terminals.len());

        for (terminal, keys) in self.evaluator_terminals.iter().zip(&round1.keys) {
            if keys.len() != ot.n() {
                return Err(GcError::SerializationError(format!(
                    "terminal {} carries {} OT keys, expected {}",
                    terminal,
                    keys.len(),
                    ot.n()
                )));
            }
            let pair = generate_label_pair(rng);
            let messages = vec![pair[0].to_vec(), pair[1].to_vec()];
            ciphertexts.push(ot.sender_round1(&messages, keys, rng)?);
            input_labels.insert(terminal.clone(), pair);
        }
        debug!(
            terminals = self.evaluator_terminals.len(),
            "encrypted label pairs for evaluator terminals"
        );

        let garbled_circuit =
            GarbledCircuit::garble(&self.circuit, &self.assignment, &input_labels, rng)?;
        debug!("garbled circuit constructed");

        Ok(Round2Message {
            ciphertexts,
            garbled_circuit,
        })
    }
}

/// Secrets the evaluator retains between its two calls: one OT secret key
/// per evaluator terminal, in canonical order.
#[derive(Debug)]
pub struct EvaluatorState {
    secret_keys: Vec<ElGamalSecretKey>,
}

/// Party B: runs the OT receiver for every one of its terminals, then
/// evaluates the garbled circuit with the recovered labels.
#[derive(Debug)]
pub struct Evaluator {
    evaluator_terminals: Vec<Terminal>,
    assignment: BTreeMap<Terminal, bool>,
}

impl Evaluator {
    pub fn new(file: CircuitFile, assignment: BTreeMap<Terminal, bool>) -> Result<Self> {
        for terminal in assignment.keys() {
            if !file.evaluator_terminals.contains(terminal) {
                return Err(GcError::PartitionError(format!(
                    "terminal {} does not belong to the evaluator",
                    terminal
                )));
            }
        }
        let mut evaluator_terminals = file.evaluator_terminals;
        evaluator_terminals.sort();
        Ok(Evaluator {
            evaluator_terminals,
            assignment,
        })
    }

    /// Build the round-1 message: OT receiver keys for every evaluator
    /// terminal, choice bit taken from the local assignment.
    pub fn round1<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Round1Message, EvaluatorState)> {
        let ot = ObliviousTransfer::new(2);
        let mut keys = Vec::with_capacity(self.evaluator_terminals.len());
        let mut secret_keys = Vec::with_capacity(self.evaluator_terminals.len());

        for terminal in &self.evaluator_terminals {
            let &choice = self
                .assignment
                .get(terminal)
                .ok_or_else(|| GcError::MissingTerminal(terminal.name.clone()))?;
            let (public_keys, secret_key) = ot.receiver_round1(choice as usize, rng)?;
            keys.push(public_keys);
            secret_keys.push(secret_key);
        }
        debug!(
            terminals = self.evaluator_terminals.len(),
            "prepared OT receiver keys"
        );

        Ok((Round1Message { keys }, EvaluatorState { secret_keys }))
    }

    /// Open one OT ciphertext per terminal and evaluate the garbled
    /// circuit with the recovered labels.
    pub fn finalize(&self, state: &EvaluatorState, round2: &Round2Message) -> Result<bool> {
        if round2.ciphertexts.len() != self.evaluator_terminals.len() {
            return Err(GcError::SerializationError(format!(
                "round 2 carries {} ciphertext lists for {} evaluator terminals",
                round2.ciphertexts.len(),
                self.evaluator_terminals.len()
            )));
        }

        let ot = ObliviousTransfer::new(2);
        let mut labels = BTreeMap::new();
        for ((terminal, secret_key), ciphertexts) in self
            .evaluator_terminals
            .iter()
            .zip(&state.secret_keys)
            .zip(&round2.ciphertexts)
        {
            let &choice = self
                .assignment
                .get(terminal)
                .ok_or_else(|| GcError::MissingTerminal(terminal.name.clone()))?;
            let recovered = ot.receiver_round2(choice as usize, secret_key, ciphertexts)?;
            let label: WireLabel = recovered.try_into().map_err(|_| {
                GcError::CryptographicError(format!(
                    "recovered label for terminal {} has the wrong length",
                    terminal
                ))
            })?;
            labels.insert(terminal.clone(), label);
        }
        debug!(labels = labels.len(), "recovered input labels");

        round2.garbled_circuit.evaluate(&labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::parse_circuit_file;
    use rand::rngs::OsRng;

    const AND_FILE: &str = "term a\nterm b\nand a b g\noutput g\na\nb\n";

    fn assign(pairs: &[(&str, bool)]) -> BTreeMap<Terminal, bool> {
        pairs
            .iter()
            .map(|(name, value)| (Terminal::new(*name), *value))
            .collect()
    }

    fn run(a: bool, b: bool) -> bool {
        let mut rng = OsRng;
        let file = parse_circuit_file(AND_FILE).unwrap();
        let garbler = Garbler::new(file.clone(), assign(&[("a", a)])).unwrap();
        let evaluator = Evaluator::new(file, assign(&[("b", b)])).unwrap();

        let (round1, state) = evaluator.round1(&mut rng).unwrap();
        let round2 = garbler.round2(&round1, &mut rng).unwrap();
        evaluator.finalize(&state, &round2).unwrap()
    }

    #[test]
    fn test_two_party_and() {
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(run(a, b), a && b);
            }
        }
    }

    #[test]
    fn test_assignment_outside_partition_rejected() {
        let file = parse_circuit_file(AND_FILE).unwrap();
        let result = Garbler::new(file.clone(), assign(&[("b", true)]));
        assert!(matches!(result, Err(GcError::PartitionError(_))));

        let result = Evaluator::new(file, assign(&[("a", true)]));
        assert!(matches!(result, Err(GcError::PartitionError(_))));
    }

    #[test]
    fn test_key_count_mismatch_rejected() {
        let mut rng = OsRng;
        let file = parse_circuit_file(AND_FILE).unwrap();
        let garbler = Garbler::new(file, assign(&[("a", true)])).unwrap();

        let result = garbler.round2(&Round1Message { keys: Vec::new() }, &mut rng);
        assert!(matches!(result, Err(GcError::SerializationError(_))));
    }
}
