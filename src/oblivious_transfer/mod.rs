//! 1-out-of-n Oblivious Transfer over the ElGamal primitive
//!
//! The sender holds n messages m_0..m_{n-1}; the receiver holds a choice
//! c in [0, n). The receiver learns m_c without revealing c, and learns
//! nothing about the other messages.
//!
//! Protocol (one round trip plus local finalization):
//!
//! 1. Receiver calls `receiver_round1(c)`: generates one keypair and
//!    publishes n public keys with the element shifted so that key c is
//!    the one whose secret the receiver holds (`Y_i = Y + (i-c)*G`).
//!    The list is sent to the sender; the secret key is kept.
//! 2. Sender calls `sender_round1(messages, keys)`: encrypts message i
//!    under key i and sends the n ciphertexts back. The shifted keys are
//!    identically distributed, so the sender cannot tell which index the
//!    receiver can open.
//! 3. Receiver calls `receiver_round2(c, sk, ciphertexts)`: decrypts
//!    ciphertext c with the retained secret key.

use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};

use crate::elgamal::{ElGamal, ElGamalCiphertext, ElGamalPublicKey, ElGamalSecretKey};
use crate::{GcError, Result};

/// 1-out-of-n oblivious transfer with n fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ObliviousTransfer {
    n: usize,
}

impl ObliviousTransfer {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Receiver round 1: build the shifted public-key list for choice `c`.
    ///
    /// Returns the n public keys to send and the secret key to retain.
    /// The same `c` must be passed to `receiver_round2` later.
    pub fn receiver_round1<R: RngCore + CryptoRng>(
        &self,
        c: usize,
        rng: &mut R,
    ) -> Result<(Vec<ElGamalPublicKey>, ElGamalSecretKey)> {
        if c >= self.n {
            return Err(GcError::ProgrammerError(format!(
                "choice {} out of range for 1-out-of-{} OT",
                c, self.n
            )));
        }
        let (pk, sk) = ElGamal::keygen(rng);
        let choice = Scalar::from(c as u64);
        let keys = (0..self.n)
            .map(|i| pk.shift(&(Scalar::from(i as u64) - choice)))
            .collect();
        Ok((keys, sk))
    }

    /// Sender round 1: encrypt message i under public key i.
    pub fn sender_round1<R: RngCore + CryptoRng>(
        &self,
        messages: &[Vec<u8>],
        keys: &[ElGamalPublicKey],
        rng: &mut R,
    ) -> Result<Vec<ElGamalCiphertext>> {
        if messages.len() != self.n || keys.len() != self.n {
            return Err(GcError::ProgrammerError(format!(
                "1-out-of-{} OT requires {} messages and keys, got {} and {}",
                self.n,
                self.n,
                messages.len(),
                keys.len()
            )));
        }
        messages
            .iter()
            .zip(keys)
            .map(|(message, key)| ElGamal::encrypt(message, key, rng))
            .collect()
    }

    /// Receiver round 2: open ciphertext `c` with the retained secret key.
    pub fn receiver_round2(
        &self,
        c: usize,
        sk: &ElGamalSecretKey,
        ciphertexts: &[ElGamalCiphertext],
    ) -> Result<Vec<u8>> {
        if c >= self.n {
            return Err(GcError::ProgrammerError(format!(
                "choice {} out of range for 1-out-of-{} OT",
                c, self.n
            )));
        }
        if ciphertexts.len() != self.n {
            return Err(GcError::SerializationError(format!(
                "expected {} ciphertexts, got {}",
                self.n,
                ciphertexts.len()
            )));
        }
        ElGamal::decrypt(&ciphertexts[c], sk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn run_ot(n: usize, c: usize, messages: Vec<Vec<u8>>) -> Vec<u8> {
        let mut rng = OsRng;
        let ot = ObliviousTransfer::new(n);
        let (keys, sk) = ot.receiver_round1(c, &mut rng).unwrap();
        let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng).unwrap();
        ot.receiver_round2(c, &sk, &ciphertexts).unwrap()
    }

    #[test]
    fn test_one_out_of_two() {
        let messages = vec![b"label zero".to_vec(), b"label one".to_vec()];
        assert_eq!(run_ot(2, 0, messages.clone()), messages[0]);
        assert_eq!(run_ot(2, 1, messages.clone()), messages[1]);
    }

    #[test]
    fn test_one_out_of_five() {
        let messages: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i; 32]).collect();
        for c in 0..5 {
            assert_eq!(run_ot(5, c, messages.clone()), messages[c]);
        }
    }

    #[test]
    fn test_wrong_index_does_not_decrypt() {
        let mut rng = OsRng;
        let ot = ObliviousTransfer::new(2);
        let messages = vec![b"message zero".to_vec(), b"message one".to_vec()];

        let (keys, sk) = ot.receiver_round1(0, &mut rng).unwrap();
        let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng).unwrap();

        // Opening the other index with the retained key yields garbage.
        let wrong = ot.receiver_round2(1, &sk, &ciphertexts).unwrap();
        assert_ne!(wrong, messages[1]);
    }

    #[test]
    fn test_choice_out_of_range_rejected() {
        let mut rng = OsRng;
        let ot = ObliviousTransfer::new(2);
        let result = ot.receiver_round1(2, &mut rng);
        assert!(matches!(result, Err(GcError::ProgrammerError(_))));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut rng = OsRng;
        let ot = ObliviousTransfer::new(2);
        let (keys, _) = ot.receiver_round1(0, &mut rng).unwrap();
        let result = ot.sender_round1(&[b"only one".to_vec()], &keys, &mut rng);
        assert!(matches!(result, Err(GcError::ProgrammerError(_))));
    }
}
