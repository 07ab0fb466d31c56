//! ElGamal-style public-key encryption over the Ristretto group
//!
//! Hashed ElGamal: the ephemeral shared point is hashed into a 256-bit
//! symmetric key which encrypts the message body with AES-256-CTR. The
//! public element admits the homomorphic shift `Y' = Y + delta*G` that the
//! oblivious-transfer layer relies on: shifting produces another valid
//! public key whose secret is known only to a party that knows both the
//! original secret and `delta`'s discrete-log relation.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use ctr::Ctr128BE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Result;

type Aes256Ctr = Ctr128BE<Aes256>;

/// Symmetric nonce attached to each ciphertext body.
pub const NONCE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPublicKey {
    /// Public element `Y = x*G`.
    pub element: RistrettoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElGamalSecretKey {
    /// Discrete log `x` of the public element.
    pub exponent: Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalCiphertext {
    /// Ephemeral element `r*G`.
    pub ephemeral: RistrettoPoint,
    /// Message body encrypted under SHA-256(r*Y).
    pub body: Vec<u8>,
    /// Fresh per-encryption AES-CTR nonce.
    pub nonce: [u8; NONCE_LEN],
}

pub struct ElGamal;

impl ElGamal {
    /// Generate a fresh keypair. The group fixes the security level at
    /// roughly 128 bits, so no parameter is taken beyond the RNG.
    pub fn keygen<R: RngCore + CryptoRng>(rng: &mut R) -> (ElGamalPublicKey, ElGamalSecretKey) {
        let exponent = Scalar::random(rng);
        let element = RistrettoPoint::mul_base(&exponent);
        (ElGamalPublicKey { element }, ElGamalSecretKey { exponent })
    }

    /// Encrypt a message under a public key. Probabilistic: a fresh
    /// ephemeral scalar and a fresh nonce are drawn per call.
    pub fn encrypt<R: RngCore + CryptoRng>(
        message: &[u8],
        pk: &ElGamalPublicKey,
        rng: &mut R,
    ) -> Result<ElGamalCiphertext> {
        let r = Scalar::random(rng);
        let ephemeral = RistrettoPoint::mul_base(&r);
        let shared = r * pk.element;

        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let mut body = message.to_vec();
        Self::keystream(&shared, &nonce).apply_keystream(&mut body);

        Ok(ElGamalCiphertext {
            ephemeral,
            body,
            nonce,
        })
    }

    /// Decrypt a ciphertext with the matching secret key.
    pub fn decrypt(ct: &ElGamalCiphertext, sk: &ElGamalSecretKey) -> Result<Vec<u8>> {
        let shared = sk.exponent * ct.ephemeral;
        let mut body = ct.body.clone();
        Self::keystream(&shared, &ct.nonce).apply_keystream(&mut body);
        Ok(body)
    }

    fn keystream(shared: &RistrettoPoint, nonce: &[u8; NONCE_LEN]) -> Aes256Ctr {
        let mut hasher = Sha256::new();
        hasher.update(shared.compress().as_bytes());
        let key = hasher.finalize();
        Aes256Ctr::new(&key, GenericArray::from_slice(nonce))
    }
}

impl ElGamalPublicKey {
    /// Shift the public element by `delta` on the basepoint:
    /// `Y' = Y + delta*G`.
    ///
    /// The result is a valid public key; its secret is `x + delta`, known
    /// only to a party that knows the original secret.
    pub fn shift(&self, delta: &Scalar) -> ElGamalPublicKey {
        ElGamalPublicKey {
            element: self.element + RistrettoPoint::mul_base(delta),
        }
    }
}
