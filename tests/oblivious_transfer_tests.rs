//! 不经意传输测试
//!
//! 包含 1-out-of-n OT 正确性, 隐藏性与线上序列化相关测试

use rand::rngs::OsRng;
use yao_gc::elgamal::{ElGamal, ElGamalCiphertext, ElGamalPublicKey};
use yao_gc::oblivious_transfer::ObliviousTransfer;
use yao_gc::GcError;

// ===== Correctness =====

#[test]
fn test_every_choice_recovers_its_message() {
    let mut rng = OsRng;
    for n in 2..=5 {
        let ot = ObliviousTransfer::new(n);
        let messages: Vec<Vec<u8>> = (0..n).map(|i| vec![i as u8; 32]).collect();

        for c in 0..n {
            let (keys, sk) = ot.receiver_round1(c, &mut rng).unwrap();
            let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng).unwrap();
            let recovered = ot.receiver_round2(c, &sk, &ciphertexts).unwrap();
            assert_eq!(recovered, messages[c], "1-out-of-{} OT failed for c={}", n, c);
        }
    }
}

#[test]
fn test_messages_of_unequal_length() {
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(2);
    let messages = vec![b"short".to_vec(), b"a considerably longer message".to_vec()];

    for c in 0..2 {
        let (keys, sk) = ot.receiver_round1(c, &mut rng).unwrap();
        let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng).unwrap();
        assert_eq!(
            ot.receiver_round2(c, &sk, &ciphertexts).unwrap(),
            messages[c]
        );
    }
}

// ===== Hiding =====

#[test]
fn test_published_keys_reveal_nothing_structurally() {
    // Every published list has the same shape regardless of the choice,
    // and each entry is a well-formed public key the sender can encrypt
    // under.
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(3);

    for c in 0..3 {
        let (keys, _) = ot.receiver_round1(c, &mut rng).unwrap();
        assert_eq!(keys.len(), 3);
        for key in &keys {
            assert!(ElGamal::encrypt(b"probe", key, &mut rng).is_ok());
        }
    }
}

#[test]
fn test_unchosen_ciphertexts_stay_closed() {
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(4);
    let messages: Vec<Vec<u8>> = (0..4u8).map(|i| vec![0x40 | i; 32]).collect();

    let c = 1;
    let (keys, sk) = ot.receiver_round1(c, &mut rng).unwrap();
    let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng).unwrap();

    for other in 0..4 {
        if other == c {
            continue;
        }
        let opened = ot.receiver_round2(other, &sk, &ciphertexts).unwrap();
        assert_ne!(opened, messages[other]);
    }
}

// ===== Validation and serialization =====

#[test]
fn test_ciphertext_count_checked() {
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(2);
    let (_, sk) = ot.receiver_round1(0, &mut rng).unwrap();

    let result = ot.receiver_round2(0, &sk, &[]);
    assert!(matches!(result, Err(GcError::SerializationError(_))));
}

#[test]
fn test_keys_and_ciphertexts_survive_the_wire() {
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(2);
    let messages = vec![vec![0xAA; 32], vec![0xBB; 32]];

    let (keys, sk) = ot.receiver_round1(1, &mut rng).unwrap();

    // Keys travel B -> A.
    let key_bytes = bincode::serialize(&keys).unwrap();
    let keys_received: Vec<ElGamalPublicKey> = bincode::deserialize(&key_bytes).unwrap();
    assert_eq!(keys_received, keys);

    // Ciphertexts travel A -> B.
    let ciphertexts = ot
        .sender_round1(&messages, &keys_received, &mut rng)
        .unwrap();
    let ct_bytes = bincode::serialize(&ciphertexts).unwrap();
    let ciphertexts_received: Vec<ElGamalCiphertext> =
        bincode::deserialize(&ct_bytes).unwrap();

    let recovered = ot
        .receiver_round2(1, &sk, &ciphertexts_received)
        .unwrap();
    assert_eq!(recovered, messages[1]);
}
