//! Run a 1-out-of-4 oblivious transfer with both parties in one process.

use rand::rngs::OsRng;

use yao_gc::oblivious_transfer::ObliviousTransfer;

fn main() -> anyhow::Result<()> {
    let mut rng = OsRng;
    let ot = ObliviousTransfer::new(4);

    let messages: Vec<Vec<u8>> = ["north", "east", "south", "west"]
        .iter()
        .map(|m| m.as_bytes().to_vec())
        .collect();
    let choice = 2;

    // Receiver publishes n keys, only one of which it can open.
    let (keys, secret_key) = ot.receiver_round1(choice, &mut rng)?;

    // Sender encrypts message i under key i without learning the choice.
    let ciphertexts = ot.sender_round1(&messages, &keys, &mut rng)?;

    // Receiver opens exactly its chosen ciphertext.
    let recovered = ot.receiver_round2(choice, &secret_key, &ciphertexts)?;
    println!("chose index {}: {}", choice, String::from_utf8_lossy(&recovered));

    Ok(())
}
