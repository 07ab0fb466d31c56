//! Parse a small circuit and watch partial evaluation fold it down.

use std::collections::BTreeMap;

use yao_gc::circuits::{parse_circuit, Terminal};

fn main() -> anyhow::Result<()> {
    let description = "\
term a
term b
term c
and a b g1
not c g2
or g1 g2 g3
output g3
";
    let circuit = parse_circuit(description)?;
    println!("circuit: {}", circuit);

    // Fix a=true, b=false: ((true & false) | ~c) collapses to ~c.
    let mut assignment = BTreeMap::new();
    assignment.insert(Terminal::new("a"), true);
    assignment.insert(Terminal::new("b"), false);
    println!("with a=1, b=0: {}", circuit.simplify(&assignment));

    // Fixing c=false makes the output constant.
    let mut assignment = BTreeMap::new();
    assignment.insert(Terminal::new("c"), false);
    println!("with c=0: {}", circuit.simplify(&assignment));

    Ok(())
}
