//! # 电路表示和部分求值
//!
//! 本模块定义布尔电路的竞技场 (arena) 表示和化简操作。门节点按拓扑序存放，
//! 通过整数索引引用端子表或更早的门节点。电路作为树遍历：若文本形式中存在
//! 共享子表达式，每次出现都会被独立求值。

use std::collections::BTreeMap;
use std::fmt;

use super::elements::{GateKind, Simplified, Terminal};
use crate::{GcError, Result};

/// 节点引用：端子表或门竞技场中的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Terminal(usize),
    Gate(usize),
}

/// 逻辑门节点
///
/// 输入按顺序引用端子或更早定义的门。
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub kind: GateKind,
    pub inputs: Vec<NodeId>,
}

/// 布尔电路
///
/// 由端子表、拓扑序的门竞技场和单一输出节点组成。
/// 不变量：每个门的所有传递输入都在端子表中。
#[derive(Debug, Clone)]
pub struct Circuit {
    pub terminals: Vec<Terminal>,
    pub gates: Vec<Gate>,
    pub output: NodeId,
}

impl Circuit {
    /// 构造电路并校验结构不变量
    ///
    /// 检查每个门的元数与输入引用：门只能引用端子或更早的门，
    /// 保证竞技场是拓扑序且无环。
    pub fn new(terminals: Vec<Terminal>, gates: Vec<Gate>, output: NodeId) -> Result<Self> {
        for (idx, gate) in gates.iter().enumerate() {
            if gate.inputs.len() != gate.kind.arity() {
                return Err(GcError::ProgrammerError(format!(
                    "{:?} gate expects {} inputs, got {}",
                    gate.kind,
                    gate.kind.arity(),
                    gate.inputs.len()
                )));
            }
            for input in &gate.inputs {
                if !Self::reference_ok(*input, terminals.len(), idx) {
                    return Err(GcError::ProgrammerError(format!(
                        "gate {} references invalid node {:?}",
                        idx, input
                    )));
                }
            }
        }
        if !Self::reference_ok(output, terminals.len(), gates.len()) {
            return Err(GcError::ProgrammerError(format!(
                "output references invalid node {:?}",
                output
            )));
        }
        Ok(Circuit {
            terminals,
            gates,
            output,
        })
    }

    fn reference_ok(node: NodeId, terminal_count: usize, gate_limit: usize) -> bool {
        match node {
            NodeId::Terminal(i) => i < terminal_count,
            NodeId::Gate(i) => i < gate_limit,
        }
    }

    /// 按名查找端子
    pub fn terminal(&self, name: &str) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.name == name)
    }

    /// 对电路做部分求值（化简）
    ///
    /// 给定部分赋值后递归常量折叠。返回布尔值、端子或化简后的门，
    /// 不修改电路本身。
    ///
    /// # 参数
    ///
    /// * `assignment` - 端子到布尔值的部分映射
    ///
    /// # 返回值
    ///
    /// 化简结果：全部输入确定时为 `Constant`，否则为残余端子或门
    pub fn simplify(&self, assignment: &BTreeMap<Terminal, bool>) -> Simplified {
        self.simplify_node(self.output, assignment)
    }

    fn simplify_node(&self, node: NodeId, assignment: &BTreeMap<Terminal, bool>) -> Simplified {
        match node {
            NodeId::Terminal(i) => {
                let terminal = &self.terminals[i];
                match assignment.get(terminal) {
                    Some(&value) => Simplified::Constant(value),
                    None => Simplified::Terminal(terminal.clone()),
                }
            }
            NodeId::Gate(i) => {
                let gate = &self.gates[i];
                let inputs = gate
                    .inputs
                    .iter()
                    .map(|input| self.simplify_node(*input, assignment))
                    .collect();
                gate.kind.simplify(inputs)
            }
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simplify(&BTreeMap::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ((a & b) | ~c)
    fn sample_circuit() -> Circuit {
        let terminals = vec![Terminal::new("a"), Terminal::new("b"), Terminal::new("c")];
        let gates = vec![
            Gate {
                kind: GateKind::And,
                inputs: vec![NodeId::Terminal(0), NodeId::Terminal(1)],
            },
            Gate {
                kind: GateKind::Not,
                inputs: vec![NodeId::Terminal(2)],
            },
            Gate {
                kind: GateKind::Or,
                inputs: vec![NodeId::Gate(0), NodeId::Gate(1)],
            },
        ];
        Circuit::new(terminals, gates, NodeId::Gate(2)).unwrap()
    }

    fn assign(pairs: &[(&str, bool)]) -> BTreeMap<Terminal, bool> {
        pairs
            .iter()
            .map(|(name, value)| (Terminal::new(*name), *value))
            .collect()
    }

    #[test]
    fn test_simplify_to_constant() {
        let circuit = sample_circuit();
        // ((a & b) | ~false) = true
        let result = circuit.simplify(&assign(&[("c", false)]));
        assert_eq!(result, Simplified::Constant(true));
    }

    #[test]
    fn test_simplify_to_terminal() {
        let circuit = sample_circuit();
        // ((true & b) | ~true) = b
        let result = circuit.simplify(&assign(&[("a", true), ("c", true)]));
        assert_eq!(result, Simplified::Terminal(Terminal::new("b")));
    }

    #[test]
    fn test_simplify_to_residual_gate() {
        let circuit = sample_circuit();
        // ((true & false) | ~c) = ~c
        let result = circuit.simplify(&assign(&[("a", true), ("b", false)]));
        assert_eq!(
            result,
            Simplified::gate(
                GateKind::Not,
                vec![Simplified::Terminal(Terminal::new("c"))]
            )
        );
    }

    #[test]
    fn test_simplify_is_pure() {
        let circuit = sample_circuit();
        let assignment = assign(&[("a", true)]);
        let first = circuit.simplify(&assignment);
        let second = circuit.simplify(&assignment);
        assert_eq!(first, second);
        assert_eq!(circuit.terminals.len(), 3);
        assert_eq!(circuit.gates.len(), 3);
    }

    #[test]
    fn test_total_assignment_matches_plain_evaluation() {
        let circuit = sample_circuit();
        for mask in 0..8u32 {
            let a = mask & 1 != 0;
            let b = mask & 2 != 0;
            let c = mask & 4 != 0;
            let expected = (a && b) || !c;
            let result = circuit.simplify(&assign(&[("a", a), ("b", b), ("c", c)]));
            assert_eq!(result, Simplified::Constant(expected));
        }
    }

    #[test]
    fn test_invalid_gate_reference_rejected() {
        let gates = vec![Gate {
            kind: GateKind::Not,
            inputs: vec![NodeId::Terminal(3)],
        }];
        let result = Circuit::new(vec![Terminal::new("a")], gates, NodeId::Gate(0));
        assert!(matches!(result, Err(GcError::ProgrammerError(_))));
    }

    #[test]
    fn test_display_renders_expression() {
        let circuit = sample_circuit();
        assert_eq!(circuit.to_string(), "((a & b) | ~c)");
    }
}
