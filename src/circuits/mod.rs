//! # 电路代数模块 (Circuit Algebra)
//!
//! 本模块实现布尔电路的代数表示、部分求值（化简）与文本解析。
//! 电路由命名端子和 NOT/BUFFER/AND/OR 门组成，只有一个输出节点。
//!
//! ## 核心概念
//!
//! ### 电路表示
//! - **端子 (Terminal)**: 命名输入线，按名字典序比较和排序
//! - **门 (Gate)**: 携带固定真值表的逻辑门，输入为端子或其他门
//! - **电路 (Circuit)**: 门节点竞技场 (arena) 加端子表，单一输出
//!
//! ### 部分求值
//! - **常量折叠**: 给定部分赋值后递归化简，返回 {布尔值, 端子, 门}
//! - **短路律**: AND(false,_)=false, OR(true,_)=true 等
//! - **纯函数**: 化简不修改电路本身
//!
//! ### 文本格式
//! - **电路文件**: 行式描述（`term`/门/`output` 行）加两行输入划分
//! - **赋值文件**: 每行 `端子名 0|1`
//!
//! ## 使用示例
//!
//! ```rust
//! use yao_gc::circuits::*;
//!
//! let circuit = parse_circuit("term a\nterm b\nand a b g\noutput g")?;
//! let mut assignment = std::collections::BTreeMap::new();
//! assignment.insert(Terminal::new("a"), true);
//!
//! // 化简到 (b)
//! let simplified = circuit.simplify(&assignment);
//! # Ok::<(), yao_gc::GcError>(())
//! ```

pub mod elements;
pub mod circuit;
pub mod parser;

pub use elements::*;
pub use circuit::*;
pub use parser::*;
