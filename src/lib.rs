//! # Yao GC - 两方安全计算 (Two-Party Secure Computation) 库
//!
//! 这是一个用 Rust 实现的两方安全函数求值库，基于 Yao 混淆电路协议和
//! 1-out-of-n 不经意传输。参与方 A（混淆方）和 B（求值方）各自持有电路输入的
//! 一部分，共同计算布尔电路的单比特输出，任何一方都无法获知对方的输入。
//!
//! ## 核心组件 (Core Components)
//!
//! ### 电路代数 (Circuit Algebra)
//! - **电路模型**: 端子 (Terminal) 与门 (NOT/BUFFER/AND/OR) 组成的布尔电路
//! - **部分求值**: 常量折叠化简，返回 {布尔值, 端子, 门} 之一
//! - **电路解析**: 从行式文本描述反序列化电路、输入划分与赋值文件
//!
//! ### 公钥原语 (Public-Key Primitive)
//! - **ElGamal 加密**: 基于 Curve25519 Ristretto 群的哈希 ElGamal 方案
//! - **公钥平移**: OT 所需的公钥元素平移运算 `Y' = Y + δ·G`
//!
//! ### 不经意传输 (Oblivious Transfer)
//! - **1-out-of-n OT**: 接收方恰好学到 n 条消息中的一条，且不泄露选择
//!
//! ### 混淆电路 (Garbled Circuits)
//! - **线标签**: 每条线两个 32 字节随机标签，分别编码 0 和 1
//! - **门混淆**: 以输入标签串接哈希为行键的加密真值表
//! - **电路求值**: 求值方逐门解密一行，在根门恢复明文输出比特
//!
//! ### 协议驱动 (Protocol Driver)
//! - **两条消息**: B→A 公钥列表，A→B 密文与混淆电路
//! - **传输层**: 带长度前缀的 bincode 帧，基于阻塞 TCP
//!
//! ## 设计原则 (Design Principles)
//!
//! 1. **半诚实模型**: 协议在 honest-but-curious 模型下保证隐私
//! 2. **一次性**: 每个混淆电路只能使用一次，标签绝不复用
//! 3. **规范顺序**: 双方按端子名字典序对齐 OT 批次
//! 4. **模块化**: 每个组件都可以独立使用与测试
//!

pub mod circuits;
pub mod elgamal;
pub mod oblivious_transfer;
pub mod garbled_circuits;
pub mod protocol;
pub mod transport;

pub use circuits::*;
pub use elgamal::*;
pub use oblivious_transfer::*;
pub use garbled_circuits::*;
pub use protocol::*;
pub use transport::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Partition error: {0}")]
    PartitionError(String),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Cryptographic error: {0}")]
    CryptographicError(String),
    #[error("Invalid label")]
    InvalidLabel,
    #[error("Missing terminal: {0}")]
    MissingTerminal(String),
    #[error("Programmer error: {0}")]
    ProgrammerError(String),
}

impl From<std::io::Error> for GcError {
    fn from(e: std::io::Error) -> Self {
        GcError::TransportError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GcError>;
