//! # 混淆电路模块 (Garbled Circuits)
//!
//! 本模块实现 Yao 协议中的电路混淆与求值。混淆方为每条非常量、非自有输入的
//! 线生成一对随机标签，把每个门替换为以输入标签为密钥的加密真值表；
//! 求值方只持有每条线上与实际取值对应的那一个标签，逐门解密恰好一行，
//! 在根门恢复明文输出比特。
//!
//! ## 核心概念
//!
//! ### 线标签 (Wire Label)
//! - 32 字节均匀随机值，label[0] 编码 false，label[1] 编码 true
//! - 标签只在单次混淆中有效，绝不复用
//!
//! ### 行键 (Row Key)
//! - 按门的输入顺序串接活跃输入标签，取 SHA-256 得到 32 字节行键
//! - 行键同时用作该行的对称加密密钥，把解密能力绑定到全部输入
//!
//! ### 归约真值表 (Reduced Truth Table)
//! - 混淆方自有输入在混淆时固定为常量，表从 2^k 行缩至 2^k_live 行
//!
//! ## 安全保证
//!
//! - **隐私性**: 求值方每个门只能解开一行，其余行在标签未知时不可解
//! - **一次性**: 混淆电路重复使用会泄露标签与比特的对应关系，因此禁止

pub mod garbled_gate;
pub mod garbled_circuit;

pub use garbled_gate::*;
pub use garbled_circuit::*;

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// 线标签长度（字节）
pub const LABEL_LEN: usize = 32;

/// 线标签类型，32 字节随机值
///
/// 每条线两个标签，分别对应逻辑值 0 和 1。
pub type WireLabel = [u8; LABEL_LEN];

/// 生成一个随机线标签
pub fn generate_random_label<R: RngCore + CryptoRng>(rng: &mut R) -> WireLabel {
    let mut label = [0u8; LABEL_LEN];
    rng.fill_bytes(&mut label);
    label
}

/// 生成一对线标签：`[label_false, label_true]`
pub fn generate_label_pair<R: RngCore + CryptoRng>(rng: &mut R) -> [WireLabel; 2] {
    [generate_random_label(rng), generate_random_label(rng)]
}

/// 由输入标签串接计算行键
///
/// 按给定顺序串接标签并取 SHA-256。32 字节摘要既是查表键也是该行的
/// 对称加密密钥。
pub fn row_key(labels: &[WireLabel]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for label in labels {
        hasher.update(label);
    }
    let digest = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_labels_are_distinct() {
        let mut rng = OsRng;
        let [l0, l1] = generate_label_pair(&mut rng);
        assert_ne!(l0, l1);
    }

    #[test]
    fn test_row_key_depends_on_order() {
        let mut rng = OsRng;
        let a = generate_random_label(&mut rng);
        let b = generate_random_label(&mut rng);
        assert_ne!(row_key(&[a, b]), row_key(&[b, a]));
    }

    #[test]
    fn test_row_key_is_deterministic() {
        let a = [7u8; LABEL_LEN];
        let b = [9u8; LABEL_LEN];
        assert_eq!(row_key(&[a, b]), row_key(&[a, b]));
    }
}
