//! 校验和
//!
//! 对 seqnum、acknum 和每个载荷字节做整数求和。只有校验和可见的损坏才能被发现，
//! 碰撞导致的漏检是已知限制。

use super::packet::Packet;

/// 确认号未使用时参与校验和计算的哨兵值
pub const NOT_IN_USE: i64 = -1;

/// 计算包的校验和（不读取 `checksum` 字段本身）。
pub fn compute_checksum(pkt: &Packet) -> i64 {
    let ack = pkt.acknum.map_or(NOT_IN_USE, i64::from);
    let payload: i64 = pkt.payload.iter().map(|&b| i64::from(b)).sum();
    i64::from(pkt.seqnum) + ack + payload
}

pub fn is_corrupted(pkt: &Packet) -> bool {
    pkt.checksum != compute_checksum(pkt)
}
