//! 数据包类型
//!
//! 线上传输单元：序号、确认号、校验和、定长载荷。校验和总是在其余字段定好之后
//! 最后计算。

use serde::Serialize;

use super::checksum::compute_checksum;

/// 每个应用消息/载荷的固定长度（字节）
pub const PAYLOAD_LEN: usize = 20;

/// ACK 包的填充载荷字节
pub const ACK_FILLER: u8 = b'0';

/// 序号（环上的下标）
pub type Seq = u32;

/// 一个应用消息的载荷
pub type Payload = [u8; PAYLOAD_LEN];

/// 线上数据包
///
/// 协议代码只通过 [`Packet::data`] / [`Packet::ack`] 构造；字段公开是为了让信道
/// 仿真可以模拟线上损坏。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    pub seqnum: Seq,
    /// `None` 表示确认号未使用（数据包）
    pub acknum: Option<Seq>,
    pub checksum: i64,
    pub payload: Payload,
}

impl Packet {
    /// 构造数据包（确认号未使用）
    pub fn data(seqnum: Seq, payload: Payload) -> Self {
        Self::sealed(seqnum, None, payload)
    }

    /// 构造确认包：`seqnum` 是 ACK 方向自己的交替位序号，`acknum` 是被确认的数据包序号
    pub fn ack(seqnum: Seq, acknum: Seq) -> Self {
        Self::sealed(seqnum, Some(acknum), [ACK_FILLER; PAYLOAD_LEN])
    }

    fn sealed(seqnum: Seq, acknum: Option<Seq>, payload: Payload) -> Self {
        let mut pkt = Packet {
            seqnum,
            acknum,
            checksum: 0,
            payload,
        };
        pkt.checksum = compute_checksum(&pkt);
        pkt
    }

    pub fn is_ack(&self) -> bool {
        self.acknum.is_some()
    }

    pub fn is_corrupted(&self) -> bool {
        super::checksum::is_corrupted(self)
    }
}
