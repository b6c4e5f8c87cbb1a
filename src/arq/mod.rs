//! Selective-Repeat ARQ 协议核心
//!
//! 两端状态机（发送端窗口/重传、接收端乱序缓存/按序交付）以及双方共用的
//! 校验和与序号环运算。核心只通过 [`ArqEnv`] 与外界交互，不依赖具体的信道、
//! 定时器或应用层实现。

mod checksum;
mod config;
mod env;
mod packet;
mod receiver;
mod ring;
mod sender;
mod seq_space;

pub use checksum::{NOT_IN_USE, compute_checksum, is_corrupted};
pub use config::{ArqConfig, ConfigError};
pub use env::{ArqEnv, EndpointId};
pub use packet::{ACK_FILLER, PAYLOAD_LEN, Packet, Payload, Seq};
pub use receiver::{Receiver, ReceiverStats, RecvOutcome};
pub use ring::Ring;
pub use sender::{AckOutcome, Sender, SenderStats, Submit};
pub use seq_space::SeqSpace;
