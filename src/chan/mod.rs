//! 信道仿真
//!
//! 不可靠但保序的单向信道：包可能丢失、损坏、被延迟，但不会乱序。
//! A→B 与 B→A 两个方向各自独立保序。

mod channel;
mod stats;

pub use channel::{Channel, ChannelConfig, Corruption, Transit, CORRUPT_MARK, CORRUPT_PAYLOAD_BYTE};
pub use stats::{ChannelStats, DirectionStats};
