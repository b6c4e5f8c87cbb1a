//! 结构化事件记录
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件代替散落在控制流里的打印
//! - **只读**：由仿真世界在处理完协议事件后写入，协议核心不感知
//! - **可回放**：按时间顺序记录每个包的发送、丢失、损坏、确认与交付

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger};
