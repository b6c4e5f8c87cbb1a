//! 仿真驱动
//!
//! 把协议核心接到事件驱动仿真器上：应用层消息源与接收端、单定时器设施、
//! 信道，以及统计与事件记录。

mod app;
mod config;
mod events;
mod report;
mod scenario;
mod timers;
mod world;

pub use app::{AppSink, AppSource, AppStats, message_for};
pub use config::EmuConfig;
pub use events::{AppSubmit, TimerFired, WireArrival};
pub use report::{EmuReport, EmuStats, run, run_traced};
pub use scenario::{ChannelSpec, ProtocolSpec, ScenarioError, ScenarioSpec};
pub use timers::{TimerStats, Timers};
pub use world::SrWorld;
