//! 运行结果与统计

use serde::Serialize;
use tracing::info;

use super::app::AppStats;
use super::config::EmuConfig;
use super::timers::TimerStats;
use super::world::SrWorld;
use crate::arq::{ConfigError, Payload, ReceiverStats, SenderStats};
use crate::chan::ChannelStats;
use crate::sim::{SimTime, Simulator};
use crate::trace::TraceLogger;

/// 一次仿真的全部计数器
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmuStats {
    pub sender: SenderStats,
    pub receiver: ReceiverStats,
    pub channel: ChannelStats,
    pub timers: TimerStats,
    pub app: AppStats,
    /// 最后一个事件的时间（时间单位）
    pub end_time: f64,
    pub events: u64,
    pub complete: bool,
}

#[derive(Debug)]
pub struct EmuReport {
    pub stats: EmuStats,
    pub delivered: Vec<Payload>,
    pub finished_at: SimTime,
    pub trace: Option<TraceLogger>,
}

impl SrWorld {
    pub fn stats(&self, sim: &Simulator) -> EmuStats {
        EmuStats {
            sender: *self.sender.stats(),
            receiver: *self.receiver.stats(),
            channel: *self.env.channel.stats(),
            timers: *self.env.timers.stats(),
            app: self.env.app,
            end_time: sim.last_event_at().as_units_f64(),
            events: sim.executed(),
            complete: self.is_complete(),
        }
    }

    pub fn into_report(self, sim: &Simulator) -> EmuReport {
        let stats = self.stats(sim);
        EmuReport {
            stats,
            delivered: self.env.sink.into_delivered(),
            finished_at: sim.last_event_at(),
            trace: self.env.trace,
        }
    }
}

fn run_inner(cfg: &EmuConfig, traced: bool) -> Result<EmuReport, ConfigError> {
    let mut sim = Simulator::default();
    let mut world = SrWorld::new(cfg)?;
    if traced {
        world.enable_trace();
    }
    world.kick_off(&mut sim);
    sim.run_until(cfg.until, &mut world);

    let report = world.into_report(&sim);
    info!(
        complete = report.stats.complete,
        delivered = report.stats.app.delivered,
        retransmitted = report.stats.sender.retransmitted,
        "仿真结束"
    );
    Ok(report)
}

/// 按配置跑完一次仿真。
pub fn run(cfg: &EmuConfig) -> Result<EmuReport, ConfigError> {
    run_inner(cfg, false)
}

/// 同 [`run`]，并收集结构化事件。
pub fn run_traced(cfg: &EmuConfig) -> Result<EmuReport, ConfigError> {
    run_inner(cfg, true)
}
