//! 仿真世界
//!
//! 持有两端协议状态和它们的运行环境（信道、定时器、应用层）。协议处理函数只把
//! 副作用写进 outbox，`on_tick` 在事件处理完后统一把它们变成调度事件，
//! 这样协议状态和环境之间不存在同时可变借用。

use std::any::Any;

use tracing::{debug, info, trace};

use super::app::{AppSink, AppSource, AppStats, message_for};
use super::config::EmuConfig;
use super::events::{AppSubmit, TimerFired, WireArrival};
use super::timers::Timers;
use crate::arq::{
    AckOutcome, ArqEnv, ConfigError, EndpointId, Packet, Payload, Receiver, RecvOutcome, Sender,
    Submit,
};
use crate::chan::{Channel, Transit};
use crate::sim::{SimTime, Simulator, World};
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};

/// 应用层种子相对信道种子的偏移，使两条随机流互不相关
const APP_SEED_SALT: u64 = 0x5eed;

#[derive(Debug)]
enum Effect {
    Wire { from: EndpointId, pkt: Packet },
    Timer {
        ep: EndpointId,
        generation: u64,
        after: SimTime,
    },
}

/// 协议核心看到的环境
#[derive(Debug)]
pub(crate) struct EmuEnv {
    now: SimTime,
    pub(crate) channel: Channel,
    pub(crate) timers: Timers,
    pub(crate) source: AppSource,
    pub(crate) sink: AppSink,
    pub(crate) app: AppStats,
    pub(crate) trace: Option<TraceLogger>,
    outbox: Vec<Effect>,
}

impl EmuEnv {
    fn record(&mut self, endpoint: EndpointId, kind: TraceEventKind) {
        if let Some(t) = &mut self.trace {
            t.push(TraceEvent {
                t: self.now.0,
                endpoint,
                kind,
            });
        }
    }
}

impl ArqEnv for EmuEnv {
    fn send_on_wire(&mut self, from: EndpointId, pkt: Packet) {
        self.outbox.push(Effect::Wire { from, pkt });
    }

    fn deliver(&mut self, at: EndpointId, payload: Payload) {
        let message = self.sink.accept(payload);
        self.app.delivered += 1;
        trace!(ep = %at, message, "应用层收到消息");
        self.record(at, TraceEventKind::Deliver { message });
    }

    fn start_timer(&mut self, ep: EndpointId, duration: SimTime) {
        let generation = self.timers.start(ep);
        self.outbox.push(Effect::Timer {
            ep,
            generation,
            after: duration,
        });
    }

    fn stop_timer(&mut self, ep: EndpointId) {
        self.timers.stop(ep);
    }
}

/// 一个 A→B 单向传输的 SR 仿真世界
#[derive(Debug)]
pub struct SrWorld {
    pub(crate) sender: Sender,
    pub(crate) receiver: Receiver,
    pub(crate) env: EmuEnv,
}

impl SrWorld {
    pub fn new(cfg: &EmuConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut sender = Sender::new(EndpointId::A, cfg.arq);
        let mut receiver = Receiver::new(EndpointId::B, cfg.arq);
        sender.init();
        receiver.init();
        Ok(Self {
            sender,
            receiver,
            env: EmuEnv {
                now: SimTime::ZERO,
                channel: Channel::new(cfg.channel, cfg.seed),
                timers: Timers::default(),
                source: AppSource::new(
                    cfg.messages,
                    cfg.mean_gap,
                    cfg.seed.wrapping_add(APP_SEED_SALT),
                ),
                sink: AppSink::default(),
                app: AppStats::default(),
                trace: None,
                outbox: Vec::new(),
            },
        })
    }

    /// 打开结构化事件记录
    pub fn enable_trace(&mut self) {
        self.env.trace.get_or_insert_with(TraceLogger::default);
    }

    pub fn trace(&self) -> Option<&TraceLogger> {
        self.env.trace.as_ref()
    }

    pub fn take_trace(&mut self) -> Option<TraceLogger> {
        self.env.trace.take()
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    pub fn sink(&self) -> &AppSink {
        &self.env.sink
    }

    pub fn channel(&self) -> &Channel {
        &self.env.channel
    }

    pub fn timers(&self) -> &Timers {
        &self.env.timers
    }

    pub fn app_stats(&self) -> &AppStats {
        &self.env.app
    }

    /// 所有消息都已按序交付
    pub fn is_complete(&self) -> bool {
        self.env.app.delivered >= self.env.source.total()
    }

    /// 调度第一条应用层消息
    pub fn kick_off(&mut self, sim: &mut Simulator) {
        if self.env.source.total() == 0 {
            return;
        }
        let gap = self.env.source.next_gap();
        sim.schedule_in(gap, AppSubmit { index: 0 });
    }

    #[tracing::instrument(skip(self, sim), fields(now = ?sim.now()))]
    pub(crate) fn on_app_submit(&mut self, index: u64, sim: &mut Simulator) {
        self.env.now = sim.now();
        if index >= self.env.source.total() {
            return;
        }

        match self.sender.submit(message_for(index), &mut self.env) {
            Submit::Sent { seq } => {
                self.env.app.submitted += 1;
                self.env
                    .record(EndpointId::A, TraceEventKind::SendData { seq, message: index });
                if index + 1 < self.env.source.total() {
                    let gap = self.env.source.next_gap();
                    sim.schedule_in(gap, AppSubmit { index: index + 1 });
                }
            }
            Submit::WindowFull => {
                self.env.app.retries += 1;
                self.env
                    .record(EndpointId::A, TraceEventKind::WindowFull { message: index });
                let gap = self.env.source.next_gap();
                sim.schedule_in(gap, AppSubmit { index });
            }
        }
    }

    #[tracing::instrument(skip(self, pkt, sim), fields(now = ?sim.now(), seqnum = pkt.seqnum))]
    pub(crate) fn on_wire_arrival(&mut self, to: EndpointId, pkt: Packet, sim: &mut Simulator) {
        self.env.now = sim.now();
        match to {
            EndpointId::A => {
                let kind = match self.sender.on_ack(&pkt, &mut self.env) {
                    AckOutcome::Corrupted => TraceEventKind::CorruptDrop,
                    AckOutcome::Duplicate => TraceEventKind::DupAck { ack: pkt.acknum },
                    AckOutcome::New { seq, slid } => TraceEventKind::RecvAck { ack: seq, slid },
                };
                self.env.record(to, kind);
            }
            EndpointId::B => {
                let kind = match self.receiver.on_packet(&pkt, &mut self.env) {
                    RecvOutcome::Corrupted => TraceEventKind::CorruptDrop,
                    RecvOutcome::OutOfWindow => TraceEventKind::OutOfWindow { seq: pkt.seqnum },
                    RecvOutcome::Accepted { duplicate, .. } => TraceEventKind::Accept {
                        seq: pkt.seqnum,
                        duplicate,
                    },
                };
                self.env.record(to, kind);
            }
        }
    }

    #[tracing::instrument(skip(self, sim), fields(now = ?sim.now()))]
    pub(crate) fn on_timer_fired(&mut self, ep: EndpointId, generation: u64, sim: &mut Simulator) {
        self.env.now = sim.now();
        if !self.env.timers.fire(ep, generation) {
            trace!("已停止定时器的到期事件，忽略");
            return;
        }
        match ep {
            EndpointId::A => {
                let base = self.sender.base();
                let kind = if self.sender.on_timeout(&mut self.env) {
                    TraceEventKind::Retransmit { seq: base }
                } else {
                    TraceEventKind::StaleTimeout
                };
                self.env.record(ep, kind);
            }
            // B 从不启动定时器
            EndpointId::B => debug!("接收端没有定时器逻辑"),
        }
    }

    fn flush(&mut self, sim: &mut Simulator) {
        for effect in std::mem::take(&mut self.env.outbox) {
            match effect {
                Effect::Wire { from, pkt } => {
                    if let (EndpointId::B, Some(ack)) = (from, pkt.acknum) {
                        self.env.record(
                            from,
                            TraceEventKind::SendAck {
                                ack,
                                ack_seq: pkt.seqnum,
                            },
                        );
                    }
                    let (seq, ack) = (pkt.seqnum, pkt.acknum);
                    match self.env.channel.transmit(from, sim.now(), pkt) {
                        Transit::Lost => self.env.record(from, TraceEventKind::Lost { seq, ack }),
                        Transit::Arrives {
                            at,
                            pkt,
                            corruption,
                        } => {
                            if corruption.is_some() {
                                self.env
                                    .record(from, TraceEventKind::Corrupted { seq, ack });
                            }
                            sim.schedule(at, WireArrival { to: from.peer(), pkt });
                        }
                    }
                }
                Effect::Timer {
                    ep,
                    generation,
                    after,
                } => sim.schedule_in(after, TimerFired { ep, generation }),
            }
        }
    }
}

impl World for SrWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Simulator) {
        self.flush(sim);
        if self.is_complete() && sim.pending() == 0 {
            info!(now = ?sim.now(), "✅ 所有消息已按序交付");
        }
    }
}
