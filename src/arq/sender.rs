//! 发送端（A）状态机
//!
//! - 窗口最多容纳 W 个未确认包；窗口满时拒绝新消息（背压，不是错误）
//! - 每个包单独确认（选择确认），只有从 base 开始连续被确认的前缀才会让窗口滑动
//! - 整个窗口只有一个定时器，管的是最老的未确认包；超时只重传 base 处的那一个

use serde::Serialize;
use tracing::{debug, trace};

use super::config::ArqConfig;
use super::env::{ArqEnv, EndpointId};
use super::packet::{Packet, Payload, Seq};
use super::ring::Ring;
use super::seq_space::SeqSpace;

/// 提交消息的结果
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// 已分配序号并发出
    Sent { seq: Seq },
    /// 窗口已满，调用方稍后重试
    WindowFull,
}

/// 处理一个到达的 ACK 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// 校验失败，丢弃
    Corrupted,
    /// 重复 / 窗口外 / 窗口为空时的 ACK，状态不变
    Duplicate,
    /// 新 ACK；`slid` 是窗口因此前移的格数
    New { seq: Seq, slid: usize },
}

/// 发送端计数器（只读，供统计与测试）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SenderStats {
    /// 首次发出的数据包
    pub sent: u64,
    pub retransmitted: u64,
    pub window_full: u64,
    /// 校验通过的 ACK（含重复）
    pub acks_received: u64,
    pub new_acks: u64,
    pub duplicate_acks: u64,
    pub corrupted_acks: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone)]
struct InFlight {
    pkt: Packet,
    acked: bool,
}

#[derive(Debug, Clone)]
pub struct Sender {
    id: EndpointId,
    cfg: ArqConfig,
    space: SeqSpace,
    window: Ring<InFlight>,
    next_seq: Seq,
    count: usize,
    timer_running: bool,
    stats: SenderStats,
}

impl Sender {
    /// 创建并初始化发送端。`cfg` 应已通过 [`ArqConfig::validate`]。
    pub fn new(id: EndpointId, cfg: ArqConfig) -> Self {
        Self {
            id,
            cfg,
            space: SeqSpace::new(cfg.seq_space),
            window: Ring::new(cfg.window),
            next_seq: 0,
            count: 0,
            timer_running: false,
            stats: SenderStats::default(),
        }
    }

    /// 回到初始状态：base = next_seq = count = 0，清空所有槽位。
    pub fn init(&mut self) {
        self.window.clear();
        self.next_seq = 0;
        self.count = 0;
        self.timer_running = false;
        self.stats = SenderStats::default();
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn config(&self) -> &ArqConfig {
        &self.cfg
    }

    /// 最老的未确认序号（窗口为空时等于 `next_seq`）
    pub fn base(&self) -> Seq {
        self.space.retreat(self.next_seq, self.count as u32)
    }

    pub fn next_seq(&self) -> Seq {
        self.next_seq
    }

    /// 在途（未滑出窗口）的包数
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_window_full(&self) -> bool {
        self.count >= self.cfg.window
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }

    /// 窗口内各包的序号与确认状态，按序号顺序。
    pub fn in_flight(&self) -> impl Iterator<Item = (Seq, bool)> + '_ {
        self.window
            .iter()
            .map(|(_, slot)| (slot.pkt.seqnum, slot.acked))
    }

    fn start_timer(&mut self, env: &mut dyn ArqEnv) {
        if self.timer_running {
            return;
        }
        env.start_timer(self.id, self.cfg.rto);
        self.timer_running = true;
    }

    fn stop_timer(&mut self, env: &mut dyn ArqEnv) {
        if !self.timer_running {
            return;
        }
        env.stop_timer(self.id);
        self.timer_running = false;
    }

    /// 应用层提交一条消息。
    #[tracing::instrument(skip(self, message, env), fields(ep = %self.id, next_seq = self.next_seq, count = self.count))]
    pub fn submit(&mut self, message: Payload, env: &mut dyn ArqEnv) -> Submit {
        if self.is_window_full() {
            self.stats.window_full += 1;
            debug!("发送窗口已满，拒绝新消息");
            return Submit::WindowFull;
        }

        let seq = self.next_seq;
        let pkt = Packet::data(seq, message);
        let prev = self.window.put(
            self.count,
            InFlight {
                pkt: pkt.clone(),
                acked: false,
            },
        );
        debug_assert!(prev.is_none(), "slot past the in-flight prefix must be free");
        self.count += 1;
        self.next_seq = self.space.next(self.next_seq);
        self.stats.sent += 1;

        debug!(seq, "发送数据包");
        env.send_on_wire(self.id, pkt);

        // 窗口里唯一的在途包：为它启动定时器
        if self.count == 1 {
            self.start_timer(env);
        }
        Submit::Sent { seq }
    }

    /// 收到一个来自对端的（ACK）包。
    #[tracing::instrument(skip(self, pkt, env), fields(ep = %self.id, acknum = ?pkt.acknum, base = self.base(), count = self.count))]
    pub fn on_ack(&mut self, pkt: &Packet, env: &mut dyn ArqEnv) -> AckOutcome {
        if pkt.is_corrupted() {
            self.stats.corrupted_acks += 1;
            debug!("ACK 校验失败，丢弃");
            return AckOutcome::Corrupted;
        }
        self.stats.acks_received += 1;

        let Some(ack) = pkt.acknum else {
            self.stats.duplicate_acks += 1;
            debug!("包不带确认号，忽略");
            return AckOutcome::Duplicate;
        };

        let offset = self.space.distance(self.base(), ack) as usize;
        let fresh = self.count > 0
            && offset < self.cfg.window
            && offset < self.count
            && self
                .window
                .get(offset)
                .is_some_and(|slot| !slot.acked);
        if !fresh {
            self.stats.duplicate_acks += 1;
            debug!(offset, "重复或窗口外的 ACK，忽略");
            return AckOutcome::Duplicate;
        }

        if let Some(slot) = self.window.get_mut(offset) {
            slot.acked = true;
        }
        self.stats.new_acks += 1;

        // 滑动：跳过从 base 开始连续已确认的槽位
        let mut slid = 0;
        while self.count > 0 && self.window.get(0).is_some_and(|slot| slot.acked) {
            self.window.advance_base();
            self.count -= 1;
            slid += 1;
        }
        trace!(slid, new_base = self.base(), count = self.count, "窗口滑动");

        // base 被确认：定时器改为管新的 base
        if offset == 0 {
            self.stop_timer(env);
            if self.count > 0 {
                self.start_timer(env);
            }
        }

        debug!(seq = ack, slid, "新 ACK");
        AckOutcome::New { seq: ack, slid }
    }

    /// 定时器到期。返回是否发生了重传。
    #[tracing::instrument(skip(self, env), fields(ep = %self.id, base = self.base(), count = self.count))]
    pub fn on_timeout(&mut self, env: &mut dyn ArqEnv) -> bool {
        // 到期即失效
        self.timer_running = false;
        self.stats.timeouts += 1;

        let Some(pkt) = self.window.get(0).map(|slot| slot.pkt.clone()) else {
            debug!("窗口为空，忽略过期的定时器");
            return false;
        };
        if self.count == 0 {
            return false;
        }

        self.stats.retransmitted += 1;
        debug!(seq = pkt.seqnum, "超时，重传 base 处的包");
        env.send_on_wire(self.id, pkt);
        self.start_timer(env);
        true
    }
}
