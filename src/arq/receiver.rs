//! 接收端（B）状态机
//!
//! 窗口内的包先缓存，凑齐从 base 开始的连续一段就按序交付给应用层；
//! 每个校验通过的包（不论是否在窗口内）都回一个 ACK，acknum 就是它的序号。
//! 损坏的包直接丢弃且不回 ACK，恢复完全依赖发送端超时。

use serde::Serialize;
use tracing::{debug, trace};

use super::config::ArqConfig;
use super::env::{ArqEnv, EndpointId};
use super::packet::{Packet, Seq};
use super::ring::Ring;
use super::seq_space::SeqSpace;

/// ACK 方向交替位序号的初始值
const FIRST_ACK_SEQ: Seq = 1;

/// 处理一个数据包的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// 校验失败，丢弃，未回 ACK
    Corrupted,
    /// 不在接收窗口内（通常是对端没收到早先 ACK 而重传的旧包）；已回 ACK，未缓存
    OutOfWindow,
    /// 已缓存；`delivered` 是本次交付给应用层的包数
    Accepted { delivered: usize, duplicate: bool },
}

/// 接收端计数器（只读，供统计与测试）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceiverStats {
    /// 校验通过的数据包
    pub received: u64,
    pub corrupted: u64,
    pub out_of_window: u64,
    /// 窗口内重复到达（覆盖已占用槽位）
    pub duplicates: u64,
    pub delivered: u64,
    pub acks_sent: u64,
}

#[derive(Debug, Clone)]
pub struct Receiver {
    id: EndpointId,
    cfg: ArqConfig,
    space: SeqSpace,
    base: Seq,
    window: Ring<Packet>,
    ack_seq: Seq,
    stats: ReceiverStats,
}

impl Receiver {
    /// 创建并初始化接收端。`cfg` 应已通过 [`ArqConfig::validate`]。
    pub fn new(id: EndpointId, cfg: ArqConfig) -> Self {
        Self {
            id,
            cfg,
            space: SeqSpace::new(cfg.seq_space),
            base: 0,
            window: Ring::new(cfg.window),
            ack_seq: FIRST_ACK_SEQ,
            stats: ReceiverStats::default(),
        }
    }

    pub fn init(&mut self) {
        self.base = 0;
        self.window.clear();
        self.ack_seq = FIRST_ACK_SEQ;
        self.stats = ReceiverStats::default();
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// 下一个等待按序交付的序号
    pub fn base(&self) -> Seq {
        self.base
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// 已缓存、尚未交付的包的序号，按相对 base 的偏移顺序。
    pub fn buffered(&self) -> Vec<Seq> {
        self.window.iter().map(|(_, pkt)| pkt.seqnum).collect()
    }

    #[tracing::instrument(skip(self, pkt, env), fields(ep = %self.id, seqnum = pkt.seqnum, base = self.base))]
    pub fn on_packet(&mut self, pkt: &Packet, env: &mut dyn ArqEnv) -> RecvOutcome {
        if pkt.is_corrupted() {
            self.stats.corrupted += 1;
            debug!("数据包校验失败，丢弃");
            return RecvOutcome::Corrupted;
        }
        self.stats.received += 1;

        let offset = self.space.distance(self.base, pkt.seqnum) as usize;
        let outcome = if offset >= self.cfg.window {
            self.stats.out_of_window += 1;
            debug!(offset, "窗口外的包，只回 ACK");
            RecvOutcome::OutOfWindow
        } else {
            let duplicate = self.window.put(offset, pkt.clone()).is_some();
            if duplicate {
                self.stats.duplicates += 1;
            }
            trace!(offset, duplicate, "缓存数据包");

            // 交付从 base 开始的连续一段，遇到第一个空洞停止
            let mut delivered = 0;
            while let Some(ready) = self.window.pop_front() {
                debug!(seq = ready.seqnum, "按序交付给应用层");
                env.deliver(self.id, ready.payload);
                self.base = self.space.next(self.base);
                delivered += 1;
            }
            self.stats.delivered += delivered as u64;
            RecvOutcome::Accepted {
                delivered,
                duplicate,
            }
        };

        self.send_ack(pkt.seqnum, env);
        outcome
    }

    fn send_ack(&mut self, acknum: Seq, env: &mut dyn ArqEnv) {
        let ack = Packet::ack(self.ack_seq, acknum);
        self.ack_seq ^= 1;
        self.stats.acks_sent += 1;
        debug!(acknum, ack_seq = ack.seqnum, "发送 ACK");
        env.send_on_wire(self.id, ack);
    }
}
