//! 信道
//!
//! 每个方向记录最后一个包的到达时间，新包的到达时间不早于它，从而保证不乱序：
//! `arrive = max(now, last_arrive) + min_delay + U[0, max_extra_delay)`。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::stats::ChannelStats;
use crate::arq::{ConfigError, EndpointId, Packet};
use crate::sim::SimTime;

/// 损坏载荷时写入的字节
pub const CORRUPT_PAYLOAD_BYTE: u8 = b'z';
/// 损坏序号/确认号时写入的值
pub const CORRUPT_MARK: u32 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// 丢包概率
    pub loss_prob: f64,
    /// 损坏概率（对未丢失的包）
    pub corrupt_prob: f64,
    /// 最小单向时延
    pub min_delay: SimTime,
    /// 额外随机时延的上界
    pub max_extra_delay: SimTime,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            min_delay: SimTime::from_units(1),
            max_extra_delay: SimTime::from_units(9),
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("loss_prob", self.loss_prob), ("corrupt_prob", self.corrupt_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BadProbability { name, value });
            }
        }
        Ok(())
    }
}

/// 损坏方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    Payload,
    SeqNum,
    AckNum,
}

impl Corruption {
    pub fn apply(self, pkt: &mut Packet) {
        match self {
            Corruption::Payload => pkt.payload[0] = CORRUPT_PAYLOAD_BYTE,
            Corruption::SeqNum => pkt.seqnum = CORRUPT_MARK,
            Corruption::AckNum => pkt.acknum = Some(CORRUPT_MARK),
        }
    }
}

/// 一次发送在信道上的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transit {
    Lost,
    Arrives {
        at: SimTime,
        pkt: Packet,
        corruption: Option<Corruption>,
    },
}

#[derive(Debug)]
pub struct Channel {
    cfg: ChannelConfig,
    rng: StdRng,
    last_arrival_a_to_b: SimTime,
    last_arrival_b_to_a: SimTime,
    stats: ChannelStats,
}

impl Channel {
    pub fn new(cfg: ChannelConfig, seed: u64) -> Self {
        Self {
            cfg,
            rng: StdRng::seed_from_u64(seed),
            last_arrival_a_to_b: SimTime::ZERO,
            last_arrival_b_to_a: SimTime::ZERO,
            stats: ChannelStats::default(),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.cfg
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    fn chance(&mut self, p: f64) -> bool {
        p > 0.0 && self.rng.gen_range(0.0..1.0) < p
    }

    fn pick_corruption(&mut self) -> Corruption {
        let x: f64 = self.rng.gen_range(0.0..1.0);
        if x < 0.75 {
            Corruption::Payload
        } else if x < 0.875 {
            Corruption::SeqNum
        } else {
            Corruption::AckNum
        }
    }

    fn last_arrival_mut(&mut self, from: EndpointId) -> &mut SimTime {
        match from {
            EndpointId::A => &mut self.last_arrival_a_to_b,
            EndpointId::B => &mut self.last_arrival_b_to_a,
        }
    }

    /// 把 `pkt` 交给信道，返回它的结局。
    #[tracing::instrument(skip(self, pkt), fields(from = %from, seqnum = pkt.seqnum, acknum = ?pkt.acknum))]
    pub fn transmit(&mut self, from: EndpointId, now: SimTime, mut pkt: Packet) -> Transit {
        self.stats.from_side_mut(from).offered += 1;

        if self.chance(self.cfg.loss_prob) {
            self.stats.from_side_mut(from).lost += 1;
            debug!("📉 信道丢包");
            return Transit::Lost;
        }

        let corruption = if self.chance(self.cfg.corrupt_prob) {
            let how = self.pick_corruption();
            how.apply(&mut pkt);
            self.stats.from_side_mut(from).corrupted += 1;
            debug!(how = ?how, "信道损坏数据包");
            Some(how)
        } else {
            None
        };

        let extra = match self.cfg.max_extra_delay.0 {
            0 => SimTime::ZERO,
            max => SimTime(self.rng.gen_range(0..max)),
        };
        let min_delay = self.cfg.min_delay;
        let last = self.last_arrival_mut(from);
        let at = now.max(*last).after(min_delay).after(extra);
        *last = at;

        trace!(now = ?now, at = ?at, "计算到达时间");
        Transit::Arrives {
            at,
            pkt,
            corruption,
        }
    }
}
