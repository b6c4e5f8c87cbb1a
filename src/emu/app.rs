//! 应用层：消息源与按序接收端

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::arq::{PAYLOAD_LEN, Payload};
use crate::sim::SimTime;

/// 第 `index` 条消息：20 个相同的小写字母，按 a..z 循环。
pub fn message_for(index: u64) -> Payload {
    [b'a' + (index % 26) as u8; PAYLOAD_LEN]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppStats {
    /// 被发送端接受的消息数
    pub submitted: u64,
    /// 因窗口满而重试的次数
    pub retries: u64,
    /// 按序交付的消息数
    pub delivered: u64,
    /// 交付内容与提交顺序不符的次数（正常运行应为 0）
    pub mismatched: u64,
}

/// 消息源：按指数分布的间隔产生消息；窗口满时同一条消息稍后重试。
#[derive(Debug)]
pub struct AppSource {
    total: u64,
    mean_gap: SimTime,
    rng: StdRng,
}

impl AppSource {
    pub fn new(total: u64, mean_gap: SimTime, seed: u64) -> Self {
        Self {
            total,
            mean_gap,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// 下一条消息的等待时间
    pub fn next_gap(&mut self) -> SimTime {
        // 1 - U[0,1) ∈ (0, 1]，ln 有定义
        let u: f64 = 1.0 - self.rng.gen_range(0.0..1.0);
        let units = -self.mean_gap.as_units_f64() * u.ln();
        SimTime::from_units_f64(units)
    }
}

/// 接收端应用层：记录交付顺序并与提交顺序比对。
#[derive(Debug, Default)]
pub struct AppSink {
    delivered: Vec<Payload>,
    mismatched: u64,
}

impl AppSink {
    /// 接收一条载荷，返回它在交付序列中的位置。
    pub fn accept(&mut self, payload: Payload) -> u64 {
        let index = self.delivered.len() as u64;
        if payload != message_for(index) {
            self.mismatched += 1;
        }
        self.delivered.push(payload);
        index
    }

    pub fn delivered(&self) -> &[Payload] {
        &self.delivered
    }

    pub fn mismatched(&self) -> u64 {
        self.mismatched
    }

    pub(crate) fn into_delivered(self) -> Vec<Payload> {
        self.delivered
    }
}
