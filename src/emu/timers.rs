//! 单定时器设施
//!
//! 每端最多一个定时器。启动/停止都会递增代号，已派发的到期事件只有在代号仍然
//! 匹配且定时器仍在运行时才算有效，其余一律视为过期丢弃。

use serde::Serialize;
use tracing::warn;

use crate::arq::EndpointId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimerStats {
    pub started: u64,
    pub stopped: u64,
    pub fired: u64,
    /// 已停止定时器的到期事件
    pub stale: u64,
    /// 在运行中再次启动或停止空闲定时器（协议实现错误，应为 0）
    pub misuse: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    running: bool,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Timers {
    a: Slot,
    b: Slot,
    stats: TimerStats,
}

impl Timers {
    fn slot_mut(&mut self, ep: EndpointId) -> &mut Slot {
        match ep {
            EndpointId::A => &mut self.a,
            EndpointId::B => &mut self.b,
        }
    }

    fn slot(&self, ep: EndpointId) -> &Slot {
        match ep {
            EndpointId::A => &self.a,
            EndpointId::B => &self.b,
        }
    }

    pub fn is_running(&self, ep: EndpointId) -> bool {
        self.slot(ep).running
    }

    pub fn stats(&self) -> &TimerStats {
        &self.stats
    }

    /// 启动定时器，返回到期事件需要携带的代号。
    pub fn start(&mut self, ep: EndpointId) -> u64 {
        let slot = self.slot_mut(ep);
        let misuse = slot.running;
        slot.running = true;
        slot.generation += 1;
        let generation = slot.generation;
        if misuse {
            self.stats.misuse += 1;
            warn!(ep = %ep, "定时器已在运行时再次启动");
        }
        self.stats.started += 1;
        generation
    }

    pub fn stop(&mut self, ep: EndpointId) {
        let slot = self.slot_mut(ep);
        if !slot.running {
            self.stats.misuse += 1;
            warn!(ep = %ep, "停止了一个未运行的定时器");
            return;
        }
        slot.running = false;
        slot.generation += 1;
        self.stats.stopped += 1;
    }

    /// 到期事件到达：有效则把定时器置为空闲并返回 true。
    pub fn fire(&mut self, ep: EndpointId, generation: u64) -> bool {
        let slot = self.slot_mut(ep);
        if !slot.running || slot.generation != generation {
            self.stats.stale += 1;
            return false;
        }
        slot.running = false;
        self.stats.fired += 1;
        true
    }
}
