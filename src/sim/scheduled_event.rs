//! 调度事件
//!
//! 队列中的一项：执行时间 + 调度序号 + 事件对象。同一时刻的事件按调度先后执行，
//! 这保证了信道上同一时刻到达的包、定时器与应用事件的处理顺序是确定的。

use super::event::Event;
use super::time::SimTime;
use std::cmp::Ordering;
use std::fmt;

pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

impl fmt::Debug for ScheduledEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("at", &self.at)
            .field("seq", &self.seq)
            .field("ev", &self.ev.label())
            .finish()
    }
}

// BinaryHeap 是 max-heap：反向比较，(at, seq) 最小者先出队。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq)).reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}
