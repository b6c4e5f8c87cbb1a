//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。所有事件严格串行执行，
//! 一个事件处理完（包括 `World::on_tick`）才会取下一个。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    last_event_at: SimTime,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 最近一个被执行事件的时间（`run_until` 会把 `now` 推到 `until`，这个值不会）
    pub fn last_event_at(&self) -> SimTime {
        self.last_event_at
    }

    /// 已执行的事件总数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 调度事件在指定时间执行；早于当前时间的请求按当前时间处理。
    #[tracing::instrument(skip(self, ev), fields(event_type = ev.label(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 调度事件在 `now + delay` 执行。
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        let at = self.now.after(delay);
        self.schedule(at, ev);
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        self.last_event_at = item.at;
        self.executed += 1;
        debug!(
            event_num = self.executed,
            event = item.ev.label(),
            now = ?self.now,
            seq = item.seq,
            remaining_queue = self.q.len(),
            "执行事件"
        );
        item.ev.execute(self, world);
        world.on_tick(self);
    }

    /// 运行直到事件队列为空或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while self.q.peek().is_some_and(|top| top.at <= until) {
            let Some(item) = self.q.pop() else {
                break;
            };
            self.step(item, world);
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let start = self.executed;
        while let Some(item) = self.q.pop() {
            self.step(item, world);
        }

        info!(
            total_events = self.executed - start,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
    }
}
