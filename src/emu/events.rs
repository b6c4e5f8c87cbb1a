//! 仿真事件：应用层提交、包到达、定时器到期。

use super::world::SrWorld;
use crate::arq::{EndpointId, Packet};
use crate::sim::{Event, Simulator, World};

fn sr_world(world: &mut dyn World) -> &mut SrWorld {
    world
        .as_any_mut()
        .downcast_mut::<SrWorld>()
        .expect("world must be SrWorld")
}

/// 事件：应用层把第 `index` 条消息交给发送端（窗口满时会以同一 index 重新调度）
#[derive(Debug)]
pub struct AppSubmit {
    pub index: u64,
}

impl Event for AppSubmit {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AppSubmit { index } = *self;
        sr_world(world).on_app_submit(index, sim);
    }
}

/// 事件：一个包从信道到达 `to` 端
#[derive(Debug)]
pub struct WireArrival {
    pub to: EndpointId,
    pub pkt: Packet,
}

impl Event for WireArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let WireArrival { to, pkt } = *self;
        sr_world(world).on_wire_arrival(to, pkt, sim);
    }
}

/// 事件：`ep` 的定时器到期；`generation` 用来识别已被停止的定时器
#[derive(Debug)]
pub struct TimerFired {
    pub ep: EndpointId,
    pub generation: u64,
}

impl Event for TimerFired {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerFired { ep, generation } = *self;
        sr_world(world).on_timer_fired(ep, generation, sim);
    }
}
