//! 世界 trait
//!
//! 定义仿真世界接口。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现（例如两端协议状态 + 信道 + 定时器）。
///
/// 事件通过 `as_any_mut` 向下转型拿到具体世界；`on_tick` 在每个事件执行完后调用，
/// 世界可以在这里把事件处理期间积攒的副作用（发包、启停定时器）转成新的调度事件。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
