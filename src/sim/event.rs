//! 事件 trait
//!
//! 定义仿真事件接口：包到达、定时器到期、应用层提交消息等都实现为事件。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);

    /// 事件名称（用于日志）；默认取具体类型名。
    fn label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
