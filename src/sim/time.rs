//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。仿真以抽象的“时间单位”计时（RTT = 16.0 这类配置值），
//! 内部以千分之一时间单位的整数计数，保证事件排序是全序且可复现。

use serde::{Deserialize, Serialize};

/// 每个时间单位包含的刻度数。
pub const TICKS_PER_UNIT: u64 = 1_000;

/// 仿真时间（千分之一时间单位）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_units(units: u64) -> SimTime {
        SimTime(units.saturating_mul(TICKS_PER_UNIT))
    }

    /// 从浮点时间单位换算；负数与 NaN 视为 0，向最近的刻度取整，溢出时饱和。
    pub fn from_units_f64(units: f64) -> SimTime {
        if units.is_nan() || units <= 0.0 {
            return SimTime::ZERO;
        }
        let ticks = (units * TICKS_PER_UNIT as f64).round();
        if ticks >= u64::MAX as f64 {
            SimTime(u64::MAX)
        } else {
            SimTime(ticks as u64)
        }
    }

    pub fn as_units_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_UNIT as f64
    }

    /// `self + d`，溢出时饱和。
    pub fn after(self, d: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(d.0))
    }
}
