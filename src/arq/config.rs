//! 协议配置
//!
//! 窗口大小 W、序号空间大小 N 与重传超时。N ≥ 2W 是正确性前提：否则接收端可能把
//! 旧的重传包误当作新包。

use crate::sim::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("window size must be at least 1")]
    ZeroWindow,
    #[error("sequence space {seq_space} is smaller than twice the window {window}")]
    SeqSpaceTooSmall { window: usize, seq_space: u32 },
    #[error("retransmission timeout must be positive")]
    ZeroTimeout,
    #[error("{name} = {value} is not a probability in [0, 1]")]
    BadProbability { name: &'static str, value: f64 },
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArqConfig {
    /// 窗口大小 W
    pub window: usize,
    /// 序号空间大小 N
    pub seq_space: u32,
    /// 重传超时（RTT）
    pub rto: SimTime,
}

impl Default for ArqConfig {
    fn default() -> Self {
        Self {
            window: 6,
            seq_space: 12,
            rto: SimTime::from_units(16),
        }
    }
}

impl ArqConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if (self.seq_space as u64) < (self.window as u64).saturating_mul(2) {
            return Err(ConfigError::SeqSpaceTooSmall {
                window: self.window,
                seq_space: self.seq_space,
            });
        }
        if self.rto == SimTime::ZERO {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
