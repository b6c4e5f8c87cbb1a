//! 仿真配置

use crate::arq::{ArqConfig, ConfigError};
use crate::chan::ChannelConfig;
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq)]
pub struct EmuConfig {
    pub arq: ArqConfig,
    pub channel: ChannelConfig,
    /// 应用层要发送的消息总数
    pub messages: u64,
    /// 相邻两条消息之间的平均间隔（指数分布）
    pub mean_gap: SimTime,
    /// 随机种子（信道与应用层各自派生独立的随机流）
    pub seed: u64,
    /// 仿真最多运行到的时间
    pub until: SimTime,
}

impl Default for EmuConfig {
    fn default() -> Self {
        Self {
            arq: ArqConfig::default(),
            channel: ChannelConfig::default(),
            messages: 20,
            mean_gap: SimTime::from_units(10),
            seed: 1234,
            until: SimTime::from_units(1_000_000),
        }
    }
}

impl EmuConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arq.validate()?;
        self.channel.validate()?;
        if self.mean_gap == SimTime::ZERO {
            return Err(ConfigError::NotPositive {
                name: "mean_gap",
                value: 0.0,
            });
        }
        Ok(())
    }
}
