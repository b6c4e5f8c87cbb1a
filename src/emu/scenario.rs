//! 场景文件（JSON）
//!
//! 所有字段都可省略，省略时沿用 [`EmuConfig::default`]；时间以浮点“时间单位”书写。
//!
//! ```json
//! {
//!     "protocol": { "window": 6, "seq_space": 12, "rto": 16.0 },
//!     "channel": { "loss_prob": 0.2, "corrupt_prob": 0.2 },
//!     "messages": 1000,
//!     "mean_gap": 10.0,
//!     "seed": 7
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::config::EmuConfig;
use crate::arq::ConfigError;
use crate::sim::SimTime;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSpec {
    #[serde(default)]
    pub window: Option<usize>,
    #[serde(default)]
    pub seq_space: Option<u32>,
    #[serde(default)]
    pub rto: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    #[serde(default)]
    pub loss_prob: Option<f64>,
    #[serde(default)]
    pub corrupt_prob: Option<f64>,
    #[serde(default)]
    pub min_delay: Option<f64>,
    #[serde(default)]
    pub max_extra_delay: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub protocol: Option<ProtocolSpec>,
    #[serde(default)]
    pub channel: Option<ChannelSpec>,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub mean_gap: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub until: Option<f64>,
}

fn positive(name: &'static str, value: f64) -> Result<SimTime, ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(SimTime::from_units_f64(value))
}

impl ScenarioSpec {
    pub fn from_json(raw: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// 把场景中出现的字段覆盖到 `cfg` 上。
    pub fn apply(&self, cfg: &mut EmuConfig) -> Result<(), ConfigError> {
        if let Some(p) = &self.protocol {
            if let Some(w) = p.window {
                cfg.arq.window = w;
            }
            if let Some(n) = p.seq_space {
                cfg.arq.seq_space = n;
            }
            if let Some(rto) = p.rto {
                cfg.arq.rto = positive("rto", rto)?;
            }
        }
        if let Some(c) = &self.channel {
            if let Some(p) = c.loss_prob {
                cfg.channel.loss_prob = p;
            }
            if let Some(p) = c.corrupt_prob {
                cfg.channel.corrupt_prob = p;
            }
            if let Some(d) = c.min_delay {
                cfg.channel.min_delay = SimTime::from_units_f64(d);
            }
            if let Some(d) = c.max_extra_delay {
                cfg.channel.max_extra_delay = SimTime::from_units_f64(d);
            }
        }
        if let Some(m) = self.messages {
            cfg.messages = m;
        }
        if let Some(g) = self.mean_gap {
            cfg.mean_gap = positive("mean_gap", g)?;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(u) = self.until {
            cfg.until = SimTime::from_units_f64(u);
        }
        Ok(())
    }

    /// 默认配置 + 场景覆盖，并做一次整体校验。
    pub fn to_config(&self) -> Result<EmuConfig, ScenarioError> {
        let mut cfg = EmuConfig::default();
        self.apply(&mut cfg)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
