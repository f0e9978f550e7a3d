//! 仿真环境配置（可从 JSON 读取，缺省字段取默认值）

use serde::{Deserialize, Serialize};

use crate::arq::{ArqConfig, ConfigError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmuConfig {
    /// 应用层一共产生多少条消息
    pub msgs: u64,
    /// 丢包概率
    pub loss_prob: f64,
    /// 损坏概率
    pub corrupt_prob: f64,
    /// 两条消息之间的平均间隔（时间单位）
    pub lambda: f64,
    pub seed: u64,
    /// 仿真时间上限（时间单位）；不设则运行到全部消息交付或判定停滞为止
    pub until: Option<f64>,
    /// 消息全部产生后，连续这么多次超时都没有新 ACK 即判定停滞并结束
    pub max_idle_timeouts: u32,
    pub arq: ArqConfig,
}

impl Default for EmuConfig {
    fn default() -> Self {
        Self {
            msgs: 20,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            lambda: 10.0,
            seed: 1234,
            until: None,
            max_idle_timeouts: 50,
            arq: ArqConfig::default(),
        }
    }
}

impl EmuConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arq.validate()?;
        for (name, value) in [("loss_prob", self.loss_prob), ("corrupt_prob", self.corrupt_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Err(ConfigError::InvalidLambda(self.lambda));
        }
        if self.max_idle_timeouts == 0 {
            return Err(ConfigError::ZeroIdleTimeouts);
        }
        Ok(())
    }
}
