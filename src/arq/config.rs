//! 协议常量与配置

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// 往返时间（重传定时器时长，时间单位）
pub const RTT: f64 = 16.0;
/// 发送窗口：最多允许的未确认分组数
pub const WINDOWSIZE: usize = 6;
/// 序号空间：序号取值 `[0, SEQSPACE)`，至少为 `WINDOWSIZE + 1`
pub const SEQSPACE: usize = 7;
/// 不使用的头部字段填充值
pub const NOTINUSE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArqConfig {
    /// 重传定时器时长（时间单位）
    pub rtt: f64,
    /// 发送窗口大小
    pub window_size: usize,
    /// 序号空间大小
    pub seq_space: usize,
}

impl Default for ArqConfig {
    fn default() -> Self {
        Self {
            rtt: RTT,
            window_size: WINDOWSIZE,
            seq_space: SEQSPACE,
        }
    }
}

impl ArqConfig {
    /// 检查窗口/序号空间约束：`seq_space >= window_size + 1`，
    /// 否则取模后无法区分“已发未确认”与“新分配”的序号。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.seq_space < self.window_size.saturating_add(1) {
            return Err(ConfigError::SeqSpaceTooSmall {
                seq_space: self.seq_space,
                window_size: self.window_size,
            });
        }
        if i32::try_from(self.seq_space).is_err() {
            return Err(ConfigError::SeqSpaceTooLarge(self.seq_space));
        }
        if !(self.rtt.is_finite() && self.rtt > 0.0) {
            return Err(ConfigError::InvalidRtt(self.rtt));
        }
        Ok(())
    }
}
