//! 错误类型
//!
//! 协议本身没有致命错误：损坏、丢失、重复都靠重传恢复。
//! 这里只有两类：发送被窗口拒绝，以及配置非法。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArqError {
    /// 窗口已满，消息未被接受；状态未改变，由调用方稍后重试。
    #[error("send window is full (base={base}, next_seq={next_seq})")]
    WindowFull { base: usize, next_seq: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window_size must be at least 1")]
    EmptyWindow,
    #[error("seq_space ({seq_space}) must be at least window_size + 1 ({window_size} + 1)")]
    SeqSpaceTooSmall { seq_space: usize, window_size: usize },
    #[error("seq_space ({0}) does not fit the 32-bit sequence field")]
    SeqSpaceTooLarge(usize),
    #[error("rtt must be a positive finite number, got {0}")]
    InvalidRtt(f64),
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("lambda (mean time between messages) must be positive, got {0}")]
    InvalidLambda(f64),
    #[error("max_idle_timeouts must be at least 1")]
    ZeroIdleTimeouts,
}
